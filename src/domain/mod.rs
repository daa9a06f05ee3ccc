pub mod payment;
pub mod payout;
pub mod reward;
pub mod topic;
pub mod user;
pub mod video;

pub use payment::{
    CreatePaymentRequest, Payment, PaymentMethod, PaymentReason, PaymentStats, PaymentStatus,
    UpdatePaymentStatusRequest,
};
pub use payout::{PayoutDetails, PayoutDisplayInfo, WalletType};
pub use reward::{CreateRewardRequest, Reward, RewardKind};
pub use topic::{CreateTopicRequest, Topic};
pub use user::{CreateUserRequest, StreakSnapshot, StreakUpdate, User, UserRole};
pub use video::{NewVideo, UploadRequest, Video};
