pub mod auth;
pub mod payments;
pub mod rewards;
pub mod root;
pub mod topics;
pub mod uploads;
pub mod users;
