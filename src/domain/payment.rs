use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_cents: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// The user's streak at creation time. A snapshot, never re-derived.
    pub streak_days: i64,
    pub eligible_for_payment: bool,
    pub payment_reason: PaymentReason,
    pub admin_notes: Option<String>,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub due_date: DateTime<Utc>,
    pub reminder_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl PaymentStatus {
    /// Completed, failed and cancelled payments never change status again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
    Upi,
    Wallet,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentReason {
    StreakReward,
    PremiumUpgrade,
    Subscription,
    Bonus,
}

impl Payment {
    /// Overdue is derived at read time, never stored, so it can't go stale.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == PaymentStatus::Pending && now > self.due_date
    }

    pub fn days_until_due(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.due_date - now;
        // Round up, matching "due in N days" on the admin screens.
        (remaining.num_seconds() as f64 / 86_400.0).ceil() as i64
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub user_id: Uuid,
    /// Cents; defaults to the standard streak reward when omitted.
    pub amount_cents: Option<i64>,
    pub payment_method: PaymentMethod,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentStats {
    pub total_payments: i64,
    pub pending_payments: i64,
    pub completed_payments: i64,
    pub failed_payments: i64,
    pub total_amount_cents: i64,
    pub overdue_payments: i64,
}
