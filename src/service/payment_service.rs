use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{
        CreatePaymentRequest, Payment, PaymentReason, PaymentStats, PaymentStatus,
        PayoutDisplayInfo, UpdatePaymentStatusRequest,
    },
    error::{AppError, Result},
    repository::{PaymentRepository, UserRepository},
};

/// Streak length at which a user qualifies for the cash reward.
pub const MIN_STREAK_DAYS: i64 = 10;
/// Days the admin team has to disburse before a payment counts as overdue.
pub const PAYMENT_DUE_DAYS: i64 = 7;
/// Standard streak reward when no amount is given: $100.
pub const DEFAULT_REWARD_CENTS: i64 = 10_000;

#[derive(Debug, Clone, Serialize)]
pub struct EligibleUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub payout_display: PayoutDisplayInfo,
    pub created_at: DateTime<Utc>,
}

pub struct PaymentService {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentService {
    pub fn new(users: Arc<dyn UserRepository>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { users, payments }
    }

    /// Creates a pending streak-reward payment for an eligible user.
    ///
    /// Preconditions, first failure wins: the user exists, the streak is at
    /// least `MIN_STREAK_DAYS`, payout details are complete, and no active
    /// streak-reward payment exists. The partial unique index backstops the
    /// final check under concurrent creation.
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
        actor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let user = self
            .users
            .find_by_id(request.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.current_streak < MIN_STREAK_DAYS {
            return Err(AppError::Ineligible(format!(
                "User is not eligible for payment. Minimum {}-day streak required.",
                MIN_STREAK_DAYS
            )));
        }

        if !user.payout_complete() {
            return Err(AppError::Ineligible(
                "User has not completed payout information setup.".to_string(),
            ));
        }

        if self
            .payments
            .find_active_streak_reward(request.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Payment already exists for this user".to_string(),
            ));
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            amount_cents: request.amount_cents.unwrap_or(DEFAULT_REWARD_CENTS),
            currency: "USD".to_string(),
            status: PaymentStatus::Pending,
            payment_method: request.payment_method,
            // Snapshot of the streak that earned this payment.
            streak_days: user.current_streak,
            eligible_for_payment: true,
            payment_reason: PaymentReason::StreakReward,
            admin_notes: request.admin_notes,
            processed_by: None,
            processed_at: None,
            due_date: now + Duration::days(PAYMENT_DUE_DAYS),
            reminder_count: 0,
            created_at: now,
            updated_at: now,
        };

        let payment = self.payments.create(payment).await?;

        tracing::info!(
            payment_id = %payment.id,
            user_id = %payment.user_id,
            actor_id = %actor_id,
            streak_days = payment.streak_days,
            "Created streak-reward payment"
        );

        Ok(payment)
    }

    /// Moves a payment to a new status. Pending is the only state with
    /// outgoing transitions; completion stamps processed_at/processed_by.
    pub async fn update_status(
        &self,
        payment_id: Uuid,
        request: UpdatePaymentStatusRequest,
        actor_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Payment> {
        let mut payment = self
            .payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.status.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Payment is already {:?} and cannot change status",
                payment.status
            )));
        }

        if request.status == PaymentStatus::Pending {
            return Err(AppError::InvalidTransition(
                "Payment is already pending".to_string(),
            ));
        }

        payment.status = request.status;
        if let Some(notes) = request.admin_notes {
            payment.admin_notes = Some(notes);
        }
        if request.status == PaymentStatus::Completed {
            payment.processed_at = Some(now);
            payment.processed_by = Some(actor_id);
        }

        self.payments.update(payment_id, payment).await
    }

    pub async fn get_payment(&self, payment_id: Uuid) -> Result<Payment> {
        self.payments
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }

    pub async fn list_payments(
        &self,
        status: Option<PaymentStatus>,
        user_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>> {
        self.payments.list(status, user_id, limit, offset).await
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> Result<PaymentStats> {
        self.payments.stats(now).await
    }

    /// Users at the streak threshold with payout details on file and no
    /// active streak-reward payment. The payment set difference happens in
    /// SQL; payout completeness is a per-variant check, so it is applied
    /// here.
    pub async fn eligible_users(&self) -> Result<Vec<EligibleUser>> {
        let candidates = self.users.list_streak_qualified(MIN_STREAK_DAYS).await?;

        Ok(candidates
            .into_iter()
            .filter_map(|user| {
                let payout = user.payout.as_ref()?;
                if !payout.is_complete() {
                    return None;
                }
                let payout_display = payout.display_info();
                Some(EligibleUser {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    current_streak: user.current_streak,
                    longest_streak: user.longest_streak,
                    payout_display,
                    created_at: user.created_at,
                })
            })
            .collect())
    }
}
