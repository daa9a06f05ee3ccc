use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Payment, PaymentMethod, PaymentReason, PaymentStats, PaymentStatus},
    error::{AppError, Result},
    repository::PaymentRepository,
};

#[derive(FromRow)]
struct PaymentRow {
    id: String,
    user_id: String,
    amount_cents: i64,
    currency: String,
    status: String,
    payment_method: String,
    streak_days: i64,
    eligible_for_payment: bool,
    payment_reason: String,
    admin_notes: Option<String>,
    processed_by: Option<String>,
    processed_at: Option<NaiveDateTime>,
    due_date: NaiveDateTime,
    reminder_count: i64,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

const PAYMENT_COLUMNS: &str = r#"
    id, user_id, amount_cents, currency, status, payment_method,
    streak_days, eligible_for_payment, payment_reason, admin_notes,
    processed_by, processed_at, due_date, reminder_count,
    created_at, updated_at
"#;

pub struct SqlitePaymentRepository {
    pool: SqlitePool,
}

impl SqlitePaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_payment(row: PaymentRow) -> Result<Payment> {
        Ok(Payment {
            id: parse_uuid(&row.id)?,
            user_id: parse_uuid(&row.user_id)?,
            amount_cents: row.amount_cents,
            currency: row.currency,
            status: parse_status(&row.status)?,
            payment_method: parse_method(&row.payment_method)?,
            streak_days: row.streak_days,
            eligible_for_payment: row.eligible_for_payment,
            payment_reason: parse_reason(&row.payment_reason)?,
            admin_notes: row.admin_notes,
            processed_by: row.processed_by.as_deref().map(parse_uuid).transpose()?,
            processed_at: row
                .processed_at
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            due_date: DateTime::from_naive_utc_and_offset(row.due_date, Utc),
            reminder_count: row.reminder_count,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| AppError::Database(e.to_string()))
}

fn parse_status(s: &str) -> Result<PaymentStatus> {
    match s {
        "pending" => Ok(PaymentStatus::Pending),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        "cancelled" => Ok(PaymentStatus::Cancelled),
        _ => Err(AppError::Database(format!("Invalid payment status: {}", s))),
    }
}

pub(crate) fn status_to_str(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Completed => "completed",
        PaymentStatus::Failed => "failed",
        PaymentStatus::Cancelled => "cancelled",
    }
}

fn parse_method(s: &str) -> Result<PaymentMethod> {
    match s {
        "credit_card" => Ok(PaymentMethod::CreditCard),
        "debit_card" => Ok(PaymentMethod::DebitCard),
        "paypal" => Ok(PaymentMethod::Paypal),
        "bank_transfer" => Ok(PaymentMethod::BankTransfer),
        "upi" => Ok(PaymentMethod::Upi),
        "wallet" => Ok(PaymentMethod::Wallet),
        _ => Err(AppError::Database(format!("Invalid payment method: {}", s))),
    }
}

pub(crate) fn method_to_str(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::CreditCard => "credit_card",
        PaymentMethod::DebitCard => "debit_card",
        PaymentMethod::Paypal => "paypal",
        PaymentMethod::BankTransfer => "bank_transfer",
        PaymentMethod::Upi => "upi",
        PaymentMethod::Wallet => "wallet",
    }
}

fn parse_reason(s: &str) -> Result<PaymentReason> {
    match s {
        "streak_reward" => Ok(PaymentReason::StreakReward),
        "premium_upgrade" => Ok(PaymentReason::PremiumUpgrade),
        "subscription" => Ok(PaymentReason::Subscription),
        "bonus" => Ok(PaymentReason::Bonus),
        _ => Err(AppError::Database(format!("Invalid payment reason: {}", s))),
    }
}

pub(crate) fn reason_to_str(reason: PaymentReason) -> &'static str {
    match reason {
        PaymentReason::StreakReward => "streak_reward",
        PaymentReason::PremiumUpgrade => "premium_upgrade",
        PaymentReason::Subscription => "subscription",
        PaymentReason::Bonus => "bonus",
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepository {
    async fn create(&self, payment: Payment) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, user_id, amount_cents, currency, status, payment_method,
                streak_days, eligible_for_payment, payment_reason, admin_notes,
                processed_by, processed_at, due_date, reminder_count,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.id.to_string())
        .bind(payment.user_id.to_string())
        .bind(payment.amount_cents)
        .bind(&payment.currency)
        .bind(status_to_str(payment.status))
        .bind(method_to_str(payment.payment_method))
        .bind(payment.streak_days)
        .bind(payment.eligible_for_payment)
        .bind(reason_to_str(payment.payment_reason))
        .bind(&payment.admin_notes)
        .bind(payment.processed_by.map(|id| id.to_string()))
        .bind(payment.processed_at.map(|dt| dt.naive_utc()))
        .bind(payment.due_date.naive_utc())
        .bind(payment.reminder_count)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            // The partial unique index on active streak-reward payments fired:
            // another request won the race.
            Some(db) if db.is_unique_violation() => {
                AppError::Conflict("Payment already exists for this user".to_string())
            }
            _ => AppError::Database(e.to_string()),
        })?;

        self.find_by_id(payment.id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve created payment".to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            "SELECT {} FROM payments WHERE id = ?",
            PAYMENT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }

    async fn find_active_streak_reward(&self, user_id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE user_id = ?
              AND status IN ('pending', 'completed')
              AND payment_reason = 'streak_reward'
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::row_to_payment(r)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        status: Option<PaymentStatus>,
        user_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, PaymentRow>(&format!(
            r#"
            SELECT {}
            FROM payments
            WHERE (? IS NULL OR status = ?)
              AND (? IS NULL OR user_id = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
            PAYMENT_COLUMNS
        ))
        .bind(status.map(status_to_str))
        .bind(status.map(status_to_str))
        .bind(user_id.map(|id| id.to_string()))
        .bind(user_id.map(|id| id.to_string()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }

    async fn update(&self, id: Uuid, payment: Payment) -> Result<Payment> {
        let now = Utc::now().naive_utc();

        // Only pending rows are writable. A caller working from a stale read
        // cannot overwrite a payment another admin already settled.
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = ?,
                admin_notes = ?,
                processed_by = ?,
                processed_at = ?,
                reminder_count = ?,
                updated_at = ?
            WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(status_to_str(payment.status))
        .bind(&payment.admin_notes)
        .bind(payment.processed_by.map(|id| id.to_string()))
        .bind(payment.processed_at.map(|dt| dt.naive_utc()))
        .bind(payment.reminder_count)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(id).await? {
                Some(current) => Err(AppError::InvalidTransition(format!(
                    "Payment is already {:?} and cannot change status",
                    current.status
                ))),
                None => Err(AppError::NotFound("Payment not found".to_string())),
            };
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Database("Failed to retrieve updated payment".to_string()))
    }

    async fn stats(&self, now: DateTime<Utc>) -> Result<PaymentStats> {
        let (total, pending, completed, failed, total_amount, overdue): (
            i64,
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(CASE WHEN status = 'pending' THEN 1 END),
                COUNT(CASE WHEN status = 'completed' THEN 1 END),
                COUNT(CASE WHEN status = 'failed' THEN 1 END),
                COALESCE(SUM(CASE WHEN status = 'completed' THEN amount_cents END), 0),
                COUNT(CASE WHEN status = 'pending' AND due_date < ? THEN 1 END)
            FROM payments
            "#,
        )
        .bind(now.naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(PaymentStats {
            total_payments: total,
            pending_payments: pending,
            completed_payments: completed,
            failed_payments: failed,
            total_amount_cents: total_amount,
            overdue_payments: overdue,
        })
    }
}
