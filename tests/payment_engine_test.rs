mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use dailyreel::{
    domain::{
        CreatePaymentRequest, PaymentMethod, PaymentReason, PaymentStatus,
        UpdatePaymentStatusRequest,
    },
    error::AppError,
    repository::{PaymentRepository, UserRepository},
    service::payment_service::{DEFAULT_REWARD_CENTS, MIN_STREAK_DAYS, PAYMENT_DUE_DAYS},
};

fn create_request(user_id: Uuid) -> CreatePaymentRequest {
    CreatePaymentRequest {
        user_id,
        amount_cents: None,
        payment_method: PaymentMethod::Upi,
        admin_notes: None,
    }
}

#[tokio::test]
async fn streak_below_threshold_is_ineligible() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Eve", "eve@example.com").await?;
    common::set_streak(&pool, user.id, MIN_STREAK_DAYS - 1, 12, 40, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let err = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Ineligible(_)));

    Ok(())
}

#[tokio::test]
async fn incomplete_payout_details_are_ineligible() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Finn", "finn@example.com").await?;
    common::set_streak(&pool, user.id, MIN_STREAK_DAYS, 12, 40, Some(Utc::now())).await?;
    // No payout details on file

    let err = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Ineligible(_)));

    Ok(())
}

#[tokio::test]
async fn eligible_user_gets_pending_payment_with_snapshot() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Gail", "gail@example.com").await?;
    common::set_streak(&pool, user.id, MIN_STREAK_DAYS, 12, 40, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let now = Utc::now();
    let payment = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, now)
        .await?;

    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.streak_days, MIN_STREAK_DAYS);
    assert_eq!(payment.amount_cents, DEFAULT_REWARD_CENTS);
    assert_eq!(payment.payment_reason, PaymentReason::StreakReward);
    assert!(payment.processed_at.is_none());
    // Due a week out, and not overdue at creation
    let expected_due = now + Duration::days(PAYMENT_DUE_DAYS);
    assert!((payment.due_date - expected_due).num_seconds().abs() <= 1);
    assert!(!payment.is_overdue(now));

    Ok(())
}

#[tokio::test]
async fn second_payment_for_same_user_conflicts() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Hank", "hank@example.com").await?;
    common::set_streak(&pool, user.id, 15, 15, 50, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    ctx.payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await?;

    let err = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn concurrent_creation_attempts_yield_one_payment() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Iris", "iris@example.com").await?;
    common::set_streak(&pool, user.id, 15, 15, 50, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let ctx = Arc::clone(&ctx);
        let user_id = user.id;
        let actor = admin.id;
        handles.push(tokio::spawn(async move {
            ctx.payment_service
                .create_payment(create_request(user_id), actor, Utc::now())
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await?.is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let payments = ctx
        .payment_service
        .list_payments(None, Some(user.id), 10, 0)
        .await?;
    assert_eq!(payments.len(), 1);

    Ok(())
}

#[tokio::test]
async fn completion_stamps_processor_and_terminal_states_are_final() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Jo", "jo@example.com").await?;
    common::set_streak(&pool, user.id, 11, 11, 30, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let payment = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await?;

    let completed = ctx
        .payment_service
        .update_status(
            payment.id,
            UpdatePaymentStatusRequest {
                status: PaymentStatus::Completed,
                admin_notes: Some("paid via UPI".to_string()),
            },
            admin.id,
            Utc::now(),
        )
        .await?;
    assert_eq!(completed.status, PaymentStatus::Completed);
    assert_eq!(completed.processed_by, Some(admin.id));
    assert!(completed.processed_at.is_some());

    // No transition out of a terminal state
    let err = ctx
        .payment_service
        .update_status(
            payment.id,
            UpdatePaymentStatusRequest {
                status: PaymentStatus::Pending,
                admin_notes: None,
            },
            admin.id,
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    Ok(())
}

#[tokio::test]
async fn failed_payment_does_not_stamp_processor() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Kim", "kim@example.com").await?;
    common::set_streak(&pool, user.id, 11, 11, 30, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let payment = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await?;

    let failed = ctx
        .payment_service
        .update_status(
            payment.id,
            UpdatePaymentStatusRequest {
                status: PaymentStatus::Failed,
                admin_notes: None,
            },
            admin.id,
            Utc::now(),
        )
        .await?;
    assert_eq!(failed.status, PaymentStatus::Failed);
    assert!(failed.processed_at.is_none());
    assert!(failed.processed_by.is_none());

    Ok(())
}

#[tokio::test]
async fn stale_write_cannot_resurrect_settled_payment() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Mia", "mia@example.com").await?;
    common::set_streak(&pool, user.id, 11, 11, 30, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let payment = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await?;

    // Two admins read the same pending payment
    let mut first = ctx
        .payment_repo
        .find_by_id(payment.id)
        .await?
        .expect("payment exists");
    let mut stale = first.clone();

    first.status = PaymentStatus::Completed;
    first.processed_by = Some(admin.id);
    first.processed_at = Some(Utc::now());
    ctx.payment_repo.update(payment.id, first).await?;

    // The second write was computed while the payment was still pending;
    // it must not land over the settled row
    stale.status = PaymentStatus::Cancelled;
    let err = ctx.payment_repo.update(payment.id, stale).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    let current = ctx
        .payment_repo
        .find_by_id(payment.id)
        .await?
        .expect("payment exists");
    assert_eq!(current.status, PaymentStatus::Completed);
    assert_eq!(current.processed_by, Some(admin.id));
    assert!(current.processed_at.is_some());

    // The user still counts as paid, so no second payout can be created
    assert!(ctx
        .payment_repo
        .find_active_streak_reward(user.id)
        .await?
        .is_some());

    Ok(())
}

#[tokio::test]
async fn pending_to_pending_is_rejected() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Nia", "nia@example.com").await?;
    common::set_streak(&pool, user.id, 11, 11, 30, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let payment = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, Utc::now())
        .await?;

    let err = ctx
        .payment_service
        .update_status(
            payment.id,
            UpdatePaymentStatusRequest {
                status: PaymentStatus::Pending,
                admin_notes: None,
            },
            admin.id,
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)));

    Ok(())
}

#[test]
fn out_of_enum_status_is_rejected_at_deserialization() {
    let result: Result<UpdatePaymentStatusRequest, _> =
        serde_json::from_str(r#"{"status": "refunded"}"#);
    assert!(result.is_err());
}

#[tokio::test]
async fn overdue_is_derived_from_due_date() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;
    let user = common::create_user(&ctx, "Lee", "lee@example.com").await?;
    common::set_streak(&pool, user.id, 11, 11, 30, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(user.id, common::upi_payout())
        .await?;

    let created_at = Utc::now() - Duration::days(10);
    let payment = ctx
        .payment_service
        .create_payment(create_request(user.id), admin.id, created_at)
        .await?;

    // Created 10 days ago with a 7-day window: overdue now, not then
    assert!(!payment.is_overdue(created_at));
    let payment = ctx.payment_service.get_payment(payment.id).await?;
    assert!(payment.is_overdue(Utc::now()));

    let stats = ctx.payment_service.stats(Utc::now()).await?;
    assert_eq!(stats.pending_payments, 1);
    assert_eq!(stats.overdue_payments, 1);

    Ok(())
}

#[tokio::test]
async fn eligible_users_excludes_paid_and_incomplete() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;

    // Qualifies outright
    let ready = common::create_user(&ctx, "Ready", "ready@example.com").await?;
    common::set_streak(&pool, ready.id, 12, 12, 40, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(ready.id, common::upi_payout())
        .await?;

    // Streak too short
    let short = common::create_user(&ctx, "Short", "short@example.com").await?;
    common::set_streak(&pool, short.id, 9, 9, 20, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(short.id, common::upi_payout())
        .await?;

    // Qualifying streak, no payout details
    let no_payout = common::create_user(&ctx, "NoPayout", "nopayout@example.com").await?;
    common::set_streak(&pool, no_payout.id, 14, 14, 40, Some(Utc::now())).await?;

    // Qualifying but already holds an active payment
    let paid = common::create_user(&ctx, "Paid", "paid@example.com").await?;
    common::set_streak(&pool, paid.id, 16, 16, 50, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(paid.id, common::upi_payout())
        .await?;
    ctx.payment_service
        .create_payment(create_request(paid.id), admin.id, Utc::now())
        .await?;

    let eligible = ctx.payment_service.eligible_users().await?;
    let ids: Vec<Uuid> = eligible.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![ready.id]);

    Ok(())
}

#[tokio::test]
async fn streak_at_threshold_boundary() -> anyhow::Result<()> {
    let (pool, ctx) = common::test_context().await?;
    let admin = common::create_user(&ctx, "Admin", "admin@example.com").await?;

    let nine = common::create_user(&ctx, "Nine", "nine@example.com").await?;
    common::set_streak(&pool, nine.id, 9, 9, 20, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(nine.id, common::upi_payout())
        .await?;

    let ten = common::create_user(&ctx, "Ten", "ten@example.com").await?;
    common::set_streak(&pool, ten.id, 10, 10, 20, Some(Utc::now())).await?;
    ctx.user_repo
        .update_payout_details(ten.id, common::upi_payout())
        .await?;

    assert!(ctx
        .payment_service
        .create_payment(create_request(nine.id), admin.id, Utc::now())
        .await
        .is_err());
    assert!(ctx
        .payment_service
        .create_payment(create_request(ten.id), admin.id, Utc::now())
        .await
        .is_ok());

    Ok(())
}
