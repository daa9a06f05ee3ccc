use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentUser, state::AppState},
    domain::{CreatePaymentRequest, Payment, PaymentStats, PaymentStatus, UpdatePaymentStatusRequest},
    error::Result,
    service::EligibleUser,
};

#[derive(Debug, Serialize)]
pub struct PaymentDto {
    #[serde(flatten)]
    pub payment: Payment,
    /// Derived at read time, never stored.
    pub is_overdue: bool,
    pub days_until_due: i64,
}

impl From<Payment> for PaymentDto {
    fn from(payment: Payment) -> Self {
        let now = Utc::now();
        Self {
            is_overdue: payment.is_overdue(now),
            days_until_due: payment.days_until_due(now),
            payment,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<PaymentStatus>,
    pub user_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

pub async fn create(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreatePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentDto>)> {
    let payment = state
        .service_context
        .payment_service
        .create_payment(request, current.user.id, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(payment.into())))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentDto>> {
    let payment = state.service_context.payment_service.get_payment(id).await?;
    Ok(Json(payment.into()))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PaymentDto>>> {
    let payments = state
        .service_context
        .payment_service
        .list_payments(params.status, params.user_id, params.limit, params.offset)
        .await?;

    Ok(Json(payments.into_iter().map(PaymentDto::from).collect()))
}

pub async fn update_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePaymentStatusRequest>,
) -> Result<Json<PaymentDto>> {
    let payment = state
        .service_context
        .payment_service
        .update_status(id, request, current.user.id, Utc::now())
        .await?;

    Ok(Json(payment.into()))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<PaymentStats>> {
    let stats = state
        .service_context
        .payment_service
        .stats(Utc::now())
        .await?;

    Ok(Json(stats))
}

pub async fn eligible_users(State(state): State<AppState>) -> Result<Json<Vec<EligibleUser>>> {
    let users = state
        .service_context
        .payment_service
        .eligible_users()
        .await?;

    Ok(Json(users))
}
