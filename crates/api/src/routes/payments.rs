//! Payment routes: logging, per-instance history and the dashboard.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_core::{
    dashboard::PaymentDashboard,
    payments::{InstanceKind, InstanceRef, PaymentMethod, PaymentStatus},
};
use tadika_db::{
    BillingRepository, PaymentRepository,
    entities::payments,
    repositories::{LogPaymentInput, PaymentReceipt},
};
use tadika_shared::types::AcademicYearId;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::school::YearQuery;
use crate::{
    AppState, ApiResult,
    extractors::{ValidatedJson, positive_amount},
    middleware::AuthUser,
};

/// Creates the payment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(log_payment))
        .route("/payments/dashboard", get(dashboard))
}

/// Request body for logging a payment.
#[derive(Debug, Deserialize, Validate)]
pub struct LogPaymentRequest {
    /// Instance being paid: `{"kind": "monthly" | "one_time" | "book", "id": ...}`.
    pub instance: InstanceRef,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Decimal,
    pub method: PaymentMethod,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    /// When the money was received; defaults to now.
    pub paid_at: Option<DateTime<Utc>>,
}

/// Query selecting one instance.
#[derive(Debug, Deserialize)]
pub struct InstanceQuery {
    pub kind: InstanceKind,
    pub instance_id: Uuid,
}

/// A logged payment with the instance's new balance.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub payment: payments::Model,
    pub instance: InstanceRef,
    pub enrollment_id: Uuid,
    pub amount_due: Decimal,
    pub amount_paid: Decimal,
    pub outstanding: Decimal,
    pub status: PaymentStatus,
}

impl PaymentResponse {
    fn new(instance: InstanceRef, receipt: PaymentReceipt) -> Self {
        Self {
            payment: receipt.payment,
            instance,
            enrollment_id: receipt.enrollment_id,
            amount_due: receipt.balance.amount_due,
            amount_paid: receipt.balance.amount_paid,
            outstanding: receipt.balance.outstanding(),
            status: receipt.status,
        }
    }
}

/// POST `/payments` - Record a payment against one instance.
async fn log_payment(
    State(state): State<AppState>,
    admin: AuthUser,
    ValidatedJson(payload): ValidatedJson<LogPaymentRequest>,
) -> ApiResult<(StatusCode, Json<PaymentResponse>)> {
    let repo = PaymentRepository::new((*state.db).clone());
    let instance = payload.instance;

    let receipt = repo
        .log_payment(
            LogPaymentInput {
                instance,
                amount: payload.amount,
                method: payload.method,
                note: payload.note,
                paid_at: payload.paid_at,
            },
            state.billing.overpayment_policy,
        )
        .await?;

    state.dashboard_cache.invalidate_all();

    info!(
        admin_id = %admin.user_id(),
        payment_id = %receipt.payment.id,
        %instance,
        "Payment logged via API"
    );
    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse::new(instance, receipt)),
    ))
}

/// GET `/payments?kind=&instance_id=` - Payments of one instance, oldest first.
async fn list_payments(
    State(state): State<AppState>,
    Query(query): Query<InstanceQuery>,
) -> ApiResult<Json<Vec<payments::Model>>> {
    let repo = PaymentRepository::new((*state.db).clone());
    let instance = InstanceRef::new(query.kind, query.instance_id);
    Ok(Json(repo.list_for_instance(instance).await?))
}

/// GET `/payments/dashboard?academic_year_id=` - Balances of every enrollment in a year.
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<PaymentDashboard>> {
    let year = AcademicYearId::from_uuid(query.academic_year_id);

    if let Some(cached) = state.dashboard_cache.get(year) {
        debug!(academic_year_id = %year, "Dashboard served from cache");
        return Ok(Json(PaymentDashboard::clone(&cached)));
    }

    let epoch = state.dashboard_cache.epoch();
    let repo = BillingRepository::new((*state.db).clone());
    let fresh = repo.dashboard(query.academic_year_id).await?;
    let dashboard = state.dashboard_cache.insert(epoch, fresh);

    Ok(Json(PaymentDashboard::clone(&dashboard)))
}
