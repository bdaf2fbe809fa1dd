//! Billing routes: instance generation, book charges and statements.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tadika_db::{
    BillingRepository,
    entities::book_instances,
    repositories::{BillingStatement, GenerationSummary},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState, ApiResult,
    extractors::{ValidatedJson, non_negative_amount},
    middleware::AuthUser,
};

/// Creates the billing routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/enrollments/{enrollment_id}/billing/generate",
            post(generate_billing),
        )
        .route("/enrollments/{enrollment_id}/billing", get(get_statement))
        .route("/enrollments/{enrollment_id}/books", post(add_book))
}

/// Request body for charging a book.
#[derive(Debug, Deserialize, Validate)]
pub struct AddBookRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub amount: Decimal,
}

/// POST `/enrollments/{enrollment_id}/billing/generate` - Create missing instances.
///
/// Safe to repeat: rows that already exist are left untouched.
async fn generate_billing(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(enrollment_id): Path<Uuid>,
) -> ApiResult<Json<GenerationSummary>> {
    let repo = BillingRepository::new((*state.db).clone());
    let summary = repo
        .generate(enrollment_id, state.billing.academic_months)
        .await?;

    state.dashboard_cache.invalidate_all();

    info!(
        admin_id = %admin.user_id(),
        %enrollment_id,
        misc_fees = summary.misc_fees_created,
        monthly_fees = summary.monthly_fees_created,
        "Billing generated via API"
    );
    Ok(Json(summary))
}

/// GET `/enrollments/{enrollment_id}/billing` - Every instance with its balance.
async fn get_statement(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
) -> ApiResult<Json<BillingStatement>> {
    let repo = BillingRepository::new((*state.db).clone());
    Ok(Json(repo.statement(enrollment_id).await?))
}

/// POST `/enrollments/{enrollment_id}/books` - Charge a book to the enrollment.
async fn add_book(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(enrollment_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AddBookRequest>,
) -> ApiResult<(StatusCode, Json<book_instances::Model>)> {
    let repo = BillingRepository::new((*state.db).clone());
    let book = repo
        .add_book(enrollment_id, payload.title, payload.amount)
        .await?;

    state.dashboard_cache.invalidate_all();

    info!(admin_id = %admin.user_id(), %enrollment_id, book_id = %book.id, "Book charged via API");
    Ok((StatusCode::CREATED, Json(book)))
}
