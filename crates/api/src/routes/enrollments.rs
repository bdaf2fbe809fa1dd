//! Enrollment routes: binding, overrides and the fee preview.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_core::fees::PreviewOutcome;
use tadika_db::{
    EnrollmentRepository,
    entities::{enrollment_fee_adjustments, enrollments},
    repositories::{CreateEnrollmentInput, EnrollmentWithStudent, UpsertAdjustmentInput},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::school::YearQuery;
use crate::{
    AppState, ApiResult,
    extractors::{ValidatedJson, storable_amount},
    middleware::AuthUser,
};

/// Creates the enrollment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/enrollments", get(list_enrollments).post(create_enrollment))
        .route("/enrollments/{enrollment_id}", get(get_enrollment))
        .route(
            "/enrollments/{enrollment_id}/fee-package",
            put(assign_fee_package),
        )
        .route("/enrollments/{enrollment_id}/class", put(assign_class))
        .route(
            "/enrollments/{enrollment_id}/adjustments/{fee_item_id}",
            put(upsert_adjustment).delete(remove_adjustment),
        )
        .route(
            "/enrollments/{enrollment_id}/fee-preview",
            get(fee_preview),
        )
}

/// Request body for enrolling a student.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEnrollmentRequest {
    pub student_id: Uuid,
    pub academic_year_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub level: String,
    #[validate(length(min = 1, max = 50))]
    pub program_type: String,
    /// First enrollment at the school; returning students get automatic waivers.
    pub is_new_student: bool,
    pub class_id: Option<Uuid>,
    pub fee_package_id: Option<Uuid>,
}

/// Request body for binding a fee package.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignPackageRequest {
    pub fee_package_id: Uuid,
}

/// Request body for assigning a class.
#[derive(Debug, Deserialize, Validate)]
pub struct AssignClassRequest {
    pub class_id: Uuid,
}

/// Request body for a manual fee override.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustmentRequest {
    /// Signed delta applied to the line; negative is a discount.
    #[validate(custom(function = "storable_amount"))]
    pub amount: Decimal,
    /// Replacement quantity.
    #[validate(range(min = 1))]
    pub quantity: Option<u32>,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Enrollment with the student's name.
#[derive(Debug, Serialize)]
pub struct EnrollmentResponse {
    #[serde(flatten)]
    pub enrollment: enrollments::Model,
    pub student_name: String,
}

impl From<EnrollmentWithStudent> for EnrollmentResponse {
    fn from(row: EnrollmentWithStudent) -> Self {
        Self {
            enrollment: row.enrollment,
            student_name: row.student_name,
        }
    }
}

/// GET `/enrollments?academic_year_id=` - Enrollments of one year.
async fn list_enrollments(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Vec<EnrollmentResponse>>> {
    let repo = EnrollmentRepository::new((*state.db).clone());
    let rows = repo.list_by_year(query.academic_year_id).await?;
    Ok(Json(rows.into_iter().map(EnrollmentResponse::from).collect()))
}

/// POST `/enrollments` - Enroll a student in a year.
async fn create_enrollment(
    State(state): State<AppState>,
    admin: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateEnrollmentRequest>,
) -> ApiResult<(StatusCode, Json<enrollments::Model>)> {
    let repo = EnrollmentRepository::new((*state.db).clone());

    let enrollment = repo
        .create(CreateEnrollmentInput {
            student_id: payload.student_id,
            academic_year_id: payload.academic_year_id,
            level: payload.level,
            program_type: payload.program_type,
            is_new_student: payload.is_new_student,
            class_id: payload.class_id,
            fee_package_id: payload.fee_package_id,
        })
        .await?;

    info!(admin_id = %admin.user_id(), enrollment_id = %enrollment.id, "Enrollment created via API");
    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// GET `/enrollments/{enrollment_id}` - One enrollment.
async fn get_enrollment(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
) -> ApiResult<Json<EnrollmentResponse>> {
    let repo = EnrollmentRepository::new((*state.db).clone());
    Ok(Json(repo.get(enrollment_id).await?.into()))
}

/// PUT `/enrollments/{enrollment_id}/fee-package` - Bind or replace the package.
async fn assign_fee_package(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(enrollment_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignPackageRequest>,
) -> ApiResult<Json<enrollments::Model>> {
    let repo = EnrollmentRepository::new((*state.db).clone());
    let enrollment = repo
        .assign_fee_package(enrollment_id, payload.fee_package_id)
        .await?;

    info!(
        admin_id = %admin.user_id(),
        %enrollment_id,
        fee_package_id = %payload.fee_package_id,
        "Fee package assigned via API"
    );
    Ok(Json(enrollment))
}

/// PUT `/enrollments/{enrollment_id}/class` - Place the student in a class.
async fn assign_class(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<AssignClassRequest>,
) -> ApiResult<Json<enrollments::Model>> {
    let repo = EnrollmentRepository::new((*state.db).clone());
    Ok(Json(repo.assign_class(enrollment_id, payload.class_id).await?))
}

/// PUT `/enrollments/{enrollment_id}/adjustments/{fee_item_id}` - Create or replace an override.
async fn upsert_adjustment(
    State(state): State<AppState>,
    admin: AuthUser,
    Path((enrollment_id, fee_item_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<AdjustmentRequest>,
) -> ApiResult<Json<enrollment_fee_adjustments::Model>> {
    let repo = EnrollmentRepository::new((*state.db).clone());

    let adjustment = repo
        .upsert_adjustment(
            enrollment_id,
            fee_item_id,
            UpsertAdjustmentInput {
                amount: payload.amount,
                quantity: payload.quantity,
                reason: payload.reason,
            },
        )
        .await?;

    info!(
        admin_id = %admin.user_id(),
        %enrollment_id,
        %fee_item_id,
        amount = %adjustment.amount,
        "Fee adjustment saved via API"
    );
    Ok(Json(adjustment))
}

/// DELETE `/enrollments/{enrollment_id}/adjustments/{fee_item_id}` - Drop an override.
async fn remove_adjustment(
    State(state): State<AppState>,
    Path((enrollment_id, fee_item_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let repo = EnrollmentRepository::new((*state.db).clone());
    repo.remove_adjustment(enrollment_id, fee_item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/enrollments/{enrollment_id}/fee-preview` - Current fee breakdown.
///
/// An enrollment without a package answers `{"status": "no_package", ...}`.
async fn fee_preview(
    State(state): State<AppState>,
    Path(enrollment_id): Path<Uuid>,
) -> ApiResult<Json<PreviewOutcome>> {
    let repo = EnrollmentRepository::new((*state.db).clone());
    Ok(Json(repo.preview(enrollment_id).await?))
}
