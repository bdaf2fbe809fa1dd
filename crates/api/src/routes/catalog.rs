//! Fee item and fee package routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tadika_core::catalog::{BillingPeriod, ChargeType, FeeItem, FeePackage, NewPackageLine};
use tadika_db::{
    CatalogRepository,
    repositories::{CreateFeeItemInput, CreateFeePackageInput, UpdateFeeItemInput},
};
use tadika_shared::types::FeeItemId;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::school::YearQuery;
use crate::{
    AppState, ApiResult,
    extractors::{ValidatedJson, non_negative_amount},
    middleware::AuthUser,
};

/// Creates the catalog routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fee-items", get(list_fee_items).post(create_fee_item))
        .route(
            "/fee-items/{fee_item_id}",
            put(update_fee_item).delete(delete_fee_item),
        )
        .route("/fee-packages", get(list_packages).post(create_package))
        .route("/fee-packages/{package_id}", get(get_package))
        .route("/fee-packages/{package_id}/active", put(set_package_active))
}

/// Request body for creating a fee item.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeeItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Unique short code (e.g., "REG").
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    #[validate(custom(function = "non_negative_amount"))]
    pub default_amount: Decimal,
    /// `one_time` or `monthly`.
    pub charge_type: ChargeType,
    #[serde(default)]
    pub is_waivable_for_returning_students: bool,
}

/// Request body for updating a fee item. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFeeItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(custom(function = "non_negative_amount"))]
    pub default_amount: Option<Decimal>,
    pub is_waivable_for_returning_students: Option<bool>,
    pub is_active: Option<bool>,
}

/// Query for listing fee items.
#[derive(Debug, Default, Deserialize)]
pub struct FeeItemQuery {
    /// Only return active items.
    #[serde(default)]
    pub active_only: bool,
}

/// One line of a package being created.
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PackageLineRequest {
    pub fee_item_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
    /// Package-specific unit price; the item's default applies when absent.
    #[validate(custom(function = "non_negative_amount"))]
    pub unit_amount: Option<Decimal>,
}

/// Request body for creating a fee package.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePackageRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub level: String,
    #[validate(length(min = 1, max = 50))]
    pub program_type: String,
    /// `monthly`, `termly` or `yearly`.
    pub billing_period: BillingPeriod,
    pub academic_year_id: Uuid,
    /// Months of monthly fees collected at enrollment.
    #[validate(range(min = 1))]
    pub upfront_months: Option<u32>,
    /// Items in display order.
    #[validate(length(min = 1), nested)]
    pub items: Vec<PackageLineRequest>,
}

/// Request body for activating or deactivating a package.
#[derive(Debug, Deserialize, Validate)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// GET `/fee-items` - List catalog items by name.
async fn list_fee_items(
    State(state): State<AppState>,
    Query(query): Query<FeeItemQuery>,
) -> ApiResult<Json<Vec<FeeItem>>> {
    let repo = CatalogRepository::new((*state.db).clone());
    Ok(Json(repo.list_fee_items(query.active_only).await?))
}

/// POST `/fee-items` - Add an item to the catalog.
async fn create_fee_item(
    State(state): State<AppState>,
    admin: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateFeeItemRequest>,
) -> ApiResult<(StatusCode, Json<FeeItem>)> {
    let repo = CatalogRepository::new((*state.db).clone());

    let item = repo
        .create_fee_item(CreateFeeItemInput {
            name: payload.name,
            code: payload.code,
            default_amount: payload.default_amount,
            charge_type: payload.charge_type,
            is_waivable_for_returning_students: payload.is_waivable_for_returning_students,
        })
        .await?;

    info!(admin_id = %admin.user_id(), fee_item_id = %item.id, code = %item.code, "Fee item created via API");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT `/fee-items/{fee_item_id}` - Update name, price or flags.
async fn update_fee_item(
    State(state): State<AppState>,
    Path(fee_item_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateFeeItemRequest>,
) -> ApiResult<Json<FeeItem>> {
    let repo = CatalogRepository::new((*state.db).clone());

    let item = repo
        .update_fee_item(
            fee_item_id,
            UpdateFeeItemInput {
                name: payload.name,
                default_amount: payload.default_amount,
                is_waivable_for_returning_students: payload.is_waivable_for_returning_students,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(item))
}

/// DELETE `/fee-items/{fee_item_id}` - Remove an unreferenced item.
async fn delete_fee_item(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(fee_item_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = CatalogRepository::new((*state.db).clone());
    repo.delete_fee_item(fee_item_id).await?;

    info!(admin_id = %admin.user_id(), %fee_item_id, "Fee item deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/fee-packages?academic_year_id=` - Packages sold in one year.
async fn list_packages(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Vec<FeePackage>>> {
    let repo = CatalogRepository::new((*state.db).clone());
    Ok(Json(repo.list_packages(query.academic_year_id).await?))
}

/// POST `/fee-packages` - Create a package with its items.
async fn create_package(
    State(state): State<AppState>,
    admin: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreatePackageRequest>,
) -> ApiResult<(StatusCode, Json<FeePackage>)> {
    let repo = CatalogRepository::new((*state.db).clone());

    let lines = payload
        .items
        .into_iter()
        .map(|line| NewPackageLine {
            fee_item_id: FeeItemId::from_uuid(line.fee_item_id),
            quantity: line.quantity,
            unit_amount: line.unit_amount,
        })
        .collect();

    let package = repo
        .create_package(
            CreateFeePackageInput {
                name: payload.name,
                level: payload.level,
                program_type: payload.program_type,
                billing_period: payload.billing_period,
                academic_year_id: payload.academic_year_id,
                upfront_months: payload.upfront_months,
                lines,
            },
            state.billing.academic_months,
        )
        .await?;

    info!(
        admin_id = %admin.user_id(),
        package_id = %package.id,
        academic_year_id = %package.academic_year_id,
        items = package.items.len(),
        "Fee package created via API"
    );
    Ok((StatusCode::CREATED, Json(package)))
}

/// GET `/fee-packages/{package_id}` - One package with its items.
async fn get_package(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
) -> ApiResult<Json<FeePackage>> {
    let repo = CatalogRepository::new((*state.db).clone());
    Ok(Json(repo.get_package(package_id).await?))
}

/// PUT `/fee-packages/{package_id}/active` - Activate or retire a package.
async fn set_package_active(
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SetActiveRequest>,
) -> ApiResult<Json<FeePackage>> {
    let repo = CatalogRepository::new((*state.db).clone());
    Ok(Json(
        repo.set_package_active(package_id, payload.is_active)
            .await?,
    ))
}
