//! Academic year, student and class routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tadika_db::{
    SchoolRepository,
    entities::{academic_years, school_classes, students},
    repositories::{CreateAcademicYearInput, CreateClassInput, CreateStudentInput},
};
use tadika_shared::types::{PageRequest, PageResponse};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, ApiResult, extractors::ValidatedJson, middleware::AuthUser};

/// Creates the school record routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/academic-years",
            get(list_academic_years).post(create_academic_year),
        )
        .route("/students", get(list_students).post(create_student))
        .route("/students/{student_id}", get(get_student))
        .route("/classes", get(list_classes).post(create_class))
}

/// Request body for creating an academic year.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAcademicYearRequest {
    /// Display name (e.g., "2026/2027").
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    /// First day (YYYY-MM-DD).
    pub starts_on: NaiveDate,
    /// Last day (YYYY-MM-DD).
    pub ends_on: NaiveDate,
    /// Marks the year as current.
    #[serde(default)]
    pub is_current: bool,
}

/// Request body for registering a student.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200))]
    pub guardian_name: String,
    #[validate(length(max = 30))]
    pub guardian_phone: Option<String>,
}

/// Request body for creating a class.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassRequest {
    pub academic_year_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub level: String,
    #[validate(length(max = 100))]
    pub building: Option<String>,
    #[validate(range(min = 1, max = 500))]
    pub capacity: u32,
}

/// Query selecting an academic year.
#[derive(Debug, Deserialize)]
pub struct YearQuery {
    /// Academic year to read.
    pub academic_year_id: Uuid,
}

/// GET `/academic-years` - List academic years, newest first.
async fn list_academic_years(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<academic_years::Model>>> {
    let repo = SchoolRepository::new((*state.db).clone());
    Ok(Json(repo.list_academic_years().await?))
}

/// POST `/academic-years` - Create an academic year.
async fn create_academic_year(
    State(state): State<AppState>,
    admin: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAcademicYearRequest>,
) -> ApiResult<(StatusCode, Json<academic_years::Model>)> {
    let repo = SchoolRepository::new((*state.db).clone());

    let year = repo
        .create_academic_year(CreateAcademicYearInput {
            name: payload.name,
            starts_on: payload.starts_on,
            ends_on: payload.ends_on,
            is_current: payload.is_current,
        })
        .await?;

    info!(admin_id = %admin.user_id(), academic_year_id = %year.id, "Academic year created via API");
    Ok((StatusCode::CREATED, Json(year)))
}

/// GET `/students` - Paginated student list.
async fn list_students(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Json<PageResponse<students::Model>>> {
    let repo = SchoolRepository::new((*state.db).clone());
    let (items, total) = repo.list_students(&page).await?;
    let per_page = u32::try_from(page.limit()).unwrap_or(page.per_page);

    Ok(Json(PageResponse::new(items, page.page, per_page, total)))
}

/// POST `/students` - Register a student.
async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateStudentRequest>,
) -> ApiResult<(StatusCode, Json<students::Model>)> {
    let repo = SchoolRepository::new((*state.db).clone());

    let student = repo
        .create_student(CreateStudentInput {
            full_name: payload.full_name,
            date_of_birth: payload.date_of_birth,
            guardian_name: payload.guardian_name,
            guardian_phone: payload.guardian_phone,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

/// GET `/students/{student_id}` - Get one student.
async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> ApiResult<Json<students::Model>> {
    let repo = SchoolRepository::new((*state.db).clone());
    Ok(Json(repo.get_student(student_id).await?))
}

/// GET `/classes?academic_year_id=` - Classes of one year.
async fn list_classes(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> ApiResult<Json<Vec<school_classes::Model>>> {
    let repo = SchoolRepository::new((*state.db).clone());
    Ok(Json(repo.list_classes(query.academic_year_id).await?))
}

/// POST `/classes` - Create a class.
async fn create_class(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateClassRequest>,
) -> ApiResult<(StatusCode, Json<school_classes::Model>)> {
    let repo = SchoolRepository::new((*state.db).clone());

    let class = repo
        .create_class(CreateClassInput {
            academic_year_id: payload.academic_year_id,
            name: payload.name,
            level: payload.level,
            building: payload.building,
            capacity: payload.capacity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(class)))
}
