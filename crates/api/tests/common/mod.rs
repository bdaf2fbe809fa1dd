//! Router harness for API tests.
//!
//! Every `TestApp` owns a fresh in-memory SQLite database with the
//! migrations applied and an admin token signed with the test secret.

#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};
use tadika_api::{AppState, create_router};
use tadika_db::migration::Migrator;
use tadika_shared::{ADMIN_ROLE, BillingConfig, DatabaseConfig, JwtConfig, JwtService};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-for-api-tests";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(BillingConfig::default()).await
}

pub async fn spawn_app_with(billing: BillingConfig) -> TestApp {
    let db = tadika_db::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .expect("Failed to connect to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let jwt_service = JwtService::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry_secs: 900,
    });
    let token = jwt_service
        .generate_access_token(Uuid::new_v4(), ADMIN_ROLE)
        .expect("should generate token");

    let state = AppState::new(db, jwt_service, billing);

    TestApp {
        router: create_router(state.clone()),
        state,
        token,
    }
}

impl TestApp {
    /// Sends a request with the admin token.
    pub async fn call(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call_as(Some(&self.token), method, uri, body).await
    }

    /// Sends a request with an explicit token, or none.
    pub async fn call_as(
        &self,
        token: Option<&str>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(format!("/api/v1{uri}"));
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    /// A school year with registration (200, one-time, waivable) and tuition
    /// (300, monthly) bundled in a K1 package collecting three months upfront.
    pub async fn seed_catalog(&self) -> Catalog {
        let (status, year) = self
            .call(
                "POST",
                "/academic-years",
                Some(json!({
                    "name": "2026/2027",
                    "starts_on": "2026-01-05",
                    "ends_on": "2026-12-18",
                    "is_current": true
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{year}");

        let (status, registration) = self
            .call(
                "POST",
                "/fee-items",
                Some(json!({
                    "name": "Registration",
                    "code": "REG",
                    "default_amount": "200",
                    "charge_type": "one_time",
                    "is_waivable_for_returning_students": true
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{registration}");

        let (status, tuition) = self
            .call(
                "POST",
                "/fee-items",
                Some(json!({
                    "name": "Tuition",
                    "code": "TUI",
                    "default_amount": "300",
                    "charge_type": "monthly"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{tuition}");

        let (status, package) = self
            .call(
                "POST",
                "/fee-packages",
                Some(json!({
                    "name": "K1 Full Day",
                    "level": "K1",
                    "program_type": "full_day",
                    "billing_period": "monthly",
                    "academic_year_id": year["id"],
                    "upfront_months": 3,
                    "items": [
                        { "fee_item_id": registration["id"], "quantity": 1 },
                        { "fee_item_id": tuition["id"], "quantity": 1 }
                    ]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{package}");

        Catalog {
            year_id: id_of(&year),
            registration_id: id_of(&registration),
            tuition_id: id_of(&tuition),
            package_id: id_of(&package),
        }
    }

    /// Registers a student and enrolls them in the seeded year.
    pub async fn enroll(&self, catalog: &Catalog, name: &str, is_new: bool, bind: bool) -> Uuid {
        let (status, student) = self
            .call(
                "POST",
                "/students",
                Some(json!({
                    "full_name": name,
                    "guardian_name": format!("Guardian of {name}")
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{student}");

        let (status, enrollment) = self
            .call(
                "POST",
                "/enrollments",
                Some(json!({
                    "student_id": student["id"],
                    "academic_year_id": catalog.year_id,
                    "level": "K1",
                    "program_type": "full_day",
                    "is_new_student": is_new,
                    "fee_package_id": bind.then_some(catalog.package_id)
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{enrollment}");

        id_of(&enrollment)
    }
}

pub struct Catalog {
    pub year_id: Uuid,
    pub registration_id: Uuid,
    pub tuition_id: Uuid,
    pub package_id: Uuid,
}

pub fn id_of(value: &Value) -> Uuid {
    value["id"].as_str().unwrap().parse().unwrap()
}

/// Reads a decimal that may be serialized as a string or a number.
pub fn amount(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        Value::Number(n) => n.to_string().parse().unwrap(),
        other => panic!("not an amount: {other}"),
    }
}
