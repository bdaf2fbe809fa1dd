//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Admin authentication middleware
//! - Request extractors
//! - Error to response mapping

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tadika_core::dashboard::DashboardCache;
use tadika_shared::{BillingConfig, JwtService};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Billing rules.
    pub billing: Arc<BillingConfig>,
    /// Cached payment dashboards.
    pub dashboard_cache: DashboardCache,
}

impl AppState {
    /// Builds the state, sizing the dashboard cache from the billing config.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, billing: BillingConfig) -> Self {
        let dashboard_cache = DashboardCache::new(billing.dashboard_cache_ttl_secs);
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            billing: Arc::new(billing),
            dashboard_cache,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
