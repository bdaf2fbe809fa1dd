//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod billing;
pub mod catalog;
pub mod enrollments;
pub mod health;
pub mod payments;
pub mod school;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Everything except the health check is admin-only
    let protected_routes = Router::new()
        .merge(school::routes())
        .merge(catalog::routes())
        .merge(enrollments::routes())
        .merge(billing::routes())
        .merge(payments::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
