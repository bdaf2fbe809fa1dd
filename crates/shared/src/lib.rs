//! Shared types, errors, and configuration for Tadika.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and validation for the admin gate

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{ADMIN_ROLE, Claims};
pub use config::{AppConfig, BillingConfig, DatabaseConfig, JwtConfig, OverpaymentPolicy};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService};
