//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Billing rules configuration.
    #[serde(default)]
    pub billing: BillingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key shared with the login provider.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// What to do when a payment exceeds the outstanding balance of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    /// Refuse the payment.
    #[default]
    Reject,
    /// Record only the outstanding amount.
    Clamp,
    /// Record the payment as given.
    Allow,
}

/// Billing rules.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Number of monthly instances generated per academic year.
    #[serde(default = "default_academic_months")]
    pub academic_months: u32,
    /// Handling of payments above the outstanding amount.
    #[serde(default)]
    pub overpayment_policy: OverpaymentPolicy,
    /// Lifetime of cached payment dashboards.
    #[serde(default = "default_dashboard_cache_ttl")]
    pub dashboard_cache_ttl_secs: u64,
}

fn default_academic_months() -> u32 {
    12
}

fn default_dashboard_cache_ttl() -> u64 {
    300
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            academic_months: default_academic_months(),
            overpayment_policy: OverpaymentPolicy::default(),
            dashboard_cache_ttl_secs: default_dashboard_cache_ttl(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TADIKA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
