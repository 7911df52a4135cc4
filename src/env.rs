//! Environment variable names read by this crate.
//!
//! Only the profile selection lives in the environment; everything else is
//! configured through [`LoggerConfig`](crate::config::LoggerConfig).

/// Deployment profile, e.g. `local`, `development` or `production`.
pub const ENVIRONMENT_ENV: &str = "ENVIRONMENT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
