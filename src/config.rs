use std::fmt;
use std::sync::Arc;

use crate::env::{env_or, ENVIRONMENT_ENV};
use crate::handler::Handler;
use crate::level::Level;

/// Deployment profile selecting the default severity threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Local,
    Development,
    Production,
    /// Unset or unrecognized.
    Unspecified,
}

impl Profile {
    /// Map a raw profile name. Anything unknown is `Unspecified`, never an error.
    pub fn parse(value: &str) -> Profile {
        match value {
            "local" => Profile::Local,
            "development" => Profile::Development,
            "production" => Profile::Production,
            _ => Profile::Unspecified,
        }
    }

    /// Read the profile from [`ENVIRONMENT_ENV`].
    pub fn from_env() -> Profile {
        Profile::parse(&env_or(ENVIRONMENT_ENV, ""))
    }

    pub fn threshold(&self) -> Level {
        match self {
            Profile::Local | Profile::Development => Level::Debug,
            Profile::Production => Level::Error,
            Profile::Unspecified => Level::Info,
        }
    }
}

/// How a [`Logger`](crate::logger::Logger) gets its handler chain.
///
/// **Variants**
/// - `Environment`: JSON lines on stdout at the profile's threshold, with
///   request-context enrichment.
/// - `Handler`: the given handler, used verbatim. No threshold is applied
///   and no enrichment is added; wrap it in a
///   [`ContextHandler`](crate::enrich::ContextHandler) yourself if you want it.
#[derive(Clone)]
pub enum LoggerConfig {
    Environment(Profile),
    Handler(Arc<dyn Handler>),
}

impl LoggerConfig {
    pub fn from_env() -> Self {
        LoggerConfig::Environment(Profile::from_env())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig::from_env()
    }
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggerConfig::Environment(profile) => {
                f.debug_tuple("Environment").field(profile).finish()
            }
            LoggerConfig::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn threshold_mapping() {
        assert_eq!(Profile::parse("local").threshold(), Level::Debug);
        assert_eq!(Profile::parse("development").threshold(), Level::Debug);
        assert_eq!(Profile::parse("production").threshold(), Level::Error);
        assert_eq!(Profile::parse("staging").threshold(), Level::Info);
        assert_eq!(Profile::parse("").threshold(), Level::Info);
    }

    #[test]
    fn profile_names_are_exact() {
        assert_eq!(Profile::parse("Production"), Profile::Unspecified);
        assert_eq!(Profile::parse(" local"), Profile::Unspecified);
    }

    #[test]
    #[serial]
    fn reads_profile_from_environment() {
        std::env::set_var(ENVIRONMENT_ENV, "production");
        assert_eq!(Profile::from_env(), Profile::Production);

        std::env::remove_var(ENVIRONMENT_ENV);
        assert_eq!(Profile::from_env(), Profile::Unspecified);
        assert!(matches!(
            LoggerConfig::default(),
            LoggerConfig::Environment(Profile::Unspecified)
        ));
    }
}
