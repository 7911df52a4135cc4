use std::sync::{Arc, OnceLock};

use crate::config::LoggerConfig;
use crate::handler::Handler;
use crate::init::InitError;
use crate::logger::Logger;

static LOGGER: OnceLock<Logger> = OnceLock::new();

/// Process-wide logger, built on first use.
///
/// **Parameters**
/// - `handler`: only consulted on the very first call in the process. When
///   `Some`, that handler becomes the whole chain verbatim (no environment
///   threshold, no request-context enrichment). When `None`, the logger is
///   built from [`LoggerConfig::from_env`].
///
/// **Returns**
/// - The same `&'static Logger` on every call. Arguments passed after the
///   first call are ignored.
///
/// Prefer building a [`Logger`] in `main` and passing it down; this exists
/// for code that cannot receive one.
pub fn get_logger(handler: Option<Arc<dyn Handler>>) -> &'static Logger {
    get_or_init(|| match handler {
        Some(handler) => Logger::from_handler(handler),
        None => Logger::new(LoggerConfig::from_env()),
    })
}

/// Shorthand for `get_logger(None)`.
pub fn logger() -> &'static Logger {
    get_logger(None)
}

/// Run `build` exactly once per process and return its logger forever after.
///
/// Concurrent first callers block until the single build finishes, and
/// all of them observe the finished logger. Later reads take no lock.
pub fn get_or_init(build: impl FnOnce() -> Logger) -> &'static Logger {
    LOGGER.get_or_init(|| {
        let logger = build();
        tracing::debug!("process-wide logger initialized");
        logger
    })
}

/// Install a logger built from `config` as the process-wide logger.
///
/// Unlike [`get_logger`], a second installation is reported instead of
/// silently ignored.
pub fn init(config: LoggerConfig) -> Result<&'static Logger, InitError> {
    let mut config = Some(config);
    let installed = get_or_init(|| Logger::new(config.take().unwrap_or_default()));
    if config.is_some() {
        return Err(InitError::AlreadyInitialized);
    }
    Ok(installed)
}

/// The process-wide logger if one has been built.
pub fn try_get() -> Option<&'static Logger> {
    LOGGER.get()
}
