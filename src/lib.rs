pub mod level;
pub mod record;
pub mod context;
pub mod handler;
pub mod json;
pub mod text;
pub mod enrich;
pub mod env;
pub mod config;
pub mod logger;
pub mod global;
pub mod init;

#[cfg(feature = "tracing-bridge")]
pub mod layer;

mod scope;

pub use config::{LoggerConfig, Profile};
pub use context::{ContextKey, LogContext, RequestFields};
pub use enrich::ContextHandler;
pub use global::{get_logger, logger};
pub use handler::{Handler, HandlerError};
pub use level::Level;
pub use logger::Logger;
pub use record::{Attr, LogRecord};
