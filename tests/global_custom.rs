mod common;

use std::sync::Arc;

use common::Buffer;
use context_logging::global::{self, get_logger};
use context_logging::init::InitError;
use context_logging::json::{HandlerOptions, JsonHandler};
use context_logging::{Attr, Handler, Level, LogContext, LoggerConfig, Profile};

#[test]
fn supplied_handler_wins_and_is_not_enriched() {
    let buf = Buffer::default();
    let handler: Arc<dyn Handler> =
        Arc::new(JsonHandler::new(buf.clone(), HandlerOptions { level: Level::Warn }));

    let logger = get_logger(Some(handler.clone()));
    assert!(Arc::ptr_eq(logger.handler(), &handler));

    // Environment profile plays no part once a handler was supplied.
    std::env::set_var(context_logging::env::ENVIRONMENT_ENV, "development");
    let again = get_logger(None);
    assert!(std::ptr::eq(logger, again));

    let ctx = LogContext::background().with_correlation_id("abc").with_user_id("u1");
    again.debug_ctx(&ctx, "filtered by handler", []).unwrap();
    again
        .error_ctx(&ctx, "error message", [Attr::new("module", "logging")])
        .unwrap();

    let lines = buf.json_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["message"], "error message");
    assert_eq!(lines[0]["module"], "logging");
    assert!(lines[0].get("correlation_id").is_none());
    assert!(lines[0].get("user_id").is_none());

    let err = global::init(LoggerConfig::Environment(Profile::Local)).unwrap_err();
    assert!(matches!(err, InitError::AlreadyInitialized));
    assert!(std::ptr::eq(global::try_get().unwrap(), logger));

    std::env::remove_var(context_logging::env::ENVIRONMENT_ENV);
}
