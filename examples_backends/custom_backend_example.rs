use std::sync::Arc;

use context_logging::{
    get_logger, Attr, ContextHandler, Handler, HandlerError, Level, LogContext, LogRecord,
};

/// Example of plugging in a completely custom backend by implementing
/// the `Handler` trait directly. Imagine this feeds some in-house
/// collector for which this crate does not provide a built-in handler.
struct MyCollectorHandler {
    attrs: Vec<Attr>,
}

impl Handler for MyCollectorHandler {
    fn enabled(&self, _ctx: &LogContext, level: Level) -> bool {
        level >= Level::Info
    }

    fn handle(&self, _ctx: &LogContext, mut record: LogRecord) -> Result<(), HandlerError> {
        record.prepend_attrs(self.attrs.clone());
        // Here you would call your own client library.
        // For the sake of example we just print the record.
        println!("[my-collector] {:?}", record);
        Ok(())
    }

    fn with_attrs(&self, attrs: Vec<Attr>) -> Arc<dyn Handler> {
        let mut all = self.attrs.clone();
        all.extend(attrs);
        Arc::new(MyCollectorHandler { attrs: all })
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(MyCollectorHandler { attrs: self.attrs.clone() })
    }
}

fn main() {
    // A supplied handler is used verbatim; wrap it to keep request enrichment.
    let backend: Arc<dyn Handler> = Arc::new(MyCollectorHandler { attrs: Vec::new() });
    let logger = get_logger(Some(Arc::new(ContextHandler::new(backend))));

    let ctx = LogContext::background().with_request_id("req-42").with_account_id("acct-7");

    let _ = logger.info("custom backend example started", []);
    let _ = logger.error_ctx(
        &ctx,
        "simulated error sent via custom backend",
        [Attr::new("db", "my-collector")],
    );
}
