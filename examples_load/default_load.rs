use std::sync::Arc;
use std::time::Instant;

use context_logging::handler::NoopHandler;
use context_logging::{Attr, ContextHandler, LogContext, Logger};

fn main() {
    // Enrichment in front of a sink that drops everything, so the numbers
    // show the cost of the logging path itself.
    let logger = Logger::from_handler(Arc::new(ContextHandler::new(Arc::new(NoopHandler))));
    let ctx = LogContext::background()
        .with_request_id("req-1")
        .with_correlation_id("corr-1")
        .with_user_id("user-1");

    let n: u64 = 100_000;
    let start = Instant::now();

    for i in 0..n {
        let _ = logger.error_ctx(&ctx, "default load test error", [Attr::new("iteration", i)]);
    }

    let elapsed = start.elapsed();
    println!("default config: emitted {} records in {:?} (~{:.0} rec/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
}
