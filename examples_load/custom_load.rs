use std::io;
use std::time::Instant;

use context_logging::{Attr, LogContext, Logger, Profile};

#[tokio::main]
async fn main() {
    // Full default chain, JSON rendering included, writing into the void.
    let logger = Logger::for_profile(Profile::Development, io::sink());

    let n: u64 = 25_000;
    let workers: u64 = 4;
    let start = Instant::now();

    let mut tasks = Vec::new();
    for w in 0..workers {
        let logger = logger.clone();
        tasks.push(tokio::spawn(async move {
            let ctx = LogContext::background()
                .with_request_id(format!("req-{}", w))
                .with_org_id("org-load");
            for i in 0..n {
                let _ = logger.debug_ctx(&ctx, "custom load test debug", [Attr::new("iteration", i)]);
            }
        }));
    }
    for task in tasks {
        let _ = task.await;
    }

    let total = n * workers;
    let elapsed = start.elapsed();
    println!("json chain: emitted {} records from {} tasks in {:?} (~{:.0} rec/s)",
        total,
        workers,
        elapsed,
        total as f64 / elapsed.as_secs_f64()
    );
}
