mod common;

use common::Buffer;
use context_logging::{Attr, LogContext, Logger, Profile};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_keep_their_own_identifiers() {
    let buf = Buffer::default();
    let logger = Logger::for_profile(Profile::Development, buf.clone());

    let mut tasks = Vec::new();
    for i in 0..200 {
        let logger = logger.clone();
        tasks.push(tokio::spawn(async move {
            let ctx = LogContext::background()
                .with_request_id(format!("req-{}", i))
                .with_user_id(format!("user-{}", i));
            logger
                .info_ctx(&ctx, "handled request", [Attr::new("n", i)])
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let lines = buf.json_lines();
    assert_eq!(lines.len(), 200);
    for line in lines {
        let n = line["n"].as_i64().unwrap();
        assert_eq!(line["request_id"], format!("req-{}", n));
        assert_eq!(line["user_id"], format!("user-{}", n));
    }
}
