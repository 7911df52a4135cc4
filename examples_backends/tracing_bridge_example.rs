use context_logging::init::init_tracing;
use context_logging::{Logger, LoggerConfig};
use tracing::{error, info, info_span};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // JSON lines on stdout at the threshold chosen by `ENVIRONMENT`.
    init_tracing(Logger::new(LoggerConfig::from_env()))?;

    info!("starting service");

    let span = info_span!("request", request_id = "req-1", user_id = "42");
    let _guard = span.enter();

    error!(reason = "invalid password", "authentication failed");
    Ok(())
}
