/// Error type returned when installing a process-wide logger or subscriber.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("process-wide logger is already initialized")]
    AlreadyInitialized,

    #[error("failed to set global tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Route every `tracing` event in the process through `logger`.
///
/// **Parameters**
/// - `logger`: the logger whose handler chain receives the events. Span
///   fields named after request identifiers (`request_id`, `user_id`, ...)
///   become the events' [`LogContext`](crate::context::LogContext).
///
/// **Effects**
///
/// Installs a [`Registry`](tracing_subscriber::Registry) combined with
/// [`ContextLayer`](crate::layer::ContextLayer) as the global default
/// subscriber. Fails if another subscriber is already installed.
#[cfg(feature = "tracing-bridge")]
pub fn init_tracing(logger: crate::logger::Logger) -> Result<(), InitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    let subscriber = Registry::default().with(crate::layer::ContextLayer::new(logger));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
