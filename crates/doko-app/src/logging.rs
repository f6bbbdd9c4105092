use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Console logging for the trainer binary: RUST_LOG wins, otherwise
/// the given default level.
pub fn init_logging(default_level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    // Ignore the error if a global subscriber is already set (tests).
    let _ = tracing::subscriber::set_global_default(subscriber);
}
