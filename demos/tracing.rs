use {
    stdlog::{Level, LoggingSetup, Registry, StdLogLayer},
    tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new();
    let logger = LoggingSetup::new("tracing")
        .log_path("./logs")
        .level(Level::Info)
        .max_bytes(64 * 1024)
        .backup_count(2)
        .install(&registry)?;
    tracing_subscriber::registry()
        .with(StdLogLayer::new(logger))
        .try_init()?;

    tracing::info!("This is an info message");
    tracing::warn!(disk = "/var", "This is a warning message");
    tracing::error!("This is an error message");
    tracing::debug!("This is filtered by the logger threshold");

    Ok(())
}
