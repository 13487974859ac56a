use stdlog::{Level, LoggingSetup, Registry, RotationSize};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Registry::new();
    let logger = LoggingSetup::new("rotating")
        .log_path("./logs")
        .level(Level::Info)
        .max_size(RotationSize::KB(4)) // Roll over near 4 KB
        .backup_count(3) // Keep rotating.log.1 .. rotating.log.3
        .install(&registry)?;

    // Simulate writing logs that will trigger size-based rotation
    for i in 1..=500 {
        logger.info(format_args!(
            "Log entry #{i}: This is a sample log message that will contribute to file size"
        ))?;
        logger.debug("below the threshold, never written")?;
    }

    Ok(())
}
