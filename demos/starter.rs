use stdlog::{standard_logging_setup, Logger, Registry};

fn thing1(logger: &Logger, i: u32) -> stdlog::Result<()> {
    logger.info(format_args!("something #{}", i + 1))
}

fn run(logger: &Logger) -> stdlog::Result<()> {
    logger.info("hello")?;
    for i in 0..5 {
        logger.debug("calling thing1()")?;
        thing1(logger, i)?;
    }
    logger.critical("complete")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Writes ./.logs/stdlog-demo.log
    let registry = Registry::new();
    let logger = standard_logging_setup(&registry, "stdlog-demo")?;

    logger.warning("before run()")?;
    run(&logger)?;
    logger.error("after run(): no error, really")?;

    Ok(())
}
