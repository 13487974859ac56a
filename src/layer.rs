use {
    crate::{
        level::Level,
        logger::Logger,
        record::{module_from_file, Record},
    },
    std::{fmt, sync::Arc},
    tracing::{
        field::{Field, Visit},
        Event, Subscriber,
    },
    tracing_subscriber::layer::{Context, Layer},
};

/// Forwards `tracing` events to a [`Logger`], so code instrumented with
/// `tracing` macros ends up in the same console and file reports.
///
/// ```rust
/// use stdlog::{LoggingSetup, Registry, StdLogLayer};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let dir = tempfile::tempdir().unwrap();
/// let registry = Registry::new();
/// let logger = LoggingSetup::new("traced").log_path(dir.path()).install(&registry).unwrap();
/// let subscriber = tracing_subscriber::registry().with(StdLogLayer::new(logger));
/// tracing::subscriber::with_default(subscriber, || tracing::info!("bridged"));
/// ```
pub struct StdLogLayer {
    logger: Arc<Logger>,
}

impl StdLogLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        StdLogLayer { logger }
    }
}

impl<S: Subscriber> Layer<S> for StdLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        if !self.logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let module = match (metadata.file(), metadata.module_path()) {
            (Some(file), _) => module_from_file(file),
            (None, Some(module_path)) => module_path.rsplit("::").next().unwrap_or(module_path).to_string(),
            (None, None) => "unknown".to_string(),
        };
        let record = Record::new(self.logger.name(), level, visitor.finish())
            .with_location(module, metadata.line().unwrap_or(0));

        if let Err(err) = self.logger.handle(&record) {
            eprintln!("Failed to emit log record for '{}': {}", self.logger.name(), err);
        }
    }
}

/// Collects the `message` field, then any other fields as ` key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields.push_str(&format!(" {}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message.push_str(&format!("{value:?}"));
        } else {
            self.fields.push_str(&format!(" {}={:?}", field.name(), value));
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::handler::{tests::SharedBuffer, ConsoleHandler, Handler},
        tracing_subscriber::layer::SubscriberExt,
    };

    fn capture(level: Level) -> (Arc<Logger>, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let logger = Arc::new(Logger::new("traced"));
        logger.set_level(level);
        let handler: Arc<dyn Handler> = Arc::new(ConsoleHandler::with_writer(Box::new(buffer.clone())));
        logger.add_handler(handler);
        (logger, buffer)
    }

    #[test]
    fn events_become_console_reports() {
        let (logger, buffer) = capture(Level::Debug);
        let subscriber = tracing_subscriber::registry().with(StdLogLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("disk nearly full");
            tracing::trace!(attempt = 3, "retrying");
        });

        let contents = buffer.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("W ") && lines[0].ends_with(" - disk nearly full"));
        assert!(lines[1].starts_with("D ") && lines[1].ends_with(" - retrying attempt=3"));
    }

    #[test]
    fn logger_threshold_applies_to_events() {
        let (logger, buffer) = capture(Level::Error);
        let subscriber = tracing_subscriber::registry().with(StdLogLayer::new(logger));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("dropped");
            tracing::error!(code = "E42", "kept");
        });
        assert_eq!(buffer.contents().lines().count(), 1);
        assert!(buffer.contents().ends_with(" - kept code=E42\n"));
    }

    #[test]
    fn fields_without_message() {
        let visitor = MessageVisitor {
            fields: " a=1 b=2".to_string(),
            ..Default::default()
        };
        assert_eq!(visitor.finish(), "a=1 b=2");
    }
}
