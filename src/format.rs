use {
    crate::record::Record,
    chrono::{DateTime, FixedOffset, Local, Utc},
};

/// Weekday and 24-hour time of day, e.g. `Fri-12:43:19.180`.
pub const CONSOLE_DATE_FORMAT: &str = "%a-%H:%M:%S%.3f";

/// ISO-8601 date and time with millisecond precision, e.g.
/// `2020-02-14 12:43:19.180`.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Specifies the time zone record timestamps are rendered in.
///
/// # Examples
/// ```
/// use stdlog::TimeZone;
/// use chrono::FixedOffset;
///
/// // Use UTC time for global deployments
/// let utc = TimeZone::UTC;
///
/// // Use the local system time zone, following daylight saving changes
/// let local = TimeZone::Local;
///
/// // Use a fixed offset for a specific region (e.g., UTC+8)
/// let fixed = TimeZone::Fix(FixedOffset::east_opt(8 * 3600).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZone {
    /// Render timestamps in UTC.
    UTC,
    /// Render timestamps in the system's local time zone.
    #[default]
    Local,
    /// Render timestamps at a fixed offset from UTC.
    Fix(FixedOffset),
}

impl TimeZone {
    /// Format an instant in this time zone with a `strftime`-style pattern.
    pub fn format(&self, instant: &DateTime<Utc>, pattern: &str) -> String {
        match self {
            TimeZone::UTC => instant.format(pattern).to_string(),
            TimeZone::Local => instant.with_timezone(&Local).format(pattern).to_string(),
            TimeZone::Fix(offset) => instant.with_timezone(offset).format(pattern).to_string(),
        }
    }
}

/// Turns a record into one line of text, without the trailing newline.
pub trait Formatter: Send + Sync {
    fn format(&self, record: &Record) -> String;
}

/// Brief console reports: `I Fri-12:43:19.180 - message`.
///
/// The first letter shows the (first letter of the) logging level, followed
/// by the weekday abbreviation and the 24-hour time.
#[derive(Debug, Clone, Default)]
pub struct ConsoleFormatter {
    time_zone: TimeZone,
}

impl ConsoleFormatter {
    pub fn new(time_zone: TimeZone) -> Self {
        ConsoleFormatter { time_zone }
    }
}

impl Formatter for ConsoleFormatter {
    fn format(&self, record: &Record) -> String {
        format!(
            "{} {} - {}",
            record.level().initial(),
            self.time_zone.format(&record.created(), CONSOLE_DATE_FORMAT),
            record.message()
        )
    }
}

/// Verbose file records with the metadata split from the message by
/// vertical bars:
///
/// `|2020-02-14 12:43:19.180|INFO|12056|session|callbacks|29|main| - message`
///
/// The metadata items are the timestamp, level name, process id, logger
/// name, module, line number and thread name.
#[derive(Debug, Clone, Default)]
pub struct FileFormatter {
    time_zone: TimeZone,
}

impl FileFormatter {
    pub fn new(time_zone: TimeZone) -> Self {
        FileFormatter { time_zone }
    }
}

impl Formatter for FileFormatter {
    fn format(&self, record: &Record) -> String {
        format!(
            "|{}|{}|{}|{}|{}|{}|{}| - {}",
            self.time_zone.format(&record.created(), FILE_DATE_FORMAT),
            record.level().name(),
            record.process_id(),
            record.logger_name(),
            record.module(),
            record.line(),
            record.thread_name(),
            record.message()
        )
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::level::Level,
        chrono::TimeZone as _,
    };

    fn fixed_record(level: Level, message: &str) -> Record {
        let created = Utc.with_ymd_and_hms(2020, 2, 14, 12, 43, 19).unwrap() + chrono::Duration::milliseconds(180);
        Record::new("bluesky-session", level, message)
            .with_created(created)
            .with_location("callbacks", 29)
    }

    #[test]
    fn console_line_is_terse() {
        let line = ConsoleFormatter::new(TimeZone::UTC).format(&fixed_record(Level::Info, "writing to SPEC file"));
        assert_eq!(line, "I Fri-12:43:19.180 - writing to SPEC file");
    }

    #[test]
    fn console_line_uses_level_initial() {
        let formatter = ConsoleFormatter::new(TimeZone::UTC);
        assert!(formatter.format(&fixed_record(Level::Critical, "x")).starts_with("C "));
        assert!(formatter.format(&fixed_record(Level::Warning, "x")).starts_with("W "));
    }

    #[test]
    fn file_line_is_pipe_delimited() {
        let record = fixed_record(Level::Info, "writing to SPEC file");
        let line = FileFormatter::new(TimeZone::UTC).format(&record);
        assert_eq!(
            line,
            format!(
                "|2020-02-14 12:43:19.180|INFO|{}|bluesky-session|callbacks|29|{}| - writing to SPEC file",
                std::process::id(),
                record.thread_name()
            )
        );
    }

    #[test]
    fn fixed_offset_shifts_the_clock() {
        let plus_two = TimeZone::Fix(FixedOffset::east_opt(2 * 3600).unwrap());
        let line = FileFormatter::new(plus_two).format(&fixed_record(Level::Error, "x"));
        assert!(line.starts_with("|2020-02-14 14:43:19.180|ERROR|"));
    }
}
