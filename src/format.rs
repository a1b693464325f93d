//! The fixed console layout:
//!
//! ```text
//! 2026-01-09T08:07:06.123+0000	info	service.db	src/main.rs:42	connected	{"pool":4}
//! ```
//!
//! Tab separated: timestamp, level, logger name (when set), caller, message
//! and the record's fields as JSON (when present).

use std::fmt::{self, Write as _};
use std::panic::Location;

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory][offset_minute]"
);

/// Event formatter producing the console layout.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut record = RecordVisitor::default();
        event.record(&mut record);

        let metadata = event.metadata();
        if record.severity.is_empty() {
            record.severity = metadata.level().as_str().to_ascii_lowercase();
        }
        if record.caller.is_empty()
            && let (Some(file), Some(line)) = (metadata.file(), metadata.line())
        {
            record.caller = format!("{file}:{line}");
        }

        write!(writer, "{}\t{}", timestamp(), record.severity)?;
        if !record.logger.is_empty() {
            write!(writer, "\t{}", record.logger)?;
        }
        write!(writer, "\t{}\t{}", record.caller, record.message)?;
        if !record.fields.is_empty() {
            write!(writer, "\t{}", record.fields)?;
        }
        writeln!(writer)
    }
}

/// ISO-8601 timestamp in local time, or UTC when the local offset is unknown.
fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(TIMESTAMP_FORMAT).unwrap_or_default()
}

/// `dir/file.rs:line`, the last two path components of the call site.
pub(crate) fn caller(location: &Location<'_>) -> String {
    let file = location.file();
    let short = file
        .rfind(['/', '\\'])
        .and_then(|last| file[..last].rfind(['/', '\\']))
        .map_or(file, |start| &file[start + 1..]);
    format!("{}:{}", short, location.line())
}

#[derive(Debug, Default)]
struct RecordVisitor {
    severity: String,
    logger: String,
    caller: String,
    message: String,
    fields: String,
}

impl RecordVisitor {
    fn slot(&mut self, name: &str) -> Option<&mut String> {
        match name {
            "severity" => Some(&mut self.severity),
            "logger" => Some(&mut self.logger),
            "caller" => Some(&mut self.caller),
            "message" => Some(&mut self.message),
            "fields" => Some(&mut self.fields),
            _ => None,
        }
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if let Some(slot) = self.slot(field.name()) {
            slot.push_str(value);
        }
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if let Some(slot) = self.slot(field.name()) {
            let _ = write!(slot, "{value:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_points_here() {
        let here = caller(Location::caller());
        assert!(here.starts_with("src/format.rs:"), "{here}");
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], "T");
        assert_eq!(&ts[19..20], ".");
        assert!(ts[23..].starts_with(['+', '-']), "{ts}");
        assert_eq!(ts.len(), 28);
    }
}
