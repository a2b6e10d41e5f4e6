//! Output formats for `tracing` events.
//!
//! Both formatters understand the events emitted by [`Logger`](super::Logger):
//! a `severity` field, a `fields` field holding pre-encoded JSON members
//! (`,"key":value,...`) and a `message`. Events from plain `tracing` macros are
//! formatted too; their fields are encoded on the fly.
//!
//! JSON:
//! ```json
//! {"level":"info","time":"2024-12-28T15:04:05Z","request_id":"host/abc-000001","message":"request"}
//! ```
//!
//! Console:
//! ```text
//! 2024-12-28T15:04:05Z [INFO ] request method=GET path=/items status=200
//! ```

use std::fmt::Write as _;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::timestamp::Rfc3339;
use crate::level::Severity;

/// Field carrying the event severity name.
pub(crate) const SEVERITY_FIELD: &str = "severity";
/// Field carrying the pre-encoded JSON members.
pub(crate) const FIELDS_FIELD: &str = "fields";
/// Field carrying the event message.
pub(crate) const MESSAGE_FIELD: &str = "message";

/// One JSON object per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormat;

/// Human-readable single line with an uppercase bracketed level tag.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for JsonFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let visitor = FieldVisitor::collect(event);
        let severity = visitor.severity(event);

        let mut line = String::with_capacity(64 + visitor.fields.len() + visitor.message.len());
        line.push_str("{\"level\":");
        push_json_str(&mut line, severity.as_str());
        line.push_str(",\"time\":\"");
        line.push_str(Rfc3339::now().as_str());
        line.push('"');
        line.push_str(&visitor.fields);
        if !visitor.message.is_empty() {
            line.push_str(",\"message\":");
            push_json_str(&mut line, &visitor.message);
        }
        line.push('}');

        writeln!(writer, "{}", line)
    }
}

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let visitor = FieldVisitor::collect(event);
        let severity = visitor.severity(event);

        write!(writer, "{} {}", Rfc3339::now(), severity.console_tag())?;
        if !visitor.message.is_empty() {
            write!(writer, " {}", visitor.message)?;
        }

        match decode_members(&visitor.fields) {
            Some(members) => {
                // serde_json's default map is ordered by key
                for (key, value) in &members {
                    write!(writer, " {}={}", key, console_value(value))?;
                }
            }
            None if !visitor.fields.is_empty() => {
                write!(writer, " {}", visitor.fields.trim_start_matches(','))?;
            }
            None => {}
        }

        writeln!(writer)
    }
}

/// Parse `,"a":1,"b":"x"` into a map. `None` for empty or malformed input.
pub(crate) fn decode_members(fields: &str) -> Option<Map<String, Value>> {
    let inner = fields.strip_prefix(',')?;
    serde_json::from_str(&format!("{{{}}}", inner)).ok()
}

/// Render a value for console output: bare strings unless they contain
/// whitespace (or are empty), compact JSON for everything else.
fn console_value(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() && !s.contains(char::is_whitespace) => s.clone(),
        other => other.to_string(),
    }
}

/// Append `s` as a quoted, escaped JSON string.
#[inline]
pub(crate) fn push_json_str(buf: &mut String, s: &str) {
    buf.push_str(&serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string()));
}

/// Append a `,"key":` member prefix.
#[inline]
pub(crate) fn push_key(buf: &mut String, key: &str) {
    buf.push(',');
    push_json_str(buf, key);
    buf.push(':');
}

/// Field visitor for collecting tracing fields.
#[derive(Default)]
struct FieldVisitor {
    severity: Option<Severity>,
    message: String,
    fields: String,
}

impl FieldVisitor {
    fn collect(event: &Event<'_>) -> Self {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor
    }

    fn severity(&self, event: &Event<'_>) -> Severity {
        self.severity
            .unwrap_or_else(|| Severity::from_tracing(event.metadata().level()))
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == MESSAGE_FIELD {
            self.message = format!("{:?}", value);
        } else {
            push_key(&mut self.fields, field.name());
            push_json_str(&mut self.fields, &format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            SEVERITY_FIELD => self.severity = Some(Severity::from_name(value)),
            FIELDS_FIELD => self.fields.push_str(value),
            MESSAGE_FIELD => self.message = value.to_string(),
            name => {
                push_key(&mut self.fields, name);
                push_json_str(&mut self.fields, value);
            }
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        push_key(&mut self.fields, field.name());
        let _ = write!(self.fields, "{}", value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        push_key(&mut self.fields, field.name());
        let _ = write!(self.fields, "{}", value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        push_key(&mut self.fields, field.name());
        self.fields.push_str(&serde_json::json!(value).to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        push_key(&mut self.fields, field.name());
        self.fields.push_str(if value { "true" } else { "false" });
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        push_key(&mut self.fields, field.name());
        push_json_str(&mut self.fields, &value.to_string());
    }
}
