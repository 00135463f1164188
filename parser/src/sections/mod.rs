//! Dialect-specific section parsers.
//!
//! Each parser walks the cleaned line list once, switching section on title
//! lines (`Active Internet connections…`, `Routing tables`, …) and column
//! schema on header lines (`Proto Recv-Q …`), and emits one raw record per
//! data row. Raw records hold strings (or null for columns known to be
//! empty); integer coercion is left to [`crate::normalize`].

pub mod bsd;
pub mod linux;

use netstat_schema_core::{Record, Value};
use regex::Regex;
use std::sync::LazyLock;

use crate::detect::Dialect;
use crate::schema::Column;
use crate::text::{Token, span};

/// Turns the cleaned lines of one `netstat` document into raw records.
pub trait SectionParser {
    fn dialect(&self) -> Dialect;
    fn parse(&self, lines: &[&str]) -> Vec<Record>;
}

/// Returns the section parser for a detected dialect.
pub fn parser_for(dialect: Dialect) -> &'static dyn SectionParser {
    match dialect {
        Dialect::Linux => &linux::LinuxParser,
        Dialect::Bsd => &bsd::BsdParser,
    }
}

/// Matches the combined `pid/program` token, e.g. `887/systemd-resolve`.
static PID_PROGRAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+/").expect("static regex must compile"));

pub(crate) fn is_program_token(text: &str) -> bool {
    text == "-" || PID_PROGRAM_RE.is_match(text)
}

/// Sets `key` unless an earlier column already produced it.
pub(crate) fn set_once(record: &mut Record, key: &str, value: Value) {
    if record.get(key).is_none() {
        record.insert(key, value);
    }
}

/// Assigns `tokens` to `columns` left to right.
///
/// The column at `gap` (if any) becomes null without consuming a token.
/// Assignment stops when tokens run out; surplus tokens are absorbed by the
/// last column, keeping the original spacing.
pub(crate) fn assign_columns(
    record: &mut Record,
    columns: &[Column],
    tokens: &[Token<'_>],
    line: &str,
    gap: Option<usize>,
) {
    let mut cursor = 0;
    for (index, column) in columns.iter().enumerate() {
        if gap == Some(index) {
            set_once(record, &column.name, Value::Null);
            continue;
        }
        let Some(token) = tokens.get(cursor) else {
            break;
        };
        let text = match tokens.last() {
            Some(last) if index + 1 == columns.len() => span(line, token, last),
            _ => token.text,
        };
        set_once(record, &column.name, Value::from(text));
        cursor += 1;
    }
}

/// Splits `pid/program` in `program_name` into `pid` and `program_name`.
///
/// A lone `-` means no process information and becomes null.
pub(crate) fn split_program(record: &mut Record) {
    let Some(program) = record.text("program_name").map(str::trim) else {
        return;
    };
    if program == "-" || program.is_empty() {
        record.insert("program_name", Value::Null);
        return;
    }
    if let Some((pid, name)) = program.split_once('/') {
        let (pid, name) = (pid.to_string(), name.to_string());
        record.insert("pid", Value::from(pid));
        record.insert("program_name", Value::from(name));
    }
}

/// Splits `address<sep>port` at the last separator.
///
/// A bracketed IPv6 literal with no port (`[::1]`) is returned whole.
pub(crate) fn split_host_port(address: &str, separator: char) -> (&str, Option<&str>) {
    if address.ends_with(']') {
        return (address, None);
    }
    match address.rsplit_once(separator) {
        Some((host, port)) => (host, Some(port)),
        None => (address, None),
    }
}

/// Replaces `<prefix>_address` with its host part and adds `<prefix>_port`.
pub(crate) fn split_address_field(record: &mut Record, prefix: &str, separator: char) {
    let address_key = format!("{prefix}_address");
    let Some(address) = record.text(&address_key) else {
        return;
    };
    let (host, port) = split_host_port(address, separator);
    let (host, port) = (host.to_string(), port.map(str::to_string));
    record.insert(&address_key, Value::from(host));
    if let Some(port) = port {
        record.insert(&format!("{prefix}_port"), Value::from(port));
    }
}
