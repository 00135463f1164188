//! Structured parsing of `netstat` output.
//!
//! This crate turns the text printed by Linux (`net-tools`) and macOS/BSD
//! `netstat` into typed [`Record`]s. A document may hold several sections
//! (connections, Unix sockets, kernel control/event sockets, routing tables);
//! each section's header row defines its column schema.
//!
//! # Main entry points
//!
//! - [`parse`]: parse a document into records, optionally skipping
//!   normalization (`raw`) or the platform warning (`quiet`).
//! - [`parse_netstat`]: same, but also reports the detected [`Dialect`] and
//!   any warnings.
//!
//! # Pipeline
//!
//! 1. [`clean_lines`] drops blank lines.
//! 2. [`detect_dialect`] picks the section parser from the first line.
//! 3. [`sections::parser_for`] emits raw, text-valued records.
//! 4. [`normalize_records`] coerces integer fields and derives
//!    `local_port_num` / `foreign_port_num` (skipped in raw mode).
//!
//! # Example
//!
//! ```
//! use netstat_schema_parser::parse;
//! use netstat_schema_core::Value;
//!
//! let text = "\
//! Active Internet connections (only servers)
//! Proto Recv-Q Send-Q Local Address           Foreign Address         State       PID/Program name
//! tcp        0      0 localhost:domain        0.0.0.0:*               LISTEN      887/systemd-resolve
//! ";
//!
//! let records = parse(text, false, true);
//! let record = &records[0];
//! assert_eq!(record.get("recv_q"), Some(&Value::Int(0)));
//! assert_eq!(record.text("local_port"), Some("domain"));
//! assert!(record.get("local_port_num").is_none());
//! assert_eq!(record.get("pid"), Some(&Value::Int(887)));
//! assert_eq!(record.text("program_name"), Some("systemd-resolve"));
//! ```

pub mod compat;
pub mod config;
pub mod detect;
pub mod error;
pub mod normalize;
pub mod output;
pub mod schema;
pub mod sections;
pub mod text;

use netstat_schema_core::Record;
use serde::Serialize;
use tracing::debug;

pub use config::ParseConfig;
pub use detect::{BSD_SECTION_HEADERS, Dialect, detect_dialect};
pub use error::{NetstatError, Result};
pub use normalize::{normalize_record, normalize_records};
pub use output::{OutputFormat, format_records};
pub use text::clean_lines;

/// Options for a single parse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Return records before normalization (every field as text).
    pub raw: bool,
    /// Skip the platform compatibility check.
    pub quiet: bool,
}

/// Records and diagnostics from one parse run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub records: Vec<Record>,
    /// `None` when the input held no non-blank lines.
    pub dialect: Option<Dialect>,
    pub warnings: Vec<String>,
}

/// Parses a `netstat` document with diagnostics.
///
/// Never fails: unrecognized or malformed input yields fewer (or partial)
/// records.
///
/// # Examples
///
/// ```
/// use netstat_schema_parser::{Dialect, ParseOptions, parse_netstat};
///
/// let text = "\
/// Active Internet connections
/// Proto Recv-Q Send-Q  Local Address          Foreign Address        (state)
/// tcp4       0      0  192.168.1.221.56722    151.101.1.69.443       ESTABLISHED
/// ";
///
/// let result = parse_netstat(text, &ParseOptions { raw: true, quiet: true });
/// assert_eq!(result.dialect, Some(Dialect::Bsd));
/// assert_eq!(result.records[0].text("local_port"), Some("56722"));
/// assert!(result.warnings.is_empty());
/// ```
pub fn parse_netstat(data: &str, options: &ParseOptions) -> ParseResult {
    let mut result = ParseResult::default();

    if !options.quiet {
        result.warnings.extend(compat::warn_if_incompatible());
    }

    let lines = clean_lines(data);
    let Some(first) = lines.first() else {
        debug!("No input lines to parse");
        return result;
    };

    let dialect = detect_dialect(first);
    debug!(dialect = %dialect, lines = lines.len(), "Detected netstat dialect");

    let parser = sections::parser_for(dialect);
    let mut records = parser.parse(&lines);
    debug!(
        dialect = %parser.dialect(),
        records = records.len(),
        raw = options.raw,
        "Parsed netstat sections"
    );

    if !options.raw {
        normalize_records(&mut records);
    }

    result.dialect = Some(dialect);
    result.records = records;
    result
}

/// Parses a `netstat` document into records.
///
/// With `raw` set, records keep every field as text. `quiet` only silences
/// the platform compatibility warning.
pub fn parse(data: &str, raw: bool, quiet: bool) -> Vec<Record> {
    parse_netstat(data, &ParseOptions { raw, quiet }).records
}

#[cfg(test)]
mod tests {
    use super::*;
    use netstat_schema_core::{RecordMode, Value, validate_records};

    const LINUX: &str = "\
Active Internet connections (servers and established)
Proto Recv-Q Send-Q Local Address           Foreign Address         State       PID/Program name
tcp        0      0 localhost:domain        0.0.0.0:*               LISTEN      887/systemd-resolve
tcp        0      0 localhost:ssh           localhost:52186         ESTABLISHED 2242/sshd: root

Active UNIX domain sockets (servers and established)
Proto RefCnt Flags       Type       State         I-Node   PID/Program name     Path
unix  2      [ ACC ]     STREAM     LISTENING     20812    1/init               /run/systemd/private
";

    #[test]
    fn test_empty_input() {
        let result = parse_netstat("", &ParseOptions { raw: false, quiet: true });
        assert!(result.records.is_empty());
        assert_eq!(result.dialect, None);
        assert!(parse("\n  \n\t\n", false, true).is_empty());
    }

    #[test]
    fn test_normalized_and_raw() {
        let records = parse(LINUX, false, true);
        assert_eq!(records.len(), 3);
        assert!(validate_records(&records, RecordMode::Normalized).is_empty());
        assert_eq!(records[1].get("local_port_num"), None);
        assert_eq!(records[1].get("foreign_port_num"), Some(&Value::Int(52186)));
        assert_eq!(records[2].get("refcnt"), Some(&Value::Int(2)));
        assert_eq!(records[2].get("pid"), Some(&Value::Int(1)));

        let raw = parse(LINUX, true, true);
        assert!(validate_records(&raw, RecordMode::Raw).is_empty());
        assert_eq!(raw[2].text("refcnt"), Some("2"));
        assert_eq!(raw[1].text("foreign_port"), Some("52186"));
    }

    #[test]
    fn test_quiet_does_not_change_records() {
        let quiet = parse_netstat(LINUX, &ParseOptions { raw: false, quiet: true });
        let loud = parse_netstat(LINUX, &ParseOptions { raw: false, quiet: false });
        assert_eq!(quiet.records, loud.records);
        assert!(quiet.warnings.is_empty());
    }

    #[test]
    fn test_unrecognized_input_routes_to_linux() {
        let result = parse_netstat("hello world\nfoo bar\n", &ParseOptions { raw: false, quiet: true });
        assert_eq!(result.dialect, Some(Dialect::Linux));
        assert!(result.records.is_empty());
    }
}
