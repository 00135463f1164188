//! Dialect detection from the first line of input.

use serde::Serialize;
use std::fmt;

/// Section titles that only macOS/BSD `netstat` prints as a first line.
///
/// Matched exactly. Extending dialect support means extending this table.
pub const BSD_SECTION_HEADERS: [&str; 8] = [
    "Active Internet connections",
    "Active Internet connections (including servers)",
    "Active Multipath Internet connections",
    "Active LOCAL (UNIX) domain sockets",
    "Registered kernel control modules",
    "Active kernel event sockets",
    "Active kernel control sockets",
    "Routing tables",
];

/// `netstat` output family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// `net-tools` netstat on Linux. Also the fallback for unknown input.
    Linux,
    /// macOS and FreeBSD netstat.
    Bsd,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Linux => f.write_str("linux"),
            Dialect::Bsd => f.write_str("bsd"),
        }
    }
}

/// Selects the dialect from the first non-blank line.
///
/// # Examples
///
/// ```
/// use netstat_schema_parser::{Dialect, detect_dialect};
///
/// assert_eq!(detect_dialect("Routing tables"), Dialect::Bsd);
/// assert_eq!(
///     detect_dialect("Active Internet connections (servers and established)"),
///     Dialect::Linux
/// );
/// ```
pub fn detect_dialect(first_line: &str) -> Dialect {
    if BSD_SECTION_HEADERS.contains(&first_line) {
        Dialect::Bsd
    } else {
        Dialect::Linux
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bsd_header_selects_bsd() {
        for header in BSD_SECTION_HEADERS {
            assert_eq!(detect_dialect(header), Dialect::Bsd, "{header}");
        }
    }

    #[test]
    fn test_plain_internet_title_is_bsd() {
        assert_eq!(detect_dialect("Active Internet connections"), Dialect::Bsd);
    }

    #[test]
    fn test_match_is_exact() {
        for line in [
            "Active Internet connections (w/o servers)",
            "Active Internet connections (only servers)",
            "active internet connections",
            "Active Internet connections ",
            "Active UNIX domain sockets (servers and established)",
            "Proto Recv-Q Send-Q Local Address           Foreign Address         State",
            "Kernel IP routing table",
            "",
        ] {
            assert_eq!(detect_dialect(line), Dialect::Linux, "{line:?}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Dialect::Bsd.to_string(), "bsd");
        assert_eq!(
            serde_json::to_string(&Dialect::Linux).unwrap(),
            "\"linux\""
        );
    }
}
