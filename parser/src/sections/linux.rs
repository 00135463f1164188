//! Linux (`net-tools`) netstat section parser.
//!
//! Handles `Active Internet connections` and `Active UNIX domain sockets`
//! sections with any combination of the `-e`, `-p`, `-o` and `-Z` columns.
//! Bluetooth and kernel routing/interface tables are recognized and skipped.

use netstat_schema_core::{NetworkRecord, Record, SocketFamily, SocketRecord, Value};
use tracing::debug;

use super::{
    SectionParser, assign_columns, is_program_token, set_once, split_address_field,
    split_program,
};
use crate::detect::Dialect;
use crate::schema::{Column, HeaderAliases, Schema};
use crate::text::{Token, span, tokenize};

static LINUX_HEADERS: HeaderAliases = HeaderAliases {
    phrases: &[
        "local address",
        "foreign address",
        "pid/program name",
        "security context",
    ],
    renames: &[("pid/program_name", "program_name"), ("i-node", "inode")],
};

/// Columns that precede the addresses when no `Foreign Address` title is found.
const LEADING_NETWORK_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    /// No title line seen yet.
    Pending,
    Network,
    Unix,
    /// Recognized but unsupported (Bluetooth, kernel tables).
    Skipped,
}

impl Section {
    fn from_title(line: &str) -> Option<Self> {
        if line.starts_with("Active Internet") {
            Some(Section::Network)
        } else if line.starts_with("Active UNIX") {
            Some(Section::Unix)
        } else if line.starts_with("Active Bluetooth") || line.starts_with("Kernel ") {
            Some(Section::Skipped)
        } else {
            None
        }
    }
}

pub struct LinuxParser;

impl SectionParser for LinuxParser {
    fn dialect(&self) -> Dialect {
        Dialect::Linux
    }

    fn parse(&self, lines: &[&str]) -> Vec<Record> {
        let mut records = Vec::new();
        let mut section = Section::Pending;
        let mut schema: Option<Schema> = None;

        for (index, line) in lines.iter().enumerate() {
            if let Some(next) = Section::from_title(line) {
                debug!(line = index, section = ?next, "Entering netstat section");
                section = next;
                schema = None;
                continue;
            }

            if line.starts_with("Proto") {
                let header = Schema::from_header(line, &LINUX_HEADERS);
                if section == Section::Pending {
                    section = if header.contains("refcnt") {
                        Section::Unix
                    } else {
                        Section::Network
                    };
                    debug!(line = index, section = ?section, "Inferred section from header");
                }
                schema = Some(header);
                continue;
            }

            let Some(active) = schema.as_ref() else {
                debug!(line = index, "Skipping row with no column header");
                continue;
            };

            match section {
                Section::Network => records.push(parse_network_row(active, line)),
                Section::Unix => records.push(parse_unix_row(active, line)),
                Section::Pending | Section::Skipped => {}
            }
        }

        records
    }
}

fn parse_network_row(schema: &Schema, line: &str) -> Record {
    let tokens = tokenize(line);
    let columns = schema.columns();
    let mut record = Record::Network(NetworkRecord::default());

    let lead = schema
        .position("foreign_address")
        .map_or(LEADING_NETWORK_COLUMNS.min(columns.len()), |idx| idx + 1);
    let lead_tokens = &tokens[..lead.min(tokens.len())];
    assign_columns(&mut record, &columns[..lead], lead_tokens, line, None);

    if tokens.len() >= lead {
        assign_network_tail(&mut record, &columns[lead..], &tokens[lead..], line);
    }

    split_program(&mut record);
    split_address_field(&mut record, "local", ':');
    split_address_field(&mut record, "foreign", ':');
    add_protocols(&mut record);
    record
}

/// Assigns the columns after the addresses.
///
/// Trailing `timer` and `security_context` columns are taken from the end,
/// the program field is located by its `pid/` (or `-`) token and may span
/// several words, and the remaining columns are zipped from the left.
fn assign_network_tail(record: &mut Record, columns: &[Column], tokens: &[Token<'_>], line: &str) {
    let mut columns = columns;
    let mut tokens = tokens;

    if columns.last().is_some_and(|column| column.name == "timer") {
        if let [rest @ .., first, last] = tokens {
            if last.text.starts_with('(') {
                record.insert("timer", Value::from(span(line, first, last)));
                tokens = rest;
            }
        }
        columns = &columns[..columns.len() - 1];
    }

    if columns
        .last()
        .is_some_and(|column| column.name == "security_context")
    {
        if let Some((last, rest)) = tokens.split_last() {
            record.insert("security_context", Value::from(last.text));
            tokens = rest;
        }
        columns = &columns[..columns.len() - 1];
    }

    if let Some(program_col) = columns.iter().position(|column| column.name == "program_name") {
        let program_token = tokens
            .iter()
            .enumerate()
            .skip(program_col.saturating_sub(1))
            .find(|(_, token)| is_program_token(token.text))
            .map(|(idx, _)| idx);
        columns = &columns[..program_col];
        if let (Some(idx), Some(last)) = (program_token, tokens.last()) {
            record.insert("program_name", Value::from(span(line, &tokens[idx], last)));
            tokens = &tokens[..idx];
        }
    }

    // UDP rows leave the state column blank.
    let gap = (columns.first().is_some_and(|column| column.name == "state")
        && tokens.len() + 1 == columns.len())
    .then_some(0);
    assign_columns(record, columns, tokens, line, gap);
}

fn parse_unix_row(schema: &Schema, line: &str) -> Record {
    let tokens = tokenize(line);
    let mut record = Record::Socket(SocketRecord::new(SocketFamily::Unix));
    let path_start = schema.column("path").map(|column| column.start);
    let mut cursor = 0;

    for column in schema.columns() {
        let Some(token) = tokens.get(cursor) else {
            break;
        };
        match column.name.as_str() {
            "flags" => {
                let (value, next) = read_flags(&tokens, cursor, line);
                set_once(&mut record, "flags", value);
                cursor = next;
            }
            "state" => {
                if is_state_word(token.text) {
                    set_once(&mut record, "state", Value::from(token.text));
                    cursor += 1;
                } else {
                    set_once(&mut record, "state", Value::Null);
                }
            }
            "program_name" => {
                if token.text == "-" {
                    set_once(&mut record, "program_name", Value::from(token.text));
                    cursor += 1;
                } else if is_program_token(token.text) {
                    let limit = path_start.unwrap_or(usize::MAX);
                    let mut end = cursor;
                    while tokens.get(end + 1).is_some_and(|next| next.start < limit) {
                        end += 1;
                    }
                    set_once(
                        &mut record,
                        "program_name",
                        Value::from(span(line, token, &tokens[end])),
                    );
                    cursor = end + 1;
                }
            }
            "path" => {
                let path = line[token.start..].trim_end();
                set_once(&mut record, "path", Value::from(path));
                cursor = tokens.len();
            }
            name => {
                set_once(&mut record, name, Value::from(token.text));
                cursor += 1;
            }
        }
    }

    split_program(&mut record);
    record
}

/// Reads a bracketed flag group such as `[ ACC ]`.
///
/// Returns the flag text (null for `[ ]`) and the cursor after the group.
fn read_flags(tokens: &[Token<'_>], cursor: usize, line: &str) -> (Value, usize) {
    let first = &tokens[cursor];
    if !first.text.starts_with('[') {
        return (Value::from(first.text), cursor + 1);
    }

    let close = tokens[cursor..]
        .iter()
        .position(|token| token.text.ends_with(']'))
        .map_or(cursor, |offset| cursor + offset);
    let group = span(line, first, &tokens[close]);
    let inner = group
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim();
    let value = if inner.is_empty() {
        Value::Null
    } else {
        Value::from(inner)
    };
    (value, close + 1)
}

fn is_state_word(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_uppercase() || b == b'_')
}

/// Derives `transport_protocol` and `network_protocol` from `proto`.
fn add_protocols(record: &mut Record) {
    let Some(proto) = record.text("proto") else {
        return;
    };
    let transport = if proto.contains("tcp") {
        Value::from("tcp")
    } else if proto.contains("udp") {
        Value::from("udp")
    } else {
        Value::Null
    };
    let network = if proto.contains('6') { "ipv6" } else { "ipv4" };
    record.insert("transport_protocol", transport);
    record.insert("network_protocol", Value::from(network));
}

#[cfg(test)]
mod tests {
    use super::*;

    const APEE_HEADER: &str = "Proto Recv-Q Send-Q Local Address           Foreign Address         State       User       Inode      PID/Program name    ";
    const UNIX_HEADER: &str = "Proto RefCnt Flags       Type       State         I-Node   PID/Program name     Path";

    fn parse(text: &str) -> Vec<Record> {
        let lines = crate::text::clean_lines(text);
        LinuxParser.parse(&lines)
    }

    #[test]
    fn test_program_name_with_space() {
        let text = format!(
            "Active Internet connections (servers and established)\n{APEE_HEADER}\n\
             tcp        0      0 localhost:ssh           localhost:52186         ESTABLISHED root       46829      2242/sshd: root     \n"
        );
        let records = parse(&text);
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.text("state"), Some("ESTABLISHED"));
        assert_eq!(record.text("user"), Some("root"));
        assert_eq!(record.text("inode"), Some("46829"));
        assert_eq!(record.text("pid"), Some("2242"));
        assert_eq!(record.text("program_name"), Some("sshd: root"));
        assert_eq!(record.text("local_port"), Some("ssh"));
        assert_eq!(record.text("foreign_port"), Some("52186"));
    }

    #[test]
    fn test_udp_row_has_null_state() {
        let text = format!(
            "Active Internet connections (servers and established)\n{APEE_HEADER}\n\
             udp        0      0 localhost:domain        0.0.0.0:*                           systemd-resolve 26957      887/systemd-resolve \n"
        );
        let record = &parse(&text)[0];
        assert_eq!(record.get("state"), Some(&Value::Null));
        assert_eq!(record.text("user"), Some("systemd-resolve"));
        assert_eq!(record.text("inode"), Some("26957"));
        assert_eq!(record.text("transport_protocol"), Some("udp"));
        assert_eq!(record.text("network_protocol"), Some("ipv4"));
    }

    #[test]
    fn test_raw6_row() {
        let text = format!(
            "Active Internet connections (servers and established)\n{APEE_HEADER}\n\
             raw6       0      0 [::]:ipv6-icmp          [::]:*                  7           systemd-network 27001      867/systemd-network \n"
        );
        let record = &parse(&text)[0];
        assert_eq!(record.text("state"), Some("7"));
        assert_eq!(record.text("local_address"), Some("[::]"));
        assert_eq!(record.text("local_port"), Some("ipv6-icmp"));
        assert_eq!(record.get("transport_protocol"), Some(&Value::Null));
        assert_eq!(record.text("network_protocol"), Some("ipv6"));
    }

    #[test]
    fn test_no_program_info() {
        let text = "Active Internet connections (only servers)\n\
                    Proto Recv-Q Send-Q Local Address           Foreign Address         State       PID/Program name\n\
                    tcp        0      0 0.0.0.0:22              0.0.0.0:*               LISTEN      -\n";
        let record = &parse(text)[0];
        assert_eq!(record.get("program_name"), Some(&Value::Null));
        assert!(record.get("pid").is_none());
        assert_eq!(record.text("local_port"), Some("22"));
    }

    #[test]
    fn test_timer_and_security_context_columns() {
        let text = "Active Internet connections (w/o servers)\n\
                    Proto Recv-Q Send-Q Local Address           Foreign Address         State       PID/Program name     Security Context\n\
                    tcp        0      0 10.0.0.5:22             10.0.0.9:51514          ESTABLISHED 1201/sshd: alice     unconfined\n";
        let record = &parse(text)[0];
        assert_eq!(record.text("program_name"), Some("sshd: alice"));
        assert_eq!(record.text("security_context"), Some("unconfined"));

        let text = "Active Internet connections (w/o servers)\n\
                    Proto Recv-Q Send-Q Local Address           Foreign Address         State       Timer\n\
                    tcp        0     36 10.0.0.5:22             10.0.0.9:51514          ESTABLISHED on (0.20/0/0)\n";
        let record = &parse(text)[0];
        assert_eq!(record.text("timer"), Some("on (0.20/0/0)"));
        assert_eq!(record.text("state"), Some("ESTABLISHED"));
    }

    #[test]
    fn test_unix_rows() {
        let text = format!(
            "Active UNIX domain sockets (servers and established)\n{UNIX_HEADER}\n\
             unix  2      [ ]         DGRAM                    33322    1607/systemd         /run/user/1000/systemd/notify\n\
             unix  2      [ ACC ]     SEQPACKET  LISTENING     20835    1/init               /run/udev/control\n\
             unix  3      [ ]         STREAM     CONNECTED     17886    -                    \n"
        );
        let records = parse(&text);
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.socket_family(), Some(SocketFamily::Unix));
        assert_eq!(first.get("flags"), Some(&Value::Null));
        assert_eq!(first.text("type"), Some("DGRAM"));
        assert_eq!(first.get("state"), Some(&Value::Null));
        assert_eq!(first.text("inode"), Some("33322"));
        assert_eq!(first.text("pid"), Some("1607"));
        assert_eq!(first.text("program_name"), Some("systemd"));
        assert_eq!(first.text("path"), Some("/run/user/1000/systemd/notify"));

        let second = &records[1];
        assert_eq!(second.text("flags"), Some("ACC"));
        assert_eq!(second.text("state"), Some("LISTENING"));
        assert_eq!(second.text("program_name"), Some("init"));

        let third = &records[2];
        assert_eq!(third.get("program_name"), Some(&Value::Null));
        assert!(third.get("path").is_none());
    }

    #[test]
    fn test_unix_program_with_space_bounded_by_path_column() {
        let text = format!(
            "Active UNIX domain sockets (w/o servers)\n{UNIX_HEADER}\n\
             unix  3      [ ]         STREAM     CONNECTED     41213    2242/sshd: root      /run/systemd/journal/stdout\n"
        );
        let record = &parse(&text)[0];
        assert_eq!(record.text("program_name"), Some("sshd: root"));
        assert_eq!(record.text("path"), Some("/run/systemd/journal/stdout"));
    }

    #[test]
    fn test_header_without_title_infers_section() {
        let text = format!(
            "{UNIX_HEADER}\nunix  2      [ ACC ]     STREAM     LISTENING     20812    1/init               /run/systemd/private\n"
        );
        let records = parse(&text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].socket_family(), Some(SocketFamily::Unix));
    }

    #[test]
    fn test_rows_before_header_and_skipped_sections_are_ignored() {
        let text = "tcp 0 0 a:1 b:2 LISTEN\n\
                    Active Bluetooth connections (servers and established)\n\
                    Proto  Destination       Source            State         PSM DCID   SCID      IMTU    OMTU Security\n\
                    l2cap  00:00:00:00:00:00 AA:BB:CC:DD:EE:FF LISTEN        25  0x0000 0x0000    672     0    low\n\
                    Kernel IP routing table\n\
                    Destination     Gateway         Genmask         Flags   MSS Window  irtt Iface\n\
                    0.0.0.0         192.168.1.1     0.0.0.0         UG        0 0          0 eth0\n";
        assert!(parse(text).is_empty());
    }

    #[test]
    fn test_short_row_is_partial() {
        let text = format!("Active Internet connections (servers and established)\n{APEE_HEADER}\ntcp 0\n");
        let record = &parse(&text)[0];
        assert_eq!(record.text("proto"), Some("tcp"));
        assert_eq!(record.text("recv_q"), Some("0"));
        assert!(record.get("send_q").is_none());
        assert!(record.get("state").is_none());
        assert!(record.get("local_port").is_none());
    }
}
