//! macOS/BSD netstat section parser.
//!
//! One document may hold several sections, each introduced by a title line
//! and followed by its own header row:
//!
//! ```text
//! Active Internet connections (including servers)
//! Proto Recv-Q Send-Q  Local Address          Foreign Address        (state)
//! tcp4       0      0  192.168.1.221.56722    151.101.1.69.443       ESTABLISHED
//! Registered kernel control modules
//! id       flags    pcbcount rcvbuf   sndbuf   name
//!        1        9        0   131072   131072 com.apple.flow-divert
//! Routing tables
//! Internet:
//! Destination        Gateway            Flags        Refs      Use   Netif Expire
//! default            192.168.1.1        UGSc           91       11     en0
//! ```

use netstat_schema_core::{
    NetworkRecord, Record, RouteRecord, SocketFamily, SocketRecord, Value,
};
use tracing::debug;

use super::{SectionParser, assign_columns, split_address_field};
use crate::detect::Dialect;
use crate::schema::{HeaderAliases, Schema};
use crate::text::tokenize;

static BSD_HEADERS: HeaderAliases = HeaderAliases {
    phrases: &["local address", "foreign address"],
    renames: &[
        ("(state)", "state"),
        ("inode", "osx_inode"),
        ("flags", "osx_flags"),
        ("addr", "path"),
    ],
};

static ROUTE_HEADERS: HeaderAliases = HeaderAliases {
    phrases: &[],
    renames: &[("flags", "route_flags"), ("refs", "route_refs")],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Pending,
    Network,
    /// Recognized, rows are not parsed.
    Multipath,
    Unix,
    KernelControlModules,
    KernelEvents,
    KernelControl,
    Routing,
}

impl Section {
    fn from_title(line: &str) -> Option<Self> {
        let section = if line.starts_with("Active Internet connections") {
            Section::Network
        } else if line.starts_with("Active Multipath Internet connections") {
            Section::Multipath
        } else if line.starts_with("Active LOCAL (UNIX) domain sockets")
            || line.starts_with("Active UNIX domain sockets")
        {
            Section::Unix
        } else if line.starts_with("Registered kernel control modules") {
            Section::KernelControlModules
        } else if line.starts_with("Active kernel event sockets") {
            Section::KernelEvents
        } else if line.starts_with("Active kernel control sockets") {
            Section::KernelControl
        } else if line.starts_with("Routing tables") {
            Section::Routing
        } else {
            return None;
        };
        Some(section)
    }

    /// Whether `line` is the column header row of this section.
    fn is_header(self, line: &str) -> bool {
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| line.starts_with(*p));
        match self {
            Section::Network | Section::Multipath => starts(&["Proto", "Socket"]),
            Section::Unix => starts(&["Address"]),
            Section::KernelControlModules => starts(&["id ", "kctlref"]),
            Section::KernelEvents | Section::KernelControl => starts(&["Proto", "Socket"]),
            Section::Routing => starts(&["Destination"]),
            Section::Pending => false,
        }
    }

    fn aliases(self) -> &'static HeaderAliases {
        match self {
            Section::Routing => &ROUTE_HEADERS,
            _ => &BSD_HEADERS,
        }
    }
}

pub struct BsdParser;

impl SectionParser for BsdParser {
    fn dialect(&self) -> Dialect {
        Dialect::Bsd
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

            if section.is_header(line) {
                schema = Some(Schema::from_header(line, section.aliases()));
                continue;
            }

            // Address family sub-titles inside the routing tables.
            if section == Section::Routing && line.trim_end().ends_with(':') {
                continue;
            }

            let Some(active) = schema.as_ref() else {
                debug!(line = index, section = ?section, "Skipping row with no column header");
                continue;
            };

            let record = match section {
                Section::Network => parse_network_row(active, line),
                Section::Unix => socket_row(active, line, SocketFamily::Unix),
                Section::KernelControlModules => {
                    socket_row(active, line, SocketFamily::KernelControlModule)
                }
                Section::KernelEvents => socket_row(active, line, SocketFamily::KernelEvent),
                Section::KernelControl => socket_row(active, line, SocketFamily::KernelControl),
                Section::Routing => route_row(active, line),
                Section::Multipath | Section::Pending => continue,
            };
            records.push(record);
        }

        records
    }
}

fn parse_network_row(schema: &Schema, line: &str) -> Record {
    let tokens = tokenize(line);
    let mut record = Record::Network(NetworkRecord::default());

    // UDP and ICMP rows have no state; later columns shift left.
    let gap = schema.position("state").filter(|&idx| {
        tokens.len() >= idx
            && tokens
                .get(idx)
                .is_none_or(|token| !is_state_word(token.text))
    });
    assign_columns(&mut record, schema.columns(), &tokens, line, gap);

    split_address_field(&mut record, "local", '.');
    split_address_field(&mut record, "foreign", '.');
    add_protocols(&mut record);
    record
}

fn socket_row(schema: &Schema, line: &str, family: SocketFamily) -> Record {
    let tokens = tokenize(line);
    let mut record = Record::Socket(SocketRecord::new(family));
    assign_columns(&mut record, schema.columns(), &tokens, line, None);
    record
}

fn route_row(schema: &Schema, line: &str) -> Record {
    let tokens = tokenize(line);
    let mut record = Record::Route(RouteRecord::default());
    assign_columns(&mut record, schema.columns(), &tokens, line, None);
    record
}

/// TCP state words: `LISTEN`, `ESTABLISHED`, `FIN_WAIT_2`, ...
fn is_state_word(text: &str) -> bool {
    let mut bytes = text.bytes();
    bytes.next().is_some_and(|b| b.is_ascii_uppercase())
        && bytes.all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

/// Derives `transport_protocol` and `network_protocol` from `proto`.
fn add_protocols(record: &mut Record) {
    let Some(proto) = record.text("proto") else {
        return;
    };
    let transport = if proto.starts_with("tcp") {
        Value::from("tcp")
    } else if proto.starts_with("udp") {
        Value::from("udp")
    } else if proto.starts_with("icm") {
        Value::from("icmp")
    } else {
        Value::Null
    };
    let network = if proto.ends_with("46") {
        Value::from("ipv4/6")
    } else if proto.ends_with('4') {
        Value::from("ipv4")
    } else if proto.ends_with('6') {
        Value::from("ipv6")
    } else {
        Value::Null
    };
    record.insert("transport_protocol", transport);
    record.insert("network_protocol", network);
}
