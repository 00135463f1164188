//! Record type definitions.
//!
//! A [`Record`] is one parsed connection, socket, or route. Each kind has its
//! own struct so a socket record can never carry network fields. Every named
//! field is an `Option<Value>`:
//!
//! - `None`: the section parser never produced the field (not serialized).
//! - `Some(Value::Null)`: the field exists but is empty or failed coercion.
//!
//! Header columns without a named field land in the struct's `extra` map,
//! which is flattened into the serialized object.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Value;

/// Name-based access to the fields of a record.
///
/// Section parsers assign columns by their normalized header name and the
/// normalizer coerces fields by name, so neither needs to know which struct
/// backs the record.
pub trait FieldMap {
    /// Returns the value of `key`, if the field is present.
    fn get(&self, key: &str) -> Option<&Value>;
    /// Returns a mutable reference to the value of `key`, if present.
    fn get_mut(&mut self, key: &str) -> Option<&mut Value>;
    /// Sets `key`, replacing any previous value.
    fn insert(&mut self, key: &str, value: Value);
    /// Returns all present fields: named fields in declaration order, then
    /// extra columns in key order.
    fn entries(&self) -> Vec<(&str, &Value)>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

macro_rules! record_struct {
    (
        $(#[$meta:meta])*
        pub struct $name:ident [$( $fixed:ident : $fixed_ty:ty ),*] {
            $( $(#[$fmeta:meta])* $field:ident => $key:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $( pub $fixed: $fixed_ty, )*
            $(
                $(#[$fmeta])*
                #[serde(
                    rename = $key,
                    default,
                    deserialize_with = "present",
                    skip_serializing_if = "Option::is_none"
                )]
                pub $field: Option<Value>,
            )*
            /// Header columns without a dedicated field.
            #[serde(flatten)]
            pub extra: BTreeMap<String, Value>,
        }

        impl $name {
            /// Names of the dedicated fields, in declaration order.
            pub const FIELDS: &'static [&'static str] = &[$($key),*];

            fn slot(&self, key: &str) -> Option<&Option<Value>> {
                match key {
                    $( $key => Some(&self.$field), )*
                    _ => None,
                }
            }

            fn slot_mut(&mut self, key: &str) -> Option<&mut Option<Value>> {
                match key {
                    $( $key => Some(&mut self.$field), )*
                    _ => None,
                }
            }
        }

        impl FieldMap for $name {
            fn get(&self, key: &str) -> Option<&Value> {
                match self.slot(key) {
                    Some(slot) => slot.as_ref(),
                    None => self.extra.get(key),
                }
            }

            fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
                if Self::FIELDS.contains(&key) {
                    return self.slot_mut(key).and_then(Option::as_mut);
                }
                self.extra.get_mut(key)
            }

            fn insert(&mut self, key: &str, value: Value) {
                match self.slot_mut(key) {
                    Some(slot) => *slot = Some(value),
                    None => {
                        self.extra.insert(key.to_string(), value);
                    }
                }
            }

            fn entries(&self) -> Vec<(&str, &Value)> {
                let mut out = Vec::new();
                $(
                    if let Some(value) = &self.$field {
                        out.push(($key, value));
                    }
                )*
                out.extend(self.extra.iter().map(|(key, value)| (key.as_str(), value)));
                out
            }
        }
    };
}

record_struct! {
    /// A TCP/UDP/raw connection or listening endpoint.
    pub struct NetworkRecord [] {
        proto => "proto",
        recv_q => "recv_q",
        send_q => "send_q",
        transport_protocol => "transport_protocol",
        network_protocol => "network_protocol",
        local_address => "local_address",
        local_port => "local_port",
        /// Present only when `local_port` is an integer literal.
        local_port_num => "local_port_num",
        foreign_address => "foreign_address",
        foreign_port => "foreign_port",
        /// Present only when `foreign_port` is an integer literal.
        foreign_port_num => "foreign_port_num",
        state => "state",
        program_name => "program_name",
        pid => "pid",
        user => "user",
        inode => "inode",
        security_context => "security_context",
        timer => "timer",
    }
}

record_struct! {
    /// A Unix-domain socket or a macOS kernel control/event socket.
    pub struct SocketRecord [family: SocketFamily] {
        proto => "proto",
        refcnt => "refcnt",
        flags => "flags",
        socket_type => "type",
        state => "state",
        inode => "inode",
        program_name => "program_name",
        pid => "pid",
        path => "path",
        address => "address",
        recv_q => "recv_q",
        send_q => "send_q",
        osx_inode => "osx_inode",
        conn => "conn",
        refs => "refs",
        nextref => "nextref",
        name => "name",
        unit => "unit",
        vendor => "vendor",
        class => "class",
        subcla => "subcla",
        osx_flags => "osx_flags",
        pcbcount => "pcbcount",
        rcvbuf => "rcvbuf",
        sndbuf => "sndbuf",
        rxbytes => "rxbytes",
        txbytes => "txbytes",
    }
}

record_struct! {
    /// A routing-table entry.
    pub struct RouteRecord [] {
        destination => "destination",
        gateway => "gateway",
        route_flags => "route_flags",
        route_refs => "route_refs",
        use_count => "use",
        mtu => "mtu",
        netif => "netif",
        expire => "expire",
    }
}

impl SocketRecord {
    /// Creates an empty socket record of the given family.
    pub fn new(family: SocketFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }
}

/// Which section a socket record came from.
///
/// # Examples
///
/// ```
/// use netstat_schema_core::SocketFamily;
///
/// let family = SocketFamily::KernelEvent;
/// assert_eq!(serde_json::to_string(&family).unwrap(), "\"kernel_event\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SocketFamily {
    /// Unix-domain socket (Linux `Active UNIX domain sockets`, macOS
    /// `Active LOCAL (UNIX) domain sockets`).
    #[default]
    Unix,
    /// macOS `Registered kernel control modules`.
    KernelControlModule,
    /// macOS `Active kernel event sockets`.
    KernelEvent,
    /// macOS `Active kernel control sockets`.
    KernelControl,
}

/// Record category, matching the serialized `kind` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Network,
    Socket,
    Route,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Network => "network",
            RecordKind::Socket => "socket",
            RecordKind::Route => "route",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed `netstat` entity.
///
/// Serialized with an internal `kind` tag:
///
/// ```
/// use netstat_schema_core::*;
///
/// let mut socket = SocketRecord::new(SocketFamily::Unix);
/// socket.insert("refcnt", Value::Int(2));
/// socket.insert("path", Value::from("/run/udev/control"));
///
/// let json = serde_json::to_value(Record::Socket(socket)).unwrap();
/// assert_eq!(json["kind"], "socket");
/// assert_eq!(json["family"], "unix");
/// assert_eq!(json["refcnt"], 2);
/// assert!(json.get("local_port").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Network(NetworkRecord),
    Socket(SocketRecord),
    Route(RouteRecord),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Network(_) => RecordKind::Network,
            Record::Socket(_) => RecordKind::Socket,
            Record::Route(_) => RecordKind::Route,
        }
    }

    /// Returns the socket family for socket records.
    pub fn socket_family(&self) -> Option<SocketFamily> {
        match self {
            Record::Socket(socket) => Some(socket.family),
            _ => None,
        }
    }

    pub fn fields(&self) -> &dyn FieldMap {
        match self {
            Record::Network(r) => r,
            Record::Socket(r) => r,
            Record::Route(r) => r,
        }
    }

    pub fn fields_mut(&mut self) -> &mut dyn FieldMap {
        match self {
            Record::Network(r) => r,
            Record::Socket(r) => r,
            Record::Route(r) => r,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields().get(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields_mut().insert(key, value);
    }

    /// Returns the string content of `key`, if present and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}
