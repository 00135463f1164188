//! Core record types for structured `netstat` output.
//!
//! This crate defines the typed data model produced by the
//! `netstat-schema-parser` crate:
//!
//! - [`Record`]: one parsed entity, tagged by kind (`network`, `socket`,
//!   `route`).
//! - [`NetworkRecord`], [`SocketRecord`], [`RouteRecord`]: the field set
//!   for each kind. Columns a header defines but the struct does not name are
//!   kept in the record's `extra` map.
//! - [`Value`]: integer, string, or null field value.
//! - [`FieldMap`]: name-based field access shared by all record kinds.
//!
//! Validation ([`validate_record`], [`validate_records`]) checks that a
//! record list matches the shape expected for raw or normalized output.
//!
//! # Example
//!
//! ```
//! use netstat_schema_core::*;
//!
//! let mut record = Record::Network(NetworkRecord::default());
//! record.insert("proto", Value::from("tcp"));
//! record.insert("recv_q", Value::Int(0));
//! record.insert("local_port", Value::from("22"));
//! record.insert("local_port_num", Value::Int(22));
//!
//! assert_eq!(record.kind(), RecordKind::Network);
//! assert_eq!(record.get("proto").and_then(Value::as_str), Some("tcp"));
//! assert!(validate_record(&record, RecordMode::Normalized).is_empty());
//! ```

mod record;
mod validate;
mod value;

pub use record::*;
pub use validate::{RecordMode, ValidationError, validate_record, validate_records};
pub use value::{Value, parse_int};

/// Fields coerced to integers by normalization.
///
/// A field in this set that is present on a normalized record holds either
/// [`Value::Int`] or [`Value::Null`].
pub const INTEGER_FIELDS: &[&str] = &[
    "recv_q",
    "send_q",
    "pid",
    "refcnt",
    "inode",
    "unit",
    "vendor",
    "class",
    "osx_flags",
    "subcla",
    "pcbcount",
    "rcvbuf",
    "sndbuf",
    "rxbytes",
    "txbytes",
    "route_refs",
    "use",
    "mtu",
];

/// Port string fields and the numeric companion derived from each.
pub const PORT_FIELDS: &[(&str, &str)] = &[
    ("local_port", "local_port_num"),
    ("foreign_port", "foreign_port_num"),
];
