//! Record list validation.
//!
//! Checks that records carry the value shapes promised for raw or normalized
//! output: integer-typed fields hold integers (or null) only after
//! normalization, and derived port numbers agree with the port strings they
//! came from.
//!
//! # Examples
//!
//! ```
//! use netstat_schema_core::*;
//!
//! let mut record = Record::Network(NetworkRecord::default());
//! record.insert("recv_q", Value::from("0"));
//! assert!(validate_record(&record, RecordMode::Raw).is_empty());
//!
//! // A raw string left in an integer field is not valid normalized output.
//! let errors = validate_record(&record, RecordMode::Normalized);
//! assert_eq!(errors, vec![ValidationError::UncoercedInteger("recv_q".into())]);
//! ```

use thiserror::Error;

use crate::{INTEGER_FIELDS, PORT_FIELDS, Record, Value, parse_int};

/// Which output shape a record list is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordMode {
    /// Section-parser output: every value is a string or null.
    Raw,
    /// Normalizer output: integer fields coerced, port numbers derived.
    Normalized,
}

/// Record validation errors.
///
/// Each variant names the offending field; [`validate_records`] prefixes
/// the record index when reporting over a list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An integer-typed field still holds text after normalization.
    #[error("integer field was not coerced: {0}")]
    UncoercedInteger(String),
    /// A raw record holds an integer value.
    #[error("raw record holds an integer value: {0}")]
    UnexpectedInteger(String),
    /// A derived port number exists in raw output.
    #[error("raw record holds a derived port number: {0}")]
    UnexpectedPortNumber(String),
    /// A derived port number disagrees with its source port string.
    #[error("port number does not match its port field: {0}")]
    PortNumberMismatch(String),
    /// An integer port string has no derived port number.
    #[error("missing derived port number: {0}")]
    MissingPortNumber(String),
    /// Error found on a specific record of a list.
    #[error("record {index}: {error}")]
    AtRecord {
        index: usize,
        error: Box<ValidationError>,
    },
}

/// Validates a single record against the expected output shape.
pub fn validate_record(record: &Record, mode: RecordMode) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let fields = record.fields();

    match mode {
        RecordMode::Raw => {
            for (key, value) in fields.entries() {
                if matches!(value, Value::Int(_)) {
                    errors.push(ValidationError::UnexpectedInteger(key.to_string()));
                }
            }
            for (_, num_key) in PORT_FIELDS {
                if fields.contains(num_key) {
                    errors.push(ValidationError::UnexpectedPortNumber(num_key.to_string()));
                }
            }
        }
        RecordMode::Normalized => {
            for key in INTEGER_FIELDS {
                if let Some(Value::Text(_)) = fields.get(key) {
                    errors.push(ValidationError::UncoercedInteger(key.to_string()));
                }
            }
            for (port_key, num_key) in PORT_FIELDS {
                let expected = fields
                    .get(port_key)
                    .and_then(Value::as_str)
                    .and_then(parse_int);
                match (expected, fields.get(num_key)) {
                    (Some(port), Some(Value::Int(num))) if port == *num => {}
                    (None, None) => {}
                    (Some(_), None) => {
                        errors.push(ValidationError::MissingPortNumber(num_key.to_string()));
                    }
                    _ => {
                        errors.push(ValidationError::PortNumberMismatch(num_key.to_string()));
                    }
                }
            }
        }
    }

    errors
}

/// Validates every record of a list, tagging errors with the record index.
///
/// # Examples
///
/// ```
/// use netstat_schema_core::*;
///
/// let mut ok = Record::Route(RouteRecord::default());
/// ok.insert("mtu", Value::Int(1500));
/// let mut bad = Record::Route(RouteRecord::default());
/// bad.insert("mtu", Value::from("1500"));
///
/// let errors = validate_records(&[ok, bad], RecordMode::Normalized);
/// assert_eq!(errors.len(), 1);
/// assert!(errors[0].to_string().starts_with("record 1:"));
/// ```
pub fn validate_records(records: &[Record], mode: RecordMode) -> Vec<ValidationError> {
    records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| {
            validate_record(record, mode)
                .into_iter()
                .map(move |error| ValidationError::AtRecord {
                    index,
                    error: Box::new(error),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldMap, NetworkRecord, SocketFamily, SocketRecord};

    fn network(pairs: &[(&str, Value)]) -> Record {
        let mut record = Record::Network(NetworkRecord::default());
        for (key, value) in pairs {
            record.insert(key, value.clone());
        }
        record
    }

    #[test]
    fn test_normalized_accepts_null_integer_fields() {
        let record = network(&[("recv_q", Value::Null), ("send_q", Value::Int(0))]);
        assert!(validate_record(&record, RecordMode::Normalized).is_empty());
    }

    #[test]
    fn test_normalized_requires_port_number_for_integer_port() {
        let record = network(&[("local_port", Value::from("52186"))]);
        assert_eq!(
            validate_record(&record, RecordMode::Normalized),
            vec![ValidationError::MissingPortNumber("local_port_num".into())]
        );
    }

    #[test]
    fn test_normalized_rejects_port_number_for_named_service() {
        let record = network(&[
            ("foreign_port", Value::from("ssh")),
            ("foreign_port_num", Value::Int(22)),
        ]);
        assert_eq!(
            validate_record(&record, RecordMode::Normalized),
            vec![ValidationError::PortNumberMismatch("foreign_port_num".into())]
        );
    }

    #[test]
    fn test_normalized_accepts_matching_port_number() {
        let record = network(&[
            ("local_port", Value::from("52186")),
            ("local_port_num", Value::Int(52186)),
            ("foreign_port", Value::from("*")),
        ]);
        assert!(validate_record(&record, RecordMode::Normalized).is_empty());
    }

    #[test]
    fn test_raw_rejects_integers_and_port_numbers() {
        let record = network(&[
            ("recv_q", Value::Int(0)),
            ("local_port_num", Value::Int(80)),
        ]);
        let errors = validate_record(&record, RecordMode::Raw);
        assert!(errors.contains(&ValidationError::UnexpectedInteger("recv_q".into())));
        assert!(errors.contains(&ValidationError::UnexpectedPortNumber(
            "local_port_num".into()
        )));
    }

    #[test]
    fn test_extra_integer_columns_are_checked() {
        let mut socket = SocketRecord::new(SocketFamily::KernelControlModule);
        socket.insert("rxbytes", Value::from("12"));
        let errors = validate_record(&Record::Socket(socket), RecordMode::Normalized);
        assert_eq!(
            errors,
            vec![ValidationError::UncoercedInteger("rxbytes".into())]
        );
    }

    #[test]
    fn test_error_display() {
        let error = ValidationError::AtRecord {
            index: 3,
            error: Box::new(ValidationError::UncoercedInteger("pid".into())),
        };
        assert_eq!(error.to_string(), "record 3: integer field was not coerced: pid");
    }
}
