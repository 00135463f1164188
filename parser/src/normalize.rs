//! Type coercion of raw records.
//!
//! Integer-typed fields become [`Value::Int`] (or [`Value::Null`] when the
//! text is not an integer), and integer port strings gain a `*_port_num`
//! companion. Nothing else is touched.

use netstat_schema_core::{INTEGER_FIELDS, PORT_FIELDS, Record, Value, parse_int};

/// Normalizes every record in place.
pub fn normalize_records(records: &mut [Record]) {
    for record in records {
        normalize_record(record);
    }
}

/// Normalizes one record in place.
///
/// Running it again on a normalized record changes nothing.
pub fn normalize_record(record: &mut Record) {
    let fields = record.fields_mut();

    for key in INTEGER_FIELDS {
        if let Some(value) = fields.get_mut(key) {
            *value = value.to_int();
        }
    }

    for (port_key, num_key) in PORT_FIELDS {
        let port = fields.get(port_key).and_then(Value::as_str).and_then(parse_int);
        if let Some(port) = port {
            fields.insert(num_key, Value::Int(port));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netstat_schema_core::{FieldMap, NetworkRecord, RouteRecord, SocketFamily, SocketRecord};

    fn network(pairs: &[(&str, &str)]) -> Record {
        let mut record = Record::Network(NetworkRecord::default());
        for (key, value) in pairs {
            record.insert(key, Value::from(*value));
        }
        record
    }

    #[test]
    fn test_integer_port_gets_number() {
        let mut record = network(&[("local_port", "52186"), ("foreign_port", "ssh")]);
        normalize_record(&mut record);

        assert_eq!(record.text("local_port"), Some("52186"));
        assert_eq!(record.get("local_port_num"), Some(&Value::Int(52186)));
        assert_eq!(record.text("foreign_port"), Some("ssh"));
        assert!(record.get("foreign_port_num").is_none());
    }

    #[test]
    fn test_whitespace_tolerated_in_integer_fields() {
        let mut socket = SocketRecord::new(SocketFamily::Unix);
        socket.insert("refcnt", Value::from("2"));
        socket.insert("pid", Value::from(" 1"));
        let mut record = Record::Socket(socket);
        normalize_record(&mut record);

        assert_eq!(record.get("refcnt"), Some(&Value::Int(2)));
        assert_eq!(record.get("pid"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_garbage_becomes_null_and_others_untouched() {
        let mut record = network(&[
            ("recv_q", "N/A"),
            ("send_q", "0"),
            ("state", "LISTEN"),
            ("local_address", "0.0.0.0"),
        ]);
        normalize_record(&mut record);

        assert_eq!(record.get("recv_q"), Some(&Value::Null));
        assert_eq!(record.get("send_q"), Some(&Value::Int(0)));
        assert_eq!(record.text("state"), Some("LISTEN"));
        assert_eq!(record.text("local_address"), Some("0.0.0.0"));
        assert!(record.get("pid").is_none());
    }

    #[test]
    fn test_present_null_stays_null() {
        let mut record = Record::Network(NetworkRecord::default());
        record.insert("pid", Value::Null);
        normalize_record(&mut record);
        assert_eq!(record.get("pid"), Some(&Value::Null));
    }

    #[test]
    fn test_route_fields_and_extra_columns() {
        let mut route = RouteRecord::default();
        route.insert("use", Value::from("11"));
        route.insert("mtu", Value::from("!"));
        route.insert("route_refs", Value::from("91"));
        let mut record = Record::Route(route);
        normalize_record(&mut record);

        assert_eq!(record.get("use"), Some(&Value::Int(11)));
        assert_eq!(record.get("mtu"), Some(&Value::Null));
        assert_eq!(record.get("route_refs"), Some(&Value::Int(91)));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut records = vec![network(&[
            ("recv_q", "0"),
            ("send_q", "x"),
            ("local_port", "22"),
            ("foreign_port", "*"),
            ("pid", "887"),
        ])];
        normalize_records(&mut records);
        let once = records.clone();
        normalize_records(&mut records);
        assert_eq!(records, once);
    }
}
