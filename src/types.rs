//! Core data model: typed flow-record values and the record itself.
//!
//! A [`FlowRecord`] is an immutable mapping from information-element name to a
//! typed [`Value`], produced once per record by an external collector. The
//! engine never mutates a record; all per-record work is a pure function of
//! the record and the report configuration.
//!
//! Absence is modelled by the map, not by the value type: [`FlowRecord::get`]
//! returns `None` for an element that was not exported, which is distinct
//! from an element that was exported with value zero. Everything downstream
//! preserves that three-state semantics (absent / zero / non-zero).

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

/// A single typed information-element value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Unsigned counter or gauge (octet/packet counts, RTT milliseconds, ...).
    Unsigned(u64),
    /// Signed integer.
    Signed(i64),
    /// IPv4 or IPv6 address.
    Addr(IpAddr),
}

impl Value {
    /// Numeric view of the value for predicate arithmetic.
    ///
    /// Returns `None` for addresses and for negative signed values; the
    /// predicate kinds compare non-negative counters only.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Value::Unsigned(v) => Some(*v),
            Value::Signed(v) if *v >= 0 => Some(*v as u64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(v) => write!(f, "{v}"),
            Value::Signed(v) => write!(f, "{v}"),
            Value::Addr(a) => write!(f, "{a}"),
        }
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Unsigned(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Signed(v)
    }
}

impl From<IpAddr> for Value {
    fn from(a: IpAddr) -> Self {
        Value::Addr(a)
    }
}

/// Returns the RFC 5103 reverse-direction counterpart of an element name.
///
/// Unprefixed names describe initiator-to-responder traffic; the counterpart
/// prepends `reverse` and upper-cases the first letter:
/// `octetDeltaCount` -> `reverseOctetDeltaCount`.
pub fn reverse_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 7);
    out.push_str("reverse");
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
    out
}

/// One decoded flow record: an immutable name-to-value mapping.
///
/// Build with [`FlowRecord::new`] and [`FlowRecord::with_field`] (tests,
/// embedding), or let [`crate::input::NdjsonReader`] produce records from
/// decoded NDJSON. Once handed to a pipeline a record is only ever read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowRecord {
    fields: BTreeMap<String, Value>,
}

impl FlowRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, consuming and returning the record.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field by element name.
    ///
    /// `None` means the element is absent from the record, which is distinct
    /// from a present zero.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Numeric view of a field, `None` if absent or non-numeric.
    pub fn unsigned(&self, name: &str) -> Option<u64> {
        self.get(name).and_then(Value::as_unsigned)
    }

    /// Number of fields present on the record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate (name, value) pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for FlowRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{reverse_name, FlowRecord, Value};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn absent_is_distinct_from_zero() {
        let rec = FlowRecord::new().with_field("octetDeltaCount", 0u64);
        assert_eq!(rec.get("octetDeltaCount"), Some(&Value::Unsigned(0)));
        assert_eq!(rec.get("reverseOctetDeltaCount"), None);
    }

    #[test]
    fn reverse_name_uppercases_first_letter() {
        assert_eq!(reverse_name("octetDeltaCount"), "reverseOctetDeltaCount");
        assert_eq!(
            reverse_name("meanTcpRttMilliseconds"),
            "reverseMeanTcpRttMilliseconds"
        );
    }

    #[test]
    fn as_unsigned_rejects_addresses_and_negatives() {
        assert_eq!(Value::Unsigned(7).as_unsigned(), Some(7));
        assert_eq!(Value::Signed(7).as_unsigned(), Some(7));
        assert_eq!(Value::Signed(-1).as_unsigned(), None);
        let addr = Value::Addr(IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(addr.as_unsigned(), None);
    }

    #[test]
    fn display_renders_addresses_textually() {
        let v = Value::Addr(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(v.to_string(), "192.0.2.1");
    }
}
