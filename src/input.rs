//! NDJSON adapter for already-decoded flow records.
//!
//! This is not a wire decoder: each input line is one decoded record, a JSON
//! object mapping information-element names to values the collector already
//! typed. Two line shapes are accepted:
//!
//! - a bare record object: `{"octetDeltaCount": 100, ...}`
//! - an export envelope: `{"domain": 1, "sequence": 7, "record": {...}}`
//!
//! With envelopes, per-domain sequence continuity is checked and gaps are
//! reported through [`FlowObserver::on_sequence_gap`]; the record is still
//! yielded. JSON `null` fields are treated as absent.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::net::IpAddr;
use std::sync::Arc;

use crate::error::{ReportError, ReportResult};
use crate::observe::FlowObserver;
use crate::types::{FlowRecord, Value};

/// Streaming reader yielding one [`FlowRecord`] per NDJSON line.
pub struct NdjsonReader<R> {
    reader: R,
    line_no: usize,
    observer: Option<Arc<dyn FlowObserver>>,
    // next expected sequence number per observation domain
    expected: BTreeMap<u32, u32>,
}

impl<R: BufRead> NdjsonReader<R> {
    /// Wrap a buffered reader of NDJSON lines.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            observer: None,
            expected: BTreeMap::new(),
        }
    }

    /// Attach an observer for sequence-gap notifications.
    pub fn with_observer(mut self, observer: Arc<dyn FlowObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    fn parse_line(&mut self, line: &str) -> ReportResult<FlowRecord> {
        let value: serde_json::Value = serde_json::from_str(line)?;
        let obj = match value {
            serde_json::Value::Object(obj) => obj,
            _ => {
                return Err(ReportError::InvalidField {
                    line: self.line_no,
                    field: String::new(),
                    message: "line is not a json object".to_string(),
                });
            }
        };

        // Envelope form carries export metadata next to the record.
        if let Some(inner) = obj.get("record") {
            let domain = obj.get("domain").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
            if let Some(seq) = obj.get("sequence").and_then(|v| v.as_u64()) {
                self.check_sequence(domain, seq as u32);
            }
            let inner = inner
                .as_object()
                .ok_or_else(|| ReportError::InvalidField {
                    line: self.line_no,
                    field: "record".to_string(),
                    message: "envelope 'record' is not a json object".to_string(),
                })?;
            return self.record_from_object(inner);
        }

        self.record_from_object(&obj)
    }

    fn record_from_object(
        &self,
        obj: &serde_json::Map<String, serde_json::Value>,
    ) -> ReportResult<FlowRecord> {
        let mut fields = Vec::with_capacity(obj.len());
        for (name, jv) in obj {
            match self.convert(name, jv)? {
                Some(value) => fields.push((name.clone(), value)),
                None => {} // explicit null: absent
            }
        }
        Ok(fields.into_iter().collect())
    }

    fn convert(&self, field: &str, jv: &serde_json::Value) -> ReportResult<Option<Value>> {
        match jv {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Some(Value::Unsigned(u)))
                } else if let Some(i) = n.as_i64() {
                    Ok(Some(Value::Signed(i)))
                } else {
                    Err(self.invalid(field, "expected an integer"))
                }
            }
            serde_json::Value::String(s) => match s.parse::<IpAddr>() {
                Ok(addr) => Ok(Some(Value::Addr(addr))),
                Err(_) => Err(self.invalid(field, "expected an IPv4/IPv6 address string")),
            },
            _ => Err(self.invalid(field, "expected a number, address string, or null")),
        }
    }

    fn invalid(&self, field: &str, message: &str) -> ReportError {
        ReportError::InvalidField {
            line: self.line_no,
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    fn check_sequence(&mut self, domain: u32, got: u32) {
        if let Some(&expected) = self.expected.get(&domain) {
            if got != expected {
                if let Some(obs) = &self.observer {
                    obs.on_sequence_gap(domain, expected, got);
                }
            }
        }
        self.expected.insert(domain, got.wrapping_add(1));
    }
}

impl<R: BufRead> Iterator for NdjsonReader<R> {
    type Item = ReportResult<FlowRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(self.parse_line(trimmed));
        }
    }
}
