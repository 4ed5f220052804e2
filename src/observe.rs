//! Diagnostic notifications from record iteration.
//!
//! The collector session that feeds the engine reports protocol-level events
//! (a template missing for a set, a sequence-number gap in an observation
//! domain); the engine itself reports records it had to skip because no
//! address was available. All of these are notifications, not errors: the
//! pipeline continues with the next record.
//!
//! Callbacks are invoked inline during iteration; the engine is
//! single-threaded and pull-based, so no queuing or async dispatch is
//! involved.

use std::fmt;
use std::sync::Arc;

/// Observer interface for collector and pipeline diagnostics.
///
/// All methods default to no-ops, so implementors override only what they
/// care about.
pub trait FlowObserver: Send + Sync {
    /// A record set arrived for which no template is known.
    fn on_missing_template(&self, _domain: u32, _set_id: u16) {}

    /// The per-domain export sequence number jumped.
    fn on_sequence_gap(&self, _domain: u32, _expected: u32, _got: u32) {}

    /// A record needed an address column but carried neither an IPv4 nor an
    /// IPv6 address; the record was skipped.
    fn on_address_unavailable(&self, _record_index: u64) {}
}

/// Fans each notification out to a list of observers.
#[derive(Default)]
pub struct CompositeFlowObserver {
    observers: Vec<Arc<dyn FlowObserver>>,
}

impl CompositeFlowObserver {
    /// Create a composite from a list of observers.
    pub fn new(observers: Vec<Arc<dyn FlowObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeFlowObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeFlowObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl FlowObserver for CompositeFlowObserver {
    fn on_missing_template(&self, domain: u32, set_id: u16) {
        for o in &self.observers {
            o.on_missing_template(domain, set_id);
        }
    }

    fn on_sequence_gap(&self, domain: u32, expected: u32, got: u32) {
        for o in &self.observers {
            o.on_sequence_gap(domain, expected, got);
        }
    }

    fn on_address_unavailable(&self, record_index: u64) {
        for o in &self.observers {
            o.on_address_unavailable(record_index);
        }
    }
}

/// Logs every notification to stderr.
#[derive(Debug, Default)]
pub struct StdErrFlowObserver;

impl FlowObserver for StdErrFlowObserver {
    fn on_missing_template(&self, domain: u32, set_id: u16) {
        eprintln!("missing template for set {set_id} in domain {domain}");
    }

    fn on_sequence_gap(&self, domain: u32, expected: u32, got: u32) {
        eprintln!("bad sequence for domain {domain}: got {got}, expected {expected}");
    }

    fn on_address_unavailable(&self, record_index: u64) {
        eprintln!("ignoring record {record_index} without an address");
    }
}
