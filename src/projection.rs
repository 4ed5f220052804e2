//! Column projection and per-direction gating.
//!
//! A [`ProjectionSpec`] is an ordered list of [`Column`] descriptors defining
//! one output row, for one flow direction. Direction substitution happens at
//! construction time: a spec built for [`Direction::Reverse`] holds the
//! concrete `reverse`-prefixed element names, so per-record resolution is a
//! plain lookup.
//!
//! A [`DirectionGate`] decides, per record, whether a direction's sub-row is
//! emitted at all. Forward and reverse gates are evaluated independently; a
//! record may emit zero, one, or two rows.

use serde::{Deserialize, Serialize};

use crate::types::{reverse_name, FlowRecord, Value};

/// Flow direction of a sub-report.
///
/// Forward is initiator-to-responder (unprefixed element names), reverse is
/// responder-to-initiator (`reverse`-prefixed names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Reverse,
}

/// One output-column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// A literal element name, resolved via the field accessor.
    Field(String),
    /// A literal constant, independent of the record. Used where a direction
    /// has no counterpart element (e.g. the delta to the first reverse
    /// packet, which does not exist for the reverse sub-row).
    Constant(u64),
    /// Source address: `sourceIPv4Address`, falling back to
    /// `sourceIPv6Address`.
    SourceAddress,
    /// Destination address: `destinationIPv4Address`, falling back to
    /// `destinationIPv6Address`.
    DestinationAddress,
}

impl Column {
    /// Field column for a literal element name.
    pub fn field(name: impl Into<String>) -> Self {
        Column::Field(name.into())
    }

    /// Field column for a direction-paired element: the unprefixed `base`
    /// name forward, its `reverse`-prefixed counterpart in reverse.
    pub fn paired(base: &str, direction: Direction) -> Self {
        match direction {
            Direction::Forward => Column::Field(base.to_string()),
            Direction::Reverse => Column::Field(reverse_name(base)),
        }
    }

    fn is_address(&self) -> bool {
        matches!(self, Column::SourceAddress | Column::DestinationAddress)
    }
}

/// Decides whether a direction's sub-row applies to a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionGate {
    /// The sub-row is always emitted for a reportable record.
    Always,
    /// The sub-row is emitted iff the gating field is present and positive.
    /// An absent gating field gates false (no traffic seen that direction).
    Positive { field: String },
}

impl DirectionGate {
    /// Evaluate the gate against a record.
    pub fn open(&self, rec: &FlowRecord) -> bool {
        match self {
            DirectionGate::Always => true,
            DirectionGate::Positive { field } => rec.unsigned(field).is_some_and(|v| v > 0),
        }
    }
}

/// An ordered column list for one direction of one report variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectionSpec {
    columns: Vec<Column>,
}

impl ProjectionSpec {
    /// Build a projection from columns, rendered in the given order.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Number of output columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True if any column requires a source or destination address.
    pub fn requires_address(&self) -> bool {
        self.columns.iter().any(Column::is_address)
    }

    /// Resolve every column against a record.
    ///
    /// Returns one `Option<Value>` per column (`None` renders as the
    /// layout's missing-value sentinel). Returns `None` for the whole row if
    /// a required address column has neither an IPv4 nor an IPv6 value; the
    /// caller skips the record and raises the address-unavailable
    /// diagnostic.
    pub fn resolve(&self, rec: &FlowRecord) -> Option<Vec<Option<Value>>> {
        let mut cells = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            match col {
                Column::Field(name) => cells.push(rec.get(name).copied()),
                Column::Constant(v) => cells.push(Some(Value::Unsigned(*v))),
                Column::SourceAddress => {
                    cells.push(Some(address(rec, "sourceIPv4Address", "sourceIPv6Address")?))
                }
                Column::DestinationAddress => cells.push(Some(address(
                    rec,
                    "destinationIPv4Address",
                    "destinationIPv6Address",
                )?)),
            }
        }
        Some(cells)
    }
}

fn address(rec: &FlowRecord, v4: &str, v6: &str) -> Option<Value> {
    rec.get(v4).or_else(|| rec.get(v6)).copied()
}
