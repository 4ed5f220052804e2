//! Record filtering: presence/threshold predicates over flow records.
//!
//! A [`FilterSpec`] is an ordered conjunction of [`Predicate`]s, built once
//! at startup and evaluated per record. Evaluation short-circuits: the first
//! failing predicate rejects the record.
//!
//! Absence policy (applied uniformly, see DESIGN.md): only true absence
//! counts as "missing"; a present zero is valid data. [`Predicate::Present`]
//! therefore accepts a zero-valued field, while [`Predicate::NonZero`] does
//! not.

use serde::{Deserialize, Serialize};

use crate::types::FlowRecord;

/// Comparison operator for [`Predicate::Threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl CmpOp {
    fn eval(self, lhs: u64, rhs: u64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }
}

/// One presence/threshold test over record fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Field is present on the record (any value, including zero).
    Present { field: String },

    /// Field value (or the sum of two fields) is present and greater than
    /// zero. With a paired field, one absent operand counts as zero; both
    /// operands absent fails the predicate.
    NonZero {
        field: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        paired: Option<String>,
    },

    /// Numeric comparison against a literal. An absent field fails.
    Threshold {
        field: String,
        op: CmpOp,
        limit: u64,
    },

    /// Sum of two fields is at least `limit`. Absent operands count as zero
    /// for the sum, but both operands absent fails the predicate (nothing to
    /// evaluate).
    SumAtLeast {
        field: String,
        paired: String,
        limit: u64,
    },
}

impl Predicate {
    /// Evaluate this predicate against a record.
    pub fn holds(&self, rec: &FlowRecord) -> bool {
        match self {
            Predicate::Present { field } => rec.get(field).is_some(),
            Predicate::NonZero { field, paired } => {
                match summed(rec, field, paired.as_deref()) {
                    Some(sum) => sum > 0,
                    None => false,
                }
            }
            Predicate::Threshold { field, op, limit } => match rec.unsigned(field) {
                Some(v) => op.eval(v, *limit),
                None => false,
            },
            Predicate::SumAtLeast {
                field,
                paired,
                limit,
            } => match summed(rec, field, Some(paired)) {
                Some(sum) => sum >= *limit,
                None => false,
            },
        }
    }
}

/// Sum of one or two fields. `None` when every operand is absent.
fn summed(rec: &FlowRecord, field: &str, paired: Option<&str>) -> Option<u64> {
    let a = rec.unsigned(field);
    let b = paired.and_then(|p| rec.unsigned(p));
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0).saturating_add(b.unwrap_or(0))),
    }
}

/// An ordered conjunction of predicates; a record is reportable iff all hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
}

impl FilterSpec {
    /// Build a filter from predicates, evaluated in the given order.
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    /// A filter that accepts every record.
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// True iff every predicate holds; short-circuits on the first failure.
    pub fn matches(&self, rec: &FlowRecord) -> bool {
        self.predicates.iter().all(|p| p.holds(rec))
    }

    /// Predicates in evaluation order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}
