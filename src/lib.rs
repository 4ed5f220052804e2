//! `flow-report` turns a stream of decoded IPFIX-style flow records into
//! filtered, per-flow, per-direction tabular reports of TCP performance
//! metrics (round-trip time, retransmissions, out-of-order delivery, flight
//! size, MSS, TTL).
//!
//! One engine, many reports: a report variant is a [`pipeline::ReportConfig`]
//! value — a record filter, one or two direction-gated column projections,
//! and a row layout — evaluated by the same [`pipeline::Pipeline`] driver.
//! The built-in variants live in [`variants`]; custom ones load from JSON.
//!
//! ```
//! use flow_report::pipeline::Pipeline;
//! use flow_report::types::FlowRecord;
//! use flow_report::variants;
//!
//! # fn main() -> Result<(), flow_report::ReportError> {
//! let config = variants::by_name("tcp-performance")?;
//! let rec = FlowRecord::new()
//!     .with_field("meanTcpRttMilliseconds", 20u64)
//!     .with_field("octetDeltaCount", 5000u64)
//!     .with_field("packetDeltaCount", 40u64);
//!
//! let mut out = Vec::new();
//! let stats = Pipeline::new(&config, &mut out).run([rec])?;
//! assert_eq!(stats.rows, 1); // forward direction only
//! # Ok(())
//! # }
//! ```
//!
//! The engine treats records as already-materialized, typed, name-keyed
//! mappings ([`types::FlowRecord`]). Wire decoding, template management, and
//! network I/O belong to the external collector; its diagnostics (missing
//! template, sequence gap) flow through the [`observe::FlowObserver`]
//! notification interface, as do records skipped for lack of an address.
//!
//! ## Modules
//!
//! - [`types`]: typed values and the immutable flow record
//! - [`filter`]: presence/threshold predicates and the record filter
//! - [`projection`]: column descriptors and direction gates
//! - [`format`]: delimited-row rendering with a missing-value sentinel
//! - [`pipeline`]: report configuration and the streaming driver
//! - [`variants`]: the built-in report variants
//! - [`input`]: NDJSON adapter for decoded records
//! - [`observe`]: diagnostic notification interface
//! - [`error`]: error types

pub mod error;
pub mod filter;
pub mod format;
pub mod input;
pub mod observe;
pub mod pipeline;
pub mod projection;
pub mod types;
pub mod variants;

pub use error::{ReportError, ReportResult};
