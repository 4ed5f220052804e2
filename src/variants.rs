//! The built-in report variants.
//!
//! Each variant is a plain [`ReportConfig`] value; the engine in
//! [`crate::pipeline`] knows nothing about any of them. They differ only in
//! filter predicates, projected columns, gating, and layout.

use crate::error::{ReportError, ReportResult};
use crate::filter::{CmpOp, FilterSpec, Predicate};
use crate::format::RowLayout;
use crate::pipeline::{ReportConfig, SubReport};
use crate::projection::{Column, Direction, DirectionGate, ProjectionSpec};

/// Names of all built-in variants, in presentation order.
pub fn names() -> &'static [&'static str] {
    &[
        "rtt-summary",
        "tcp-performance",
        "lossless-rtt",
        "bulk-transfer",
        "sequence-loss",
    ]
}

/// Look up a built-in variant by name.
pub fn by_name(name: &str) -> ReportResult<ReportConfig> {
    match name {
        "rtt-summary" => Ok(rtt_summary()),
        "tcp-performance" => Ok(tcp_performance()),
        "lossless-rtt" => Ok(lossless_rtt()),
        "bulk-transfer" => Ok(bulk_transfer()),
        "sequence-loss" => Ok(sequence_loss()),
        _ => Err(ReportError::UnknownReport {
            name: name.to_string(),
            available: names().join(", "),
        }),
    }
}

fn present(field: &str) -> Predicate {
    Predicate::Present {
        field: field.to_string(),
    }
}

fn below(field: &str, limit: u64) -> Predicate {
    Predicate::Threshold {
        field: field.to_string(),
        op: CmpOp::Lt,
        limit,
    }
}

fn gate(field: &str) -> DirectionGate {
    DirectionGate::Positive {
        field: field.to_string(),
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// One headerless line per flow with RTT data: addresses, then forward and
/// reverse byte/sequence/RTT/flight columns. Mixes both directions in a
/// single row; no gating.
pub fn rtt_summary() -> ReportConfig {
    ReportConfig {
        name: "rtt-summary".to_string(),
        filter: FilterSpec::new(vec![present("meanTcpRttMilliseconds")]),
        sub_reports: vec![SubReport {
            gate: DirectionGate::Always,
            projection: ProjectionSpec::new(vec![
                Column::SourceAddress,
                Column::DestinationAddress,
                Column::field("octetDeltaCount"),
                Column::field("initiatorOctets"),
                Column::field("tcpSequenceCount"),
                Column::field("meanTcpRttMilliseconds"),
                Column::field("maxTcpRttMilliseconds"),
                Column::field("maxTcpFlightSize"),
                Column::field("reverseOctetDeltaCount"),
                Column::field("responderOctets"),
                Column::field("reverseTcpSequenceCount"),
                Column::field("reverseFlowDeltaMilliseconds"),
                Column::field("reverseMeanTcpRttMilliseconds"),
                Column::field("reverseMaxTcpRttMilliseconds"),
                Column::field("reverseMaxTcpFlightSize"),
            ]),
        }],
        layout: RowLayout::plain(),
    }
}

/// Per-direction TCP performance columns shared by both sub-rows of the
/// tcp-performance variant, except the delta to the first reverse packet,
/// which has no reverse counterpart.
fn performance_projection(direction: Direction) -> ProjectionSpec {
    let rfd = match direction {
        Direction::Forward => Column::field("reverseFlowDeltaMilliseconds"),
        Direction::Reverse => Column::Constant(0),
    };
    ProjectionSpec::new(vec![
        Column::paired("octetDeltaCount", direction),
        Column::paired("packetDeltaCount", direction),
        rfd,
        Column::paired("meanTcpRttMilliseconds", direction),
        Column::paired("minTcpRttMilliseconds", direction),
        Column::paired("tcpRetransmitCount", direction),
        Column::paired("tcpOutOfOrderCount", direction),
        Column::paired("maxTcpFlightSize", direction),
        Column::paired("observedTcpMss", direction),
        Column::paired("minimumTTL", direction),
    ])
}

/// One fixed-width row per direction that carried traffic: octets, packets,
/// delta to first reverse packet, RTT, retransmits, out-of-order, flight
/// size, MSS, TTL.
pub fn tcp_performance() -> ReportConfig {
    ReportConfig {
        name: "tcp-performance".to_string(),
        filter: FilterSpec::new(vec![present("meanTcpRttMilliseconds")]),
        sub_reports: vec![
            SubReport {
                gate: gate("octetDeltaCount"),
                projection: performance_projection(Direction::Forward),
            },
            SubReport {
                gate: gate("reverseOctetDeltaCount"),
                projection: performance_projection(Direction::Reverse),
            },
        ],
        layout: RowLayout::fixed(
            12,
            "na",
            headers(&[
                "octets",
                "packets",
                "rfd_ms",
                "rtt_mean_ms",
                "rtt_min_ms",
                "rtx",
                "ooo",
                "flight_max",
                "mss",
                "ttl_min",
            ]),
        ),
    }
}

/// RTT samples from flows with no observation loss in either direction.
/// Requires the loss counters to be present: a flow that did not export them
/// cannot be shown to be lossless.
pub fn lossless_rtt() -> ReportConfig {
    ReportConfig {
        name: "lossless-rtt".to_string(),
        filter: FilterSpec::new(vec![
            below("tcpSequenceLossCount", 1),
            below("reverseTcpSequenceLossCount", 1),
            present("minTcpRttMilliseconds"),
        ]),
        sub_reports: vec![SubReport {
            gate: DirectionGate::Always,
            projection: ProjectionSpec::new(vec![
                Column::SourceAddress,
                Column::DestinationAddress,
                Column::field("minTcpRttMilliseconds"),
                Column::field("tcpRttSampleCount"),
                Column::field("transportPacketDeltaCount"),
                Column::field("reverseTransportPacketDeltaCount"),
            ]),
        }],
        layout: RowLayout::fixed(
            10,
            "na",
            headers(&[
                "sip",
                "dip",
                "rtt_min_ms",
                "rtt_samples",
                "packets",
                "rev_packets",
            ]),
        ),
    }
}

fn bulk_projection(direction: Direction) -> ProjectionSpec {
    ProjectionSpec::new(vec![
        Column::paired("octetDeltaCount", direction),
        Column::paired("packetDeltaCount", direction),
        Column::paired("maxTcpFlightSize", direction),
        Column::paired("observedTcpMss", direction),
        Column::paired("tcpRetransmitCount", direction),
    ])
}

/// Flows that moved at least a megabyte end to end, one row per direction
/// that carried traffic.
pub fn bulk_transfer() -> ReportConfig {
    ReportConfig {
        name: "bulk-transfer".to_string(),
        filter: FilterSpec::new(vec![
            Predicate::SumAtLeast {
                field: "initiatorOctets".to_string(),
                paired: "responderOctets".to_string(),
                limit: 1_000_000,
            },
            Predicate::NonZero {
                field: "packetDeltaCount".to_string(),
                paired: Some("reversePacketDeltaCount".to_string()),
            },
        ]),
        sub_reports: vec![
            SubReport {
                gate: gate("octetDeltaCount"),
                projection: bulk_projection(Direction::Forward),
            },
            SubReport {
                gate: gate("reverseOctetDeltaCount"),
                projection: bulk_projection(Direction::Reverse),
            },
        ],
        layout: RowLayout::fixed(
            12,
            "na",
            headers(&["octets", "packets", "flight_max", "mss", "rtx"]),
        ),
    }
}

/// Flows where the observation point missed sequence space in either
/// direction: timestamps, sequence and loss counters, octet counters.
pub fn sequence_loss() -> ReportConfig {
    ReportConfig {
        name: "sequence-loss".to_string(),
        filter: FilterSpec::new(vec![Predicate::NonZero {
            field: "tcpSequenceLossCount".to_string(),
            paired: Some("reverseTcpSequenceLossCount".to_string()),
        }]),
        sub_reports: vec![SubReport {
            gate: DirectionGate::Always,
            projection: ProjectionSpec::new(vec![
                Column::field("flowStartMilliseconds"),
                Column::field("flowEndMilliseconds"),
                Column::field("tcpSequenceCount"),
                Column::field("reverseTcpSequenceCount"),
                Column::field("tcpSequenceLossCount"),
                Column::field("reverseTcpSequenceLossCount"),
                Column::field("octetDeltaCount"),
                Column::field("reverseOctetDeltaCount"),
            ]),
        }],
        layout: RowLayout::fixed(
            14,
            "na",
            headers(&[
                "start_ms",
                "end_ms",
                "seq",
                "rev_seq",
                "seq_loss",
                "rev_seq_loss",
                "octets",
                "rev_octets",
            ]),
        ),
    }
}
