use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};

use flow_report::observe::FlowObserver;
use flow_report::pipeline::Pipeline;
use flow_report::types::FlowRecord;
use flow_report::variants;

fn addr(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

/// A record rich enough to produce data rows in every built-in variant.
fn full_record() -> FlowRecord {
    FlowRecord::new()
        .with_field("sourceIPv4Address", addr(192, 0, 2, 1))
        .with_field("destinationIPv4Address", addr(198, 51, 100, 7))
        .with_field("flowStartMilliseconds", 1_700_000_000_000u64)
        .with_field("flowEndMilliseconds", 1_700_000_004_000u64)
        .with_field("octetDeltaCount", 1_200_000u64)
        .with_field("reverseOctetDeltaCount", 48_000u64)
        .with_field("packetDeltaCount", 900u64)
        .with_field("reversePacketDeltaCount", 600u64)
        .with_field("transportPacketDeltaCount", 880u64)
        .with_field("reverseTransportPacketDeltaCount", 590u64)
        .with_field("initiatorOctets", 1_150_000u64)
        .with_field("responderOctets", 40_000u64)
        .with_field("tcpSequenceCount", 1_100_000u64)
        .with_field("reverseTcpSequenceCount", 39_000u64)
        .with_field("tcpSequenceLossCount", 1u64)
        .with_field("reverseTcpSequenceLossCount", 0u64)
        .with_field("meanTcpRttMilliseconds", 23u64)
        .with_field("minTcpRttMilliseconds", 11u64)
        .with_field("maxTcpRttMilliseconds", 80u64)
        .with_field("reverseMeanTcpRttMilliseconds", 25u64)
        .with_field("reverseMinTcpRttMilliseconds", 12u64)
        .with_field("reverseMaxTcpRttMilliseconds", 88u64)
        .with_field("tcpRttSampleCount", 420u64)
        .with_field("tcpRetransmitCount", 3u64)
        .with_field("reverseTcpRetransmitCount", 1u64)
        .with_field("tcpOutOfOrderCount", 2u64)
        .with_field("reverseTcpOutOfOrderCount", 0u64)
        .with_field("maxTcpFlightSize", 64_000u64)
        .with_field("reverseMaxTcpFlightSize", 8_000u64)
        .with_field("observedTcpMss", 1460u64)
        .with_field("reverseObservedTcpMss", 1460u64)
        .with_field("minimumTTL", 64u64)
        .with_field("reverseMinimumTTL", 57u64)
        .with_field("reverseFlowDeltaMilliseconds", 14u64)
}

fn run_variant(name: &str, records: Vec<FlowRecord>) -> (flow_report::pipeline::PipelineStats, String) {
    let config = variants::by_name(name).unwrap();
    let mut out = Vec::new();
    let stats = Pipeline::new(&config, &mut out).run(records).unwrap();
    (stats, String::from_utf8(out).unwrap())
}

#[test]
fn scenario_a_no_rtt_data_is_filtered_from_the_address_summary() {
    let rec = FlowRecord::new()
        .with_field("sourceIPv4Address", addr(192, 0, 2, 1))
        .with_field("destinationIPv4Address", addr(198, 51, 100, 7))
        .with_field("octetDeltaCount", 100u64)
        .with_field("initiatorOctets", 50u64);

    let (stats, output) = run_variant("rtt-summary", vec![rec]);
    assert_eq!(stats.filtered, 1);
    assert_eq!(stats.rows, 0);
    assert!(output.is_empty());
}

#[test]
fn scenario_b_reverse_row_suppressed_when_reverse_gate_is_zero() {
    let rec = FlowRecord::new()
        .with_field("meanTcpRttMilliseconds", 20u64)
        .with_field("tcpSequenceLossCount", 0u64)
        .with_field("reverseTcpSequenceLossCount", 0u64)
        .with_field("observedTcpMss", 1460u64)
        .with_field("initiatorPackets", 40u64)
        .with_field("responderPackets", 40u64)
        .with_field("octetDeltaCount", 5000u64)
        .with_field("reverseOctetDeltaCount", 0u64);

    let (stats, output) = run_variant("tcp-performance", vec![rec]);
    assert_eq!(stats.rows, 1);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2); // header + forward row
    let cells: Vec<&str> = lines[1].split(", ").map(str::trim).collect();
    assert_eq!(cells[0], "5000"); // octetDeltaCount
    assert_eq!(cells[8], "1460"); // observedTcpMss
}

#[test]
fn scenario_b_both_gates_open_emit_two_rows() {
    let (stats, output) = run_variant("tcp-performance", vec![full_record()]);
    assert_eq!(stats.rows, 2);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);

    // reverse row substitutes reverse counters and renders the
    // first-reverse-packet delta as the constant 0
    let reverse: Vec<&str> = lines[2].split(", ").map(str::trim).collect();
    assert_eq!(reverse[0], "48000"); // reverseOctetDeltaCount
    assert_eq!(reverse[2], "0"); // no reverse counterpart
    assert_eq!(reverse[9], "57"); // reverseMinimumTTL
}

#[test]
fn scenario_c_lossy_flow_is_skipped_regardless_of_other_fields() {
    let rec = full_record().with_field("tcpSequenceLossCount", 2u64);
    let (stats, output) = run_variant("lossless-rtt", vec![rec]);
    assert_eq!(stats.filtered, 1);
    assert_eq!(stats.rows, 0);
    assert_eq!(output.lines().count(), 1); // header only
}

#[derive(Default)]
struct SkipRecorder {
    skipped: Mutex<Vec<u64>>,
}

impl FlowObserver for SkipRecorder {
    fn on_address_unavailable(&self, record_index: u64) {
        self.skipped.lock().unwrap().push(record_index);
    }
}

#[test]
fn scenario_d_record_without_any_address_is_skipped_with_a_diagnostic() {
    let rec = FlowRecord::new()
        .with_field("meanTcpRttMilliseconds", 20u64)
        .with_field("octetDeltaCount", 100u64);

    let config = variants::by_name("rtt-summary").unwrap();
    let obs = Arc::new(SkipRecorder::default());
    let mut out = Vec::new();
    let stats = Pipeline::new(&config, &mut out)
        .with_observer(obs.clone())
        .run(vec![rec])
        .unwrap();

    assert_eq!(stats.no_address, 1);
    assert_eq!(stats.rows, 0);
    assert!(out.is_empty());
    assert_eq!(*obs.skipped.lock().unwrap(), vec![0]);
}

#[test]
fn data_rows_always_match_header_column_count() {
    for name in variants::names() {
        let config = variants::by_name(name).unwrap();
        let Some(header) = config.layout.header.clone() else {
            continue;
        };
        // one lossy and one lossless record, so every variant emits data
        let records = vec![
            full_record(),
            full_record().with_field("tcpSequenceLossCount", 0u64),
        ];
        let (stats, output) = run_variant(name, records);
        assert!(stats.rows > 0, "variant {name} emitted no data rows");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len() as u64, stats.rows + 1, "variant {name}");
        for line in &lines {
            assert_eq!(
                line.split(", ").count(),
                header.len(),
                "variant {name}: {line}"
            );
        }
    }
}

#[test]
fn absence_renders_the_sentinel_never_zero() {
    // full record minus the out-of-order counter: that column must read
    // "na", not "0", while a true zero elsewhere still reads "0".
    let rec = FlowRecord::new()
        .with_field("meanTcpRttMilliseconds", 20u64)
        .with_field("octetDeltaCount", 5000u64)
        .with_field("tcpRetransmitCount", 0u64);

    let (_, output) = run_variant("tcp-performance", vec![rec]);
    let row: Vec<&str> = output.lines().nth(1).unwrap().split(", ").map(str::trim).collect();
    assert_eq!(row[5], "0"); // rtx: present zero
    assert_eq!(row[6], "na"); // ooo: absent
    assert_eq!(row[4], "na"); // rtt_min_ms: absent
}

#[test]
fn identical_records_produce_identical_output() {
    let records = vec![full_record(), full_record()];
    let (_, once) = run_variant("tcp-performance", records.clone());
    let (_, again) = run_variant("tcp-performance", records);
    assert_eq!(once, again);

    let lines: Vec<&str> = once.lines().collect();
    assert_eq!(lines[1..3], lines[3..5]); // same record, same two rows
}

#[test]
fn rtt_summary_row_is_plain_and_ordered() {
    let (stats, output) = run_variant("rtt-summary", vec![full_record()]);
    assert_eq!(stats.rows, 1);
    let cells: Vec<&str> = output.trim_end().split(", ").collect();
    assert_eq!(cells.len(), 15);
    assert_eq!(cells[0], "192.0.2.1");
    assert_eq!(cells[1], "198.51.100.7");
    assert_eq!(cells[2], "1200000"); // octetDeltaCount
    assert_eq!(cells[11], "14"); // reverseFlowDeltaMilliseconds
}

#[test]
fn bulk_transfer_requires_a_megabyte_end_to_end() {
    let small = full_record()
        .with_field("initiatorOctets", 100u64)
        .with_field("responderOctets", 100u64);
    let (stats, _) = run_variant("bulk-transfer", vec![small]);
    assert_eq!(stats.filtered, 1);

    let (stats, output) = run_variant("bulk-transfer", vec![full_record()]);
    assert_eq!(stats.rows, 2);
    assert_eq!(output.lines().count(), 3);
}

#[test]
fn sequence_loss_reports_only_lossy_flows() {
    let lossless = full_record()
        .with_field("tcpSequenceLossCount", 0u64)
        .with_field("reverseTcpSequenceLossCount", 0u64);
    let (stats, output) = run_variant("sequence-loss", vec![full_record(), lossless]);
    assert_eq!(stats.records, 2);
    assert_eq!(stats.rows, 1); // full_record has tcpSequenceLossCount=1
    assert_eq!(stats.filtered, 1);
    assert_eq!(output.lines().count(), 2);
}
