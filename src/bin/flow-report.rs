//! CLI driver: run a report variant over decoded NDJSON flow records.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::process;
use std::sync::Arc;

use clap::Parser;

use flow_report::input::NdjsonReader;
use flow_report::observe::StdErrFlowObserver;
use flow_report::pipeline::{Pipeline, ReportConfig};
use flow_report::variants;
use flow_report::ReportResult;

/// Produce a filtered, per-direction tabular TCP performance report from
/// decoded flow records (NDJSON, one record per line).
#[derive(Parser)]
#[command(name = "flow-report", version)]
struct Cli {
    /// Built-in report variant to run
    #[arg(short, long, conflicts_with = "config")]
    report: Option<String>,

    /// JSON report configuration file (instead of a built-in variant)
    #[arg(short, long)]
    config: Option<String>,

    /// NDJSON input file (default stdin)
    #[arg(short, long)]
    file: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Print record/row counters to stderr when done
    #[arg(long)]
    stats: bool,

    /// List the built-in report variants and exit
    #[arg(long)]
    list: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.list {
        for name in variants::names() {
            println!("{name}");
        }
        return;
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading report config: {e}");
            process::exit(1);
        }
    };

    let input: Box<dyn BufRead> = match &cli.file {
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("Error opening input file '{path}': {e}");
                process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let output: Box<dyn Write> = match &cli.output {
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(BufWriter::new(f)),
            Err(e) => {
                eprintln!("Error creating output file '{path}': {e}");
                process::exit(1);
            }
        },
        None => Box::new(io::stdout().lock()),
    };

    match run(&config, input, output) {
        Ok(stats) => {
            if cli.stats {
                eprintln!(
                    "Records: {} in -> {} rows ({} filtered, {} without address)",
                    stats.records, stats.rows, stats.filtered, stats.no_address
                );
            }
        }
        Err(e) => {
            eprintln!("Report error: {e}");
            process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> ReportResult<ReportConfig> {
    match (&cli.report, &cli.config) {
        (_, Some(path)) => ReportConfig::from_path(path),
        (Some(name), None) => variants::by_name(name),
        (None, None) => variants::by_name("tcp-performance"),
    }
}

fn run(
    config: &ReportConfig,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
) -> ReportResult<flow_report::pipeline::PipelineStats> {
    let observer = Arc::new(StdErrFlowObserver);
    let reader = NdjsonReader::new(input).with_observer(observer.clone());
    let mut pipeline = Pipeline::new(config, output).with_observer(observer);
    pipeline.write_header()?;
    for record in reader {
        pipeline.process(&record?)?;
    }
    Ok(pipeline.stats())
}
