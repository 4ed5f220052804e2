//! Report configuration and the streaming pipeline driver.
//!
//! A [`ReportConfig`] is pure data: a record filter, one or two gated
//! sub-reports (one per direction), and a row layout. The five built-in
//! variants in [`crate::variants`] are just values of this type, and any
//! other variant can be loaded from JSON with [`ReportConfig::from_path`].
//!
//! A [`Pipeline`] binds a configuration to an output writer and consumes
//! records one at a time: filter, then per-direction gate, then projection
//! and formatting, writing each qualifying row immediately in arrival order.
//! Processing is stateless across records; the only mutable state is the
//! output position and the running [`PipelineStats`].

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::filter::FilterSpec;
use crate::format::RowLayout;
use crate::observe::FlowObserver;
use crate::projection::{DirectionGate, ProjectionSpec};
use crate::types::FlowRecord;

/// One gated, projected sub-report (typically one flow direction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubReport {
    /// Gate deciding whether this sub-row applies to a record.
    #[serde(default = "always")]
    pub gate: DirectionGate,
    /// Columns of this sub-row.
    pub projection: ProjectionSpec,
}

fn always() -> DirectionGate {
    DirectionGate::Always
}

/// A complete, immutable report variant: filter, sub-reports, layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Variant name, used for selection and diagnostics.
    pub name: String,
    /// Record filter; a record failing any predicate emits no rows.
    #[serde(default)]
    pub filter: FilterSpec,
    /// One sub-report for single-row variants, two for per-direction ones.
    pub sub_reports: Vec<SubReport>,
    /// Row rendering parameters.
    #[serde(default)]
    pub layout: RowLayout,
}

impl ReportConfig {
    /// Load and validate a configuration from a JSON string.
    pub fn from_json_str(text: &str) -> ReportResult<Self> {
        let config: ReportConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> ReportResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check internal consistency: at least one sub-report, and every data
    /// row must have exactly as many columns as the header (when present).
    pub fn validate(&self) -> ReportResult<()> {
        if self.sub_reports.is_empty() {
            return Err(ReportError::Config {
                message: format!("report '{}' has no sub-reports", self.name),
            });
        }
        if let Some(header) = &self.layout.header {
            for (i, sub) in self.sub_reports.iter().enumerate() {
                let cols = sub.projection.column_count();
                if cols != header.len() {
                    return Err(ReportError::Config {
                        message: format!(
                            "report '{}': sub-report {} has {} columns but the header has {}",
                            self.name,
                            i,
                            cols,
                            header.len()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// True if any sub-report projects an address column.
    pub fn requires_address(&self) -> bool {
        self.sub_reports
            .iter()
            .any(|s| s.projection.requires_address())
    }
}

/// Counters accumulated over one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Records consumed from the source.
    pub records: u64,
    /// Data rows written.
    pub rows: u64,
    /// Records rejected by the filter.
    pub filtered: u64,
    /// Records skipped because no address was available.
    pub no_address: u64,
}

/// Streaming driver: one record in, zero to two rows out, written
/// immediately.
pub struct Pipeline<'a, W: Write> {
    config: &'a ReportConfig,
    out: W,
    observer: Option<Arc<dyn FlowObserver>>,
    stats: PipelineStats,
    header_written: bool,
}

impl<'a, W: Write> Pipeline<'a, W> {
    /// Bind a configuration to an output writer.
    pub fn new(config: &'a ReportConfig, out: W) -> Self {
        Self {
            config,
            out,
            observer: None,
            stats: PipelineStats::default(),
            header_written: false,
        }
    }

    /// Attach an observer for skip/collector diagnostics.
    pub fn with_observer(mut self, observer: Arc<dyn FlowObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Counters so far.
    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Consume an entire record source and return the final counters.
    ///
    /// The header (if the variant defines one) is emitted before any data,
    /// even for an empty source.
    pub fn run<I>(mut self, records: I) -> ReportResult<PipelineStats>
    where
        I: IntoIterator<Item = FlowRecord>,
    {
        self.ensure_header()?;
        for rec in records {
            self.process(&rec)?;
        }
        Ok(self.stats)
    }

    /// Emit the header now (if the variant defines one and it has not been
    /// written yet). Callers driving [`Pipeline::process`] themselves can use
    /// this to get the header out even when the source yields no records;
    /// otherwise the first processed record triggers it.
    pub fn write_header(&mut self) -> ReportResult<()> {
        self.ensure_header()
    }

    /// Process one record; returns the number of rows written for it.
    ///
    /// A record that fails the filter is silently skipped. A record that
    /// needs an address column but has no address is skipped with an
    /// [`FlowObserver::on_address_unavailable`] notification and contributes
    /// zero rows, even if one direction could otherwise have been rendered.
    pub fn process(&mut self, rec: &FlowRecord) -> ReportResult<usize> {
        self.ensure_header()?;

        let index = self.stats.records;
        self.stats.records += 1;

        if !self.config.filter.matches(rec) {
            self.stats.filtered += 1;
            return Ok(0);
        }

        // Resolve every open sub-report before writing anything, so an
        // address-unavailable record emits no partial output.
        let mut resolved = Vec::with_capacity(self.config.sub_reports.len());
        for sub in &self.config.sub_reports {
            if !sub.gate.open(rec) {
                continue;
            }
            match sub.projection.resolve(rec) {
                Some(cells) => resolved.push(cells),
                None => {
                    self.stats.no_address += 1;
                    if let Some(obs) = &self.observer {
                        obs.on_address_unavailable(index);
                    }
                    return Ok(0);
                }
            }
        }

        let mut written = 0;
        for cells in resolved {
            let line = self.config.layout.render_row(&cells);
            writeln!(self.out, "{line}")?;
            written += 1;
        }
        self.stats.rows += written as u64;
        Ok(written)
    }

    fn ensure_header(&mut self) -> ReportResult<()> {
        if !self.header_written {
            self.header_written = true;
            if let Some(header) = self.config.layout.render_header() {
                writeln!(self.out, "{header}")?;
            }
        }
        Ok(())
    }
}
