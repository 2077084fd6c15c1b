use std::path::Path;

use tracing::{info, instrument};

use crate::domain::traceroute::{HopRow, TracerouteRun, hop_rows};
use crate::error::NetlensError;
use crate::graph::HopGraph;
use crate::parse::ScanReport;
use crate::parse::traceroute::TracerouteLog;
use crate::stats::{StatsTable, latency_stats};

use super::read_log;

/// Runs of one traceroute log together with their scan tally.
#[derive(Debug, Clone)]
pub struct TracerouteExtraction {
    pub runs: Vec<TracerouteRun>,
    pub report: ScanReport,
}

impl TracerouteExtraction {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn rows(&self) -> Vec<HopRow> {
        hop_rows(&self.runs)
    }

    /// Average latency statistics per target.
    pub fn stats(&self) -> StatsTable {
        latency_stats(&self.runs)
    }

    pub fn graph(&self) -> HopGraph {
        HopGraph::from_runs(&self.runs)
    }
}

/// Extract runs from traceroute log text.
pub fn extract_traceroute(text: &str) -> TracerouteExtraction {
    let (runs, report) = TracerouteLog::new(text).scan();
    info!(
        runs = runs.len(),
        hops = report.records,
        timeouts = report.timeouts,
        "traceroute log scanned"
    );
    TracerouteExtraction { runs, report }
}

/// Load a traceroute log from disk and extract its runs.
#[instrument]
pub fn load_traceroute(path: &Path) -> Result<TracerouteExtraction, NetlensError> {
    let text = read_log(path)?;
    Ok(extract_traceroute(&text))
}
