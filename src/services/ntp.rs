use std::path::Path;

use tracing::{info, instrument};

use crate::domain::ntp::NtpSample;
use crate::error::NetlensError;
use crate::parse::ScanReport;
use crate::parse::ntp::NtpLog;
use crate::stats::{StatsTable, ntp_stats};

use super::read_log;

/// Samples of one NTP log together with their scan tally.
#[derive(Debug, Clone)]
pub struct NtpExtraction {
    pub samples: Vec<NtpSample>,
    pub report: ScanReport,
}

impl NtpExtraction {
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Delay and jitter statistics per server.
    pub fn stats(&self) -> StatsTable {
        ntp_stats(&self.samples)
    }
}

/// Extract samples from NTP log text.
pub fn extract_ntp(text: &str) -> NtpExtraction {
    let (samples, report) = NtpLog::new(text).scan();
    info!(
        samples = samples.len(),
        blocks = report.headers,
        skipped = report.total_skipped(),
        "ntp log scanned"
    );
    NtpExtraction { samples, report }
}

/// Load an NTP log from disk and extract its samples.
#[instrument]
pub fn load_ntp(path: &Path) -> Result<NtpExtraction, NetlensError> {
    let text = read_log(path)?;
    Ok(extract_ntp(&text))
}
