#[cfg(feature = "json")]
use chrono::Utc;
#[cfg(feature = "json")]
use serde::Serialize;

use crate::domain::ntp::NtpSample;
use crate::domain::traceroute::HopRow;
use crate::error::NetlensError;
use crate::parse::ScanReport;
use crate::stats::StatsTable;

#[cfg(feature = "json")]
#[derive(Serialize)]
pub struct JsonNtpRun<'a> {
    pub schema_version: u8,
    pub run_ts: String,
    pub source: &'a str,
    pub samples: &'a [NtpSample],
    pub stats: &'a StatsTable,
    pub report: &'a ScanReport,
}

#[cfg(feature = "json")]
#[derive(Serialize)]
pub struct JsonTracerouteRun<'a> {
    pub schema_version: u8,
    pub run_ts: String,
    pub source: &'a str,
    pub rows: &'a [HopRow],
    pub stats: &'a StatsTable,
    pub report: &'a ScanReport,
}

/// Serialize an NTP extraction into a JSON document.
/// Undefined statistics (NaN) come out as `null`.
#[allow(unused_variables)]
pub fn ntp_to_json(
    source: &str,
    samples: &[NtpSample],
    stats: &StatsTable,
    report: &ScanReport,
    pretty: bool,
) -> Result<String, NetlensError> {
    #[cfg(feature = "json")]
    {
        let run = JsonNtpRun {
            schema_version: 1,
            run_ts: Utc::now().to_rfc3339(),
            source,
            samples,
            stats,
            report,
        };
        render(&run, pretty)
    }
    #[cfg(not(feature = "json"))]
    {
        Err(NetlensError::Other("json feature disabled".into()))
    }
}

/// Serialize a traceroute extraction into a JSON document.
#[allow(unused_variables)]
pub fn traceroute_to_json(
    source: &str,
    rows: &[HopRow],
    stats: &StatsTable,
    report: &ScanReport,
    pretty: bool,
) -> Result<String, NetlensError> {
    #[cfg(feature = "json")]
    {
        let run = JsonTracerouteRun {
            schema_version: 1,
            run_ts: Utc::now().to_rfc3339(),
            source,
            rows,
            stats,
            report,
        };
        render(&run, pretty)
    }
    #[cfg(not(feature = "json"))]
    {
        Err(NetlensError::Other("json feature disabled".into()))
    }
}

#[cfg(feature = "json")]
fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, NetlensError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
