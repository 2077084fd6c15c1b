//! netlens library: extract structured records from NTP query and traceroute
//! logs and summarize them.

pub mod config;
pub mod domain;
mod error;
pub mod fmt;
pub mod graph;
pub mod parse;
pub mod services;
pub mod stats;

pub use domain::ntp::NtpSample;
pub use domain::traceroute::{Hop, HopRow, TracerouteRun};
pub use error::NetlensError;
pub use graph::HopGraph;
pub use parse::ntp::{NtpLog, parse_ntp};
pub use parse::traceroute::{TracerouteLog, parse_traceroute};
pub use parse::{LineOutcome, ScanReport, SkipReason};
pub use services::ntp::{NtpExtraction, extract_ntp, load_ntp};
pub use services::traceroute::{TracerouteExtraction, extract_traceroute, load_traceroute};
