use std::str::Lines;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use tracing::trace;

use super::{LineOutcome, ScanReport, SkipReason};
use crate::domain::ntp::NtpSample;

static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\]\s+NTP Query Result")
        .expect("static regex")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Minimum column count of an `ntpq -p` peer row.
const MIN_COLUMNS: usize = 10;
const DELAY_COL: usize = 7;
const OFFSET_COL: usize = 8;
const JITTER_COL: usize = 9;

/// Parse the timestamp of a block header line, if it is one.
pub fn parse_header(line: &str) -> Option<NaiveDateTime> {
    let caps = HEADER.captures(line)?;
    NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()
}

/// Scan state: the open block and its timestamp.
#[derive(Debug, Default, Clone)]
pub struct NtpScanner {
    current_timestamp: Option<NaiveDateTime>,
    in_block: bool,
}

impl NtpScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one line, updating the open block on headers.
    pub fn feed(&mut self, line: &str) -> LineOutcome<NtpSample> {
        if let Some(ts) = parse_header(line) {
            self.current_timestamp = Some(ts);
            self.in_block = true;
            return LineOutcome::Header;
        }
        if !self.in_block {
            return LineOutcome::Skipped(SkipReason::OutsideBlock);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("====") || trimmed.starts_with("remote") {
            return LineOutcome::Skipped(SkipReason::Noise);
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < MIN_COLUMNS {
            return LineOutcome::Skipped(SkipReason::TooFewFields);
        }

        let server = parts[0].trim_start_matches(['+', '-', '*']);
        let (Ok(delay), Ok(offset), Ok(jitter)) = (
            parts[DELAY_COL].parse::<f64>(),
            parts[OFFSET_COL].replace('+', "").parse::<f64>(),
            parts[JITTER_COL].parse::<f64>(),
        ) else {
            return LineOutcome::Skipped(SkipReason::BadNumber);
        };

        match self.current_timestamp {
            Some(timestamp) => LineOutcome::Record(NtpSample {
                timestamp,
                server: server.to_string(),
                delay,
                offset,
                jitter,
            }),
            None => LineOutcome::Skipped(SkipReason::NoHeader),
        }
    }
}

/// Borrowed NTP log text. Each call to [`NtpLog::samples`] starts a fresh scan.
#[derive(Debug, Clone, Copy)]
pub struct NtpLog<'a> {
    text: &'a str,
}

impl<'a> NtpLog<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Lazily yield samples from the start of the log.
    pub fn samples(&self) -> NtpSamples<'a> {
        NtpSamples {
            lines: self.text.lines(),
            scanner: NtpScanner::new(),
        }
    }

    /// Scan the whole log, keeping a tally of skipped lines.
    pub fn scan(&self) -> (Vec<NtpSample>, ScanReport) {
        let mut scanner = NtpScanner::new();
        let mut report = ScanReport::default();
        let mut samples = Vec::new();
        for (idx, line) in self.text.lines().enumerate() {
            let outcome = scanner.feed(line);
            report.record(&outcome);
            match outcome {
                LineOutcome::Record(s) => samples.push(s),
                LineOutcome::Skipped(reason) => trace!(line = idx + 1, ?reason, "ntp line skipped"),
                LineOutcome::Header => trace!(line = idx + 1, "ntp block header"),
            }
        }
        (samples, report)
    }
}

/// Iterator returned by [`NtpLog::samples`].
#[derive(Debug, Clone)]
pub struct NtpSamples<'a> {
    lines: Lines<'a>,
    scanner: NtpScanner,
}

impl Iterator for NtpSamples<'_> {
    type Item = NtpSample;

    fn next(&mut self) -> Option<NtpSample> {
        for line in self.lines.by_ref() {
            if let LineOutcome::Record(sample) = self.scanner.feed(line) {
                return Some(sample);
            }
        }
        None
    }
}

/// Collect every sample of an NTP log.
pub fn parse_ntp(text: &str) -> Vec<NtpSample> {
    NtpLog::new(text).samples().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LOG: &str = "\
[2025-02-10 09:00:00] NTP Query Result
     remote           refid      st t when poll reach   delay   offset  jitter
==============================================================================
*meg.magnet.ie   217.53.21.92     2 u    1   64    1    9.171   +0.892   0.000
+ntp.tcd.ie      .GPS.            1 u    2   64    1   12.400   -1.250   0.310

[2025-02-10 10:00:00] NTP Query Result
*meg.magnet.ie   217.53.21.92     2 u    5   64    3    9.500   +0.700   0.120
";

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 10)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn header_sets_block_timestamp() {
        assert_eq!(
            parse_header("[2025-02-10 09:00:00] NTP Query Result"),
            Some(ts(9))
        );
        assert_eq!(
            parse_header("log: [2025-02-10 09:00:00]   NTP Query Result (pool)"),
            Some(ts(9))
        );
        assert_eq!(parse_header("[2025-02-10 09:00:00] something else"), None);
    }

    #[test]
    fn impossible_date_is_not_a_header() {
        assert_eq!(parse_header("[2025-13-40 09:00:00] NTP Query Result"), None);
        let mut scanner = NtpScanner::new();
        assert_eq!(
            scanner.feed("[2025-13-40 09:00:00] NTP Query Result"),
            LineOutcome::Skipped(SkipReason::OutsideBlock)
        );
    }

    #[test]
    fn reference_row_is_parsed() {
        let mut scanner = NtpScanner::new();
        assert_eq!(
            scanner.feed("[2025-02-10 09:00:00] NTP Query Result"),
            LineOutcome::Header
        );
        let outcome = scanner.feed(
            "*meg.magnet.ie   217.53.21.92   2 u   1   64   1   9.171   +0.892   0.000",
        );
        assert_eq!(
            outcome,
            LineOutcome::Record(NtpSample {
                timestamp: ts(9),
                server: "meg.magnet.ie".into(),
                delay: 9.171,
                offset: 0.892,
                jitter: 0.0,
            })
        );
    }

    #[test]
    fn status_glyphs_are_stripped() {
        let samples = parse_ntp(LOG);
        let servers: Vec<&str> = samples.iter().map(|s| s.server.as_str()).collect();
        assert_eq!(servers, ["meg.magnet.ie", "ntp.tcd.ie", "meg.magnet.ie"]);
        assert_eq!(samples[1].offset, -1.25);
        assert_eq!(samples[2].timestamp, ts(10));
    }

    #[test]
    fn row_before_header_is_dropped() {
        let text = "*meg.magnet.ie 217.53.21.92 2 u 1 64 1 9.171 +0.892 0.000\n";
        let (samples, report) = NtpLog::new(text).scan();
        assert!(samples.is_empty());
        assert_eq!(report.skipped(SkipReason::OutsideBlock), 1);
    }

    #[test]
    fn bad_number_does_not_stop_the_scan() {
        let text = "\
[2025-02-10 09:00:00] NTP Query Result
*a.example  1.2.3.4  2 u 1 64 1  n/a   +0.892  0.000
*b.example  1.2.3.4  2 u 1 64 1  1.0   +0.500  0.100
";
        let (samples, report) = NtpLog::new(text).scan();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].server, "b.example");
        assert_eq!(report.skipped(SkipReason::BadNumber), 1);
    }

    #[test]
    fn nan_delay_is_kept_as_missing_value() {
        let text = "\
[2025-02-10 09:00:00] NTP Query Result
*a.example  1.2.3.4  2 u 1 64 1  nan   +0.892  0.000
";
        let samples = parse_ntp(text);
        assert_eq!(samples.len(), 1);
        assert!(samples[0].delay.is_nan());
    }

    #[test]
    fn short_rows_and_noise_are_skipped() {
        let text = "\
[2025-02-10 09:00:00] NTP Query Result
     remote  refid  st
=====================

ntpq: read: Connection refused
";
        let (samples, report) = NtpLog::new(text).scan();
        assert!(samples.is_empty());
        assert_eq!(report.headers, 1);
        assert_eq!(report.skipped(SkipReason::Noise), 3);
        assert_eq!(report.skipped(SkipReason::TooFewFields), 1);
    }

    #[test]
    fn samples_iterator_restarts() {
        let log = NtpLog::new(LOG);
        let first: Vec<_> = log.samples().collect();
        let second: Vec<_> = log.samples().collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
        assert_eq!(log.scan().0, first);
    }
}
