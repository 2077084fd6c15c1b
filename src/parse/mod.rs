//! Line scanners for NTP query dumps and traceroute logs.
//!
//! Both scanners are small state machines fed one line at a time. Every line
//! produces a [`LineOutcome`]; nothing in here returns an error.

pub mod ntp;
pub mod traceroute;

#[cfg(feature = "json")]
use serde::Serialize;

/// Why a line did not produce a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Seen before the first block header.
    OutsideBlock,
    /// Blank line, table separator or column title.
    Noise,
    /// Data row with fewer columns than required.
    TooFewFields,
    /// A measured column is not a number.
    BadNumber,
    /// Record-shaped line with no open header to attach to.
    NoHeader,
    /// Traceroute probe that got no answer.
    Timeout,
    /// Matches no known grammar.
    Unrecognized,
}

/// Result of feeding one line to a scanner.
#[derive(Clone, Debug, PartialEq)]
pub enum LineOutcome<T> {
    /// The line opened a new block.
    Header,
    /// The line produced a record.
    Record(T),
    Skipped(SkipReason),
}

impl<T> LineOutcome<T> {
    pub fn into_record(self) -> Option<T> {
        match self {
            LineOutcome::Record(r) => Some(r),
            _ => None,
        }
    }
}

/// Per-scan tally of headers, records and skipped lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct ScanReport {
    pub lines: usize,
    pub headers: usize,
    pub records: usize,
    pub outside_block: usize,
    pub noise: usize,
    pub too_few_fields: usize,
    pub bad_number: usize,
    pub no_header: usize,
    pub timeouts: usize,
    pub unrecognized: usize,
}

impl ScanReport {
    pub fn record<T>(&mut self, outcome: &LineOutcome<T>) {
        self.lines += 1;
        match outcome {
            LineOutcome::Header => self.headers += 1,
            LineOutcome::Record(_) => self.records += 1,
            LineOutcome::Skipped(reason) => *self.slot(*reason) += 1,
        }
    }

    /// Number of lines dropped for the given reason.
    pub fn skipped(&self, reason: SkipReason) -> usize {
        match reason {
            SkipReason::OutsideBlock => self.outside_block,
            SkipReason::Noise => self.noise,
            SkipReason::TooFewFields => self.too_few_fields,
            SkipReason::BadNumber => self.bad_number,
            SkipReason::NoHeader => self.no_header,
            SkipReason::Timeout => self.timeouts,
            SkipReason::Unrecognized => self.unrecognized,
        }
    }

    pub fn total_skipped(&self) -> usize {
        self.lines - self.headers - self.records
    }

    fn slot(&mut self, reason: SkipReason) -> &mut usize {
        match reason {
            SkipReason::OutsideBlock => &mut self.outside_block,
            SkipReason::Noise => &mut self.noise,
            SkipReason::TooFewFields => &mut self.too_few_fields,
            SkipReason::BadNumber => &mut self.bad_number,
            SkipReason::NoHeader => &mut self.no_header,
            SkipReason::Timeout => &mut self.timeouts,
            SkipReason::Unrecognized => &mut self.unrecognized,
        }
    }
}
