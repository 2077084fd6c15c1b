use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::{LineOutcome, ScanReport, SkipReason};
use crate::domain::traceroute::{Hop, TracerouteRun};

static TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Tracing route to (\S+)").expect("static regex"));

static HOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s+(\d+)\s*ms\s+(\d+)\s*ms\s+(\d+)\s*ms\s+(.*)$").expect("static regex")
});

const TIMEOUT_MARKER: &str = "Request timed out";

/// Parse a hop line such as `1  10 ms  12 ms  11 ms  192.168.1.1`.
///
/// Returns `None` when the line does not have the hop shape, and
/// `Some(Err(()))` when it does but a number cannot be read. Timings of any
/// length are accepted; the hop number must fit a `u32`.
fn parse_hop(line: &str) -> Option<Result<Hop, ()>> {
    let caps = HOP.captures(line)?;
    let number = caps[1].parse::<u32>().map_err(|_| ());
    let samples: Result<Vec<f64>, _> = (2..=4).map(|i| caps[i].parse::<f64>()).collect();
    let hop = match (number, samples) {
        (Ok(hop_number), Ok(samples)) => Ok(Hop {
            hop_number,
            avg_latency_ms: samples.iter().sum::<f64>() / 3.0,
            address: caps[5].trim().to_string(),
        }),
        _ => Err(()),
    };
    Some(hop)
}

/// Scan state: the open run and the runs already closed.
#[derive(Debug, Default, Clone)]
pub struct TracerouteScanner {
    current_target: Option<String>,
    hops: Vec<Hop>,
    completed: Vec<TracerouteRun>,
}

impl TracerouteScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one line. A target header closes the open run if it has hops.
    pub fn feed(&mut self, line: &str) -> LineOutcome<Hop> {
        if let Some(caps) = TARGET.captures(line) {
            self.flush();
            self.current_target = Some(caps[1].to_string());
            return LineOutcome::Header;
        }
        if line.contains(TIMEOUT_MARKER) {
            return LineOutcome::Skipped(SkipReason::Timeout);
        }
        match parse_hop(line) {
            None => LineOutcome::Skipped(SkipReason::Unrecognized),
            Some(Err(())) => LineOutcome::Skipped(SkipReason::BadNumber),
            Some(Ok(_)) if self.current_target.is_none() => {
                LineOutcome::Skipped(SkipReason::NoHeader)
            }
            Some(Ok(hop)) => {
                self.hops.push(hop.clone());
                LineOutcome::Record(hop)
            }
        }
    }

    /// Close the open run and return every run seen, in input order.
    pub fn finish(mut self) -> Vec<TracerouteRun> {
        self.flush();
        self.completed
    }

    fn flush(&mut self) {
        let hops = std::mem::take(&mut self.hops);
        match self.current_target.take() {
            Some(target) if !hops.is_empty() => {
                self.completed.push(TracerouteRun { target, hops })
            }
            Some(target) => trace!(%target, "traceroute run without hops dropped"),
            None => {}
        }
    }
}

/// Borrowed traceroute log text.
#[derive(Debug, Clone, Copy)]
pub struct TracerouteLog<'a> {
    text: &'a str,
}

impl<'a> TracerouteLog<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn runs(&self) -> Vec<TracerouteRun> {
        self.scan().0
    }

    /// Scan the whole log, keeping a tally of skipped lines.
    pub fn scan(&self) -> (Vec<TracerouteRun>, ScanReport) {
        let mut scanner = TracerouteScanner::new();
        let mut report = ScanReport::default();
        for (idx, line) in self.text.lines().enumerate() {
            let outcome = scanner.feed(line);
            report.record(&outcome);
            if let LineOutcome::Skipped(reason) = outcome {
                trace!(line = idx + 1, ?reason, "traceroute line skipped");
            }
        }
        (scanner.finish(), report)
    }
}

/// Collect every non-empty run of a traceroute log.
pub fn parse_traceroute(text: &str) -> Vec<TracerouteRun> {
    TracerouteLog::new(text).runs()
}
