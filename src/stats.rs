use std::collections::BTreeMap;

use crate::domain::ntp::NtpSample;
use crate::domain::traceroute::{TracerouteRun, hop_rows};
#[cfg(feature = "json")]
use serde::Serialize;

pub const DELAY: &str = "Delay";
pub const JITTER: &str = "Jitter";
pub const AVG_LATENCY: &str = "Avg Latency";

/// Descriptive statistics of one numeric series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct FieldStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1); NaN below two values.
    pub std: f64,
}

/// Group key -> field name -> statistics, keys in ascending order.
pub type StatsTable = BTreeMap<String, BTreeMap<&'static str, FieldStats>>;

/// A named numeric column of `T`.
pub type Field<T> = (&'static str, fn(&T) -> f64);

/// Summarize a series. NaN entries are missing values and are left out of
/// every statistic, including `count`.
pub fn summarize(values: &[f64]) -> FieldStats {
    let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    let count = values.len();
    if count == 0 {
        return FieldStats {
            count,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std: f64::NAN,
        };
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (count - 1) as f64).sqrt()
    };
    FieldStats {
        count,
        min,
        max,
        mean,
        std,
    }
}

/// Group `items` by `key` and summarize each of `fields` per group.
pub fn group_stats<T, K>(items: &[T], key: K, fields: &[Field<T>]) -> StatsTable
where
    K: Fn(&T) -> &str,
{
    let mut groups: BTreeMap<&str, Vec<&T>> = BTreeMap::new();
    for item in items {
        groups.entry(key(item)).or_default().push(item);
    }
    groups
        .into_iter()
        .map(|(name, members)| {
            let per_field = fields
                .iter()
                .map(|(field, get)| {
                    let values: Vec<f64> = members.iter().map(|m| get(m)).collect();
                    (*field, summarize(&values))
                })
                .collect();
            (name.to_string(), per_field)
        })
        .collect()
}

/// Delay and jitter statistics per NTP server.
pub fn ntp_stats(samples: &[NtpSample]) -> StatsTable {
    group_stats(
        samples,
        |s| s.server.as_str(),
        &[(DELAY, |s| s.delay), (JITTER, |s| s.jitter)],
    )
}

/// Hop latency statistics per traceroute target. Runs to the same target are pooled.
pub fn latency_stats(runs: &[TracerouteRun]) -> StatsTable {
    let rows = hop_rows(runs);
    group_stats(
        &rows,
        |r| r.target.as_str(),
        &[(AVG_LATENCY, |r| r.avg_latency_ms)],
    )
}
