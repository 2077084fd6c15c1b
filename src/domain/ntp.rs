use chrono::NaiveDateTime;

#[cfg(feature = "json")]
use serde::Serialize;

/// One peer row taken from a timestamped NTP query block.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct NtpSample {
    /// Timestamp of the enclosing `NTP Query Result` header.
    pub timestamp: NaiveDateTime,
    /// Remote peer, without its tally code (`*`, `+`, `-`).
    pub server: String,
    pub delay: f64,
    pub offset: f64,
    pub jitter: f64,
}
