use console::style;

use crate::domain::ntp::NtpSample;
use crate::domain::traceroute::HopRow;
use crate::parse::ScanReport;
use crate::stats::StatsTable;

pub const NO_NTP_DATA: &str = "No valid NTP data found. Check file format.";
pub const NO_TRACEROUTE_DATA: &str = "No valid traceroute data found. Check file format.";

/// Render parsed NTP samples as an aligned table.
pub fn render_samples(samples: &[NtpSample]) -> String {
    let width = column_width(samples.iter().map(|s| s.server.as_str()), "Server");
    let mut out = format!(
        "{}\n",
        style(format!(
            "{:<19}  {:<width$}  {:>10}  {:>10}  {:>10}",
            "Timestamp", "Server", "Delay", "Offset", "Jitter"
        ))
        .cyan()
        .bold()
    );
    for s in samples {
        out.push_str(&format!(
            "{:<19}  {:<width$}  {:>10.3}  {:>10.3}  {:>10.3}\n",
            s.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            style(&s.server).green(),
            s.delay,
            s.offset,
            s.jitter,
        ));
    }
    out
}

/// Render flattened traceroute hops, one per line.
pub fn render_hop_rows(rows: &[HopRow]) -> String {
    let width = column_width(rows.iter().map(|r| r.target.as_str()), "Target");
    let mut out = format!(
        "{}\n",
        style(format!(
            "{:<width$}  {:>3}  {:>16}  Hop Address",
            "Target", "Hop", "Avg Latency (ms)"
        ))
        .cyan()
        .bold()
    );
    for r in rows {
        out.push_str(&format!(
            "{:<width$}  {:>3}  {:>16.3}  {}\n",
            style(&r.target).green(),
            r.hop_number,
            r.avg_latency_ms,
            r.address,
        ));
    }
    out
}

/// Render a grouped statistics table, one line per (group, field).
pub fn render_stats(title: &str, group_label: &str, table: &StatsTable) -> String {
    let width = column_width(table.keys().map(String::as_str), group_label);
    let mut out = format!("{}\n", style(title).bold());
    out.push_str(&format!(
        "{}\n",
        style(format!(
            "{:<width$}  {:<12}  {:>5}  {:>10}  {:>10}  {:>10}  {:>10}",
            group_label, "Field", "Count", "Min", "Max", "Mean", "Std"
        ))
        .cyan()
        .bold()
    ));
    for (group, fields) in table {
        for (field, st) in fields {
            out.push_str(&format!(
                "{:<width$}  {:<12}  {:>5}  {:>10.3}  {:>10.3}  {:>10.3}  {:>10.3}\n",
                style(group).green(),
                field,
                st.count,
                st.min,
                st.max,
                st.mean,
                st.std,
            ));
        }
    }
    out
}

/// Render the skip counters of a scan.
pub fn render_report(report: &ScanReport) -> String {
    let mut out = format!(
        "{} {} lines, {} headers, {} records, {} skipped",
        style("Scan:").cyan().bold(),
        report.lines,
        report.headers,
        report.records,
        report.total_skipped()
    );
    let reasons = [
        ("outside block", report.outside_block),
        ("noise", report.noise),
        ("too few fields", report.too_few_fields),
        ("bad number", report.bad_number),
        ("no header", report.no_header),
        ("timed out", report.timeouts),
        ("unrecognized", report.unrecognized),
    ];
    for (label, n) in reasons.iter().filter(|(_, n)| *n > 0) {
        out.push_str(&format!("\n  {label}: {n}"));
    }
    out
}

// Styled cells carry escape codes, so widths come from the raw text. Counted
// in chars, the unit `{:<width$}` pads by.
fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain([header.chars().count()])
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ntp_stats;
    use chrono::NaiveDate;
    use console::set_colors_enabled;

    fn sample() -> NtpSample {
        NtpSample {
            timestamp: NaiveDate::from_ymd_opt(2025, 2, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            server: "meg.magnet.ie".into(),
            delay: 9.171,
            offset: 0.892,
            jitter: 0.0,
        }
    }

    #[test]
    fn samples_table_lists_rows() {
        set_colors_enabled(false);
        let out = render_samples(&[sample()]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Timestamp"));
        assert!(lines[1].starts_with("2025-02-10 09:00:00  meg.magnet.ie"));
        assert!(lines[1].contains("9.171"));
        assert!(lines[1].contains("0.892"));
    }

    #[test]
    fn non_ascii_names_size_columns_by_chars() {
        set_colors_enabled(false);
        let mut other = sample();
        other.server = "ntp.café.example.ie".into();
        assert_eq!(other.server.chars().count(), 19);
        let out = render_samples(&[sample(), other]);
        // Timestamp, server and three numeric columns separated by two spaces.
        let expected = 19 + 2 + 19 + 2 + 10 + 2 + 10 + 2 + 10;
        for line in out.lines() {
            assert_eq!(line.chars().count(), expected, "{line:?}");
        }
    }

    #[test]
    fn stats_show_nan_for_single_sample() {
        set_colors_enabled(false);
        let out = render_stats("Stats", "Server", &ntp_stats(&[sample()]));
        assert!(out.starts_with("Stats\n"));
        assert!(out.contains("Delay"));
        assert!(out.contains("Jitter"));
        assert!(out.contains("NaN"));
    }

    #[test]
    fn report_lists_only_nonzero_reasons() {
        set_colors_enabled(false);
        let report = ScanReport {
            lines: 4,
            headers: 1,
            records: 1,
            noise: 2,
            ..Default::default()
        };
        let out = render_report(&report);
        assert!(out.contains("4 lines, 1 headers, 1 records, 2 skipped"));
        assert!(out.contains("noise: 2"));
        assert!(!out.contains("bad number"));
    }
}
