#[cfg(feature = "json")]
use serde::Serialize;

/// A single measured hop.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct Hop {
    pub hop_number: u32,
    /// Mean of the three probe round trips, in milliseconds.
    pub avg_latency_ms: f64,
    pub address: String,
}

/// Hops collected under one `Tracing route to` header, in encounter order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct TracerouteRun {
    pub target: String,
    pub hops: Vec<Hop>,
}

/// Flattened hop, one row per hop of every run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct HopRow {
    pub target: String,
    pub hop_number: u32,
    pub avg_latency_ms: f64,
    pub address: String,
}

/// Flatten runs into per-hop rows, keeping run then hop order.
pub fn hop_rows(runs: &[TracerouteRun]) -> Vec<HopRow> {
    runs.iter()
        .flat_map(|run| {
            run.hops.iter().map(move |hop| HopRow {
                target: run.target.clone(),
                hop_number: hop.hop_number,
                avg_latency_ms: hop.avg_latency_ms,
                address: hop.address.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hop(n: u32, ms: f64, addr: &str) -> Hop {
        Hop {
            hop_number: n,
            avg_latency_ms: ms,
            address: addr.to_string(),
        }
    }

    #[test]
    fn hop_rows_keep_run_order() {
        let runs = vec![
            TracerouteRun {
                target: "a.example".into(),
                hops: vec![hop(1, 1.0, "10.0.0.1"), hop(3, 5.0, "10.0.0.3")],
            },
            TracerouteRun {
                target: "b.example".into(),
                hops: vec![hop(1, 2.0, "10.0.0.1")],
            },
        ];
        let rows = hop_rows(&runs);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].target, "a.example");
        assert_eq!(rows[1].hop_number, 3);
        assert_eq!(rows[2].target, "b.example");
        assert_eq!(rows[2].avg_latency_ms, 2.0);
    }
}
