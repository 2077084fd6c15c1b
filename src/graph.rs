//! Hop-chain graph derived from traceroute runs.
//!
//! Nodes are identified by their label. Two runs that report the same hop
//! number and address share a node, so common path prefixes merge.

use std::collections::HashMap;
use std::fmt::Write as _;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::domain::traceroute::{Hop, TracerouteRun};

pub const SOURCE: &str = "Source";

pub fn hop_label(hop: &Hop) -> String {
    format!("Hop {} ({})", hop.hop_number, hop.address)
}

pub fn destination_label(target: &str) -> String {
    format!("Destination: {target}")
}

/// Directed graph of every run, edges weighted by hop latency.
#[derive(Debug, Clone, Default)]
pub struct HopGraph {
    graph: DiGraph<String, Option<f64>>,
    index: HashMap<String, NodeIndex>,
}

impl HopGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_runs(runs: &[TracerouteRun]) -> Self {
        let mut g = Self::new();
        for run in runs {
            g.add_run(run);
        }
        g
    }

    /// Append `Source -> hops... -> Destination` for one run.
    pub fn add_run(&mut self, run: &TracerouteRun) {
        if run.hops.is_empty() {
            return;
        }
        let mut prev = self.node(SOURCE);
        for hop in &run.hops {
            let next = self.node(&hop_label(hop));
            self.add_edge(prev, next, Some(hop.avg_latency_ms));
            prev = next;
        }
        let dest = self.node(&destination_label(&run.target));
        self.add_edge(prev, dest, None);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Weight of the edge `from -> to`: `None` if absent, `Some(None)` if unweighted.
    pub fn edge_weight(&self, from: &str, to: &str) -> Option<Option<f64>> {
        let (a, b) = (*self.index.get(from)?, *self.index.get(to)?);
        let e = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(e).copied()
    }

    /// Labels of the direct successors of `label`, in insertion order.
    pub fn successors(&self, label: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(label) else {
            return Vec::new();
        };
        let mut out: Vec<(usize, &str)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.id().index(), self.graph[e.target()].as_str()))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out.into_iter().map(|(_, l)| l).collect()
    }

    /// Render the graph as Graphviz DOT, edge labels in milliseconds.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph traceroute {\n    rankdir=LR;\n");
        out.push_str("    node [shape=box, style=filled, fillcolor=lightblue];\n");
        for idx in self.graph.node_indices() {
            let _ = writeln!(
                out,
                "    n{} [label=\"{}\"];",
                idx.index(),
                escape(&self.graph[idx])
            );
        }
        for e in self.graph.edge_references() {
            let (a, b) = (e.source().index(), e.target().index());
            match e.weight() {
                Some(ms) => {
                    let _ = writeln!(out, "    n{a} -> n{b} [label=\"{ms:.1} ms\"];");
                }
                None => {
                    let _ = writeln!(out, "    n{a} -> n{b};");
                }
            }
        }
        out.push_str("}\n");
        out
    }

    fn node(&mut self, label: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.graph.add_node(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, weight: Option<f64>) {
        match self.graph.find_edge(a, b) {
            // An existing weight survives an unweighted re-add.
            Some(e) => {
                if weight.is_some() {
                    self.graph[e] = weight;
                }
            }
            None => {
                self.graph.add_edge(a, b, weight);
            }
        }
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
