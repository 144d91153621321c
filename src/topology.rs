//! Region-network graph construction.
//!
//! Graphs come from one of four canned three-region shapes, or from a
//! neighbor-list file describing arbitrary networks. The graph is built once
//! per request and never mutated afterwards; layout is a rendering concern.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use tracing::debug;

use crate::error::PipelineError;

/// The canned region-network shapes, in batch enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Isolated,
    Ring,
    Hub,
    Complete,
}

impl Topology {
    pub const ALL: [Topology; 4] = [
        Topology::Isolated,
        Topology::Ring,
        Topology::Hub,
        Topology::Complete,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Topology::Isolated => "isolated",
            Topology::Ring => "ring",
            Topology::Hub => "hub",
            Topology::Complete => "complete",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "isolated" => Ok(Topology::Isolated),
            "ring" => Ok(Topology::Ring),
            "hub" => Ok(Topology::Hub),
            "complete" => Ok(Topology::Complete),
            other => Err(format!("unknown topology: {other}")),
        }
    }
}

/// A region node; the population weight feeds node sizing in the renderer and
/// plays no part in any computation here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionNode {
    pub id: usize,
    pub population: Option<u64>,
}

/// Undirected graph of regions. Immutable once built.
#[derive(Debug)]
pub struct RegionGraph {
    graph: UnGraph<RegionNode, ()>,
    index: HashMap<usize, NodeIndex>,
}

impl RegionGraph {
    fn new() -> Self {
        RegionGraph {
            graph: UnGraph::new_undirected(),
            index: HashMap::new(),
        }
    }

    fn ensure_node(&mut self, id: usize, population: Option<u64>) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            if population.is_some() {
                self.graph[idx].population = population;
            }
            return idx;
        }
        let idx = self.graph.add_node(RegionNode { id, population });
        self.index.insert(id, idx);
        idx
    }

    fn connect(&mut self, a: usize, b: usize) {
        let ia = self.ensure_node(a, None);
        let ib = self.ensure_node(b, None);
        if self.graph.find_edge(ia, ib).is_none() {
            self.graph.add_edge(ia, ib, ());
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges as region-id pairs, each pair ordered low-high.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| {
                let (a, b) = (self.graph[a].id, self.graph[b].id);
                if a <= b { (a, b) } else { (b, a) }
            })
            .collect()
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        match (self.index.get(&a), self.index.get(&b)) {
            (Some(&ia), Some(&ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }

    /// Population weight of a node, when the source provided one.
    pub fn population(&self, id: usize) -> Option<u64> {
        self.index.get(&id).and_then(|&idx| self.graph[idx].population)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> Vec<RegionNode> {
        self.graph.node_indices().map(|i| self.graph[i].clone()).collect()
    }
}

/// Builds one of the canned three-region graphs.
pub fn canned(topology: Topology) -> RegionGraph {
    let mut g = RegionGraph::new();
    for id in 0..3 {
        g.ensure_node(id, None);
    }

    match topology {
        Topology::Isolated => {}
        Topology::Ring => {
            g.connect(0, 1);
            g.connect(1, 2);
            g.connect(2, 0);
        }
        Topology::Hub => {
            g.connect(0, 1);
            g.connect(0, 2);
        }
        Topology::Complete => {
            g.connect(0, 1);
            g.connect(0, 2);
            g.connect(1, 2);
        }
    }

    g
}

/// Builds a graph from a neighbor-list file.
///
/// `#`-prefixed and blank lines are ignored. Each remaining line is one node,
/// indexed by its ordinal position among those lines: a 4-field header whose
/// first field is the node's population, followed by zero or more neighbor
/// indices. Neighbor indices past the last line materialize placeholder nodes.
pub fn from_neighbor_file(path: &Path) -> Result<RegionGraph, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::MissingSource {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;
    let graph = parse_neighbor_list(&content)?;
    debug!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "Built region graph from neighbor list"
    );
    Ok(graph)
}

/// Parses neighbor-list text. See [`from_neighbor_file`] for the format.
pub fn parse_neighbor_list(content: &str) -> Result<RegionGraph, PipelineError> {
    let mut g = RegionGraph::new();

    // node index counts non-comment lines; errors report the physical line
    let lines = content
        .lines()
        .enumerate()
        .map(|(idx, l)| (idx + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'));

    for (node, (line_no, line)) in lines.enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(PipelineError::MalformedLine {
                line: line_no,
                reason: format!("expected 4 header fields, found {}", fields.len()),
            });
        }

        let population: u64 = fields[0].parse().map_err(|_| PipelineError::MalformedLine {
            line: line_no,
            reason: format!("population is not an integer: {}", fields[0]),
        })?;
        g.ensure_node(node, Some(population));

        // fields 1..4 are opaque to this core; neighbors start at field 4
        for token in &fields[4..] {
            let neighbor: usize = token.parse().map_err(|_| PipelineError::MalformedLine {
                line: line_no,
                reason: format!("neighbor index is not an integer: {token}"),
            })?;
            g.connect(node, neighbor);
        }
    }

    Ok(g)
}
