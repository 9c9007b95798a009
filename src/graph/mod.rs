// Graph module - some methods reserved for future use
#![allow(dead_code)]

mod builder;
mod dataset;

pub use builder::GraphBuilder;
pub use dataset::{DatasetError, DependencyDataset, MeasureRecord};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Kind of node in the lineage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A computed measure
    Measure,
    /// A leaf data-model column, `Table[Field]`
    Column,
}

/// A node in the lineage graph, shaped for visualization output
#[derive(Debug, Clone)]
pub struct Node {
    /// Node id (measure name or `Table[Field]`)
    pub id: String,
    /// Display label (same as id for this dataset)
    pub label: String,
    pub kind: NodeKind,
    /// Expression text, present on measure nodes that had a dataset row
    pub expression: Option<String>,
}

/// Kind of edge in the lineage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Input measure feeding a downstream measure
    Input,
    /// Leaf column feeding a root measure
    Column,
}

/// A directed "source feeds target" edge
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
}

/// The measure lineage graph: measures, root-measure columns, and the
/// directed "feeds" relationships between them.
#[derive(Debug, Default)]
pub struct LineageGraph {
    /// The underlying directed graph; nodes are ids, edges are kinds
    inner: DiGraph<String, EdgeKind>,

    /// Map from node id to node index
    node_map: HashMap<String, NodeIndex>,

    /// Map from node id to node details
    details: HashMap<String, Node>,

    /// Node ids in insertion order, for stable visualization output
    node_order: Vec<String>,

    /// Deduplication set for (from, to) pairs
    edge_set: HashSet<(String, String)>,

    /// Edges in insertion order
    edges: Vec<Edge>,
}

impl LineageGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node to the graph, or return the existing index for its id
    pub fn add_node(&mut self, node: Node) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node.id) {
            // A placeholder may gain its expression once its row is seen
            if node.expression.is_some() {
                if let Some(existing) = self.details.get_mut(&node.id) {
                    if existing.expression.is_none() {
                        existing.expression = node.expression;
                    }
                }
            }
            return idx;
        }

        let idx = self.inner.add_node(node.id.clone());
        self.node_map.insert(node.id.clone(), idx);
        self.node_order.push(node.id.clone());
        self.details.insert(node.id.clone(), node);
        idx
    }

    /// Add a "source feeds target" edge; duplicates of the same
    /// (from, to) pair are silently ignored.
    pub fn add_edge(&mut self, from: &str, to: &str, kind: EdgeKind) {
        let pair = (from.to_string(), to.to_string());
        if self.edge_set.contains(&pair) {
            return;
        }

        if let (Some(&from_idx), Some(&to_idx)) = (self.node_map.get(from), self.node_map.get(to)) {
            self.inner.add_edge(from_idx, to_idx, kind);
            self.edge_set.insert(pair);
            self.edges.push(Edge {
                from: from.to_string(),
                to: to.to_string(),
                kind,
            });
        }
    }

    /// Get node details by id
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.details.get(id)
    }

    /// Iterate nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.node_order.iter().filter_map(|id| self.details.get(id))
    }

    /// Iterate edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Ids of measures directly fed by this node (outgoing `Input` edges)
    pub fn direct_dependents(&self, id: &str) -> Vec<&str> {
        let Some(&node_idx) = self.node_map.get(id) else {
            return Vec::new();
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Outgoing)
            .filter(|edge| *edge.weight() == EdgeKind::Input)
            .filter_map(|edge| self.inner.node_weight(edge.target()))
            .map(String::as_str)
            .collect()
    }

    /// Ids of nodes feeding this one (incoming edges of any kind)
    pub fn feeders(&self, id: &str) -> Vec<&str> {
        let Some(&node_idx) = self.node_map.get(id) else {
            return Vec::new();
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Incoming)
            .filter_map(|edge| self.inner.node_weight(edge.source()))
            .map(String::as_str)
            .collect()
    }

    /// Check whether this node feeds anything
    pub fn has_dependents(&self, id: &str) -> bool {
        let Some(&node_idx) = self.node_map.get(id) else {
            return false;
        };

        self.inner
            .edges_directed(node_idx, petgraph::Direction::Outgoing)
            .next()
            .is_some()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Number of measure nodes (excluding columns)
    pub fn measure_count(&self) -> usize {
        self.details
            .values()
            .filter(|n| n.kind == NodeKind::Measure)
            .count()
    }

    /// The underlying petgraph for advanced traversals
    pub fn inner(&self) -> &DiGraph<String, EdgeKind> {
        &self.inner
    }

    /// Get node index for a node id
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }
}
