use super::{DependencyDataset, EdgeKind, LineageGraph, MeasureRecord, Node, NodeKind};
use tracing::debug;

/// Builder for constructing the lineage graph from dependency records
pub struct GraphBuilder {
    /// The graph being built
    graph: LineageGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: LineageGraph::new(),
        }
    }

    /// Build a graph from a fully parsed dataset
    pub fn build_from_dataset(dataset: &DependencyDataset) -> LineageGraph {
        let mut builder = Self::new();
        for record in dataset.records() {
            builder.add_record(record);
        }
        let graph = builder.build();
        debug!(
            "Lineage graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// Add one merged measure record to the graph
    pub fn add_record(&mut self, record: &MeasureRecord) {
        self.graph.add_node(Node {
            id: record.name.clone(),
            label: record.name.clone(),
            kind: NodeKind::Measure,
            expression: Some(record.expression.clone()),
        });

        // Column edges only for root measures; graphing column usage on
        // composite measures would imply false column-level fan-in.
        if record.is_root() {
            for column in &record.columns {
                self.graph.add_node(Node {
                    id: column.clone(),
                    label: column.clone(),
                    kind: NodeKind::Column,
                    expression: None,
                });
                self.graph.add_edge(column, &record.name, EdgeKind::Column);
            }
        }

        for input in &record.inputs {
            // An input may have no row of its own; give it a placeholder
            // node so the edge has an endpoint.
            self.graph.add_node(Node {
                id: input.clone(),
                label: input.clone(),
                kind: NodeKind::Measure,
                expression: None,
            });
            self.graph.add_edge(input, &record.name, EdgeKind::Input);
        }
    }

    /// Finish building and return the graph
    pub fn build(self) -> LineageGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
