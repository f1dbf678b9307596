use std::{collections::BTreeMap, fmt};

use serde_json::{Map, Value};

use crate::graph::{DualGraph, GraphDocument};

/// Diagnostics for a loaded dual graph.
#[derive(Clone, Debug)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub totals: BTreeMap<String, f64>,
    pub first_node: Option<Map<String, Value>>,
}

impl GraphSummary {
    pub fn new(document: &GraphDocument, dual: &DualGraph) -> Self {
        let graph = dual.graph();
        let weights = graph.node_weights();

        Self {
            nodes: graph.node_count(),
            edges: graph.undirected_edge_count(),
            components: graph.components().1,
            totals: weights.series_names()
                .filter_map(|name| Some((name.to_string(), weights.total(name)?)))
                .collect(),
            first_node: document.nodes.first().map(|node| {
                let mut attributes = Map::new();
                attributes.insert("id".into(), node.id.clone());
                attributes.extend(node.attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
                attributes
            }),
        }
    }

    #[inline] pub fn is_connected(&self) -> bool { self.components <= 1 }
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes:      {}", self.nodes)?;
        writeln!(f, "edges:      {}", self.edges)?;
        writeln!(f, "connected:  {} ({} components)", self.is_connected(), self.components)?;
        for (name, total) in &self.totals {
            writeln!(f, "total {name}: {total}")?;
        }
        match &self.first_node {
            Some(attributes) => write!(f, "nodes[0]:   {}", Value::Object(attributes.clone())),
            None => write!(f, "nodes[0]:   <empty graph>"),
        }
    }
}
