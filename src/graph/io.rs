use std::{fs::File, io::BufReader, path::Path, sync::Arc};

use ahash::AHashMap;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{error::Error, graph::{Graph, WeightMatrix}};

/// A dual graph as serialized by networkx: either adjacency form
/// (`nodes` + `adjacency`) or node-link form (`nodes` + `links`).
#[derive(Debug, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub directed: bool,
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    adjacency: Option<Vec<Vec<NeighborRecord>>>,
    #[serde(default, alias = "edges")]
    links: Option<Vec<LinkRecord>>,
}

/// A node entry: its id plus every other attribute.
#[derive(Debug, Deserialize)]
pub struct NodeRecord {
    pub id: Value,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct NeighborRecord {
    id: Value,
}

#[derive(Debug, Deserialize)]
struct LinkRecord {
    source: Value,
    target: Value,
}

/// Canonical string form of a node id (strings as-is, anything else as JSON text).
fn node_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl GraphDocument {
    /// Read a graph document from a JSON file.
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to read graph file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse graph file: {}", path.display()))
    }

    /// Parse a graph document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse graph JSON")
    }

    /// Number of nodes in the document.
    #[inline] pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Numeric value of `attribute` on node `index`.
    pub fn numeric_attribute(&self, index: usize, attribute: &str) -> Result<f64> {
        let node = &self.nodes[index];
        let key = node_key(&node.id);
        match node.attributes.get(attribute) {
            None => bail!(Error::MissingAttribute { node: key, attribute: attribute.into() }),
            Some(value) => match value.as_f64() {
                Some(x) => Ok(x),
                None => bail!(Error::NonNumericAttribute { node: key, attribute: attribute.into() }),
            },
        }
    }
}

/// A dual graph: adjacency plus node weights, with node ids as read from the file.
#[derive(Clone, Debug)]
pub struct DualGraph {
    ids: Vec<String>,
    index: AHashMap<String, u32>,
    graph: Arc<Graph>,
}

impl DualGraph {
    /// Build from a parsed document, loading the listed numeric attributes as node weights.
    pub fn from_document(document: &GraphDocument, series: &[&str]) -> Result<Self> {
        let num_nodes = document.node_count();

        let mut ids = Vec::with_capacity(num_nodes);
        let mut index = AHashMap::with_capacity(num_nodes);
        for (i, node) in document.nodes.iter().enumerate() {
            let key = node_key(&node.id);
            if index.insert(key.clone(), i as u32).is_some() { bail!(Error::DuplicateNode(key)) }
            ids.push(key);
        }

        let lookup = |id: &Value| -> Result<usize> {
            let key = node_key(id);
            match index.get(&key) {
                Some(&i) => Ok(i as usize),
                None => bail!(Error::UnknownNode(key)),
            }
        };

        let mut pairs = Vec::new();
        match (&document.adjacency, &document.links) {
            (Some(adjacency), _) => {
                if adjacency.len() != num_nodes {
                    bail!(Error::MalformedGraph(format!(
                        "adjacency has {} entries for {num_nodes} nodes", adjacency.len()
                    )))
                }
                for (u, neighbors) in adjacency.iter().enumerate() {
                    for neighbor in neighbors { pairs.push((u, lookup(&neighbor.id)?)) }
                }
            }
            (None, Some(links)) => {
                for link in links { pairs.push((lookup(&link.source)?, lookup(&link.target)?)) }
            }
            (None, None) => bail!(Error::MissingAdjacency),
        }

        let columns = series.iter()
            .map(|&name| {
                let values = (0..num_nodes)
                    .map(|i| document.numeric_attribute(i, name))
                    .collect::<Result<Vec<_>>>()?;
                Ok((name.to_string(), values))
            })
            .collect::<Result<Vec<_>>>()?;

        let graph = Graph::from_edges(num_nodes, pairs, WeightMatrix::new(num_nodes, columns));

        Ok(Self { ids, index, graph: Arc::new(graph) })
    }

    /// Read a dual graph from a JSON file.
    pub fn read_json(path: &Path, series: &[&str]) -> Result<Self> {
        let document = GraphDocument::read(path)?;
        Self::from_document(&document, series)
            .with_context(|| format!("Invalid graph file: {}", path.display()))
    }

    /// Parse a dual graph from a JSON string.
    pub fn from_json_str(json: &str, series: &[&str]) -> Result<Self> {
        Self::from_document(&GraphDocument::from_json_str(json)?, series)
    }

    /// Node ids, in node index order.
    #[inline] pub fn ids(&self) -> &[String] { &self.ids }

    /// Index of the node with the given id.
    #[inline] pub fn node_index(&self, id: &str) -> Option<usize> { self.index.get(id).map(|&i| i as usize) }

    /// Get a reference to the underlying graph.
    #[inline] pub fn graph(&self) -> &Graph { &self.graph }

    /// Get a shared handle to the underlying graph.
    #[inline] pub fn graph_handle(&self) -> Arc<Graph> { Arc::clone(&self.graph) }
}
