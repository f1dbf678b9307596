use std::{collections::BTreeMap, fs::File, io::{BufReader, BufWriter, Write}, path::Path};

use anyhow::{bail, Context, Result};

use crate::{error::Error, graph::DualGraph, plan::Plan};

impl Plan {
    /// Map each node id to its district.
    pub fn assignment_map(&self, ids: &[String]) -> Result<BTreeMap<String, u32>> {
        if ids.len() != self.num_nodes() {
            bail!(Error::InvalidPlan(format!("{} ids for {} nodes", ids.len(), self.num_nodes())))
        }
        Ok(ids.iter().cloned().zip(self.assignments().iter().copied()).collect())
    }

    /// Write the node → district assignment as a JSON object.
    pub fn write_json(&self, path: &Path, dual: &DualGraph) -> Result<()> {
        let assignments = self.assignment_map(dual.ids())?;
        let file = File::create(path)
            .with_context(|| format!("Failed to create plan file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &assignments)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read a node → district assignment written by `write_json`.
    /// Every node of `dual` must be assigned.
    pub fn read_json(path: &Path, dual: &DualGraph, num_districts: u32) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        let map: BTreeMap<String, u32> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse plan file: {}", path.display()))?;

        let assignments = dual.ids().iter()
            .map(|id| match map.get(id) {
                Some(&district) => Ok(district),
                None => bail!(Error::InvalidPlan(format!("node {id} has no district"))),
            })
            .collect::<Result<Vec<_>>>()?;

        Plan::new(dual.graph_handle(), num_districts, assignments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = r#"{
        "nodes": [{"id": "a", "POP": 1}, {"id": "b", "POP": 1}, {"id": "c", "POP": 1}],
        "links": [{"source": "a", "target": "b"}, {"source": "b", "target": "c"}]
    }"#;

    #[test]
    fn json_round_trip() {
        let dual = DualGraph::from_json_str(GRAPH, &["POP"]).unwrap();
        let plan = Plan::new(dual.graph_handle(), 2, vec![0, 1, 1]).unwrap();

        let map = plan.assignment_map(dual.ids()).unwrap();
        assert_eq!(map.get("a"), Some(&0));
        assert_eq!(map.get("c"), Some(&1));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        plan.write_json(&path, &dual).unwrap();

        let loaded = Plan::read_json(&path, &dual, 2).unwrap();
        assert_eq!(loaded.assignments(), plan.assignments());
    }

    #[test]
    fn read_rejects_incomplete_plan() {
        let dual = DualGraph::from_json_str(GRAPH, &["POP"]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, r#"{"a": 0, "b": 1}"#).unwrap();

        let err = Plan::read_json(&path, &dual, 2).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidPlan(_))));
    }
}
