use anyhow::{bail, Context, Result};
use shortburst::{DualGraph, GraphDocument, GraphSummary};
use tracing::{info, warn};

use crate::cli::{Cli, InspectArgs};

pub fn run(_cli: &Cli, args: &InspectArgs) -> Result<()> {
    let series = [args.population.as_str(), args.vap.as_str(), args.bvap.as_str()];

    for path in &args.graphs {
        info!(path = %path.display(), "loading dual graph");
        let document = GraphDocument::read(path)?;
        let dual = DualGraph::from_document(&document, &series)
            .with_context(|| format!("Failed to load dual graph: {}", path.display()))?;
        let summary = GraphSummary::new(&document, &dual);

        if args.sample_node >= document.node_count() {
            bail!("sample node {} out of range for {} nodes", args.sample_node, document.node_count())
        }
        let sample = document.numeric_attribute(args.sample_node, &args.bvap)?;

        println!("{}", path.display());
        println!("{summary}");
        println!("nodes[{}] {}: {sample}", args.sample_node, args.bvap);

        if !summary.is_connected() {
            warn!(path = %path.display(), components = summary.components, "dual graph is not connected");
        }
    }

    Ok(())
}
