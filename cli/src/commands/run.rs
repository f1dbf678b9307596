use anyhow::{bail, Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shortburst::{ideal_population, BurstConfig, DualGraph, Plan, ShortBursts};
use tracing::info;

use crate::cli::{Cli, RunArgs};

/// Load the config file, if any, and apply command-line overrides.
fn load_config(args: &RunArgs) -> Result<BurstConfig> {
    let mut config = match &args.config {
        Some(path) => BurstConfig::from_json_file(path)?,
        None => BurstConfig::default(),
    };

    if let Some(districts) = args.districts { config.num_districts = districts }
    if let Some(burst_length) = args.burst_length { config.burst_length = burst_length }
    if let Some(bursts) = args.bursts { config.num_bursts = bursts }
    if let Some(epsilon) = args.epsilon { config.epsilon = epsilon }
    if let Some(seed) = args.seed { config.seed = seed }

    config.validate()?;
    Ok(config)
}

pub fn run(_cli: &Cli, args: &RunArgs) -> Result<()> {
    let config = load_config(args)?;

    if let Some(output) = &args.output {
        if output.exists() && !args.force {
            bail!("Output file {} already exists (use --force to overwrite)", output.display())
        }
    }

    info!(path = %args.graph.display(), "loading dual graph");
    let dual = DualGraph::read_json(&args.graph, &config.series())?;

    let ideal = ideal_population(dual.graph(), &config.population, config.num_districts)?;
    info!(ideal, "ideal population");

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let seed = Plan::from_tree_partition(
        dual.graph_handle(),
        config.num_districts,
        &config.population,
        ideal,
        config.epsilon,
        config.seed_budget(),
        &mut rng,
    ).context("Failed to build seed plan")?;
    seed.log_tallies(&[config.bvap.as_str(), config.vap.as_str()])?;

    let bursts = ShortBursts::from_config(&config, &seed)?;
    let report = bursts.run(seed, &mut rng)?;

    for burst in &report.bursts {
        println!("burst {:>3}: max {} at step {} {:?}", burst.index, burst.count, burst.step, burst.counts);
    }
    match report.best_burst {
        Some(index) => println!("best: {} majority-minority districts (burst {index})", report.best_count),
        None => println!("best: {} majority-minority districts (seed)", report.best_count),
    }

    if let Some(output) = &args.output {
        report.best.write_json(output, &dual)?;
        info!(path = %output.display(), "wrote plan");
    }

    Ok(())
}
