use std::path::PathBuf;

/// Short-burst redistricting CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "shortburst", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Print diagnostics for one or more dual-graph files
    Inspect(InspectArgs),

    /// Run short bursts maximizing majority-minority districts
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Dual-graph JSON files
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub graphs: Vec<PathBuf>,

    /// Population column
    #[arg(long, default_value = "POPULATION")]
    pub population: String,

    /// Voting-age population column
    #[arg(long, default_value = "VAP")]
    pub vap: String,

    /// Black voting-age population column, e.g. BVAP10
    #[arg(long, default_value = "BVAP")]
    pub bvap: String,

    /// Node index whose BVAP is printed
    #[arg(long, default_value_t = 0)]
    pub sample_node: usize,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Dual-graph JSON file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub graph: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Number of districts
    #[arg(short, long)]
    pub districts: Option<u32>,

    /// Plans visited per burst
    #[arg(long)]
    pub burst_length: Option<usize>,

    /// Number of bursts
    #[arg(long)]
    pub bursts: Option<usize>,

    /// Population tolerance around the ideal, e.g. 0.02
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the best plan's assignment to this JSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(long)]
    pub force: bool,
}
