
mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{inspect, run};
use tracing::level_filters::LevelFilter;

/// Install a stderr subscriber at the level selected by `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Inspect(args) => inspect::run(&cli, args),
        Commands::Run(args) => run::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
