//! CLI for maze generation

use clap::Parser;
use maze_pathfinder::{Dimensions, MazeConfig, MazeGenerator};
use tracing_subscriber::EnvFilter;

/// Print a perfect maze
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Generated field height
    #[arg(long, default_value_t = 21)]
    height: usize,

    /// Generated field width
    #[arg(long, default_value_t = 21)]
    width: usize,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = MazeConfig::default();
    let dimensions = Dimensions::new(args.width, args.height, &config)?;

    let mut gen = MazeGenerator::new(args.seed);
    println!("{}", gen.generate(dimensions));
    Ok(())
}
