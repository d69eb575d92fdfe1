//! CLI for watching a maze search

use std::time::Duration;

use clap::{Parser, ValueEnum};
use maze_pathfinder::{
    CellState, Cue, Grid, MazeConfig, MazeEvent, Session, Strategy, TraversalState,
};
use tracing::trace;
use tracing_subscriber::EnvFilter;

/// Generate a maze and watch a graph search find the exit
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width, 5 to 50
    #[arg(long, default_value_t = 20)]
    width: usize,

    /// Maze height, 5 to 50
    #[arg(long, default_value_t = 20)]
    height: usize,

    /// Search strategy
    #[arg(short, long, value_enum, default_value_t = SearchArg::Bfs)]
    strategy: SearchArg,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Delay between search steps in milliseconds
    #[arg(short, long, default_value_t = 100)]
    frame_length: u64,

    /// Only print the final maze and report
    #[arg(long)]
    no_playback: bool,
}

/// Search strategy as named on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
enum SearchArg {
    /// Breadth-first
    Bfs,
    /// Depth-first
    Dfs,
}

impl From<SearchArg> for Strategy {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Bfs => Strategy::Bfs,
            SearchArg::Dfs => Strategy::Dfs,
        }
    }
}

/// Terminal view of the session events
struct View {
    grid: Option<Grid>,
    visited: usize,
    playback: bool,
}

impl View {
    fn apply(&mut self, event: MazeEvent) -> anyhow::Result<()> {
        match event {
            MazeEvent::Generated { grid, .. } => {
                self.grid = Some(grid);
                self.visited = 0;
            }
            MazeEvent::CellChanged { point, state, .. } => {
                if let Some(grid) = self.grid.as_mut() {
                    grid.set(point, state)?;
                    if state == CellState::Visited {
                        self.visited += 1;
                    }
                }
            }
            MazeEvent::Cue { cue, volume } => {
                // Terminal bell stands in for the success sound
                trace!(?cue, volume, "Play cue");
                if cue == Cue::Success {
                    print!("\x07");
                }
                return Ok(());
            }
        }
        if self.playback {
            self.print();
        }
        Ok(())
    }

    fn print(&self) {
        if let Some(grid) = &self.grid {
            print!("\x1B[2J\x1B[1;1H");
            println!("{}", grid);
            println!("Visited {} cells", self.visited);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let strategy = Strategy::from(args.strategy);
    let config = MazeConfig::default()
        .with_seed(args.seed)
        .with_step_delay(Duration::from_millis(args.frame_length));

    let (mut session, mut events) = Session::channel(config);
    session.generate(args.width, args.height)?;
    session.start_search(strategy)?;

    let mut view = View {
        grid: None,
        visited: 0,
        playback: !args.no_playback,
    };
    let outcome = {
        let wait = session.wait();
        tokio::pin!(wait);
        loop {
            tokio::select! {
                biased;

                Some(event) = events.recv() => view.apply(event)?,
                outcome = &mut wait => break outcome,
            }
        }
    };
    while let Ok(event) = events.try_recv() {
        view.apply(event)?;
    }

    if !view.playback {
        view.print();
    }
    match outcome {
        Some(Ok(TraversalState::Succeeded)) => println!(
            "{} reached the exit after visiting {} cells.",
            strategy, view.visited
        ),
        Some(Ok(_)) => println!(
            "{} explored {} cells without reaching the exit.",
            strategy, view.visited
        ),
        Some(Err(err)) => return Err(err.into()),
        None => (),
    }
    Ok(())
}
