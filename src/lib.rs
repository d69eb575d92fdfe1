//! Generate a perfect maze and watch graph searches find their way out
//!
//! A maze is a [Grid] of [CellState]s carved by [MazeGenerator]. The
//! [TraversalEngine] explores it one step at a time, either breadth-first or
//! depth-first, marking discovered cells as [CellState::Visited] and
//! publishing every change as a [MazeEvent]. A [Session] ties these together
//! and paces the steps on a tokio task so that a front end can animate them.
//!
//! # Examples
//! ## Step through a search by hand
//! ```
//! use maze_pathfinder::{MazeConfig, MazeEvent, MazeGenerator, Strategy, TraversalEngine};
//!
//! let config = MazeConfig::default();
//! let mut grid = MazeGenerator::new(Some(7)).generate(config.default_dimensions());
//!
//! let mut engine = TraversalEngine::new(0, &config);
//! engine.start(Some(&grid), grid.start(), Strategy::Bfs).unwrap();
//!
//! let mut events: Vec<MazeEvent> = Vec::new();
//! while !engine.state().is_finished() {
//!     engine.step(&mut grid, &mut events).unwrap();
//! }
//! println!("{grid}");
//! ```
//!
//! ## Paced session
//! ```
//! use std::time::Duration;
//!
//! use maze_pathfinder::{MazeConfig, Session, Strategy, TraversalState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let config = MazeConfig::default()
//!     .with_seed(Some(1))
//!     .with_step_delay(Duration::from_millis(1));
//! let (mut session, _events) = Session::channel(config);
//! session.generate(9, 9).unwrap();
//! session.start_search(Strategy::Dfs).unwrap();
//!
//! let outcome = session.wait().await.unwrap().unwrap();
//! assert!(matches!(outcome, TraversalState::Succeeded | TraversalState::Exhausted));
//! # }
//! ```

use std::fmt;

use itertools::Itertools;

pub mod config;
pub mod error;
pub mod events;
pub mod maze_generator;
pub mod scheduler;
pub mod session;
pub mod traversal;

pub use config::{Dimensions, MazeConfig};
pub use error::MazeError;
pub use events::{Cue, EventSink, MazeEvent};
pub use maze_generator::MazeGenerator;
pub use scheduler::PacedRun;
pub use session::Session;
pub use traversal::{Strategy, TraversalEngine, TraversalState};

/// Location in the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column index
    pub x: usize,
    /// Row index
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Point moved by `(dx, dy)`, or `None` if it would leave the first quadrant.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

/// State of one maze square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Wall,
    Path,
    Start,
    End,
    /// Path square discovered by a search
    Visited,
}

impl CellState {
    const S_WALL: char = '🟫';
    const S_PATH: char = '🟩';
    const S_START: char = '🏃';
    const S_END: char = '❎';
    const S_VISITED: char = '🟨';

    /// Emoji used when rendering the maze as text
    pub fn symbol(self) -> char {
        match self {
            CellState::Wall => Self::S_WALL,
            CellState::Path => Self::S_PATH,
            CellState::Start => Self::S_START,
            CellState::End => Self::S_END,
            CellState::Visited => Self::S_VISITED,
        }
    }

    /// Inverse of [Self::symbol]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            Self::S_WALL => Some(CellState::Wall),
            Self::S_PATH => Some(CellState::Path),
            Self::S_START => Some(CellState::Start),
            Self::S_END => Some(CellState::End),
            Self::S_VISITED => Some(CellState::Visited),
            _ => None,
        }
    }
}

/// Rectangular maze of `height` rows, each of `width` cells.
///
/// Only [MazeGenerator] creates grids; a traversal mutates the grid it was
/// started on, and regenerating replaces the grid wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<CellState>>,
    width: usize,
    height: usize,
}

impl Grid {
    pub(crate) fn filled(dimensions: Dimensions, state: CellState) -> Self {
        let (width, height) = (dimensions.width(), dimensions.height());
        Self {
            cells: (0..height)
                .map(|_| (0..width).map(|_| state).collect())
                .collect(),
            width,
            height,
        }
    }

    /// Parse emoji rendering of a maze, see [CellState::symbol].
    #[cfg(test)]
    pub(crate) fn parse_emojis(emojis: &str) -> Self {
        let cells: Vec<Vec<CellState>> = emojis
            .trim()
            .split('\n')
            .map(|row| {
                row.trim()
                    .chars()
                    .map(|c| CellState::from_symbol(c).expect("known maze symbol"))
                    .collect()
            })
            .collect();
        let width = cells[0].len();
        assert!(cells.iter().all(|row| row.len() == width), "ragged maze");
        Self {
            height: cells.len(),
            width,
            cells,
        }
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    pub fn get(&self, point: Point) -> Result<CellState, MazeError> {
        self.check(point)?;
        Ok(self.cells[point.y][point.x])
    }

    pub fn set(&mut self, point: Point, state: CellState) -> Result<(), MazeError> {
        self.check(point)?;
        self.cells[point.y][point.x] = state;
        Ok(())
    }

    /// Entrance of the maze, on the left border
    pub fn start(&self) -> Point {
        Point::new(0, 1)
    }

    /// Exit of the maze, on the right border
    pub fn end(&self) -> Point {
        Point::new(self.width - 1, self.height - 2)
    }

    /// Number of cells in `state`
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().flatten().filter(|c| **c == state).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Turn every visited cell back into a path, returning the changed points
    pub(crate) fn clear_visited(&mut self) -> Vec<Point> {
        let mut cleared = Vec::new();
        for (y, row) in self.cells.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if *cell == CellState::Visited {
                    *cell = CellState::Path;
                    cleared.push(Point::new(x, y));
                }
            }
        }
        cleared
    }

    fn check(&self, point: Point) -> Result<(), MazeError> {
        if self.contains(point) {
            Ok(())
        } else {
            Err(MazeError::OutOfBounds {
                x: point.x,
                y: point.y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self
            .rows()
            .map(|row| row.iter().map(|c| c.symbol()).join(""))
            .join("\n");
        f.write_str(&text)
    }
}
