//! Step-by-step breadth-first and depth-first exploration of a maze

use std::collections::{HashSet, VecDeque};
use std::fmt;

use tracing::trace;

use crate::{CellState, Cue, EventSink, Grid, MazeConfig, MazeError, MazeEvent, Point};

/// Order in which discovered cells are expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Breadth-first: expand the oldest discovered cell
    #[default]
    Bfs,
    /// Depth-first: expand the newest discovered cell
    Dfs,
}

impl Strategy {
    /// Take the next cell to expand; new cells are always pushed to the back.
    fn take(self, frontier: &mut VecDeque<Point>) -> Option<Point> {
        match self {
            Strategy::Bfs => frontier.pop_front(),
            Strategy::Dfs => frontier.pop_back(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Bfs => "BFS",
            Strategy::Dfs => "DFS",
        })
    }
}

/// Lifecycle of a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalState {
    Idle,
    Running,
    /// The exit was reached
    Succeeded,
    /// The frontier ran dry before the exit was reached
    Exhausted,
    Cancelled,
}

impl TraversalState {
    pub fn is_finished(self) -> bool {
        matches!(
            self,
            TraversalState::Succeeded | TraversalState::Exhausted | TraversalState::Cancelled
        )
    }
}

/// Frontier based maze exploration, advanced one step at a time.
///
/// A step expands one frontier cell: each unvisited neighbor that is a path
/// is marked [CellState::Visited] and queued, and reaching the exit ends the
/// run. Every grid write is published as a [MazeEvent::CellChanged] together
/// with a navigation cue.
pub struct TraversalEngine {
    strategy: Strategy,
    generation: u64,
    frontier: VecDeque<Point>,
    visited: HashSet<Point>,
    state: TraversalState,
    steps: usize,
    navigation_volume: f32,
    success_volume: f32,
}

impl TraversalEngine {
    /// Neighbor order: down, right, up, left
    const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

    /// Idle engine for the maze of the given session `generation`
    pub fn new(generation: u64, config: &MazeConfig) -> Self {
        Self {
            strategy: Strategy::default(),
            generation,
            frontier: VecDeque::new(),
            visited: HashSet::new(),
            state: TraversalState::Idle,
            steps: 0,
            navigation_volume: config.navigation_volume,
            success_volume: config.success_volume,
        }
    }

    /// Begin exploring from `origin`.
    ///
    /// Fails with [MazeError::EmptyGrid] if no maze exists yet. The origin
    /// counts as visited but its cell is left as it is.
    pub fn start(
        &mut self,
        grid: Option<&Grid>,
        origin: Point,
        strategy: Strategy,
    ) -> Result<(), MazeError> {
        let grid = grid.ok_or(MazeError::EmptyGrid)?;
        grid.get(origin)?;

        self.strategy = strategy;
        self.frontier = VecDeque::from([origin]);
        self.visited = HashSet::from([origin]);
        self.steps = 0;
        self.state = TraversalState::Running;
        Ok(())
    }

    /// Expand one frontier cell.
    ///
    /// Returns the state after the step; stepping a finished engine is a no-op.
    pub fn step(
        &mut self,
        grid: &mut Grid,
        events: &mut impl EventSink,
    ) -> Result<TraversalState, MazeError> {
        if self.state != TraversalState::Running {
            return Ok(self.state);
        }
        let Some(current) = self.strategy.take(&mut self.frontier) else {
            self.finish(TraversalState::Exhausted);
            return Ok(self.state);
        };
        self.steps += 1;

        for (dx, dy) in Self::DIRECTIONS {
            let Some(next) = current.offset(dx, dy).filter(|p| grid.contains(*p)) else {
                continue;
            };
            if !self.visited.insert(next) {
                continue;
            }
            match grid.get(next)? {
                CellState::End => {
                    self.cue(events, Cue::Success);
                    self.finish(TraversalState::Succeeded);
                    return Ok(self.state);
                }
                CellState::Path => {
                    grid.set(next, CellState::Visited)?;
                    events.emit(MazeEvent::CellChanged {
                        generation: self.generation,
                        point: next,
                        state: CellState::Visited,
                    });
                    self.cue(events, Cue::Navigation);
                    self.frontier.push_back(next);
                }
                _ => (),
            }
        }
        Ok(self.state)
    }

    /// Abandon a running traversal, discarding its frontier.
    ///
    /// Finished traversals keep their outcome.
    pub fn cancel(&mut self) {
        if matches!(self.state, TraversalState::Idle | TraversalState::Running) {
            self.finish(TraversalState::Cancelled);
        }
    }

    pub fn state(&self) -> TraversalState {
        self.state
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Number of expanded cells
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of discovered cells waiting to be expanded
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cue(&self, events: &mut impl EventSink, cue: Cue) {
        let volume = match cue {
            Cue::Navigation => self.navigation_volume,
            Cue::Success => self.success_volume,
        };
        trace!(?cue, volume, "Cue");
        events.emit(MazeEvent::Cue { cue, volume });
    }

    fn finish(&mut self, state: TraversalState) {
        self.frontier.clear();
        self.visited.clear();
        self.state = state;
    }
}
