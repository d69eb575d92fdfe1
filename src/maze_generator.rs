//! Maze generation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::debug;

use crate::{CellState, Dimensions, Grid, Point};

/// Perfect maze generator.
///
/// Mazes are carved with randomized depth-first backtracking on the cells
/// with odd coordinates, starting from `(1, 1)`.
pub struct MazeGenerator {
    random: StdRng,
}

/// Lattice cell being carved, with its remaining directions
struct Frame {
    cell: Point,
    directions: [(isize, isize); 4],
    next: usize,
}

impl MazeGenerator {
    const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
    const ORIGIN: Point = Point::new(1, 1);

    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Generate perfect maze (no loops, all carved cells connected)
    ///
    /// The entrance is placed at `(0, 1)` and the exit at
    /// `(width - 1, height - 2)` after carving, whatever the carve left there.
    /// On some even dimensions this leaves the exit cut off from the maze.
    pub fn generate(&mut self, dimensions: Dimensions) -> Grid {
        let mut grid = Grid::filled(dimensions, CellState::Wall);
        let carve_steps = self.carve(&mut grid, Self::ORIGIN);

        let (start, end) = (grid.start(), grid.end());
        grid.cells[start.y][start.x] = CellState::Start;
        grid.cells[end.y][end.x] = CellState::End;

        debug!(
            width = grid.width,
            height = grid.height,
            carve_steps,
            "Maze generated"
        );
        grid
    }

    /// Carve passages depth-first from `origin`.
    ///
    /// Each frame holds its own shuffled directions, so cells are entered in
    /// the same order as a recursive carve would. Returns the number of
    /// lattice cells entered after `origin`; each step opens two cells.
    fn carve(&mut self, grid: &mut Grid, origin: Point) -> usize {
        grid.cells[origin.y][origin.x] = CellState::Path;
        let mut stack = vec![self.frame(origin)];
        let mut steps = 0;

        while let Some(frame) = stack.last_mut() {
            let Some(&(dx, dy)) = frame.directions.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let cell = frame.cell;

            let (Some(between), Some(neighbor)) =
                (cell.offset(dx, dy), cell.offset(2 * dx, 2 * dy))
            else {
                continue;
            };
            // Unvisited lattice cells are exactly those still walled
            if grid.get(neighbor) == Ok(CellState::Wall) {
                grid.cells[between.y][between.x] = CellState::Path;
                grid.cells[neighbor.y][neighbor.x] = CellState::Path;
                steps += 1;
                stack.push(self.frame(neighbor));
            }
        }
        steps
    }

    fn frame(&mut self, cell: Point) -> Frame {
        let mut directions = Self::DIRECTIONS;
        directions.shuffle(&mut self.random);
        Frame {
            cell,
            directions,
            next: 0,
        }
    }
}
