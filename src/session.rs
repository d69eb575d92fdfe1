//! Maze session: the entry point of a presentation layer
//!
//! A [Session] owns the current maze and the traversal running on it.
//! Regenerating the maze or starting a new search always cancels the running
//! traversal first, so a replaced grid never receives stale steps.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::{
    CellState, Dimensions, EventSink, Grid, MazeConfig, MazeError, MazeEvent, MazeGenerator,
    PacedRun, Strategy, TraversalEngine, TraversalState,
};

/// Maze generation and paced traversal for one observer
pub struct Session {
    config: MazeConfig,
    generator: MazeGenerator,
    events: UnboundedSender<MazeEvent>,
    grid: Option<Arc<Mutex<Grid>>>,
    dimensions: Option<Dimensions>,
    generation: u64,
    run: Option<PacedRun>,
}

impl Session {
    /// Create a session without a maze, publishing events to `events`
    pub fn new(config: MazeConfig, events: UnboundedSender<MazeEvent>) -> Self {
        Self {
            generator: MazeGenerator::new(config.seed),
            config,
            events,
            grid: None,
            dimensions: None,
            generation: 0,
            run: None,
        }
    }

    /// Create a session together with the receiving end of its events
    pub fn channel(config: MazeConfig) -> (Self, UnboundedReceiver<MazeEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(config, tx), rx)
    }

    /// Replace the maze with a new one of the given size.
    ///
    /// Invalid dimensions are rejected without touching the session.
    pub fn generate(&mut self, width: usize, height: usize) -> Result<Dimensions, MazeError> {
        let dimensions = Dimensions::new(width, height, &self.config)
            .inspect_err(|err| debug!(%err, "Generate request rejected"))?;
        self.regenerate(dimensions);
        Ok(dimensions)
    }

    /// [Self::generate] with dimensions as typed in by a user
    pub fn generate_from_input(
        &mut self,
        width: &str,
        height: &str,
    ) -> Result<Dimensions, MazeError> {
        let dimensions = Dimensions::parse(width, height, &self.config)
            .inspect_err(|err| debug!(%err, "Generate request rejected"))?;
        self.regenerate(dimensions);
        Ok(dimensions)
    }

    /// Replace the maze with one of the default size
    pub fn reset(&mut self) -> Dimensions {
        let dimensions = self.config.default_dimensions();
        self.regenerate(dimensions);
        dimensions
    }

    /// Start exploring the current maze from its entrance.
    ///
    /// Any running traversal is cancelled first. The maze itself is kept, but
    /// every [CellState::Visited] cell left by earlier searches is turned
    /// back into [CellState::Path] and published as a
    /// [MazeEvent::CellChanged] before the first step. This is the only grid
    /// write besides traversal marking; without it a second search on the
    /// same maze would find its neighbors already visited and exhaust at
    /// once. Call [Self::generate] or [Self::reset] instead for a fresh maze.
    ///
    /// Fails with [MazeError::EmptyGrid], changing nothing, if no maze was
    /// generated yet. Must be called from within a tokio runtime.
    pub fn start_search(&mut self, strategy: Strategy) -> Result<(), MazeError> {
        let grid = self.grid.clone().ok_or(MazeError::EmptyGrid)?;
        self.cancel();

        let mut engine = TraversalEngine::new(self.generation, &self.config);
        {
            let mut grid = grid.lock();
            for point in grid.clear_visited() {
                self.events.emit(MazeEvent::CellChanged {
                    generation: self.generation,
                    point,
                    state: CellState::Path,
                });
            }
            let origin = grid.start();
            engine.start(Some(&*grid), origin, strategy)?;
        }

        self.run = Some(PacedRun::spawn(
            engine,
            grid,
            self.events.clone(),
            self.config.step_delay,
        ));
        Ok(())
    }

    /// Cancel the running traversal, if any
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            run.cancel();
            if !run.is_finished() {
                info!(generation = self.generation, "Traversal cancelled");
            }
        }
    }

    /// Wait for the current traversal to end.
    ///
    /// `None` if no traversal was started since the last (re)generation.
    pub async fn wait(&mut self) -> Option<Result<TraversalState, MazeError>> {
        match self.run.as_mut() {
            Some(run) => Some(run.finished().await),
            None => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.is_finished())
    }

    /// Snapshot of the current maze
    pub fn grid(&self) -> Option<Grid> {
        self.grid.as_ref().map(|grid| grid.lock().clone())
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    /// Number of mazes generated so far; tags [MazeEvent]s
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn regenerate(&mut self, dimensions: Dimensions) {
        self.cancel();
        let grid = self.generator.generate(dimensions);
        self.generation += 1;
        info!(
            generation = self.generation,
            width = dimensions.width(),
            height = dimensions.height(),
            "Maze generated"
        );
        self.events.emit(MazeEvent::Generated {
            generation: self.generation,
            grid: grid.clone(),
        });
        self.grid = Some(Arc::new(Mutex::new(grid)));
        self.dimensions = Some(dimensions);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::{
        CellState, MazeConfig, MazeError, MazeEvent, Point, Session, Strategy, TraversalState,
    };

    fn session() -> (Session, UnboundedReceiver<MazeEvent>) {
        Session::channel(MazeConfig::default().with_seed(Some(17)))
    }

    fn drain(rx: &mut UnboundedReceiver<MazeEvent>) -> Vec<MazeEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn dimension_boundaries() {
        let (mut session, mut rx) = session();

        assert!(matches!(
            session.generate(4, 20),
            Err(MazeError::InvalidDimension { .. })
        ));
        assert!(session.generate(51, 20).is_err());
        assert!(session.grid().is_none());
        assert!(session.dimensions().is_none());
        assert!(drain(&mut rx).is_empty());

        for size in [5, 50] {
            let dims = session.generate(size, size).unwrap();
            assert_eq!((dims.width(), dims.height()), (size, size));
            assert_eq!(session.grid().unwrap().dimensions(), (size, size));
        }
        assert_eq!(session.generation(), 2);

        // Rejected requests keep the current maze
        let before = session.grid();
        assert!(session.generate(20, 4).is_err());
        assert_eq!(session.grid(), before);
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn generate_from_typed_input() {
        let (mut session, mut rx) = session();

        assert!(session.generate_from_input("abc", "10").is_err());
        assert!(session.generate_from_input("10", "").is_err());
        assert!(session.grid().is_none());

        session.generate_from_input(" 12 ", "7").unwrap();
        assert_eq!(session.grid().unwrap().dimensions(), (12, 7));
        match drain(&mut rx).as_slice() {
            [MazeEvent::Generated { generation, grid }] => {
                assert_eq!(*generation, 1);
                assert_eq!(grid.dimensions(), (12, 7));
            }
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn reset_twice_gives_default_mazes() {
        let (mut session, _rx) = session();

        for _ in 0..2 {
            let dims = session.reset();
            assert_eq!((dims.width(), dims.height()), (20, 20));

            let grid = session.grid().unwrap();
            assert_eq!(grid.dimensions(), (20, 20));
            assert_eq!(grid.count(CellState::Start), 1);
            assert_eq!(grid.count(CellState::End), 1);
            assert_eq!(grid.get(Point::new(0, 1)), Ok(CellState::Start));
            assert_eq!(grid.get(Point::new(19, 18)), Ok(CellState::End));
        }
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn reset_follows_configured_bounds() {
        let config = MazeConfig::default()
            .with_seed(Some(4))
            .with_bounds(7, 15, 11)
            .unwrap();
        let (mut session, _rx) = Session::channel(config);

        assert!(session.generate(5, 5).is_err());
        assert!(session.generate(16, 7).is_err());

        let dims = session.reset();
        assert_eq!((dims.width(), dims.height()), (11, 11));
        let grid = session.grid().unwrap();
        assert_eq!(grid.get(grid.start()), Ok(CellState::Start));
        assert_eq!(grid.get(Point::new(10, 9)), Ok(CellState::End));
    }

    #[test]
    fn search_without_maze_is_rejected() {
        let (mut session, mut rx) = session();

        assert_eq!(session.start_search(Strategy::Bfs), Err(MazeError::EmptyGrid));
        assert!(!session.is_running());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn small_maze_search_ends_in_defined_outcome() {
        let (mut session, _rx) = session();
        session.generate(5, 5).unwrap();

        for strategy in [Strategy::Bfs, Strategy::Dfs] {
            session.start_search(strategy).unwrap();
            assert!(session.is_running());

            let outcome = session.wait().await.unwrap();
            assert!(
                matches!(
                    outcome,
                    Ok(TraversalState::Succeeded | TraversalState::Exhausted)
                ),
                "{outcome:?}"
            );
            assert!(!session.is_running());

            let grid = session.grid().unwrap();
            assert_eq!(grid.get(grid.start()), Ok(CellState::Start));
            assert_eq!(grid.get(grid.end()), Ok(CellState::End));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_stale_events_after_regeneration() {
        let (mut session, mut rx) = session();
        session.generate(41, 41).unwrap();
        let stale = session.generation();

        session.start_search(Strategy::Bfs).unwrap();
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(session.is_running());

        session.cancel();
        session.generate(9, 9).unwrap();
        let visited = drain(&mut rx)
            .iter()
            .filter(|e| matches!(e, MazeEvent::CellChanged { .. }))
            .count();
        assert!(visited > 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!drain(&mut rx).iter().any(|e| matches!(
            e,
            MazeEvent::CellChanged { generation, .. } if *generation == stale
        )));
        assert_eq!(session.grid().unwrap().count(CellState::Visited), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn new_search_replaces_running_one() {
        let (mut session, mut rx) = session();
        session.generate(45, 45).unwrap();

        session.start_search(Strategy::Bfs).unwrap();
        tokio::time::sleep(Duration::from_millis(550)).await;
        let visited_by_bfs = session.grid().unwrap().count(CellState::Visited);
        assert!(visited_by_bfs > 0);
        drain(&mut rx);

        session.start_search(Strategy::Dfs).unwrap();
        let restored = drain(&mut rx)
            .iter()
            .filter(|e| matches!(e, MazeEvent::CellChanged { state: CellState::Path, .. }))
            .count();
        assert_eq!(restored, visited_by_bfs);
        assert_eq!(session.grid().unwrap().count(CellState::Visited), 0);

        let outcome = session.wait().await.unwrap();
        assert!(matches!(
            outcome,
            Ok(TraversalState::Succeeded | TraversalState::Exhausted)
        ));
        let visited_by_dfs = session.grid().unwrap().count(CellState::Visited);

        // Only the depth-first run wrote to the maze, and it has stopped
        let events = drain(&mut rx);
        let marked = events
            .iter()
            .filter(|e| matches!(e, MazeEvent::CellChanged { state: CellState::Visited, .. }))
            .count();
        assert_eq!(marked, visited_by_dfs);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());
    }
}
