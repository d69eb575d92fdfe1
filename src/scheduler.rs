//! Paced, cancellable execution of a traversal
//!
//! A [PacedRun] drives a [TraversalEngine] on a background tokio task: the
//! first step runs right away, every following one `delay` after the previous
//! step completed, so that observers can render and play cues in between.
//!
//! Cancellation is cooperative. [PacedRun::cancel] raises a flag while holding
//! the grid lock, and every step checks that flag under the same lock before
//! touching the grid. Once `cancel` returns, the run neither writes to the
//! grid nor publishes events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::{Grid, MazeError, MazeEvent, TraversalEngine, TraversalState};

/// Handle of a traversal running on a tokio task
pub struct PacedRun {
    grid: Arc<Mutex<Grid>>,
    cancelled: Arc<AtomicBool>,
    wake: Arc<Notify>,
    task: Option<JoinHandle<Result<TraversalState, MazeError>>>,
    outcome: Option<Result<TraversalState, MazeError>>,
}

impl PacedRun {
    /// Spawn the step loop of a started `engine`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        engine: TraversalEngine,
        grid: Arc<Mutex<Grid>>,
        events: UnboundedSender<MazeEvent>,
        delay: Duration,
    ) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());

        let task = tokio::spawn(step_loop(
            engine,
            Arc::clone(&grid),
            events,
            Arc::clone(&cancelled),
            Arc::clone(&wake),
            delay,
        ));

        Self {
            grid,
            cancelled,
            wake,
            task: Some(task),
            outcome: None,
        }
    }

    /// Stop the run; no step starts after this returns.
    pub fn cancel(&self) {
        let _grid = self.grid.lock();
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.wake.notify_one();
        }
    }

    /// Whether the step loop has ended
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the run to end and return its outcome.
    ///
    /// Step errors end the run and are returned here.
    pub async fn finished(&mut self) -> Result<TraversalState, MazeError> {
        if let Some(task) = self.task.take() {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(err) => {
                    error!(error = ?err, "Traversal task aborted");
                    Ok(TraversalState::Cancelled)
                }
            };
            self.outcome = Some(outcome);
        }
        self.outcome.clone().unwrap_or(Ok(TraversalState::Cancelled))
    }
}

impl Drop for PacedRun {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn step_loop(
    mut engine: TraversalEngine,
    grid: Arc<Mutex<Grid>>,
    mut events: UnboundedSender<MazeEvent>,
    cancelled: Arc<AtomicBool>,
    wake: Arc<Notify>,
    delay: Duration,
) -> Result<TraversalState, MazeError> {
    let strategy = engine.strategy();
    info!(%strategy, delay_ms = delay.as_millis() as u64, "Traversal started");

    loop {
        let state = {
            let mut grid = grid.lock();
            if cancelled.load(Ordering::SeqCst) {
                engine.cancel();
                break;
            }
            engine.step(&mut grid, &mut events).inspect_err(|err| {
                error!(%strategy, %err, "Traversal step failed");
            })?
        };
        if state.is_finished() {
            break;
        }

        tokio::select! {
            biased;

            _ = wake.notified() => {
                engine.cancel();
                break;
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }

    let state = engine.state();
    match state {
        TraversalState::Cancelled => debug!(%strategy, steps = engine.steps(), "Traversal cancelled"),
        _ => info!(%strategy, steps = engine.steps(), ?state, "Traversal finished"),
    }
    Ok(state)
}
