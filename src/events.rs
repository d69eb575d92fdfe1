//! Events published to the presentation layer

use tokio::sync::mpsc::UnboundedSender;

use crate::{CellState, Grid, Point};

/// Sound cue requested by a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// A cell was visited
    Navigation,
    /// The exit was found
    Success,
}

/// Observable change of a session.
///
/// `generation` identifies the grid an event refers to; it is incremented on
/// every maze (re)generation of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum MazeEvent {
    /// A new maze replaced the previous one
    Generated { generation: u64, grid: Grid },
    /// A cell of the current maze changed state
    CellChanged {
        generation: u64,
        point: Point,
        state: CellState,
    },
    /// Play a sound cue at `volume`
    Cue { cue: Cue, volume: f32 },
}

/// Receiver of [MazeEvent]s
pub trait EventSink {
    fn emit(&mut self, event: MazeEvent);
}

impl EventSink for Vec<MazeEvent> {
    fn emit(&mut self, event: MazeEvent) {
        self.push(event);
    }
}

impl EventSink for UnboundedSender<MazeEvent> {
    fn emit(&mut self, event: MazeEvent) {
        if self.send(event).is_err() {
            tracing::trace!("Event receiver dropped, discarding event");
        }
    }
}
