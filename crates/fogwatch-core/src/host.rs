//! Host lifecycle signal.
//!
//! The host application reports whether the game is running and focused.
//! `running` drives the `Closed`/`Unknown` transitions of the state machine,
//! and both flags gate sampling.

use serde::{Deserialize, Serialize};

/// Snapshot of the target game's process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameInfo {
    pub running: bool,
    pub focused: bool,
}

impl GameInfo {
    pub fn new(running: bool, focused: bool) -> Self {
        Self { running, focused }
    }

    /// Whether a detection cycle may sample the screen.
    pub fn is_active(&self) -> bool {
        self.running && self.focused
    }
}

/// Trait for querying the host about the game process.
///
/// Returns `None` when the host could not answer (treated as "not running").
pub trait HostMonitor {
    fn game_info(&self) -> Option<GameInfo>;
}
