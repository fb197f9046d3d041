//! Run control: the Running/Paused/Stopped gate in front of the engine
//!
//! The controller never touches bodies. `start` tells the caller when a
//! reset is due; the owner of the simulation performs it.

use serde::{Deserialize, Serialize};

/// Whether the simulation is being advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// Halted; the next start resets every body
    Stopped,
    /// Advancing once per frame
    #[default]
    Running,
    /// Frozen in place, resumable
    Paused,
}

/// User commands (each a zero-argument button press)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Pause,
    Stop,
}

/// Enabled state and labels of the three control buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub start_enabled: bool,
    pub pause_enabled: bool,
    pub stop_enabled: bool,
    pub pause_label: &'static str,
}

/// Run-state machine
#[derive(Debug, Clone, Default)]
pub struct RunController {
    state: RunState,
}

impl RunController {
    /// Controller in the default `Running` state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RunState) -> Self {
        Self { state }
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Go to `Running` from any state
    ///
    /// Returns true when coming from `Stopped`, meaning the simulation must be
    /// reset before the next frame.
    #[must_use]
    pub fn start(&mut self) -> bool {
        let needs_reset = self.state == RunState::Stopped;
        self.state = RunState::Running;
        needs_reset
    }

    /// Toggle Running <-> Paused (no-op while stopped)
    pub fn pause(&mut self) {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Stopped => RunState::Stopped,
        };
    }

    /// Go to `Stopped` from any state; bodies are left untouched
    pub fn stop(&mut self) {
        self.state = RunState::Stopped;
    }

    /// Dispatch a command; returns true when a reset is required
    #[must_use]
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Pause => {
                self.pause();
                false
            }
            Command::Stop => {
                self.stop();
                false
            }
        }
    }

    /// True only while running and no champion exists
    #[inline]
    pub fn can_advance(&self, terminal: bool) -> bool {
        self.state == RunState::Running && !terminal
    }

    /// Button projection for the current state
    ///
    /// A terminal simulation forces pause off. Stop stays available so a
    /// decided run can still go Stop -> Start (which resets).
    pub fn affordances(&self, terminal: bool) -> Affordances {
        let (start_enabled, pause_enabled, stop_enabled) = match self.state {
            RunState::Stopped => (true, false, false),
            RunState::Running | RunState::Paused => (false, true, true),
        };
        Affordances {
            start_enabled,
            pause_enabled: pause_enabled && !terminal,
            stop_enabled,
            pause_label: match self.state {
                RunState::Paused => "Resume",
                _ => "Pause",
            },
        }
    }
}
