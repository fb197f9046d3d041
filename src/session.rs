//! A single simulation session
//!
//! Owns the simulation and its run controller. The host calls `frame` once
//! per display refresh and routes button presses through `command`.

use crate::settings::Settings;
use crate::sim::{
    Affordances, Body, Command, FrameReport, RunController, RunState, Simulation, advance_frame,
};

/// Text shown over the canvas once a champion exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub headline: String,
    pub detail: String,
}

/// Simulation plus the gate that decides whether it advances
#[derive(Debug, Clone)]
pub struct Session {
    sim: Simulation,
    control: RunController,
}

impl Session {
    /// Settings are not re-validated here (see `Simulation::new`)
    pub fn new(settings: Settings, seed: u64) -> Self {
        log::info!(
            "Session created with {} balls (seed {}, {:?})",
            settings.bodies.len(),
            seed,
            settings.collision_pass
        );
        Self {
            sim: Simulation::new(settings, seed),
            control: RunController::new(),
        }
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn bodies(&self) -> &[Body] {
        &self.sim.bodies
    }

    pub fn run_state(&self) -> RunState {
        self.control.state()
    }

    pub fn is_terminal(&self) -> bool {
        self.sim.is_terminal()
    }

    pub fn can_advance(&self) -> bool {
        self.control.can_advance(self.sim.is_terminal())
    }

    /// Advance one frame if running and undecided
    pub fn frame(&mut self) -> Option<FrameReport> {
        if !self.can_advance() {
            return None;
        }
        Some(advance_frame(&mut self.sim))
    }

    pub fn command(&mut self, command: Command) {
        let before = self.control.state();
        if self.control.apply(command) {
            self.sim.reset();
            log::info!("Simulation reset");
        }
        log::info!("{:?}: {:?} -> {:?}", command, before, self.control.state());
    }

    pub fn start(&mut self) {
        self.command(Command::Start);
    }

    pub fn pause(&mut self) {
        self.command(Command::Pause);
    }

    pub fn stop(&mut self) {
        self.command(Command::Stop);
    }

    pub fn affordances(&self) -> Affordances {
        self.control.affordances(self.sim.is_terminal())
    }

    /// Champion banner, if the run is over
    pub fn overlay(&self) -> Option<Overlay> {
        self.sim.champion().map(|champion| Overlay {
            headline: format!("Champion is {}!", champion.color),
            detail: format!("Collisions: {}", champion.collision_count),
        })
    }
}
