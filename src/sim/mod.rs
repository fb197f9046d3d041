//! Simulation module
//!
//! All physics and run-control logic lives here:
//! - One unit time step per frame (no delta-time scaling)
//! - Seeded RNG only, so a seeded run is reproducible
//! - Stable iteration order (body index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod control;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionOutcome, CollisionPass, bodies_collide, collision_normal, reflect_off_walls,
    resolve_collision,
};
pub use control::{Affordances, Command, RunController, RunState};
pub use state::{Body, Bounds, Simulation};
pub use tick::{FrameReport, advance_frame};
