//! Champion Balls - colored balls bounce, collide and grow until one wins
//!
//! Core modules:
//! - `sim`: Frame-stepped physics, collision resolution and run control
//! - `session`: Owner of one simulation plus its run controller
//! - `settings`: Tunable parameters (JSON-loadable)
//! - `renderer`: WebGPU rendering pipeline

pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{BodySpec, Color, Settings, SettingsError};

/// Simulation configuration constants
pub mod consts {
    /// Canvas dimensions
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Ball defaults
    pub const INITIAL_RADIUS: f32 = 20.0;
    /// Radius gained by both bodies on every collision
    pub const GROWTH_PER_COLLISION: f32 = 0.5;
    /// Max absolute velocity component (units/frame)
    pub const MAX_SPEED: f32 = 4.0;

    /// Collision count that crowns a champion
    pub const CHAMPION_THRESHOLD: u32 = 50;
    /// Frames a body renders in the flash color after a hit
    pub const FLASH_TICKS: u32 = 5;

    /// Most balls a run may hold (renderer uniform array size)
    pub const MAX_BODIES: usize = 16;
}
