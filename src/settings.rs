//! Simulation settings
//!
//! Every tunable of the engine lives here. Defaults reproduce the classic
//! five-ball arena; a page may override any field with an inline JSON block.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::CollisionPass;

/// Errors produced while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The JSON could not be parsed
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Parsed, but a value is out of range
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Ball colors (also the display identity of a ball)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Orange,
    White,
    Yellow,
    Purple,
    Cyan,
    Pink,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Purple => "purple",
            Color::Cyan => "cyan",
            Color::Pink => "pink",
        }
    }

    /// Linear RGBA used by the shader
    pub fn rgba(&self) -> [f32; 4] {
        match self {
            Color::Red => [1.0, 0.0, 0.0, 1.0],
            Color::Blue => [0.0, 0.0, 1.0, 1.0],
            Color::Green => [0.0, 0.216, 0.0, 1.0],
            Color::Orange => [1.0, 0.376, 0.0, 1.0],
            Color::White => [1.0, 1.0, 1.0, 1.0],
            Color::Yellow => [1.0, 1.0, 0.0, 1.0],
            Color::Purple => [0.216, 0.0, 0.216, 1.0],
            Color::Cyan => [0.0, 1.0, 1.0, 1.0],
            Color::Pink => [1.0, 0.527, 0.597, 1.0],
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Starting configuration of one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub color: Color,
    /// Canonical position used when the simulation is first created
    pub position: Vec2,
}

impl BodySpec {
    pub const fn new(color: Color, x: f32, y: f32) -> Self {
        Self {
            color,
            position: Vec2::new(x, y),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Canvas size in simulation units
    pub width: f32,
    pub height: f32,

    pub initial_radius: f32,
    pub growth: f32,
    /// Velocity components are drawn uniformly from [-max_speed, max_speed)
    pub max_speed: f32,

    pub champion_threshold: u32,
    pub flash_ticks: u32,

    /// How colliding pairs are enumerated each frame
    pub collision_pass: CollisionPass,

    /// Balls in collision-iteration order
    pub bodies: Vec<BodySpec>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            initial_radius: INITIAL_RADIUS,
            growth: GROWTH_PER_COLLISION,
            max_speed: MAX_SPEED,
            champion_threshold: CHAMPION_THRESHOLD,
            flash_ticks: FLASH_TICKS,
            collision_pass: CollisionPass::default(),
            bodies: vec![
                BodySpec::new(Color::Red, 100.0, 100.0),
                BodySpec::new(Color::Blue, 200.0, 200.0),
                BodySpec::new(Color::Green, 300.0, 300.0),
                BodySpec::new(Color::Orange, 400.0, 400.0),
                BodySpec::new(Color::White, 500.0, 500.0),
            ],
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::Invalid(msg));

        if !self.initial_radius.is_finite() || self.initial_radius <= 0.0 {
            return invalid(format!("initial_radius must be > 0, got {}", self.initial_radius));
        }
        let diameter = self.initial_radius * 2.0;
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width < diameter
            || self.height < diameter
        {
            return invalid(format!(
                "canvas {}x{} cannot hold a ball of radius {}",
                self.width, self.height, self.initial_radius
            ));
        }
        if !self.growth.is_finite() || self.growth < 0.0 {
            return invalid(format!("growth must be >= 0, got {}", self.growth));
        }
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return invalid(format!("max_speed must be >= 0, got {}", self.max_speed));
        }
        if self.champion_threshold == 0 {
            return invalid("champion_threshold must be at least 1".to_string());
        }
        if self.bodies.is_empty() {
            return invalid("at least one ball is required".to_string());
        }
        if self.bodies.len() > MAX_BODIES {
            return invalid(format!(
                "at most {} balls are supported, got {}",
                MAX_BODIES,
                self.bodies.len()
            ));
        }

        let r = self.initial_radius;
        for spec in &self.bodies {
            let p = spec.position;
            let inside =
                (r..=self.width - r).contains(&p.x) && (r..=self.height - r).contains(&p.y);
            if !inside {
                return invalid(format!(
                    "{} ball at ({}, {}) does not fit inside the {}x{} canvas",
                    spec.color, p.x, p.y, self.width, self.height
                ));
            }
        }
        Ok(())
    }

    /// DOM id of the optional inline JSON block
    #[allow(dead_code)]
    const SETTINGS_ELEMENT_ID: &'static str = "sim-settings";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::SETTINGS_ELEMENT_ID))
            .and_then(|el| el.text_content());

        let Some(json) = json else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_json(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from #{}", Self::SETTINGS_ELEMENT_ID);
                settings
            }
            Err(e) => {
                log::warn!("{e}; falling back to defaults");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
