//! Simulation state and core body types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::{Color, Settings};

/// Fixed canvas extent for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True if a circle at `pos` pokes past the left or right edge
    #[inline]
    pub fn outside_x(&self, pos: Vec2, radius: f32) -> bool {
        pos.x + radius > self.width || pos.x - radius < 0.0
    }

    /// True if a circle at `pos` pokes past the top or bottom edge
    #[inline]
    pub fn outside_y(&self, pos: Vec2, radius: f32) -> bool {
        pos.y + radius > self.height || pos.y - radius < 0.0
    }
}

/// A ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Units per frame
    pub vel: Vec2,
    /// Grows on every collision, only shrinks on reset
    pub radius: f32,
    pub color: Color,
    pub collision_count: u32,
    /// Frames left to render in the flash color (no physical effect)
    pub flash_ticks: u32,
}

impl Body {
    pub fn new(pos: Vec2, vel: Vec2, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            radius,
            color,
            collision_count: 0,
            flash_ticks: 0,
        }
    }

    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.flash_ticks > 0
    }

    /// Count down the flash cue by one frame
    #[inline]
    pub fn decay_flash(&mut self) {
        self.flash_ticks = self.flash_ticks.saturating_sub(1);
    }
}

/// Draw a velocity with both components uniform in [-max_speed, max_speed)
pub fn random_velocity<R: Rng>(rng: &mut R, max_speed: f32) -> Vec2 {
    let scale = max_speed * 2.0;
    Vec2::new(
        (rng.random::<f32>() - 0.5) * scale,
        (rng.random::<f32>() - 0.5) * scale,
    )
}

/// Draw a position that keeps a circle of `radius` fully inside `bounds`
pub fn random_position<R: Rng>(rng: &mut R, bounds: Bounds, radius: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(radius..=bounds.width - radius),
        rng.random_range(radius..=bounds.height - radius),
    )
}

/// Complete simulation state, owned by a single session
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Bodies in collision-iteration order (never added or removed)
    pub bodies: Vec<Body>,
    pub bounds: Bounds,
    /// Index of the champion once crowned
    pub champion: Option<usize>,
    /// Frames advanced since the last reset
    pub frame: u64,
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
}

impl Simulation {
    /// Create bodies at their canonical positions with random velocities
    ///
    /// Settings are taken as given; run `Settings::validate` first when they
    /// come from outside the crate.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bodies = settings
            .bodies
            .iter()
            .map(|spec| {
                let vel = random_velocity(&mut rng, settings.max_speed);
                Body::new(spec.position, vel, settings.initial_radius, spec.color)
            })
            .collect();

        Self {
            bodies,
            bounds: Bounds::new(settings.width, settings.height),
            champion: None,
            frame: 0,
            settings,
            seed,
            rng,
        }
    }

    /// Restore every body to a fresh random start and clear the champion
    pub fn reset(&mut self) {
        let radius = self.settings.initial_radius;
        let max_speed = self.settings.max_speed;
        for body in &mut self.bodies {
            body.pos = random_position(&mut self.rng, self.bounds, radius);
            body.radius = radius;
            body.vel = random_velocity(&mut self.rng, max_speed);
            body.collision_count = 0;
            body.flash_ticks = 0;
        }
        self.champion = None;
        self.frame = 0;
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.champion.is_some()
    }

    pub fn champion(&self) -> Option<&Body> {
        self.champion.and_then(|i| self.bodies.get(i))
    }
}
