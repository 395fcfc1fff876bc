//! Bounce Breaker - a paddle-and-ball brick breaker
//!
//! Core modules:
//! - `sim`: Simulation core (entities, level generator, collisions, game loop)
//! - `renderer`: Draw-target abstraction and WebGPU pipeline
//! - `platform`: Keyboard mapping and browser DOM glue
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `settings` / `highscores`: Persisted player data

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};

use serde::{Deserialize, Serialize};

/// Game configuration constants
///
/// Speeds and accelerations are in pixels per tick. Durations are in seconds
/// and converted to ticks through [`GameConfig::ticks`].
pub mod consts {
    /// Default simulation rate
    pub const DEFAULT_TICK_HZ: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Stage dimensions
    pub const STAGE_WIDTH: f32 = 800.0;
    pub const STAGE_HEIGHT: f32 = 600.0;

    pub const STARTING_LIVES: u32 = 3;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED: f32 = 5.0;
    pub const BALL_MAX_SPEED: f32 = 8.0;
    /// Spin added to dx every tick, as a fraction of spin
    pub const SPIN_INFLUENCE: f32 = 0.01;
    pub const SPIN_DECAY: f32 = 0.98;
    /// Paddle dx transferred into ball spin on contact
    pub const PADDLE_SPIN_TRANSFER: f32 = 0.1;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from paddle top to stage bottom
    pub const PADDLE_BOTTOM_OFFSET: f32 = 30.0;
    pub const PADDLE_WIDE_WIDTH: f32 = 150.0;
    pub const PADDLE_BOOST_SPEED: f32 = 12.0;

    /// Brick grid
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_COLUMNS: u32 = 9;
    pub const BRICK_BASE_ROWS: u32 = 5;
    pub const BRICK_MAX_ROWS: u32 = 8;
    pub const GRID_CELL_WIDTH: f32 = 80.0;
    pub const GRID_CELL_HEIGHT: f32 = 30.0;
    pub const GRID_ORIGIN_X: f32 = 45.0;
    pub const GRID_ORIGIN_Y: f32 = 60.0;
    pub const MOVING_BRICK_SPEED: f32 = 1.0;
    pub const EXPLOSION_RADIUS: f32 = 100.0;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 20.0;
    pub const POWER_UP_FALL_SPEED: f32 = 2.0;
    pub const POWER_UP_DROP_CHANCE: f64 = 0.1;

    /// Particles
    pub const PARTICLES_PER_BRICK: usize = 10;
    pub const PARTICLE_LIFE_TICKS: u32 = 30;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
    pub const PARTICLE_MAX_SPEED: f32 = 4.0;
    pub const MAX_PARTICLES: usize = 512;

    /// Scoring
    pub const BRICK_SCORE: u64 = 10;
    pub const TIME_BONUS_PER_SEC: u64 = 10;

    /// Timers (seconds)
    pub const COMBO_WINDOW_SECS: f32 = 2.0;
    pub const POWER_UP_DURATION_SECS: f32 = 5.0;
    pub const LEVEL_TIME_BUDGET_SECS: u64 = 60;
}

/// Session configuration fixed at game construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub stage_width: f32,
    pub stage_height: f32,
    /// Simulation ticks per second
    pub tick_hz: f32,
    pub starting_lives: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stage_width: consts::STAGE_WIDTH,
            stage_height: consts::STAGE_HEIGHT,
            tick_hz: consts::DEFAULT_TICK_HZ,
            starting_lives: consts::STARTING_LIVES,
        }
    }
}

impl GameConfig {
    /// Convert a duration in seconds into a whole number of ticks
    #[inline]
    pub fn ticks(&self, secs: f32) -> u32 {
        (secs * self.tick_hz).round().max(0.0) as u32
    }

    /// Convert a tick count back into whole elapsed seconds (floored)
    #[inline]
    pub fn whole_secs(&self, ticks: u64) -> u64 {
        if self.tick_hz <= 0.0 {
            return 0;
        }
        (ticks as f64 / self.tick_hz as f64).floor() as u64
    }

    /// Fixed timestep in seconds
    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_hz
    }
}

/// Format whole seconds as `mm:ss`
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_at_default_rate() {
        let config = GameConfig::default();
        assert_eq!(config.ticks(consts::COMBO_WINDOW_SECS), 120);
        assert_eq!(config.ticks(consts::POWER_UP_DURATION_SECS), 300);
    }

    #[test]
    fn test_ticks_follow_tick_rate() {
        let config = GameConfig {
            tick_hz: 120.0,
            ..Default::default()
        };
        assert_eq!(config.ticks(consts::COMBO_WINDOW_SECS), 240);
        assert_eq!(config.whole_secs(239), 1);
        assert_eq!(config.whole_secs(240), 2);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(75), "01:15");
        assert_eq!(format_time(600), "10:00");
    }
}
