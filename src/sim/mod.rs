//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity vectors are never reordered)
//! - No platform dependencies; drawing goes through `DrawTarget`

pub mod aabb;
pub mod collision;
pub mod entity;
pub mod level;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use collision::{
    BrickHit, ball_brick_collision, ball_paddle_collision, ball_wall_collision, explosion_chain,
    paddle_bounce_angle, resolve_collisions,
};
pub use entity::{Ball, Brick, BrickKind, Paddle, Particle, PowerUp, PowerUpKind};
pub use level::{BrickOdds, brick_odds, generate_level, row_count};
pub use state::{GameEvent, GameOverSummary, GamePhase, GameState, Hud, LevelSummary};
pub use tick::{TickInput, tick};
