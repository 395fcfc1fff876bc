//! Level generation
//!
//! Each level is a fixed grid whose row count grows with the level number.
//! Special bricks are rolled per cell, gated by level and scaled by
//! difficulty.

use rand::Rng;

use super::entity::{Brick, BrickKind};
use crate::consts::*;
use crate::settings::Difficulty;

/// First level that may contain strong bricks
pub const STRONG_MIN_LEVEL: u32 = 3;
/// First level that may contain explosive bricks
pub const EXPLOSIVE_MIN_LEVEL: u32 = 5;
/// First level that may contain moving bricks
pub const MOVING_MIN_LEVEL: u32 = 10;

/// Per-cell probabilities for special bricks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickOdds {
    pub strong: f32,
    pub explosive: f32,
    pub moving: f32,
}

/// Special-brick odds for a difficulty
pub fn brick_odds(difficulty: Difficulty) -> BrickOdds {
    let (strong, explosive, moving) = match difficulty {
        Difficulty::Easy => (0.05, 0.02, 0.01),
        Difficulty::Normal => (0.10, 0.05, 0.03),
        Difficulty::Hard => (0.15, 0.08, 0.05),
        Difficulty::Expert => (0.25, 0.12, 0.08),
    };
    BrickOdds {
        strong,
        explosive,
        moving,
    }
}

/// Number of brick rows for a level
pub fn row_count(level: u32) -> u32 {
    (BRICK_BASE_ROWS + level / 3).min(BRICK_MAX_ROWS)
}

/// Pick a brick kind from a single roll in [0, 1)
///
/// Checks run in order and later matches win, so a low roll on a high level
/// lands on the rarest eligible kind.
pub fn pick_kind(level: u32, roll: f32, odds: &BrickOdds) -> BrickKind {
    let mut kind = BrickKind::Normal;
    if level >= STRONG_MIN_LEVEL && roll < odds.strong {
        kind = BrickKind::Strong;
    }
    if level >= EXPLOSIVE_MIN_LEVEL && roll < odds.explosive {
        kind = BrickKind::Explosive;
    }
    if level >= MOVING_MIN_LEVEL && roll < odds.moving {
        kind = BrickKind::Moving;
    }
    kind
}

/// Generate the brick layout for a level
pub fn generate_level<R: Rng + ?Sized>(
    level: u32,
    difficulty: Difficulty,
    rng: &mut R,
) -> Vec<Brick> {
    let rows = row_count(level);
    let odds = brick_odds(difficulty);
    let mut bricks = Vec::with_capacity((rows * BRICK_COLUMNS) as usize);

    for row in 0..rows {
        for col in 0..BRICK_COLUMNS {
            let x = col as f32 * GRID_CELL_WIDTH + GRID_ORIGIN_X;
            let y = row as f32 * GRID_CELL_HEIGHT + GRID_ORIGIN_Y;
            let kind = pick_kind(level, rng.random::<f32>(), &odds);
            bricks.push(Brick::new(x, y, kind));
        }
    }

    log::info!(
        "Generated level {} ({}): {} bricks in {} rows",
        level,
        difficulty.as_str(),
        bricks.len(),
        rows
    );

    bricks
}
