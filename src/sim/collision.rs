//! Collision detection and response
//!
//! Everything collides as axis-aligned boxes; the ball uses the square around
//! its circle. Responses are deliberately simple: bricks always flip the
//! vertical velocity, and the paddle sets a fresh velocity from where it was
//! struck.

use std::collections::VecDeque;
use std::f32::consts::PI;

use glam::Vec2;

use super::entity::{Ball, Brick, BrickKind, Paddle, PowerUpKind};
use super::state::GameState;
use crate::consts::*;

/// Largest paddle deflection from vertical, reached at either paddle end
pub const MAX_BOUNCE_ANGLE: f32 = PI / 6.0;

/// Outcome of a ball touching a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickHit {
    /// No contact (or the brick was already gone)
    Miss,
    /// Contact, brick survived
    Damaged,
    /// Contact, brick destroyed by this hit
    Destroyed,
}

/// Bounce off the side and top walls
///
/// Only reflects when the ball is moving outward, so a ball that overlaps the
/// bound for several ticks cannot flip back and forth. Returns true on a
/// bounce.
pub fn ball_wall_collision(ball: &mut Ball, stage_width: f32) -> bool {
    let mut bounced = false;

    let past_left = ball.pos.x - ball.radius < 0.0 && ball.vel.x < 0.0;
    let past_right = ball.pos.x + ball.radius > stage_width && ball.vel.x > 0.0;
    if past_left || past_right {
        ball.vel.x = -ball.vel.x;
        ball.spin *= -0.5;
        bounced = true;
    }

    if ball.pos.y - ball.radius < 0.0 && ball.vel.y < 0.0 {
        ball.vel.y = -ball.vel.y;
        bounced = true;
    }

    bounced
}

/// Bounce angle from vertical for a hit at `hit_fraction` along the paddle
///
/// 0 is the left edge, 1 the right edge. Not clamped: a ball clipping the
/// paddle corner can deflect slightly past the nominal range.
#[inline]
pub fn paddle_bounce_angle(hit_fraction: f32) -> f32 {
    (hit_fraction - 0.5) * (PI / 3.0)
}

/// Bounce off the paddle; returns true on contact
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !ball.bounds().overlaps(&paddle.bounds()) {
        return false;
    }

    let hit_fraction = (ball.pos.x - paddle.pos.x) / paddle.width;
    let angle = paddle_bounce_angle(hit_fraction);
    ball.vel = Vec2::new(angle.sin() * ball.speed, -angle.cos() * ball.speed);
    ball.spin += paddle.dx * PADDLE_SPIN_TRANSFER;
    true
}

/// Test a ball against one brick, applying the bounce and one hit
pub fn ball_brick_collision(ball: &mut Ball, brick: &mut Brick) -> BrickHit {
    if !brick.visible || !ball.bounds().overlaps(&brick.bounds()) {
        return BrickHit::Miss;
    }

    ball.vel.y = -ball.vel.y;
    if brick.hit() {
        BrickHit::Destroyed
    } else {
        BrickHit::Damaged
    }
}

/// Propagate an explosion outward from the brick at `origin`
///
/// Every visible destructible brick whose center lies strictly within
/// [`EXPLOSION_RADIUS`] of an exploding brick is destroyed; explosive bricks
/// caught this way explode in turn. Returns the indices destroyed by the
/// chain in the order they fell, not including `origin`. Does nothing if
/// `origin` is not an explosive brick.
pub fn explosion_chain(bricks: &mut [Brick], origin: usize) -> Vec<usize> {
    let mut destroyed = Vec::new();
    if bricks.get(origin).map(|b| b.kind) != Some(BrickKind::Explosive) {
        return destroyed;
    }

    let mut visited = vec![false; bricks.len()];
    visited[origin] = true;
    let mut worklist = VecDeque::from([origin]);

    while let Some(current) = worklist.pop_front() {
        let center = bricks[current].center();
        for (i, other) in bricks.iter_mut().enumerate() {
            if visited[i] || !other.counts_for_clear() {
                continue;
            }
            if center.distance(other.center()) < EXPLOSION_RADIUS && other.destroy() {
                visited[i] = true;
                destroyed.push(i);
                if other.kind == BrickKind::Explosive {
                    worklist.push_back(i);
                }
            }
        }
    }

    destroyed
}

/// Run every collision for one tick
///
/// Per ball: walls, paddle, bricks, then power-ups. The paddle is tested
/// against power-ups once after all balls. Multi-ball is applied after the
/// ball pass so the list being iterated is never replaced mid-loop.
pub fn resolve_collisions(state: &mut GameState) {
    let stage_width = state.config.stage_width;
    let mut multi_ball = 0u32;

    for b in 0..state.balls.len() {
        ball_wall_collision(&mut state.balls[b], stage_width);
        ball_paddle_collision(&mut state.balls[b], &state.paddle);

        for i in 0..state.bricks.len() {
            if ball_brick_collision(&mut state.balls[b], &mut state.bricks[i])
                == BrickHit::Destroyed
            {
                state.on_brick_destroyed(i);
            }
        }

        let ball_box = state.balls[b].bounds();
        for p in 0..state.power_ups.len() {
            let power_up = &mut state.power_ups[p];
            if !power_up.active || !ball_box.overlaps(&power_up.bounds()) {
                continue;
            }
            power_up.active = false;
            let kind = power_up.kind;
            if kind == PowerUpKind::MultiBall {
                multi_ball += 1;
                state.record_power_up(kind);
            } else {
                state.apply_power_up(kind);
            }
        }
    }

    for _ in 0..multi_ball {
        state.split_balls();
    }

    let paddle_box = state.paddle.bounds();
    for p in 0..state.power_ups.len() {
        let power_up = &mut state.power_ups[p];
        if power_up.active && paddle_box.overlaps(&power_up.bounds()) {
            power_up.active = false;
            let kind = power_up.kind;
            state.apply_power_up(kind);
        }
    }
}
