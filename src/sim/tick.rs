//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session by one step.

use super::collision::resolve_collisions;
use super::state::{GamePhase, GameState};

/// Horizontal slack before autopilot bothers moving the paddle
const AUTOPILOT_DEAD_ZONE: f32 = 4.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Move-left held
    pub left: bool,
    /// Move-right held
    pub right: bool,
    /// Launch a resting ball
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the paddle follows the ball by itself
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        state.toggle_pause();
    }

    // Nothing moves outside active play
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    let direction = if input.autopilot {
        autopilot_direction(state)
    } else {
        match (input.left, input.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    };
    state.paddle.set_direction(direction);

    if input.launch {
        state.launch_ball();
    }

    // Advance entities
    let stage_width = state.config.stage_width;
    for ball in &mut state.balls {
        ball.update();
    }
    state.paddle.update(stage_width);
    for brick in &mut state.bricks {
        brick.update(stage_width);
    }
    for power_up in &mut state.power_ups {
        power_up.update();
    }
    for particle in &mut state.particles {
        particle.update();
    }

    state.particles.retain(|p| p.is_alive());
    let floor = state.config.stage_height;
    state.power_ups.retain(|p| p.active && p.pos.y < floor);

    resolve_collisions(state);

    // Combo window
    if state.combo_ticks > 0 {
        state.combo_ticks -= 1;
        if state.combo_ticks == 0 {
            state.combo = 1;
        }
    }

    state.handle_lost_balls();
    state.check_level_clear();
}

/// Steer toward the lowest ball that is falling (or the lowest ball at all)
fn autopilot_direction(state: &GameState) -> f32 {
    let target = state
        .balls
        .iter()
        .filter(|b| b.vel.y > 0.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| state.balls.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)));

    let Some(ball) = target else {
        return 0.0;
    };

    let paddle_center = state.paddle.pos.x + state.paddle.width / 2.0;
    let offset = ball.pos.x - paddle_center;
    if offset.abs() <= AUTOPILOT_DEAD_ZONE {
        0.0
    } else {
        offset.signum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameConfig;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::entity::{Brick, BrickKind, PowerUpKind};
    use glam::Vec2;
    use proptest::prelude::*;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(GameConfig::default(), Settings::default(), seed);
        state.start();
        state
    }

    /// A field with one brick the ball can never reach
    fn unreachable_field(state: &mut GameState) {
        state.bricks = vec![Brick::new(0.0, -500.0, BrickKind::Normal)];
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(GameConfig::default(), Settings::default(), 1);
        let ball = state.balls[0].clone();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.balls[0], ball);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing(1);
        let input = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Paused);
        let frozen = state.time_ticks;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.time_ticks, frozen);

        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, frozen + 1);
    }

    #[test]
    fn test_held_keys_move_paddle() {
        let mut state = playing(1);
        let x = state.paddle.pos.x;
        let left = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &left);
        assert_eq!(state.paddle.pos.x, x - PADDLE_SPEED);

        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both);
        assert_eq!(state.paddle.pos.x, x - PADDLE_SPEED);
    }

    #[test]
    fn test_combo_resets_after_window() {
        let mut state = playing(1);
        unreachable_field(&mut state);
        state.combo = 4;
        state.combo_ticks = state.config.ticks(COMBO_WINDOW_SECS);

        for _ in 0..119 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.combo, 4);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.combo, 1);
    }

    #[test]
    fn test_power_up_reverts_after_duration() {
        let mut state = playing(1);
        unreachable_field(&mut state);
        state.apply_power_up(PowerUpKind::SpeedBoost);
        for _ in 0..299 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.paddle.speed, PADDLE_BOOST_SPEED);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.paddle.speed, PADDLE_SPEED);
        assert_eq!(state.hud().power_up, None);
    }

    #[test]
    fn test_clearing_last_brick_completes_level() {
        let mut state = playing(1);
        state.bricks = vec![Brick::new(380.0, 290.0, BrickKind::Normal)];
        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::LevelComplete);
        let summary = state.last_level_summary.unwrap();
        assert_eq!(summary.score, 10);
        assert_eq!(summary.bonus, 600);
        assert_eq!(state.score, 610);
    }

    #[test]
    fn test_ball_collects_power_up() {
        let mut state = playing(1);
        unreachable_field(&mut state);
        state
            .power_ups
            .push(crate::sim::PowerUp::new(400.0, 290.0, PowerUpKind::Life));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 4);
        assert!(state.power_ups.iter().all(|p| !p.active));
    }

    #[test]
    fn test_multi_ball_from_collision() {
        let mut state = playing(1);
        unreachable_field(&mut state);
        state.power_ups.push(crate::sim::PowerUp::new(
            400.0,
            290.0,
            PowerUpKind::MultiBall,
        ));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls.len(), 2);
    }

    #[test]
    fn test_autopilot_tracks_ball() {
        let mut state = playing(1);
        state.balls[0].pos = Vec2::new(100.0, 400.0);
        state.balls[0].vel = Vec2::new(0.0, 5.0);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let x = state.paddle.pos.x;
        tick(&mut state, &input);
        assert!(state.paddle.pos.x < x);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99999);
        let mut b = playing(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..2_000 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.hud(), b.hud());
        assert_eq!(a.balls, b.balls);
        assert_eq!(a.bricks, b.bricks);
    }

    proptest! {
        #[test]
        fn prop_speed_capped_after_tick(
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            spin in -50.0f32..50.0,
        ) {
            let mut state = playing(5);
            unreachable_field(&mut state);
            state.balls[0].vel = Vec2::new(vx, vy);
            state.balls[0].spin = spin;
            tick(&mut state, &TickInput::default());
            for ball in &state.balls {
                prop_assert!(ball.vel.length() <= ball.max_speed + 1e-3);
            }
        }
    }
}
