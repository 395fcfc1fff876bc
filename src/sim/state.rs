//! Game state and session rules
//!
//! Owns every entity collection plus score, lives and combo. All mutation
//! happens through the methods here or the per-tick update in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::explosion_chain;
use super::entity::{Ball, Brick, BrickKind, Paddle, Particle, PowerUp, PowerUpKind};
use super::level::generate_level;
use crate::GameConfig;
use crate::consts::*;
use crate::renderer::{DrawTarget, colors};
use crate::settings::Settings;

/// Spacing of the background grid lines
const GRID_SPACING: f32 = 50.0;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Main menu, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Every destructible brick is gone; waiting for "next level"
    LevelComplete,
    /// Out of lives
    GameOver,
}

/// Shown when a level is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: u32,
    /// Score at the moment of clearing, before the bonus
    pub score: u64,
    pub combo: u32,
    pub elapsed_secs: u64,
    pub bonus: u64,
}

/// Shown when the game ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverSummary {
    pub score: u64,
    pub level: u32,
    pub elapsed_secs: u64,
}

/// Read-only values for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub combo: u32,
    /// Label of the active paddle power-up
    pub power_up: Option<&'static str>,
}

/// Things the UI may want to react to, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BrickDestroyed { kind: BrickKind, points: u64 },
    PowerUpCollected(PowerUpKind),
    LifeLost { lives_left: u32 },
    LevelComplete(LevelSummary),
    GameOver(GameOverSummary),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub settings: Settings,
    /// Session RNG (level layout, power-up drops, particles)
    pub rng: Pcg32,
    pub seed: u64,

    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    /// Score multiplier, starts at 1
    pub combo: u32,
    /// Ticks until the combo resets; 0 when no combo window is open
    pub combo_ticks: u32,
    /// True once a game has ended and a fresh one must be started
    pub session_over: bool,
    /// Phase `start` returns to after quitting mid-session
    pub resume_phase: GamePhase,

    /// Ticks spent in the playing phase since construction
    pub time_ticks: u64,
    pub level_start_tick: u64,
    pub game_start_tick: u64,

    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    pub particles: Vec<Particle>,

    pub last_level_summary: Option<LevelSummary>,
    pub last_game_over: Option<GameOverSummary>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session sitting at the menu with level 1 laid out
    pub fn new(config: GameConfig, settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bricks = generate_level(1, settings.difficulty, &mut rng);

        Self {
            config,
            settings,
            rng,
            seed,
            phase: GamePhase::Menu,
            level: 1,
            score: 0,
            lives: config.starting_lives,
            combo: 1,
            combo_ticks: 0,
            session_over: false,
            resume_phase: GamePhase::Playing,
            time_ticks: 0,
            level_start_tick: 0,
            game_start_tick: 0,
            paddle: Paddle::new(config.stage_width, config.stage_height),
            balls: vec![Ball::new(Self::stage_center(&config))],
            bricks,
            power_ups: Vec::new(),
            particles: Vec::new(),
            last_level_summary: None,
            last_game_over: None,
            events: Vec::new(),
        }
    }

    fn stage_center(config: &GameConfig) -> Vec2 {
        Vec2::new(config.stage_width / 2.0, config.stage_height / 2.0)
    }

    /// Enter play from the menu
    ///
    /// Resumes the current session (restarting its clocks) unless the last
    /// game ended, in which case a fresh game begins. A cleared level stays
    /// cleared and still waits for `next_level`.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Menu {
            return;
        }
        if self.session_over {
            self.reset_session();
        } else if self.resume_phase == GamePhase::LevelComplete {
            self.phase = GamePhase::LevelComplete;
            log::info!("Back to the end of level {}", self.level);
            return;
        } else {
            self.game_start_tick = self.time_ticks;
            self.level_start_tick = self.time_ticks;
        }
        self.phase = GamePhase::Playing;
        log::info!("Game started at level {}", self.level);
    }

    /// Playing <-> Paused; any other phase is left alone
    pub fn toggle_pause(&mut self) -> GamePhase {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
        self.phase
    }

    /// Start over from level 1
    ///
    /// Accepted from paused, level-complete and game-over. Returns false when
    /// ignored.
    pub fn restart(&mut self) -> bool {
        match self.phase {
            GamePhase::Paused | GamePhase::LevelComplete | GamePhase::GameOver => {
                self.reset_session();
                self.phase = GamePhase::Playing;
                log::info!("Game restarted");
                true
            }
            _ => false,
        }
    }

    /// Advance to the next level; only valid after a level is cleared
    pub fn next_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        self.level += 1;
        self.level_start_tick = self.time_ticks;
        self.resume_phase = GamePhase::Playing;
        self.reset_field();
        self.phase = GamePhase::Playing;
        log::info!("Advanced to level {}", self.level);
        true
    }

    /// Leave to the main menu from any phase
    pub fn quit_to_menu(&mut self) {
        match self.phase {
            GamePhase::Menu => return,
            GamePhase::GameOver => self.session_over = true,
            GamePhase::LevelComplete => self.resume_phase = GamePhase::LevelComplete,
            GamePhase::Playing | GamePhase::Paused => self.resume_phase = GamePhase::Playing,
        }
        self.phase = GamePhase::Menu;
    }

    /// Replace settings; difficulty applies from the next generated level
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Send a resting ball upward
    ///
    /// Only acts when exactly one ball exists and it has no vertical speed.
    pub fn launch_ball(&mut self) -> bool {
        match self.balls.as_mut_slice() {
            [ball] if ball.vel.y == 0.0 => {
                ball.vel.y = -ball.speed;
                true
            }
            _ => false,
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            level: self.level,
            lives: self.lives,
            combo: self.combo,
            power_up: self.paddle.label(),
        }
    }

    /// Take all events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whole seconds played on the current level
    pub fn level_elapsed_secs(&self) -> u64 {
        self.config
            .whole_secs(self.time_ticks.saturating_sub(self.level_start_tick))
    }

    /// Whole seconds played in the current game
    pub fn game_elapsed_secs(&self) -> u64 {
        self.config
            .whole_secs(self.time_ticks.saturating_sub(self.game_start_tick))
    }

    /// Visible destructible bricks left on the field
    pub fn remaining_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| b.counts_for_clear()).count()
    }

    /// React to the brick at `index` having just been destroyed by a ball
    pub fn on_brick_destroyed(&mut self, index: usize) {
        let mut fallen = vec![index];
        fallen.extend(explosion_chain(&mut self.bricks, index));
        for i in fallen {
            self.brick_destroyed_effects(i);
        }
    }

    fn brick_destroyed_effects(&mut self, index: usize) {
        let brick = &self.bricks[index];
        let (center, kind) = (brick.center(), brick.kind);

        if self.settings.particles {
            let burst = Particle::burst(center, kind.base_color(), &mut self.rng);
            self.particles.extend(burst);
            if self.particles.len() > MAX_PARTICLES {
                let excess = self.particles.len() - MAX_PARTICLES;
                self.particles.drain(..excess);
            }
        }

        if self.rng.random_bool(POWER_UP_DROP_CHANCE) {
            let drop = PowerUpKind::random(&mut self.rng);
            self.power_ups
                .push(PowerUp::spawn_from(&self.bricks[index], drop));
        }

        let points = BRICK_SCORE * self.combo as u64;
        self.score += points;
        self.combo += 1;
        self.combo_ticks = self.config.ticks(COMBO_WINDOW_SECS);
        log::debug!("{} brick destroyed for {} points", kind.as_str(), points);
        self.events.push(GameEvent::BrickDestroyed { kind, points });
    }

    /// Note a collected power-up without applying it
    pub fn record_power_up(&mut self, kind: PowerUpKind) {
        log::debug!("Collected power-up: {}", kind.label());
        self.events.push(GameEvent::PowerUpCollected(kind));
    }

    /// Collect a power-up and apply its effect
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        self.record_power_up(kind);
        match kind {
            PowerUpKind::MultiBall => self.split_balls(),
            PowerUpKind::PaddleSize | PowerUpKind::SpeedBoost => {
                let ticks = self.config.ticks(POWER_UP_DURATION_SECS);
                self.paddle.apply_power_up(kind, ticks);
            }
            // Collectible only
            PowerUpKind::Laser => {}
            PowerUpKind::Life => self.lives += 1,
        }
    }

    /// Replace every ball with two fresh balls at its position
    pub fn split_balls(&mut self) {
        self.balls = self
            .balls
            .iter()
            .flat_map(|b| [Ball::new(b.pos), Ball::new(b.pos)])
            .collect();
    }

    pub fn spawn_center_ball(&mut self) {
        self.balls.push(Ball::new(Self::stage_center(&self.config)));
    }

    /// Drop balls below the stage; lose a life when none remain
    pub fn handle_lost_balls(&mut self) {
        let floor = self.config.stage_height;
        self.balls.retain(|b| b.pos.y < floor);
        if !self.balls.is_empty() {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        log::info!("Ball lost, {} lives left", self.lives);

        if self.lives == 0 {
            self.game_over();
        } else {
            self.spawn_center_ball();
        }
    }

    /// Finish the level if no destructible brick remains
    pub fn check_level_clear(&mut self) {
        if self.phase == GamePhase::Playing && self.remaining_bricks() == 0 {
            self.level_complete();
        }
    }

    fn level_complete(&mut self) {
        let elapsed_secs = self.level_elapsed_secs();
        let bonus = LEVEL_TIME_BUDGET_SECS.saturating_sub(elapsed_secs) * TIME_BONUS_PER_SEC;
        let summary = LevelSummary {
            level: self.level,
            score: self.score,
            combo: self.combo,
            elapsed_secs,
            bonus,
        };
        self.score += bonus;
        self.phase = GamePhase::LevelComplete;
        self.last_level_summary = Some(summary);
        self.events.push(GameEvent::LevelComplete(summary));
        log::info!(
            "Level {} complete in {}s, bonus {}",
            self.level,
            elapsed_secs,
            bonus
        );
    }

    fn game_over(&mut self) {
        let summary = GameOverSummary {
            score: self.score,
            level: self.level,
            elapsed_secs: self.game_elapsed_secs(),
        };
        self.phase = GamePhase::GameOver;
        self.session_over = true;
        self.last_game_over = Some(summary);
        self.events.push(GameEvent::GameOver(summary));
        log::info!(
            "Game over: score {} on level {}",
            summary.score,
            summary.level
        );
    }

    fn reset_session(&mut self) {
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.level = 1;
        self.combo = 1;
        self.combo_ticks = 0;
        self.session_over = false;
        self.resume_phase = GamePhase::Playing;
        self.game_start_tick = self.time_ticks;
        self.level_start_tick = self.time_ticks;
        self.last_level_summary = None;
        self.last_game_over = None;
        self.reset_field();
    }

    /// Fresh ball, paddle and bricks for the current level
    fn reset_field(&mut self) {
        self.balls = vec![Ball::new(Self::stage_center(&self.config))];
        self.paddle = Paddle::new(self.config.stage_width, self.config.stage_height);
        self.power_ups.clear();
        self.particles.clear();
        self.bricks = generate_level(self.level, self.settings.difficulty, &mut self.rng);
    }

    /// Draw the whole scene, back to front
    pub fn draw(&self, target: &mut impl DrawTarget) {
        let (w, h) = (self.config.stage_width, self.config.stage_height);
        let mut x = 0.0;
        while x < w {
            target.line(Vec2::new(x, 0.0), Vec2::new(x, h), 1.0, colors::GRID);
            x += GRID_SPACING;
        }
        let mut y = 0.0;
        while y < h {
            target.line(Vec2::new(0.0, y), Vec2::new(w, y), 1.0, colors::GRID);
            y += GRID_SPACING;
        }

        for brick in &self.bricks {
            brick.draw(target);
        }
        for power_up in &self.power_ups {
            power_up.draw(target);
        }
        for particle in &self.particles {
            particle.draw(target);
        }
        for ball in &self.balls {
            ball.draw(target);
        }
        self.paddle.draw(target);
    }
}
