//! Game entities: ball, paddle, bricks, power-ups and particles
//!
//! Per-kind behavior lives in small lookup methods on [`BrickKind`] and
//! [`PowerUpKind`] so adding a variant is a compile-checked change.

use glam::Vec2;
use rand::Rng;

use super::aabb::Aabb;
use crate::consts::*;
use crate::renderer::{DrawTarget, Rgba, colors, with_alpha};

/// Remaining-hit markers on multi-hit bricks
const HIT_PIP_RADIUS: f32 = 2.5;
const HIT_PIP_SPACING: f32 = 8.0;
/// Stroke width of power-up glyphs
const ICON_LINE_WIDTH: f32 = 2.0;

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Nominal speed used for paddle bounces and launches
    pub speed: f32,
    /// Curve applied to horizontal velocity; decays every tick
    pub spin: f32,
    pub max_speed: f32,
}

impl Ball {
    /// New ball heading up and to the right
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(BALL_SPEED, -BALL_SPEED),
            radius: BALL_RADIUS,
            speed: BALL_SPEED,
            spin: 0.0,
            max_speed: BALL_MAX_SPEED,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::around_circle(self.pos, self.radius)
    }

    /// Move, apply spin, then cap speed
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.x += self.spin * SPIN_INFLUENCE;
        self.spin *= SPIN_DECAY;
        self.clamp_speed();
    }

    /// Rescale velocity down to `max_speed`, keeping direction
    pub fn clamp_speed(&mut self) {
        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        }
    }

    pub fn draw(&self, target: &mut impl DrawTarget) {
        target.fill_circle(self.pos, self.radius, colors::BALL);
        if self.spin.abs() > 0.1 {
            target.stroke_circle(self.pos, self.radius + 3.0, 2.0, colors::BALL_SPIN);
        }
    }
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Movement per tick while a direction key is held
    pub speed: f32,
    /// Current horizontal velocity (-speed, 0 or +speed)
    pub dx: f32,
    /// Active paddle power-up, if any
    pub power_up: Option<PowerUpKind>,
    /// Ticks until the power-up wears off
    pub power_up_ticks: u32,
}

impl Paddle {
    /// Centered near the bottom of the stage
    pub fn new(stage_width: f32, stage_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                stage_width / 2.0 - PADDLE_WIDTH / 2.0,
                stage_height - PADDLE_BOTTOM_OFFSET,
            ),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            dx: 0.0,
            power_up: None,
            power_up_ticks: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Set movement direction: negative is left, positive right, zero stops
    pub fn set_direction(&mut self, dir: f32) {
        self.dx = if dir == 0.0 { 0.0 } else { dir.signum() * self.speed };
    }

    /// Move, clamp to the stage and count down any active power-up
    pub fn update(&mut self, stage_width: f32) {
        self.pos.x = (self.pos.x + self.dx).clamp(0.0, (stage_width - self.width).max(0.0));

        if self.power_up.is_some() {
            self.power_up_ticks = self.power_up_ticks.saturating_sub(1);
            if self.power_up_ticks == 0 {
                self.remove_power_up();
            }
        }
    }

    /// Apply a paddle power-up and restart the timer
    ///
    /// The new kind becomes the tracked one, but the effect of an earlier kind
    /// stays until the shared timer runs out and `remove_power_up` reverts
    /// both width and speed. Only paddle-size and speed-boost change the
    /// paddle itself; other kinds are ignored here.
    pub fn apply_power_up(&mut self, kind: PowerUpKind, duration_ticks: u32) {
        match kind {
            PowerUpKind::PaddleSize => self.width = PADDLE_WIDE_WIDTH,
            PowerUpKind::SpeedBoost => self.speed = PADDLE_BOOST_SPEED,
            _ => return,
        }
        self.power_up = Some(kind);
        self.power_up_ticks = duration_ticks;
    }

    /// Revert width and speed to their defaults
    pub fn remove_power_up(&mut self) {
        self.width = PADDLE_WIDTH;
        self.speed = PADDLE_SPEED;
        self.power_up = None;
        self.power_up_ticks = 0;
        if self.dx != 0.0 {
            self.dx = self.dx.signum() * self.speed;
        }
    }

    /// Label of the active power-up for the HUD
    pub fn label(&self) -> Option<&'static str> {
        self.power_up.map(|k| k.label())
    }

    pub fn draw(&self, target: &mut impl DrawTarget) {
        target.fill_rect(self.bounds(), colors::PADDLE);
        if self.power_up.is_some() {
            let b = self.bounds();
            let glow = Aabb::new(b.min.x - 2.0, b.min.y - 2.0, b.size.x + 4.0, b.size.y + 4.0);
            target.stroke_rect(glow, 3.0, colors::PADDLE_POWERED);
        }
    }
}

/// Brick variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrickKind {
    Normal,
    /// Takes two hits
    Strong,
    /// Cannot be destroyed; not counted for level completion
    Indestructible,
    /// Destroys destructible neighbours within [`EXPLOSION_RADIUS`]
    Explosive,
    /// Slides horizontally, reversing at the stage edges
    Moving,
}

impl BrickKind {
    pub const ALL: [BrickKind; 5] = [
        BrickKind::Normal,
        BrickKind::Strong,
        BrickKind::Indestructible,
        BrickKind::Explosive,
        BrickKind::Moving,
    ];

    /// Hits needed to destroy (effectively unbounded for indestructible)
    pub fn max_hits(&self) -> u32 {
        match self {
            BrickKind::Strong => 2,
            BrickKind::Indestructible => u32::MAX,
            _ => 1,
        }
    }

    pub fn base_color(&self) -> Rgba {
        match self {
            BrickKind::Normal => colors::BRICK_NORMAL,
            BrickKind::Strong => colors::BRICK_STRONG,
            BrickKind::Indestructible => colors::BRICK_INDESTRUCTIBLE,
            BrickKind::Explosive => colors::BRICK_EXPLOSIVE,
            BrickKind::Moving => colors::BRICK_MOVING,
        }
    }

    pub fn is_destructible(&self) -> bool {
        !matches!(self, BrickKind::Indestructible)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BrickKind::Normal => "normal",
            BrickKind::Strong => "strong",
            BrickKind::Indestructible => "indestructible",
            BrickKind::Explosive => "explosive",
            BrickKind::Moving => "moving",
        }
    }
}

/// A brick in the level grid
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: BrickKind,
    pub hits: u32,
    pub max_hits: u32,
    pub visible: bool,
    /// +1 moving right, -1 moving left (moving bricks only)
    pub move_dir: f32,
}

impl Brick {
    pub fn new(x: f32, y: f32, kind: BrickKind) -> Self {
        let max_hits = kind.max_hits();
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(BRICK_WIDTH, BRICK_HEIGHT),
            kind,
            hits: max_hits,
            max_hits,
            visible: true,
            move_dir: 1.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Visible and destructible
    pub fn counts_for_clear(&self) -> bool {
        self.visible && self.kind.is_destructible()
    }

    /// Draw color; destructible bricks fade with remaining hits
    pub fn color(&self) -> Rgba {
        let base = self.kind.base_color();
        if self.kind.is_destructible() && self.max_hits > 0 {
            with_alpha(base, self.hits as f32 / self.max_hits as f32)
        } else {
            base
        }
    }

    /// Slide moving bricks back and forth
    pub fn update(&mut self, stage_width: f32) {
        if self.kind != BrickKind::Moving || !self.visible {
            return;
        }
        self.pos.x += MOVING_BRICK_SPEED * self.move_dir;
        if self.pos.x <= 0.0 || self.pos.x + self.size.x >= stage_width {
            self.move_dir = -self.move_dir;
        }
    }

    /// Register one hit; returns true when this hit destroyed the brick
    pub fn hit(&mut self) -> bool {
        if !self.kind.is_destructible() || !self.visible {
            return false;
        }
        self.hits = self.hits.saturating_sub(1);
        if self.hits == 0 {
            self.visible = false;
            return true;
        }
        false
    }

    /// Destroy outright regardless of remaining hits (explosions)
    ///
    /// Returns false for indestructible or already-destroyed bricks.
    pub fn destroy(&mut self) -> bool {
        if !self.kind.is_destructible() || !self.visible {
            return false;
        }
        self.hits = 0;
        self.visible = false;
        true
    }

    pub fn draw(&self, target: &mut impl DrawTarget) {
        if !self.visible {
            return;
        }
        target.fill_rect(self.bounds(), self.color());
        target.stroke_rect(self.bounds(), 1.0, colors::BRICK_OUTLINE);

        // One pip per remaining hit on bricks that take several
        if self.kind.is_destructible() && self.hits > 1 {
            let center = self.center();
            let first = center.x - (self.hits - 1) as f32 * HIT_PIP_SPACING / 2.0;
            for i in 0..self.hits {
                let x = first + i as f32 * HIT_PIP_SPACING;
                target.fill_circle(Vec2::new(x, center.y), HIT_PIP_RADIUS, colors::ICON);
            }
        }
    }
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Every ball splits into two
    MultiBall,
    /// Wider paddle for a while
    PaddleSize,
    /// Faster paddle for a while
    SpeedBoost,
    /// Collectible with no gameplay effect yet
    Laser,
    /// Extra life
    Life,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::MultiBall,
        PowerUpKind::PaddleSize,
        PowerUpKind::SpeedBoost,
        PowerUpKind::Laser,
        PowerUpKind::Life,
    ];

    /// Uniform pick over all kinds
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn color(&self) -> Rgba {
        match self {
            PowerUpKind::MultiBall => colors::POWER_UP_MULTI_BALL,
            PowerUpKind::PaddleSize => colors::POWER_UP_PADDLE_SIZE,
            PowerUpKind::SpeedBoost => colors::POWER_UP_SPEED_BOOST,
            PowerUpKind::Laser => colors::POWER_UP_LASER,
            PowerUpKind::Life => colors::POWER_UP_LIFE,
        }
    }

    /// Glyph shown by text-capable front ends
    /// Draw the capsule glyph centered on `c`, fitting a 12 px box
    pub fn draw_icon(&self, c: Vec2, target: &mut impl DrawTarget) {
        let w = ICON_LINE_WIDTH;
        match self {
            PowerUpKind::MultiBall => target.fill_circle(c, 4.0, colors::ICON),
            PowerUpKind::PaddleSize => {
                target.line(c - Vec2::new(6.0, 0.0), c + Vec2::new(6.0, 0.0), w, colors::ICON);
                for side in [-1.0, 1.0] {
                    let tip = c + Vec2::new(6.0 * side, 0.0);
                    let back = c + Vec2::new(3.0 * side, 0.0);
                    target.line(tip, back + Vec2::new(0.0, -3.0), w, colors::ICON);
                    target.line(tip, back + Vec2::new(0.0, 3.0), w, colors::ICON);
                }
            }
            PowerUpKind::SpeedBoost | PowerUpKind::Laser => {
                let bolt = [
                    c + Vec2::new(2.0, -6.0),
                    c + Vec2::new(-3.0, 1.0),
                    c + Vec2::new(3.0, -1.0),
                    c + Vec2::new(-2.0, 6.0),
                ];
                for pair in bolt.windows(2) {
                    target.line(pair[0], pair[1], w, colors::ICON);
                }
            }
            PowerUpKind::Life => {
                target.fill_circle(c + Vec2::new(-2.5, -1.5), 3.0, colors::ICON);
                target.fill_circle(c + Vec2::new(2.5, -1.5), 3.0, colors::ICON);
                target.line(c + Vec2::new(-5.0, 0.0), c + Vec2::new(0.0, 5.0), w, colors::ICON);
                target.line(c + Vec2::new(5.0, 0.0), c + Vec2::new(0.0, 5.0), w, colors::ICON);
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::MultiBall => "multi-ball",
            PowerUpKind::PaddleSize => "paddle-size",
            PowerUpKind::SpeedBoost => "speed-boost",
            PowerUpKind::Laser => "laser",
            PowerUpKind::Life => "life",
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub kind: PowerUpKind,
    /// Cleared when collected
    pub active: bool,
}

impl PowerUp {
    /// Spawned centered horizontally on the brick's bottom edge
    pub fn spawn_from(brick: &Brick, kind: PowerUpKind) -> Self {
        Self::new(brick.pos.x + brick.size.x / 2.0, brick.pos.y + brick.size.y, kind)
    }

    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: POWER_UP_SIZE,
            kind,
            active: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    pub fn update(&mut self) {
        self.pos.y += POWER_UP_FALL_SPEED;
    }

    pub fn draw(&self, target: &mut impl DrawTarget) {
        if !self.active {
            return;
        }
        target.fill_rect(self.bounds(), self.kind.color());
        target.stroke_rect(self.bounds(), 1.0, colors::BRICK_OUTLINE);
        self.kind.draw_icon(self.bounds().center(), target);
    }
}

/// Short-lived debris particle (visual only)
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    pub life: u32,
    pub max_life: u32,
    pub size: f32,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, color: Rgba, rng: &mut R) -> Self {
        let spread = PARTICLE_MAX_SPEED * 2.0;
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * spread,
                (rng.random::<f32>() - 0.5) * spread,
            ),
            color,
            life: PARTICLE_LIFE_TICKS,
            max_life: PARTICLE_LIFE_TICKS,
            size: rng.random::<f32>() * 3.0 + 1.0,
        }
    }

    /// A burst of particles at `center`
    pub fn burst<R: Rng + ?Sized>(center: Vec2, color: Rgba, rng: &mut R) -> Vec<Self> {
        (0..PARTICLES_PER_BRICK)
            .map(|_| Self::new(center, color, &mut *rng))
            .collect()
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += PARTICLE_GRAVITY;
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }

    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            return 0.0;
        }
        self.life as f32 / self.max_life as f32
    }

    pub fn draw(&self, target: &mut impl DrawTarget) {
        target.fill_circle(self.pos, self.size, with_alpha(self.color, self.alpha()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Counts draw calls by shape
    #[derive(Default)]
    struct Tally {
        rects: usize,
        circles: usize,
        lines: usize,
    }

    impl DrawTarget for Tally {
        fn fill_rect(&mut self, _: Aabb, _: Rgba) {
            self.rects += 1;
        }
        fn stroke_rect(&mut self, _: Aabb, _: f32, _: Rgba) {
            self.rects += 1;
        }
        fn fill_circle(&mut self, _: Vec2, _: f32, _: Rgba) {
            self.circles += 1;
        }
        fn stroke_circle(&mut self, _: Vec2, _: f32, _: f32, _: Rgba) {
            self.circles += 1;
        }
        fn line(&mut self, _: Vec2, _: Vec2, _: f32, _: Rgba) {
            self.lines += 1;
        }
    }

    #[test]
    fn test_ball_speed_is_capped() {
        let mut ball = Ball::new(Vec2::new(400.0, 300.0));
        ball.vel = Vec2::new(30.0, -40.0);
        ball.update();
        assert_relative_eq!(ball.vel.length(), BALL_MAX_SPEED, epsilon = 1e-4);
    }

    #[test]
    fn test_ball_spin_curves_and_decays() {
        let mut ball = Ball::new(Vec2::new(400.0, 300.0));
        ball.spin = 1.0;
        ball.update();
        assert_relative_eq!(ball.vel.x, BALL_SPEED + 0.01);
        assert_relative_eq!(ball.spin, 0.98);
    }

    #[test]
    fn test_paddle_clamped_to_stage() {
        let mut paddle = Paddle::new(800.0, 600.0);
        assert_eq!(paddle.pos, Vec2::new(350.0, 570.0));

        paddle.set_direction(-1.0);
        for _ in 0..100 {
            paddle.update(800.0);
        }
        assert_eq!(paddle.pos.x, 0.0);

        paddle.set_direction(1.0);
        for _ in 0..200 {
            paddle.update(800.0);
        }
        assert_eq!(paddle.pos.x, 800.0 - paddle.width);
    }

    #[test]
    fn test_paddle_power_up_expires() {
        let mut paddle = Paddle::new(800.0, 600.0);
        paddle.apply_power_up(PowerUpKind::PaddleSize, 3);
        assert_eq!(paddle.width, PADDLE_WIDE_WIDTH);
        assert_eq!(paddle.label(), Some("paddle-size"));

        // Label and timer follow the newest kind; the wide paddle stays
        paddle.apply_power_up(PowerUpKind::SpeedBoost, 3);
        assert_eq!(paddle.speed, PADDLE_BOOST_SPEED);
        assert_eq!(paddle.width, PADDLE_WIDE_WIDTH);
        assert_eq!(paddle.label(), Some("speed-boost"));

        for _ in 0..3 {
            paddle.update(800.0);
        }
        assert_eq!(paddle.power_up, None);
        assert_eq!(paddle.width, PADDLE_WIDTH);
        assert_eq!(paddle.speed, PADDLE_SPEED);
    }

    #[test]
    fn test_paddle_ignores_non_paddle_power_ups() {
        let mut paddle = Paddle::new(800.0, 600.0);
        paddle.apply_power_up(PowerUpKind::Laser, 300);
        assert_eq!(paddle.power_up, None);
    }

    #[test]
    fn test_strong_brick_takes_two_hits() {
        let mut brick = Brick::new(0.0, 0.0, BrickKind::Strong);
        assert!(!brick.hit());
        assert!(brick.visible);
        assert_relative_eq!(brick.color()[3], 0.5);
        assert!(brick.hit());
        assert!(!brick.visible);
        assert!(!brick.hit());
    }

    #[test]
    fn test_strong_brick_shows_remaining_hits() {
        let mut brick = Brick::new(0.0, 0.0, BrickKind::Strong);
        let mut tally = Tally::default();
        brick.draw(&mut tally);
        assert_eq!(tally.circles, 2);

        brick.hit();
        let mut tally = Tally::default();
        brick.draw(&mut tally);
        assert_eq!((tally.rects, tally.circles), (2, 0));

        let mut tally = Tally::default();
        Brick::new(0.0, 0.0, BrickKind::Indestructible).draw(&mut tally);
        assert_eq!(tally.circles, 0);
    }

    #[test]
    fn test_every_power_up_draws_a_glyph() {
        for kind in PowerUpKind::ALL {
            let mut tally = Tally::default();
            PowerUp::new(0.0, 0.0, kind).draw(&mut tally);
            assert_eq!(tally.rects, 2);
            assert!(tally.circles + tally.lines > 0, "{kind:?} has no glyph");
        }

        let mut tally = Tally::default();
        let mut collected = PowerUp::new(0.0, 0.0, PowerUpKind::Life);
        collected.active = false;
        collected.draw(&mut tally);
        assert_eq!(tally.rects + tally.circles + tally.lines, 0);
    }

    #[test]
    fn test_indestructible_brick_survives() {
        let mut brick = Brick::new(0.0, 0.0, BrickKind::Indestructible);
        for _ in 0..10 {
            assert!(!brick.hit());
        }
        assert!(!brick.destroy());
        assert!(brick.visible);
        assert!(!brick.counts_for_clear());
        assert_relative_eq!(brick.color()[3], 0.8);
    }

    #[test]
    fn test_moving_brick_reverses_at_edges() {
        let mut brick = Brick::new(728.0, 60.0, BrickKind::Moving);
        brick.update(800.0);
        assert_eq!(brick.pos.x, 729.0);
        brick.update(800.0);
        assert_eq!(brick.pos.x, 730.0);
        assert_eq!(brick.move_dir, -1.0);
        brick.update(800.0);
        assert_eq!(brick.pos.x, 729.0);
    }

    #[test]
    fn test_power_up_spawn_position() {
        let brick = Brick::new(45.0, 60.0, BrickKind::Normal);
        let p = PowerUp::spawn_from(&brick, PowerUpKind::Life);
        assert_eq!(p.pos, Vec2::new(80.0, 80.0));
        assert_eq!(PowerUpKind::MultiBall.label(), "multi-ball");
    }

    #[test]
    fn test_particles_fade_out() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut burst = Particle::burst(Vec2::ZERO, colors::BALL, &mut rng);
        assert_eq!(burst.len(), PARTICLES_PER_BRICK);
        for p in &burst {
            assert!(p.vel.x.abs() <= PARTICLE_MAX_SPEED);
            assert!((1.0..4.0).contains(&p.size));
        }

        let p = &mut burst[0];
        let vy = p.vel.y;
        p.update();
        assert_relative_eq!(p.vel.y, vy + PARTICLE_GRAVITY);
        for _ in 1..PARTICLE_LIFE_TICKS {
            p.update();
        }
        assert!(!p.is_alive());
        assert_eq!(p.alpha(), 0.0);
    }
}
