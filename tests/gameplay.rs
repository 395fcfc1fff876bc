//! Headless sessions through the public API

use bounce_breaker::highscores::HighScoreEntry;
use bounce_breaker::persistence::{KeyValueStore, MemoryStore};
use bounce_breaker::sim::{
    Brick, BrickKind, GameEvent, GamePhase, GameState, TickInput, generate_level, tick,
};
use bounce_breaker::{Difficulty, GameConfig, HighScores, Settings};
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn autopilot() -> TickInput {
    TickInput {
        autopilot: true,
        ..Default::default()
    }
}

fn new_game(seed: u64) -> GameState {
    let mut state = GameState::new(GameConfig::default(), Settings::default(), seed);
    state.start();
    state
}

#[test]
fn full_session_reaches_a_terminal_phase_or_scores() {
    let mut state = new_game(2024);
    let mut destroyed = 0;

    for _ in 0..20_000 {
        tick(&mut state, &autopilot());
        destroyed += state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BrickDestroyed { .. }))
            .count();
        match state.phase {
            GamePhase::LevelComplete => {
                assert!(state.next_level());
            }
            GamePhase::GameOver => break,
            _ => {}
        }
    }

    assert!(destroyed > 0);
    assert!(state.score >= destroyed as u64 * 10);
    for ball in &state.balls {
        assert!(ball.vel.length() <= ball.max_speed + 1e-3);
    }
}

#[test]
fn losing_every_life_ends_the_game() {
    let mut state = new_game(7);
    state.bricks = vec![Brick::new(0.0, -500.0, BrickKind::Normal)];

    let mut lives_seen = Vec::new();
    for _ in 0..3 {
        for ball in &mut state.balls {
            ball.pos = Vec2::new(400.0, 650.0);
        }
        tick(&mut state, &TickInput::default());
        for event in state.drain_events() {
            if let GameEvent::LifeLost { lives_left } = event {
                lives_seen.push(lives_left);
            }
        }
    }

    assert_eq!(lives_seen, vec![2, 1, 0]);
    assert_eq!(state.phase, GamePhase::GameOver);
    let summary = state.last_game_over.expect("game over summary");

    // Frozen after game over
    let ticks = state.time_ticks;
    tick(&mut state, &TickInput::default());
    assert_eq!(state.time_ticks, ticks);

    let mut store = MemoryStore::new();
    let mut scores = HighScores::load(&store);
    let rank = scores.add(HighScoreEntry::new(
        "",
        summary.score,
        summary.level,
        summary.elapsed_secs,
        "1/1/2026",
    ));
    assert_eq!(rank, Some(1));
    scores.save(&mut store).unwrap();

    let reloaded = HighScores::load(&store);
    assert_eq!(reloaded.entries[0].name, "Anonymous");
}

#[test]
fn explosive_brick_clears_its_neighbourhood() {
    let mut state = new_game(11);
    state.bricks = vec![
        Brick::new(380.0, 290.0, BrickKind::Explosive),
        Brick::new(460.0, 290.0, BrickKind::Normal),
        Brick::new(380.0, 320.0, BrickKind::Strong),
        Brick::new(300.0, 290.0, BrickKind::Indestructible),
        Brick::new(620.0, 290.0, BrickKind::Normal),
    ];

    tick(&mut state, &TickInput::default());

    assert!(!state.bricks[0].visible);
    assert!(!state.bricks[1].visible);
    assert!(!state.bricks[2].visible);
    assert!(state.bricks[3].visible);
    assert!(state.bricks[4].visible);
    // Combo 1, 2, 3
    assert_eq!(state.score, 10 + 20 + 30);
    assert_eq!(state.remaining_bricks(), 1);
}

#[test]
fn menu_round_trips_do_not_repeat_a_level_clear() {
    let mut state = new_game(5);
    state.bricks.clear();
    tick(&mut state, &TickInput::default());
    assert_eq!(state.phase, GamePhase::LevelComplete);
    let score = state.score;
    state.drain_events();

    for _ in 0..5 {
        state.quit_to_menu();
        state.start();
        tick(&mut state, &TickInput::default());
    }

    let completions = state
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::LevelComplete(_)))
        .count();
    assert_eq!(completions, 0);
    assert_eq!(state.score, score);
    assert_eq!(state.level, 1);
    assert!(state.next_level());
    assert_eq!(state.level, 2);
}

#[test]
fn difficulty_setting_feeds_the_generator() {
    let mut state = new_game(3);
    state.set_settings(Settings {
        difficulty: Difficulty::Expert,
        ..Default::default()
    });
    state.bricks.clear();
    tick(&mut state, &TickInput::default());
    assert_eq!(state.phase, GamePhase::LevelComplete);
    assert!(state.next_level());
    assert_eq!(state.level, 2);
    assert_eq!(state.bricks.len(), 45);

    let mut rng = Pcg32::seed_from_u64(3);
    let expert = generate_level(20, Difficulty::Expert, &mut rng);
    let special = expert.iter().filter(|b| b.kind != BrickKind::Normal).count();
    assert!(special > 0);
}

#[test]
fn settings_survive_a_reload() {
    let mut store = MemoryStore::new();
    let settings = Settings {
        sound: false,
        particles: false,
        difficulty: Difficulty::Hard,
        ..Default::default()
    };
    settings.save(&mut store).unwrap();
    assert!(store.get(Settings::STORAGE_KEY).is_some());
    assert_eq!(Settings::load(&store), settings);
}
