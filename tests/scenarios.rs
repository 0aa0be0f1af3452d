//! End-to-end gameplay scenarios through the public API

use rand::SeedableRng;
use rand_pcg::Pcg32;

use worm_arena::consts::GROWTH_RATE;
use worm_arena::error::RenderError;
use worm_arena::platform::Key;
use worm_arena::renderer::{RenderSnapshot, Renderer};
use worm_arena::sim::{
    Food, FoodKind, GameEvent, GamePhase, GameState, InputState, Rect, Vector2D, Worm, WormConfig,
    tick,
};
use worm_arena::{BoundaryPolicy, Game, Settings};

struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &RenderSnapshot) -> Result<(), RenderError> {
        Ok(())
    }
}

#[test]
fn worm_travels_at_configured_speed() {
    let config = WormConfig {
        speed: 100.0,
        ..WormConfig::default()
    };
    let mut worm = Worm::new(Vector2D::new(100.0, 100.0), config);
    assert_eq!(worm.len(), 5);

    worm.update(1000.0);

    let head = worm.head();
    assert!((head.x - 200.0).abs() < 1e-6, "head.x = {}", head.x);
    assert!((head.y - 100.0).abs() < 1e-6, "head.y = {}", head.y);
    assert!(worm.is_alive());
}

#[test]
fn spawn_in_saturated_arena_terminates() {
    let bounds = Rect::from_size(40.0, 40.0);
    // Occupied points everywhere: no sample can ever get radius * 4 clearance
    let mut existing = Vec::new();
    for x in (0..=40).step_by(5) {
        for y in (0..=40).step_by(5) {
            existing.push(Vector2D::new(x as f64, y as f64));
        }
    }

    let mut rng = Pcg32::seed_from_u64(7);
    for id in 0..50 {
        let mut food = Food::new(id, FoodKind::Normal);
        food.spawn(&mut rng, &bounds, &existing);
        assert!(food.is_active());
        assert!(bounds.contains(food.position()));
        existing.push(food.position());
    }
}

#[test]
fn tight_loop_kills_long_worm() {
    let mut worm = Worm::new(Vector2D::new(400.0, 300.0), WormConfig::default());
    for _ in 0..5 {
        worm.grow();
    }
    assert!(worm.len() >= 5 + 10);

    let turns = [
        (10, Vector2D::DOWN),
        (20, Vector2D::LEFT),
        (30, Vector2D::UP),
        (40, Vector2D::RIGHT),
    ];
    let mut died_at = None;
    for step in 0..50 {
        if let Some((_, direction)) = turns.iter().find(|(at, _)| *at == step) {
            assert!(worm.turn(*direction));
        }
        worm.update(50.0);
        if !worm.is_alive() {
            died_at = Some(step);
            break;
        }
    }

    let died_at = died_at.expect("worm should run into its own body");
    assert!(died_at > 20, "died too early at tick {died_at}");
}

#[test]
fn eating_normal_food_scores_and_grows() {
    let mut state = GameState::new(&Settings::default());
    let mut events = Vec::new();
    let right = InputState {
        right: true,
        ..Default::default()
    };
    tick(&mut state, &right, 16.0, &mut events);
    assert_eq!(state.phase, GamePhase::Playing);

    state.food.clear();
    let mut food = Food::new(0, FoodKind::Normal);
    food.spawn_at(state.worm.head() + Vector2D::new(4.0, 0.0));
    let id = state.food.insert(food).expect("arena has room");

    let score = state.score;
    let length = state.worm.len();
    tick(&mut state, &InputState::default(), 16.0, &mut events);

    assert_eq!(state.score, score + 10);
    assert_eq!(state.worm.len(), length + GROWTH_RATE);
    assert!(state.food.get(id).is_none_or(|f| !f.is_active()));
    assert!(events.iter().any(|e| matches!(e, GameEvent::FoodEaten { value: 10, .. })));
}

#[test]
fn phase_flow_through_keyboard() {
    let mut game = Game::new(Settings::default());
    let mut renderer = NullRenderer;
    let mut now = 0.0;
    let mut frame = |game: &mut Game| {
        now += 1000.0 / 60.0;
        game.frame(now, &mut renderer);
    };

    frame(&mut game);
    assert_eq!(game.phase(), GamePhase::Menu);

    game.key_event("KeyD", true);
    frame(&mut game);
    assert_eq!(game.phase(), GamePhase::Playing);

    // Space is edge-triggered: holding it pauses once
    game.key_down(Key::Space);
    frame(&mut game);
    frame(&mut game);
    assert_eq!(game.phase(), GamePhase::Paused);
    game.key_up(Key::Space);
    frame(&mut game);
    game.key_down(Key::Space);
    frame(&mut game);
    assert_eq!(game.phase(), GamePhase::Playing);
    game.key_up(Key::Space);

    let mut frames = 0;
    while game.phase() != GamePhase::GameOver && frames < 5000 {
        frame(&mut game);
        frames += 1;
    }
    assert_eq!(game.phase(), GamePhase::GameOver);

    // Nothing but reset leaves GameOver
    game.key_down(Key::Space);
    frame(&mut game);
    assert_eq!(game.phase(), GamePhase::GameOver);

    game.key_down(Key::R);
    frame(&mut game);
    assert_eq!(game.phase(), GamePhase::Playing);
    assert_eq!(game.state().score, 0);
    assert!(game.events().contains(&GameEvent::Reset));
}

#[test]
fn wrap_policy_keeps_worm_in_arena() {
    let settings = Settings::with_policy(BoundaryPolicy::Wrap);
    let mut game = Game::new(settings);
    let mut renderer = NullRenderer;
    game.key_down(Key::ArrowUp);

    for i in 0..600 {
        game.frame(i as f64 * 1000.0 / 60.0, &mut renderer);
    }

    assert_eq!(game.phase(), GamePhase::Playing);
    assert!(game.state().bounds.contains(game.state().worm.head()));
}

#[test]
fn out_of_range_settings_still_play() {
    let settings: Settings = serde_json::from_str(
        r#"{ "max_frame_delta_ms": -1.0, "worm": { "turning_speed": -5.0, "speed": -10.0 } }"#,
    )
    .expect("valid json");
    let mut game = Game::new(settings);
    let mut renderer = NullRenderer;

    game.key_down(Key::ArrowRight);
    game.frame(0.0, &mut renderer);
    game.frame(16.0, &mut renderer);
    game.key_up(Key::ArrowRight);
    game.key_down(Key::ArrowDown);
    for i in 2..10 {
        game.frame(i as f64 * 16.0, &mut renderer);
    }

    assert_eq!(game.phase(), GamePhase::Playing);
    assert!(game.settings().max_frame_delta_ms > 0.0);
    assert_eq!(game.state().worm.config().turning_speed, 0.0);
    assert_eq!(game.state().worm.direction(), Vector2D::RIGHT);
    assert!(game.fault().is_none());
}
