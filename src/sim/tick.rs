//! Per-frame simulation step
//!
//! `tick` owns the phase transition table:
//!
//! | From                      | Trigger                  | To       |
//! |---------------------------|--------------------------|----------|
//! | Menu                      | any directional input    | Playing  |
//! | Playing                   | space                    | Paused   |
//! | Paused                    | space                    | Playing  |
//! | Playing                   | self-collision / wall    | GameOver |
//! | Playing, Paused, GameOver | reset                    | Playing  |

use serde::{Deserialize, Serialize};

use super::state::{DeathCause, FLASH_DURATION_MS, GameEvent, GamePhase, GameState};
use super::vector::Vector2D;
use crate::consts::DEBUG_SPEED_MULTIPLIER;
use crate::settings::BoundaryPolicy;

/// Input snapshot for a single tick
///
/// Directions are held state; `space`, `reset` and `debug_speed` are
/// one-tick pulses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pause toggle
    pub space: bool,
    pub reset: bool,
    /// Toggle double worm speed
    pub debug_speed: bool,
}

impl InputState {
    /// Sum of the held directions, normalized
    ///
    /// Opposite directions cancel; two orthogonal ones give a diagonal.
    pub fn direction(&self) -> Vector2D {
        let mut sum = Vector2D::ZERO;
        if self.up {
            sum += Vector2D::UP;
        }
        if self.down {
            sum += Vector2D::DOWN;
        }
        if self.left {
            sum += Vector2D::LEFT;
        }
        if self.right {
            sum += Vector2D::RIGHT;
        }
        sum.normalize()
    }

    pub fn has_direction(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Advance the game by `delta_ms` milliseconds, appending what happened to `events`
pub fn tick(state: &mut GameState, input: &InputState, delta_ms: f64, events: &mut Vec<GameEvent>) {
    // Cosmetic only, decays in every phase
    if state.flash > 0.0 {
        state.flash = (state.flash - delta_ms / FLASH_DURATION_MS).max(0.0);
    }

    match state.phase {
        GamePhase::Menu => {
            if input.has_direction() {
                set_phase(state, GamePhase::Playing, events);
                state.worm.turn(input.direction());
            }
        }
        GamePhase::Paused => {
            if input.reset {
                restart(state, events);
            } else if input.space {
                set_phase(state, GamePhase::Playing, events);
            }
        }
        GamePhase::GameOver => {
            if input.reset {
                restart(state, events);
            }
        }
        GamePhase::Playing => tick_playing(state, input, delta_ms, events),
    }
}

fn tick_playing(
    state: &mut GameState,
    input: &InputState,
    delta_ms: f64,
    events: &mut Vec<GameEvent>,
) {
    // Queued actions win over movement
    if input.reset {
        restart(state, events);
        return;
    }
    if input.space {
        set_phase(state, GamePhase::Paused, events);
        return;
    }

    let direction = input.direction();
    if !direction.is_zero() {
        state.worm.turn(direction);
    }
    if input.debug_speed {
        let multiplier = if state.worm.speed_multiplier() == 1.0 {
            DEBUG_SPEED_MULTIPLIER
        } else {
            1.0
        };
        state.worm.set_speed_multiplier(multiplier);
        log::debug!("Worm speed multiplier set to {multiplier}");
    }

    state.elapsed_ms += delta_ms;
    state.worm.update(delta_ms);
    state.food.update(delta_ms, state.worm.segments());

    resolve_food(state, events);

    if !state.worm.is_alive() {
        game_over(state, DeathCause::SelfCollision, events);
        return;
    }

    let (width, height) = (state.bounds.width(), state.bounds.height());
    match state.boundary_policy {
        BoundaryPolicy::Death => {
            if state.worm.check_boundary_collision(width, height) {
                game_over(state, DeathCause::Boundary, events);
            }
        }
        BoundaryPolicy::Wrap => {
            state.worm.wrap_around_bounds(width, height);
        }
    }
}

/// Eat every active food the head overlaps
fn resolve_food(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let detector = state.worm.detector();
    let mut eaten = Vec::new();
    for food in state.food.foods_mut() {
        if detector.snake_to_food(&state.worm, food).hit {
            let value = food.consume();
            eaten.push((food.id, food.kind(), value));
        }
    }

    for (id, kind, value) in eaten {
        state.score += u64::from(value);
        state.food_count += 1;
        state.flash = 1.0;
        state.worm.grow();
        log::debug!("Ate {kind:?} food #{id} for {value} points (score {})", state.score);
        events.push(GameEvent::FoodEaten { id, kind, value });
    }

    // Never leave the arena empty
    if state.food.active_count() == 0 {
        state.food.force_spawn(state.worm.segments());
    }
}

fn game_over(state: &mut GameState, cause: DeathCause, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::WormDied { cause });
    set_phase(state, GamePhase::GameOver, events);
    if !state.game_over_emitted {
        state.game_over_emitted = true;
        log::info!(
            "Game over ({cause:?}): score {}, {} food in {:.1}s",
            state.score,
            state.food_count,
            state.game_time_secs()
        );
        events.push(GameEvent::GameOver {
            score: state.score,
            food_count: state.food_count,
            game_time_secs: state.game_time_secs(),
        });
    }
}

fn restart(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.reset_game();
    events.push(GameEvent::Reset);
    set_phase(state, GamePhase::Playing, events);
}

fn set_phase(state: &mut GameState, to: GamePhase, events: &mut Vec<GameEvent>) {
    let from = state.phase;
    if from == to {
        return;
    }
    log::info!("Phase {} -> {}", from.as_str(), to.as_str());
    state.phase = to;
    events.push(GameEvent::PhaseChanged { from, to });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GROWTH_RATE;
    use crate::settings::Settings;
    use crate::sim::food::{Food, FoodKind};

    const DT: f64 = 1000.0 / 60.0;

    fn playing_state() -> GameState {
        let mut state = GameState::new(&Settings::default());
        let mut events = Vec::new();
        let start = InputState {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &start, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        state
    }

    #[test]
    fn test_menu_waits_for_direction() {
        let mut state = GameState::new(&Settings::default());
        let mut events = Vec::new();
        let head = state.worm.head();
        tick(&mut state, &InputState::default(), DT, &mut events);
        tick(
            &mut state,
            &InputState {
                space: true,
                ..Default::default()
            },
            DT,
            &mut events,
        );
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.worm.head(), head);
        assert!(events.is_empty());

        tick(
            &mut state,
            &InputState {
                down: true,
                ..Default::default()
            },
            DT,
            &mut events,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.worm.target_direction(), Vector2D::DOWN);
        assert_eq!(
            events,
            vec![GameEvent::PhaseChanged {
                from: GamePhase::Menu,
                to: GamePhase::Playing
            }]
        );
    }

    #[test]
    fn test_pause_and_resume() {
        let mut state = playing_state();
        let mut events = Vec::new();
        let pause = InputState {
            space: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Paused);

        let head = state.worm.head();
        tick(&mut state, &InputState::default(), DT, &mut events);
        assert_eq!(state.worm.head(), head, "paused worm must not move");

        tick(&mut state, &pause, DT, &mut events);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_reset_from_paused() {
        let mut state = playing_state();
        let mut events = Vec::new();
        state.score = 120;
        tick(
            &mut state,
            &InputState {
                space: true,
                ..Default::default()
            },
            DT,
            &mut events,
        );
        tick(
            &mut state,
            &InputState {
                reset: true,
                ..Default::default()
            },
            DT,
            &mut events,
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(events.contains(&GameEvent::Reset));
    }

    #[test]
    fn test_eating_food_scores_and_grows() {
        let mut state = playing_state();
        let mut events = Vec::new();
        state.food.clear();
        let mut food = Food::new(0, FoodKind::Normal);
        food.spawn_at(state.worm.head());
        let id = state.food.insert(food).unwrap_or_default();
        let length = state.worm.len();

        tick(&mut state, &InputState::default(), DT, &mut events);

        assert_eq!(state.score, 10);
        assert_eq!(state.food_count, 1);
        assert_eq!(state.worm.len(), length + GROWTH_RATE);
        assert!(state.food.get(id).is_none_or(|f| !f.is_active()));
        assert!(state.flash > 0.0);
        assert!(events.contains(&GameEvent::FoodEaten {
            id,
            kind: FoodKind::Normal,
            value: 10
        }));
        assert!(state.food.active_count() >= 1, "arena is restocked");
    }

    #[test]
    fn test_wall_death_emits_game_over_once() {
        let mut state = playing_state();
        let mut events = Vec::new();
        for _ in 0..2000 {
            tick(&mut state, &InputState::default(), DT, &mut events);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        assert!(events.contains(&GameEvent::WormDied {
            cause: DeathCause::Boundary
        }));
    }

    #[test]
    fn test_wrap_policy_survives_walls() {
        let settings = Settings {
            boundary_policy: BoundaryPolicy::Wrap,
            ..Settings::default()
        };
        let mut state = GameState::new(&settings);
        let mut events = Vec::new();
        let right = InputState {
            right: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &right, DT, &mut events);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.bounds.contains(state.worm.head()));
    }

    #[test]
    fn test_debug_speed_toggles() {
        let mut state = playing_state();
        let mut events = Vec::new();
        let boost = InputState {
            debug_speed: true,
            ..Default::default()
        };
        tick(&mut state, &boost, DT, &mut events);
        assert_eq!(state.worm.speed_multiplier(), DEBUG_SPEED_MULTIPLIER);
        tick(&mut state, &boost, DT, &mut events);
        assert_eq!(state.worm.speed_multiplier(), 1.0);
    }

    #[test]
    fn test_flash_decays() {
        let mut state = GameState::new(&Settings::default());
        state.flash = 1.0;
        let mut events = Vec::new();
        tick(&mut state, &InputState::default(), FLASH_DURATION_MS / 2.0, &mut events);
        assert!((state.flash - 0.5).abs() < 1e-9);
        tick(&mut state, &InputState::default(), FLASH_DURATION_MS, &mut events);
        assert_eq!(state.flash, 0.0);
    }

    #[test]
    fn test_input_direction() {
        let diagonal = InputState {
            up: true,
            right: true,
            ..Default::default()
        };
        let d = diagonal.direction();
        assert!((d.magnitude() - 1.0).abs() < 1e-12);
        assert!(d.x > 0.0 && d.y < 0.0);

        let cancelled = InputState {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(cancelled.direction(), Vector2D::ZERO);
        assert!(cancelled.has_direction());
    }
}
