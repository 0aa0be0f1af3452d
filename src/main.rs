//! Worm Arena entry point
//!
//! Runs the game headless with an autopilot at the keyboard and prints ASCII
//! frames to stdout. Usage:
//!
//! ```text
//! worm-arena [settings.json] [games]
//! ```

use std::path::{Path, PathBuf};

use worm_arena::platform::Key;
use worm_arena::renderer::TextRenderer;
use worm_arena::sim::{GamePhase, GameState, Vector2D};
use worm_arena::{Game, HighScores, LocalLeaderboard, Settings};

const FRAME_MS: f64 = 1000.0 / 60.0;
/// Print every Nth frame
const PRINT_EVERY: u64 = 30;
/// Give up on a game that never ends
const MAX_FRAMES_PER_GAME: u64 = 60 * 120;
const SCORES_FILE: &str = "worm_scores.json";
/// Distance from a wall at which the autopilot turns away
const WALL_MARGIN: f64 = 60.0;

fn main() {
    env_logger::init();
    log::info!("Worm Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };
    let games: u32 = args.next().and_then(|n| n.parse().ok()).unwrap_or(3);

    let scores_path = PathBuf::from(SCORES_FILE);
    let player = settings
        .player_id
        .clone()
        .unwrap_or_else(|| "autopilot".to_string());

    let leaderboard = LocalLeaderboard::open(scores_path.clone());
    let mut game = Game::new(settings).with_reporter(Box::new(leaderboard));
    game.set_player(Some(player));
    let mut renderer = TextRenderer::new(60, 22);

    let mut now = 0.0;
    for round in 1..=games {
        let frames = play_one(&mut game, &mut renderer, &mut now);
        let state = game.state();
        println!(
            "Game {round}: score {}, {} food, {:.1}s ({frames} frames)",
            state.score,
            state.food_count,
            state.game_time_secs()
        );
        if game.fault().is_some() {
            log::error!("Stopping after fault");
            break;
        }
    }

    let board = HighScores::load(&scores_path);
    println!("\nHigh scores:");
    for (rank, entry) in board.top(10).iter().enumerate() {
        println!(
            "{:>2}. {:<12} {:>6}  ({} food, {:.1}s)",
            rank + 1,
            entry.player_id,
            entry.score,
            entry.food_count,
            entry.game_time_secs
        );
    }
}

/// Run one game to completion and return the frames it took
fn play_one(game: &mut Game, renderer: &mut TextRenderer, now: &mut f64) -> u64 {
    // Leaving GameOver (or the initial Menu) takes a tap of R or an arrow key
    if game.phase() == GamePhase::GameOver {
        game.key_down(Key::R);
        *now += FRAME_MS;
        game.frame(*now, renderer);
        game.key_up(Key::R);
    }

    let mut frames = 0;
    while frames < MAX_FRAMES_PER_GAME {
        steer(game);
        *now += FRAME_MS;
        game.frame(*now, renderer);
        frames += 1;

        if frames % PRINT_EVERY == 0 {
            println!("{}", renderer.frame());
        }
        if game.phase() == GamePhase::GameOver || game.fault().is_some() {
            println!("{}", renderer.frame());
            break;
        }
    }
    frames
}

/// Hold the arrow keys that point toward the nearest food, away from walls
fn steer(game: &mut Game) {
    let wanted = autopilot_direction(game.state());
    let keys = [
        (Key::ArrowUp, wanted.y < -0.3),
        (Key::ArrowDown, wanted.y > 0.3),
        (Key::ArrowLeft, wanted.x < -0.3),
        (Key::ArrowRight, wanted.x > 0.3),
    ];
    for (key, held) in keys {
        if held {
            game.key_down(key);
        } else {
            game.key_up(key);
        }
    }
}

fn autopilot_direction(state: &GameState) -> Vector2D {
    let head = state.worm.head();
    let heading = state.worm.direction();

    let target = state
        .food
        .active_positions()
        .into_iter()
        .min_by(|a, b| {
            a.distance_squared(head)
                .partial_cmp(&b.distance_squared(head))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    let mut wanted = match target {
        Some(food) => (food - head).normalize(),
        None => heading,
    };

    // Push away from any wall the head is closing in on
    let bounds = state.bounds;
    if head.x - bounds.min.x < WALL_MARGIN {
        wanted.x = wanted.x.max(1.0);
    }
    if bounds.max.x - head.x < WALL_MARGIN {
        wanted.x = wanted.x.min(-1.0);
    }
    if head.y - bounds.min.y < WALL_MARGIN {
        wanted.y = wanted.y.max(1.0);
    }
    if bounds.max.y - head.y < WALL_MARGIN {
        wanted.y = wanted.y.min(-1.0);
    }

    if wanted.is_zero() { heading } else { wanted.normalize() }
}
