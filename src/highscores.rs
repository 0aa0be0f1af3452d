//! Local high score leaderboard
//!
//! Keeps the top 10 scores, persisted as JSON. `LocalLeaderboard` plugs it
//! into the game as a score reporter.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceError, ReportError};
use crate::game::{ScoreReport, ScoreReporter};
use crate::persistence;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub player_id: String,
    pub score: u64,
    /// Food eaten during the run
    pub food_count: u32,
    /// Seconds played
    pub game_time_secs: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run if it qualifies; returns the rank achieved
    pub fn add_score(&mut self, report: &ScoreReport, timestamp: f64) -> Option<usize> {
        if !self.qualifies(report.score) {
            return None;
        }

        let entry = HighScoreEntry {
            player_id: report.player_id.clone(),
            score: report.score,
            food_count: report.food_count,
            game_time_secs: report.game_time,
            timestamp,
        };

        // Equal scores keep their arrival order
        let pos = self.entries.iter().position(|e| report.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Best `limit` entries
    pub fn top(&self, limit: usize) -> &[HighScoreEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    /// Best `limit` entries for one player
    pub fn for_player(&self, player_id: &str, limit: usize) -> Vec<&HighScoreEntry> {
        self.entries
            .iter()
            .filter(|e| e.player_id == player_id)
            .take(limit)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from `path`; a missing or unreadable file gives an empty board
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No high scores found, starting fresh");
            return Self::new();
        }
        match persistence::load_json::<HighScores>(path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("{e}; starting with an empty leaderboard");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Score reporter backed by a local `HighScores` file
#[derive(Debug, Clone, Default)]
pub struct LocalLeaderboard {
    scores: HighScores,
    /// Where to persist after each accepted score; in-memory when `None`
    path: Option<PathBuf>,
}

impl LocalLeaderboard {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the board stored at `path` and keep saving back to it
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            scores: HighScores::load(&path),
            path: Some(path),
        }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl ScoreReporter for LocalLeaderboard {
    fn submit(&mut self, report: &ScoreReport) -> Result<(), ReportError> {
        match self.scores.add_score(report, now_millis()) {
            Some(rank) => log::info!("{} placed #{} with {}", report.player_id, rank, report.score),
            None => {
                log::debug!("Score {} did not make the leaderboard", report.score);
                return Ok(());
            }
        }
        if let Some(path) = &self.path {
            self.scores.save(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(player: &str, score: u64) -> ScoreReport {
        ScoreReport {
            player_id: player.to_string(),
            score,
            food_count: (score / 10) as u32,
            game_time: 12.5,
        }
    }

    #[test]
    fn test_sorted_and_truncated() {
        let mut scores = HighScores::new();
        for s in 1..=12u64 {
            scores.add_score(&report("a", s * 10), 0.0);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(120));
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));
        assert!(!scores.qualifies(30));
        assert_eq!(scores.potential_rank(55), Some(8));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(&report("a", 0), 0.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_top_and_player_queries() {
        let mut scores = HighScores::new();
        scores.add_score(&report("ann", 50), 0.0);
        scores.add_score(&report("bob", 70), 0.0);
        scores.add_score(&report("ann", 90), 0.0);
        assert_eq!(scores.top(2).len(), 2);
        assert_eq!(scores.top(99).len(), 3);
        let ann: Vec<u64> = scores.for_player("ann", 10).iter().map(|e| e.score).collect();
        assert_eq!(ann, vec![90, 50]);
    }

    #[test]
    fn test_leaderboard_persists() {
        let dir = std::env::temp_dir().join(format!("worm-arena-scores-{}", std::process::id()));
        let path = dir.join("scores.json");
        let _ = std::fs::remove_file(&path);

        let mut board = LocalLeaderboard::open(&path);
        board.submit(&report("ann", 40)).unwrap();
        board.submit(&report("bob", 0)).unwrap();

        let reopened = LocalLeaderboard::open(&path);
        assert_eq!(reopened.scores().entries.len(), 1);
        assert_eq!(reopened.scores().top_score(), Some(40));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
