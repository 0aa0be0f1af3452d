//! ASCII renderer for terminals and logs
//!
//! Rasterizes the arena onto a fixed character grid. Each body circle marks
//! the cell under its centre; the head is drawn last so it stays visible.

use super::{RenderSnapshot, Renderer};
use crate::error::RenderError;
use crate::sim::FoodKind;

const EMPTY: char = '.';
const HEAD: char = '@';
const DEAD_HEAD: char = 'X';
const BODY: char = 'o';

fn food_glyph(kind: FoodKind) -> char {
    match kind {
        FoodKind::Normal => '*',
        FoodKind::Bonus => '$',
        FoodKind::Speed => '!',
    }
}

#[derive(Debug, Clone)]
pub struct TextRenderer {
    columns: usize,
    rows: usize,
    frame: String,
    frames_drawn: u64,
}

impl TextRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
            frame: String::new(),
            frames_drawn: 0,
        }
    }

    /// Most recently drawn frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Grid cell for a world position, or `None` when outside the arena
    fn cell(&self, snapshot: &RenderSnapshot, x: f64, y: f64) -> Option<(usize, usize)> {
        if x < 0.0 || y < 0.0 || x >= snapshot.world_width || y >= snapshot.world_height {
            return None;
        }
        let col = (x / snapshot.world_width * self.columns as f64) as usize;
        let row = (y / snapshot.world_height * self.rows as f64) as usize;
        Some((col.min(self.columns - 1), row.min(self.rows - 1)))
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, snapshot: &RenderSnapshot) -> Result<(), RenderError> {
        if snapshot.world_width <= 0.0 || snapshot.world_height <= 0.0 {
            return Err(RenderError::SurfaceLost("arena has no area".into()));
        }

        let mut grid = vec![vec![EMPTY; self.columns]; self.rows];

        for food in &snapshot.food {
            if let Some((c, r)) = self.cell(snapshot, food.position.x, food.position.y) {
                grid[r][c] = food_glyph(food.kind);
            }
        }

        let segments = &snapshot.worm.segments;
        for segment in segments.iter().skip(1) {
            if let Some((c, r)) = self.cell(snapshot, segment.x, segment.y) {
                grid[r][c] = BODY;
            }
        }
        if let Some((c, r)) = segments.first().and_then(|h| self.cell(snapshot, h.x, h.y)) {
            grid[r][c] = if snapshot.worm.alive { HEAD } else { DEAD_HEAD };
        }

        let mut out = String::with_capacity((self.columns + 1) * (self.rows + 2));
        out.push_str(&format!(
            "{:<9} score {:>5}  food {:>3}  time {:>6.1}s  fps {}\n",
            snapshot.phase.as_str(),
            snapshot.score,
            snapshot.food_count,
            snapshot.game_time_secs,
            snapshot.fps
        ));
        for row in grid {
            out.extend(row);
            out.push('\n');
        }
        if let Some(fault) = &snapshot.fault {
            out.push_str(&format!("ERROR: {fault} (press R to restart)\n"));
        }

        self.frame = out;
        self.frames_drawn += 1;
        Ok(())
    }
}
