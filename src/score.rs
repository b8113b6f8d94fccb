//! Scoring: line clear points, combos, perfect clears and drop bonuses

use crate::events::{EventQueue, GameEvent};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Points per hard-dropped cell
pub const HARD_DROP_POINTS: u64 = 2;
/// Points per soft-dropped cell
pub const SOFT_DROP_POINTS: u64 = 1;
/// Combo bonus per consecutive clearing placement after the first
pub const COMBO_POINTS: u64 = 50;

/// Base points (before the level multiplier) and display name for a clear
pub fn line_clear_points(lines: usize) -> (u64, &'static str) {
    match lines {
        0 => (0, ""),
        1 => (100, "Single"),
        2 => (300, "Double"),
        3 => (500, "Triple"),
        _ => (800, "Tetris"),
    }
}

/// Extra base points when a clear empties the whole board
pub fn perfect_clear_bonus(lines: usize) -> u64 {
    match lines {
        0 => 0,
        1 => 800,
        2 => 1200,
        3 => 1800,
        _ => 2000,
    }
}

/// What the board looked like when a clear happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearContext {
    /// Level the points are scaled by
    pub level: u32,
    pub is_perfect_clear: bool,
}

/// Outcome of scoring one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearResult {
    pub points: u64,
    pub name: &'static str,
    pub combo: u32,
}

/// Cumulative statistics for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub pieces: u32,
    pub elapsed_ms: u64,
    pub max_combo: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub tetrises: u32,
    pub perfect_clears: u32,
}

/// Scoring state, mutated only through its own methods
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    score: u64,
    /// Level used for stats reporting
    level: u32,
    /// Lines cleared since the last level change
    level_lines: u32,
    lines: u32,
    /// Consecutive placements that cleared at least one line
    combo: u32,
    max_combo: u32,
    pieces: u32,
    elapsed: Duration,
    /// Clears by size: singles, doubles, triples, tetrises
    clears: [u32; 4],
    perfect_clears: u32,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            level_lines: 0,
            lines: 0,
            combo: 0,
            max_combo: 0,
            pieces: 0,
            elapsed: Duration::ZERO,
            clears: [0; 4],
            perfect_clears: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level_lines(&self) -> u32 {
        self.level_lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn pieces(&self) -> u32 {
        self.pieces
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Score a placement that cleared `lines` rows
    pub fn process_line_clears(
        &mut self,
        lines: usize,
        context: ClearContext,
        events: &mut EventQueue,
    ) -> ClearResult {
        if lines == 0 {
            self.reset_combo(events);
            return ClearResult {
                points: 0,
                name: "",
                combo: 0,
            };
        }

        let level = u64::from(context.level.max(1));
        let (base, name) = line_clear_points(lines);
        let mut points = base * level;

        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);
        if self.combo > 1 {
            points += COMBO_POINTS * u64::from(self.combo - 1) * level;
        }

        if context.is_perfect_clear {
            points += perfect_clear_bonus(lines) * level;
            self.perfect_clears += 1;
        }

        self.clears[lines.min(4) - 1] += 1;
        self.lines += lines as u32;
        self.level_lines += lines as u32;
        self.score += points;

        tracing::debug!(lines, points, combo = self.combo, "line clear scored");
        events.push(GameEvent::ScoreUpdated {
            score: self.score,
            delta: points,
        });
        events.push(GameEvent::LinesUpdated { total: self.lines });
        events.push(GameEvent::ComboUpdated { combo: self.combo });

        ClearResult {
            points,
            name,
            combo: self.combo,
        }
    }

    /// Reset combo (called when a piece locks without clearing lines)
    pub fn reset_combo(&mut self, events: &mut EventQueue) {
        if self.combo != 0 {
            self.combo = 0;
            events.push(GameEvent::ComboUpdated { combo: 0 });
        }
    }

    /// Add score for hard drop (2 points per cell)
    pub fn process_hard_drop(&mut self, distance: u32, events: &mut EventQueue) -> u64 {
        self.add_points(u64::from(distance) * HARD_DROP_POINTS, events)
    }

    /// Add score for soft drop (1 point per cell)
    pub fn process_soft_drop(&mut self, cells: u32, events: &mut EventQueue) -> u64 {
        self.add_points(u64::from(cells) * SOFT_DROP_POINTS, events)
    }

    fn add_points(&mut self, points: u64, events: &mut EventQueue) -> u64 {
        if points > 0 {
            self.score += points;
            events.push(GameEvent::ScoreUpdated {
                score: self.score,
                delta: points,
            });
        }
        points
    }

    pub fn increment_piece_count(&mut self) {
        self.pieces += 1;
    }

    pub fn add_elapsed(&mut self, dt: Duration) {
        self.elapsed += dt;
    }

    /// Track the level the difficulty controller settled on, along with
    /// the lines it carried over into that level
    pub fn sync_level(&mut self, level: u32, level_lines: u32) {
        self.level = level;
        self.level_lines = level_lines;
    }

    pub fn game_stats(&self) -> GameStats {
        GameStats {
            score: self.score,
            level: self.level,
            lines: self.lines,
            pieces: self.pieces,
            elapsed_ms: self.elapsed.as_millis() as u64,
            max_combo: self.max_combo,
            singles: self.clears[0],
            doubles: self.clears[1],
            triples: self.clears[2],
            tetrises: self.clears[3],
            perfect_clears: self.perfect_clears,
        }
    }
}
