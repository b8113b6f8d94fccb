//! Lifecycle and change notifications
//!
//! Rendering, UI, audio and telemetry collaborators drain these after each
//! command or tick instead of polling the engine state.

use crate::game::GameStatus;
use crate::score::GameStats;
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    ScoreUpdated { score: u64, delta: u64 },
    LevelUpdated { new: u32, old: u32 },
    LinesUpdated { total: u32 },
    ComboUpdated { combo: u32 },
    LinesCleared {
        count: usize,
        /// Removed row indices, top to bottom
        rows: Vec<usize>,
        perfect_clear: bool,
        /// Display name such as "Double" or "Tetris"
        name: &'static str,
    },
    StatusChanged { status: GameStatus },
    GameOver { stats: GameStats },
}

/// FIFO of pending events
///
/// The queue is unbounded. Callers drain it once per frame with
/// [`Game::drain_events`](crate::Game::drain_events); a new session clears
/// whatever the previous one left behind.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        tracing::trace!(?event, "event");
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::LinesUpdated { total: 1 });
        queue.push(GameEvent::ComboUpdated { combo: 1 });
        assert_eq!(queue.len(), 2);
        let drained = queue.drain();
        assert_eq!(drained[0], GameEvent::LinesUpdated { total: 1 });
        assert!(queue.is_empty());
    }

    #[test]
    fn test_serializes_with_tag() {
        let json = serde_json::to_value(GameEvent::LevelUpdated { new: 3, old: 1 }).unwrap();
        assert_eq!(json["type"], "level_updated");
        assert_eq!(json["new"], 3);
    }
}
