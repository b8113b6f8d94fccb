//! Core game state and logic
//!
//! `Game` owns the board, the scoring engine, the difficulty controller and
//! the piece generator. Nothing here is global: every game is an isolated
//! value, driven by `tick` and the movement commands from one thread.

use crate::board::{Board, Cell, LoadReport};
use crate::collision::{collides, drop_distance};
use crate::config::EngineConfig;
use crate::difficulty::{DifficultyController, LevelProgress, Tier};
use crate::error::EngineError;
use crate::events::{EventQueue, GameEvent};
use crate::piece::Piece;
use crate::randomizer::{PieceGenerator, RandomPieces};
use crate::rotation::{RotationDirection, try_rotate};
use crate::score::{ClearContext, GameStats, ScoringEngine, line_clear_points};
use crate::tetromino;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Game lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Everything a renderer or UI needs for one frame besides the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub pieces: u32,
    pub tier: Tier,
    pub drop_interval_ms: u64,
    pub progress: LevelProgress,
    pub current: Option<Piece>,
    pub next: Option<Piece>,
}

/// The main game struct
#[derive(Debug)]
pub struct Game<G: PieceGenerator = RandomPieces> {
    config: EngineConfig,
    board: Board,
    /// Current falling piece
    current: Option<Piece>,
    /// Piece that spawns after the current one locks
    next: Option<Piece>,
    generator: G,
    scoring: ScoringEngine,
    difficulty: DifficultyController,
    events: EventQueue,
    status: GameStatus,
    /// Time since the last gravity step
    drop_accumulator: Duration,
}

impl Game<RandomPieces> {
    /// Create a game with uniform random pieces, seeded from the config when
    /// it carries a seed
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let generator = match config.game.seed {
            Some(seed) => RandomPieces::with_seed(seed),
            None => RandomPieces::new(),
        };
        Self::with_generator(config, generator)
    }

    /// Create a game with a fixed seed
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_generator(config, RandomPieces::with_seed(seed))
    }
}

impl<G: PieceGenerator> Game<G> {
    pub fn with_generator(config: EngineConfig, generator: G) -> Result<Self, EngineError> {
        config.validate()?;
        let board = Board::new(config.board.width, config.board.height)?;
        let difficulty = DifficultyController::new(config.difficulty.clone())?;

        Ok(Self {
            config,
            board,
            current: None,
            next: None,
            generator,
            scoring: ScoringEngine::new(),
            difficulty,
            events: EventQueue::new(),
            status: GameStatus::Idle,
            drop_accumulator: Duration::ZERO,
        })
    }

    /// Reset every component, spawn the first two pieces and start running
    pub fn start(&mut self) {
        self.clear_session();

        let starting_level = self.config.game.starting_level;
        if starting_level > 1 {
            self.difficulty.set_level(starting_level, &mut self.events);
        }
        self.scoring
            .sync_level(self.difficulty.level(), self.difficulty.current_level_lines());

        self.next = Some(self.spawn_kind());
        self.set_status(GameStatus::Running);
        tracing::info!(
            width = self.board.width(),
            height = self.board.height(),
            level = self.difficulty.level(),
            "game started"
        );
        self.spawn_next();
    }

    /// Back to idle with a fresh board and counters
    pub fn reset(&mut self) {
        self.clear_session();
        self.set_status(GameStatus::Idle);
    }

    fn clear_session(&mut self) {
        self.board.reset();
        self.scoring.reset();
        self.difficulty.reset();
        self.events.clear();
        self.current = None;
        self.next = None;
        self.drop_accumulator = Duration::ZERO;
    }

    /// Toggle between running and paused; no effect in any other state.
    /// Returns true if the state changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Running => self.set_status(GameStatus::Paused),
            GameStatus::Paused => self.set_status(GameStatus::Running),
            GameStatus::Idle | GameStatus::GameOver => return false,
        }
        true
    }

    fn set_status(&mut self, status: GameStatus) {
        if self.status != status {
            self.status = status;
            self.events.push(GameEvent::StatusChanged { status });
        }
    }

    /// Advance time by `dt` (call every frame while the game is on screen).
    /// Pausing is the caller's business: paused games ignore ticks.
    pub fn tick(&mut self, dt: Duration) {
        if self.status != GameStatus::Running {
            return;
        }
        self.scoring.add_elapsed(dt);
        self.drop_accumulator += dt;

        if self.drop_accumulator >= self.difficulty.drop_interval() {
            self.drop_accumulator = Duration::ZERO;
            if !self.move_tetromino(0, 1) {
                self.place_tetromino();
            }
        }
    }

    /// Shift the current piece. Illegal moves leave it where it is.
    pub fn move_tetromino(&mut self, dx: i32, dy: i32) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        if collides(&piece, &self.board, dx, dy) {
            return false;
        }
        self.current = Some(piece.translated(dx, dy));
        true
    }

    /// Rotate the current piece with the horizontal kick search
    pub fn rotate_tetromino(&mut self, direction: RotationDirection) -> bool {
        if self.status != GameStatus::Running {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };
        match try_rotate(&piece, &self.board, direction) {
            Some(rotated) => {
                self.current = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// Move down one row for a point; also restarts the gravity timer
    pub fn soft_drop(&mut self) -> bool {
        if !self.move_tetromino(0, 1) {
            return false;
        }
        self.drop_accumulator = Duration::ZERO;
        self.scoring.process_soft_drop(1, &mut self.events);
        true
    }

    /// Drop to the lowest legal row and lock immediately.
    /// Returns the distance dropped.
    pub fn hard_drop(&mut self) -> Option<u32> {
        if self.status != GameStatus::Running {
            return None;
        }
        let piece = self.current?;
        let distance = drop_distance(&piece, &self.board);
        self.current = Some(piece.translated(0, distance));
        self.scoring
            .process_hard_drop(distance as u32, &mut self.events);
        self.place_tetromino();
        Some(distance as u32)
    }

    /// Lock the current piece, clear lines, score, and spawn the next piece
    fn place_tetromino(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        if !self.board.place(&piece) {
            // The active piece is only ever replaced by a legal one
            tracing::warn!(?piece, "active piece could not be placed");
            self.finish();
            return;
        }
        self.scoring.increment_piece_count();

        let clear = self.board.clear_lines_detailed();
        let perfect_clear = clear.count > 0 && self.board.is_empty();
        tracing::debug!(
            kind = ?piece.kind,
            x = piece.x,
            y = piece.y,
            lines = clear.count,
            "piece placed"
        );

        if clear.count > 0 {
            self.events.push(GameEvent::LinesCleared {
                count: clear.count,
                rows: clear.rows,
                perfect_clear,
                name: line_clear_points(clear.count).1,
            });
        }

        // Points use the level the clear happened at
        let context = ClearContext {
            level: self.difficulty.level(),
            is_perfect_clear: perfect_clear,
        };
        self.scoring
            .process_line_clears(clear.count, context, &mut self.events);
        self.difficulty
            .process_lines_cleared(clear.count as u32, &mut self.events);
        self.scoring
            .sync_level(self.difficulty.level(), self.difficulty.current_level_lines());

        if self.board.is_game_over() {
            self.finish();
            return;
        }
        self.spawn_next();
    }

    /// Promote the next piece and draw a new one; a blocked spawn ends the game
    fn spawn_next(&mut self) {
        let piece = match self.next.take() {
            Some(piece) => piece,
            None => self.spawn_kind(),
        };
        self.next = Some(self.spawn_kind());

        if collides(&piece, &self.board, 0, 0) {
            tracing::debug!(kind = ?piece.kind, "spawn blocked");
            self.finish();
            return;
        }
        tracing::debug!(kind = ?piece.kind, x = piece.x, "spawned");
        self.current = Some(piece);
        self.drop_accumulator = Duration::ZERO;
    }

    fn spawn_kind(&mut self) -> Piece {
        tetromino::spawn(self.generator.next_kind(), self.board.width())
    }

    fn finish(&mut self) {
        self.set_status(GameStatus::GameOver);
        let stats = self.scoring.game_stats();
        tracing::info!(
            score = stats.score,
            level = stats.level,
            lines = stats.lines,
            pieces = stats.pieces,
            "game over"
        );
        self.events.push(GameEvent::GameOver { stats });
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_tetromino(&self) -> Option<Piece> {
        self.current
    }

    pub fn next_tetromino(&self) -> Option<Piece> {
        self.next
    }

    /// Where the current piece would land if hard dropped
    pub fn ghost_piece(&self) -> Option<Piece> {
        let piece = self.current?;
        Some(piece.translated(0, drop_distance(&piece, &self.board)))
    }

    /// Board grid with the current piece drawn in
    pub fn preview_board(&self) -> Vec<Vec<Cell>> {
        match &self.current {
            Some(piece) => self.board.preview_placement(piece),
            None => self.board.rows().to_vec(),
        }
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn difficulty(&self) -> &DifficultyController {
        &self.difficulty
    }

    pub fn stats(&self) -> GameStats {
        self.scoring.game_stats()
    }

    pub fn game_state(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            score: self.scoring.score(),
            level: self.difficulty.level(),
            lines: self.scoring.lines(),
            combo: self.scoring.combo(),
            pieces: self.scoring.pieces(),
            tier: self.difficulty.tier(),
            drop_interval_ms: self.difficulty.drop_interval().as_millis() as u64,
            progress: self.difficulty.level_progress(),
            current: self.current,
            next: self.next,
        }
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Restore board contents from a persisted snapshot.
    ///
    /// An active piece buried by the loaded cells goes back to its spawn
    /// position; if that is blocked too the game is over.
    pub fn load_board(&mut self, data: &serde_json::Value) -> LoadReport {
        let report = self.board.load_from_data(data);

        if let Some(piece) = self.current {
            if collides(&piece, &self.board, 0, 0) {
                let respawned = tetromino::spawn(piece.kind, self.board.width());
                tracing::debug!(kind = ?piece.kind, "active piece buried by load");
                if collides(&respawned, &self.board, 0, 0) {
                    self.current = None;
                    self.finish();
                } else {
                    self.current = Some(respawned);
                    self.drop_accumulator = Duration::ZERO;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomizer::FixedSequence;
    use crate::tetromino::TetrominoType;

    fn game_with(kinds: Vec<TetrominoType>) -> Game<FixedSequence> {
        let generator = FixedSequence::new(kinds).unwrap();
        Game::with_generator(EngineConfig::default(), generator).unwrap()
    }

    /// Snapshot of a 10x20 board with the given cells holding a T
    fn snapshot_with(cells: &[(usize, usize)]) -> serde_json::Value {
        let mut grid = vec![vec![serde_json::Value::Null; 10]; 20];
        for &(x, y) in cells {
            grid[y][x] = serde_json::json!("T");
        }
        serde_json::json!({
            "board": grid,
            "linesCleared": 0,
            "width": 10,
            "height": 20,
        })
    }

    #[test]
    fn test_starts_idle() {
        let game = Game::with_seed(EngineConfig::default(), 1).unwrap();
        assert_eq!(game.status(), GameStatus::Idle);
        assert!(game.current_tetromino().is_none());
    }

    #[test]
    fn test_start_spawns_current_and_next() {
        let mut game = game_with(vec![TetrominoType::T, TetrominoType::O]);
        game.start();
        assert!(game.is_running());
        assert_eq!(game.current_tetromino().unwrap().kind, TetrominoType::T);
        assert_eq!(game.next_tetromino().unwrap().kind, TetrominoType::O);
    }

    #[test]
    fn test_commands_ignored_when_not_running() {
        let mut game = game_with(vec![TetrominoType::O]);
        assert!(!game.move_tetromino(1, 0));
        assert_eq!(game.hard_drop(), None);
        game.start();
        game.toggle_pause();
        assert_eq!(game.status(), GameStatus::Paused);
        assert!(!game.move_tetromino(1, 0));
        assert!(!game.rotate_tetromino(RotationDirection::Clockwise));
        game.tick(Duration::from_secs(5));
        assert_eq!(game.current_tetromino().unwrap().y, 0);
        assert!(game.toggle_pause());
        assert!(game.is_running());
    }

    #[test]
    fn test_gravity_follows_interval() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        game.tick(Duration::from_millis(999));
        assert_eq!(game.current_tetromino().unwrap().y, 0);
        game.tick(Duration::from_millis(1));
        assert_eq!(game.current_tetromino().unwrap().y, 1);
        assert_eq!(game.stats().elapsed_ms, 1000);
    }

    #[test]
    fn test_gravity_locks_on_floor() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        for _ in 0..19 {
            game.tick(Duration::from_secs(1));
        }
        assert_eq!(game.stats().pieces, 1);
        assert!(game.board().is_occupied(4, 19));
        assert_eq!(game.current_tetromino().unwrap().y, 0);
    }

    #[test]
    fn test_hard_drop_scores_distance() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        assert_eq!(game.hard_drop(), Some(18));
        assert_eq!(game.game_state().score, 36);
        assert!(game.board().is_occupied(5, 18));
    }

    #[test]
    fn test_soft_drop() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        assert!(game.soft_drop());
        assert_eq!(game.current_tetromino().unwrap().y, 1);
        assert_eq!(game.game_state().score, 1);
    }

    #[test]
    fn test_ghost_piece() {
        let mut game = game_with(vec![TetrominoType::I]);
        game.start();
        let ghost = game.ghost_piece().unwrap();
        assert_eq!((ghost.x, ghost.y), (3, 19));
    }

    #[test]
    fn test_stacking_to_the_top_ends_game() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        let mut drops = 0;
        while game.is_running() {
            game.hard_drop();
            drops += 1;
            assert!(drops < 20);
        }
        // Rows 18..19 down to 2..3: the ninth square reaches the buffer
        assert_eq!(drops, 9);
        let events = game.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { stats }) if stats.pieces == 9));
        assert!(!game.toggle_pause());
    }

    #[test]
    fn test_line_clear_flow() {
        let mut game = game_with(vec![TetrominoType::I, TetrominoType::I, TetrominoType::O]);
        game.start();
        // Two I pieces fill columns 0..8 of the bottom row, an O fills 8..10
        assert!(game.move_tetromino(-3, 0));
        game.hard_drop();
        assert!(game.move_tetromino(1, 0));
        game.hard_drop();
        assert!(game.move_tetromino(4, 0));
        game.drain_events();
        game.hard_drop();

        let state = game.game_state();
        assert_eq!(state.lines, 1);
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::LinesCleared { count: 1, rows, perfect_clear: false, name: "Single" } if rows == &vec![19]
        )));
        assert!(events.contains(&GameEvent::LinesUpdated { total: 1 }));
        // The O's top half drops into the cleared row
        assert!(game.board().is_occupied(8, 19));
        assert!(!game.board().is_occupied(0, 19));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        game.hard_drop();
        game.reset();
        assert_eq!(game.status(), GameStatus::Idle);
        assert!(game.board().is_empty());
        assert_eq!(game.stats(), GameStats { level: 1, ..GameStats::default() });
    }

    #[test]
    fn test_starting_level() {
        let mut config = EngineConfig::default();
        config.game.starting_level = 5;
        let mut game = Game::with_seed(config, 3).unwrap();
        game.start();
        assert_eq!(game.game_state().level, 5);
        assert_eq!(game.game_state().drop_interval_ms, 410);
    }

    #[test]
    fn test_invalid_board_is_fatal() {
        let mut config = EngineConfig::default();
        config.board.width = 0;
        assert_eq!(
            Game::with_seed(config, 1).unwrap_err(),
            EngineError::InvalidDimensions { width: 0, height: 20 }
        );
    }

    #[test]
    fn test_preview_board_draws_current_piece() {
        let mut game = game_with(vec![TetrominoType::O]);
        assert_eq!(game.preview_board(), game.board().rows().to_vec());

        game.start();
        let grid = game.preview_board();
        for (x, y) in [(4, 0), (5, 0), (4, 1), (5, 1)] {
            assert_eq!(grid[y][x], Cell::Filled(TetrominoType::O));
        }
        assert!(game.board().is_empty());
    }

    #[test]
    fn test_load_under_active_piece_respawns_it() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        for _ in 0..10 {
            assert!(game.move_tetromino(0, 1));
        }

        let report = game.load_board(&snapshot_with(&[(4, 11)]));
        assert!(report.is_clean());
        let piece = game.current_tetromino().unwrap();
        assert!(!collides(&piece, game.board(), 0, 0));
        assert_eq!((piece.x, piece.y), (4, 0));

        assert!(game.move_tetromino(0, 1));
        assert_eq!(game.hard_drop(), Some(8));
        assert_eq!(game.status(), GameStatus::Running);
        assert!(game.board().is_occupied(4, 10));
        assert!(game.board().is_occupied(4, 11));
    }

    #[test]
    fn test_load_blocking_spawn_ends_game() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        let column: Vec<_> = (0..20).map(|y| (4, y)).collect();
        game.load_board(&snapshot_with(&column));

        assert!(game.is_game_over());
        assert!(game.current_tetromino().is_none());
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_new_session_drops_stale_events() {
        let mut game = game_with(vec![TetrominoType::O]);
        game.start();
        game.hard_drop();
        game.reset();
        assert_eq!(
            game.drain_events(),
            vec![GameEvent::StatusChanged { status: GameStatus::Idle }]
        );
    }
}
