//! Falling-block puzzle engine
//!
//! Owns board occupancy, the active piece, legal movement and rotation,
//! line clearing, scoring and the level/speed curve. Rendering, input,
//! audio, networking and storage are left to the caller: they drive the
//! engine through [`Game`] commands and `tick`, read [`GameSnapshot`]s and
//! drain [`GameEvent`]s.
//!
//! # Module Structure
//!
//! - [`tetromino`]: the 7 kinds and their orientation matrices
//! - [`piece`]: the active piece as an immutable value
//! - [`board`]: occupancy grid, placement, line clearing and snapshots
//! - [`collision`]: the single collision predicate
//! - [`rotation`]: rotation with a 4-offset horizontal kick search
//! - [`score`]: line clear points, combos and session stats
//! - [`difficulty`]: level, gravity interval and tier
//! - [`events`]: change notifications queued for the caller
//! - [`randomizer`]: seeded uniform and fixed-sequence piece sources
//! - [`game`]: the state machine tying it all together
//! - [`config`]: TOML-backed engine configuration
//! - [`error`]: construction and configuration errors
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tetrs_engine::{EngineConfig, Game, GameStatus};
//!
//! let mut game = Game::with_seed(EngineConfig::default(), 12345).unwrap();
//! game.start();
//! game.move_tetromino(-1, 0);
//! game.hard_drop();
//! game.tick(Duration::from_millis(16));
//!
//! assert_eq!(game.status(), GameStatus::Running);
//! assert!(game.game_state().score > 0);
//! // Events queue up until drained
//! assert!(!game.drain_events().is_empty());
//! ```

pub mod board;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod events;
pub mod game;
pub mod piece;
pub mod randomizer;
pub mod rotation;
pub mod score;
pub mod tetromino;

pub use board::{Board, BoardData, Cell, LineClear, LoadReport};
pub use collision::collides;
pub use config::EngineConfig;
pub use difficulty::{DifficultyConfig, DifficultyController, LevelProgress, SpeedCurve, Tier};
pub use error::EngineError;
pub use events::{EventQueue, GameEvent};
pub use game::{Game, GameSnapshot, GameStatus};
pub use piece::Piece;
pub use randomizer::{FixedSequence, PieceGenerator, RandomPieces};
pub use rotation::{RotationDirection, try_rotate};
pub use score::{ClearContext, GameStats, ScoringEngine};
pub use tetromino::TetrominoType;
