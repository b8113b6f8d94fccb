//! Property tests for the engine invariants.
//!
//! - `Board::place` writes all of a piece's cells or none of them.
//! - `collides` never mutates the board and answers the same way twice.
//! - Level never drops and the gravity interval never grows.
//! - Random input rollouts keep the active piece legal and counters monotonic.

use proptest::prelude::*;
use std::time::Duration;
use tetrs_engine::{
    Board, Cell, DifficultyConfig, DifficultyController, EngineConfig, EventQueue, Game, Piece,
    RotationDirection, SpeedCurve, TetrominoType, collides,
};

fn kind_strategy() -> impl Strategy<Value = TetrominoType> {
    (0usize..7).prop_map(|i| TetrominoType::all()[i])
}

fn piece_strategy() -> impl Strategy<Value = Piece> {
    (kind_strategy(), 0usize..4, -3i32..12, -3i32..22)
        .prop_map(|(kind, orientation, x, y)| Piece::new(kind, orientation, x, y))
}

/// A board with a random scatter of filled cells
fn board_strategy() -> impl Strategy<Value = Board> {
    prop::collection::vec((0i32..10, 0i32..20, kind_strategy()), 0..60).prop_map(|cells| {
        let mut board = Board::default();
        for (x, y, kind) in cells {
            board.set(x, y, Cell::Filled(kind));
        }
        board
    })
}

proptest! {
    #[test]
    fn place_is_all_or_nothing(board in board_strategy(), piece in piece_strategy()) {
        let before = board.clone();
        let mut after = board.clone();
        let placed = after.place(&piece);

        if !placed {
            prop_assert_eq!(&after, &before);
        } else {
            let cells = piece.block_positions();
            for y in 0..20 {
                for x in 0..10 {
                    let was = before.get(x, y).unwrap();
                    let now = after.get(x, y).unwrap();
                    if cells.contains(&(x, y)) {
                        prop_assert_eq!(was, Cell::Empty);
                        prop_assert_eq!(now, Cell::Filled(piece.kind));
                    } else {
                        prop_assert_eq!(was, now);
                    }
                }
            }
        }
    }

    #[test]
    fn collides_is_pure(
        board in board_strategy(),
        piece in piece_strategy(),
        dx in -2i32..3,
        dy in -2i32..3,
    ) {
        let before = board.clone();
        let first = collides(&piece, &board, dx, dy);
        let second = collides(&piece, &board, dx, dy);
        prop_assert_eq!(first, second);
        prop_assert_eq!(&board, &before);
        // A placement succeeds exactly when the piece does not collide in place
        let mut copy = board.clone();
        prop_assert_eq!(copy.place(&piece), !collides(&piece, &board, 0, 0));
    }

    #[test]
    fn level_rises_and_interval_falls(
        batches in prop::collection::vec(0u32..12, 0..40),
        linear in any::<bool>(),
        per_level in 1u32..15,
    ) {
        let config = DifficultyConfig {
            lines_per_level: per_level,
            curve: if linear {
                SpeedCurve::Linear { step_ms: 45 }
            } else {
                SpeedCurve::default()
            },
            ..DifficultyConfig::default()
        };
        let min = Duration::from_millis(config.min_interval_ms);
        let mut controller = DifficultyController::new(config).unwrap();
        let mut events = EventQueue::new();

        let mut level = controller.level();
        let mut interval = controller.drop_interval();
        for lines in batches {
            controller.process_lines_cleared(lines, &mut events);
            prop_assert!(controller.level() >= level);
            prop_assert!(controller.level() <= 30);
            prop_assert!(controller.drop_interval() <= interval);
            prop_assert!(controller.drop_interval() >= min);
            prop_assert!(controller.tier() >= tetrs_engine::Tier::for_level(level));
            level = controller.level();
            interval = controller.drop_interval();
        }
    }

    #[test]
    fn random_rollout_keeps_piece_legal(seed in any::<u64>(), inputs in prop::collection::vec(0u8..8, 1..300)) {
        let mut game = Game::with_seed(EngineConfig::default(), seed).unwrap();
        game.start();
        let mut score = 0;
        let mut lines = 0;
        let mut level = 1;

        for input in inputs {
            match input {
                0 => { game.move_tetromino(-1, 0); }
                1 => { game.move_tetromino(1, 0); }
                2 => { game.rotate_tetromino(RotationDirection::Clockwise); }
                3 => { game.rotate_tetromino(RotationDirection::CounterClockwise); }
                4 => { game.soft_drop(); }
                5 => { game.hard_drop(); }
                _ => game.tick(Duration::from_millis(250)),
            }

            let state = game.game_state();
            prop_assert!(state.score >= score);
            prop_assert!(state.lines >= lines);
            prop_assert!(state.level >= level);
            score = state.score;
            lines = state.lines;
            level = state.level;

            if game.is_running() {
                let piece = game.current_tetromino().unwrap();
                prop_assert!(!collides(&piece, game.board(), 0, 0));
            } else {
                prop_assert!(game.is_game_over());
                break;
            }
        }
    }
}
