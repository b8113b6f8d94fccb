//! Game board representation, placement and line clearing

use crate::collision;
use crate::error::EngineError;
use crate::piece::Piece;
use crate::tetromino::TetrominoType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
/// Rows at the top of the board that end the game once anything locks there
pub const SPAWN_BUFFER_ROWS: usize = 4;

/// Smallest board that can still hold an I piece in both orientations
const MIN_WIDTH: usize = 4;
const MIN_HEIGHT: usize = SPAWN_BUFFER_ROWS + 1;

/// A cell on the board - either empty or filled by a tetromino kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn kind(&self) -> Option<TetrominoType> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(*kind),
        }
    }
}

/// Result of a line clear pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineClear {
    /// Number of rows removed
    pub count: usize,
    /// Indices of the removed rows before compaction, top to bottom
    pub rows: Vec<usize>,
}

/// Plain snapshot crossing the persistence boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardData {
    pub board: Vec<Vec<Option<TetrominoType>>>,
    pub lines_cleared: u64,
    pub width: usize,
    pub height: usize,
}

/// Which fields of a snapshot were applied by `Board::load_from_data`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: Vec<&'static str>,
    pub rejected: Vec<&'static str>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    /// Grid stored as rows[row][col], row 0 is the top
    rows: Vec<Vec<Cell>>,
    /// Lines cleared over the board's lifetime
    lines_cleared: u64,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty(BOARD_WIDTH, BOARD_HEIGHT)
    }
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Self::empty(width, height))
    }

    fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![Cell::Empty; width]; height],
            lines_cleared: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn lines_cleared(&self) -> u64 {
        self.lines_cleared
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Clear every cell and the line counter
    pub fn reset(&mut self) {
        *self = Self::empty(self.width, self.height);
    }

    /// Get the cell at column `x`, row `y`.
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
    }

    /// Set a cell at a position.
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self
            .rows
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Check if a position is within bounds and empty
    pub fn is_cell_free(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| cell.is_empty())
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_some_and(|cell| cell.is_filled())
    }

    /// Lock a piece onto the board.
    /// Nothing is written unless every block lands on a free in-bounds cell.
    pub fn place(&mut self, piece: &Piece) -> bool {
        if collision::collides(piece, self, 0, 0) {
            return false;
        }
        let cell = Cell::Filled(piece.kind);
        for (x, y) in piece.block_positions() {
            self.rows[y as usize][x as usize] = cell;
        }
        true
    }

    /// Copy of the grid with the piece stamped in.
    /// Blocks outside the board are skipped.
    pub fn preview_placement(&self, piece: &Piece) -> Vec<Vec<Cell>> {
        let mut grid = self.rows.clone();
        for (x, y) in piece.block_positions() {
            if x < 0 || y < 0 {
                continue;
            }
            if let Some(slot) = grid
                .get_mut(y as usize)
                .and_then(|row| row.get_mut(x as usize))
            {
                *slot = Cell::Filled(piece.kind);
            }
        }
        grid
    }

    /// Clear completed lines and return the number cleared
    pub fn clear_lines(&mut self) -> usize {
        self.clear_lines_detailed().count
    }

    /// Clear completed lines, reporting which rows went away.
    /// All full rows are removed in a single pass.
    pub fn clear_lines_detailed(&mut self) -> LineClear {
        let mut cleared = Vec::new();
        let mut write_row = self.height;

        for read_row in (0..self.height).rev() {
            if self.is_line_full(read_row) {
                cleared.push(read_row);
            } else {
                write_row -= 1;
                if write_row != read_row {
                    self.rows.swap(write_row, read_row);
                }
            }
        }

        // Fill the top with empty rows
        for row in &mut self.rows[..write_row] {
            row.fill(Cell::Empty);
        }

        cleared.reverse();
        self.lines_cleared += cleared.len() as u64;
        LineClear {
            count: cleared.len(),
            rows: cleared,
        }
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.rows[row].iter().all(|cell| cell.is_filled())
    }

    /// Check if the board is completely empty (for perfect-clear detection)
    pub fn is_empty(&self) -> bool {
        self.rows
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Stack height of every column, 0 for an empty column
    pub fn column_heights(&self) -> Vec<usize> {
        (0..self.width)
            .map(|col| {
                self.rows
                    .iter()
                    .position(|row| row[col].is_filled())
                    .map_or(0, |top| self.height - top)
            })
            .collect()
    }

    /// Empty cells with a filled cell somewhere above them in the same column
    pub fn hole_count(&self) -> usize {
        (0..self.width)
            .map(|col| {
                self.rows
                    .iter()
                    .skip_while(|row| row[col].is_empty())
                    .filter(|row| row[col].is_empty())
                    .count()
            })
            .sum()
    }

    /// Sum of height differences between neighbouring columns
    pub fn roughness(&self) -> usize {
        self.column_heights()
            .windows(2)
            .map(|pair| pair[0].abs_diff(pair[1]))
            .sum()
    }

    /// Check if game is over (blocks locked inside the spawn buffer)
    pub fn is_game_over(&self) -> bool {
        self.rows
            .iter()
            .take(SPAWN_BUFFER_ROWS)
            .any(|row| row.iter().any(|cell| cell.is_filled()))
    }

    /// Snapshot for the persistence collaborator
    pub fn export_data(&self) -> BoardData {
        BoardData {
            board: self
                .rows
                .iter()
                .map(|row| row.iter().map(Cell::kind).collect())
                .collect(),
            lines_cleared: self.lines_cleared,
            width: self.width,
            height: self.height,
        }
    }

    /// Best-effort restore from a snapshot.
    /// Malformed fields are skipped and the previous state is kept for them.
    pub fn load_from_data(&mut self, data: &Value) -> LoadReport {
        let mut report = LoadReport::default();

        for (field, expected) in [("width", self.width), ("height", self.height)] {
            match data.get(field) {
                None => {}
                Some(value) if value.as_u64() == Some(expected as u64) => {
                    report.accepted.push(field)
                }
                Some(value) => {
                    tracing::warn!(field, %value, expected, "snapshot dimension does not match board");
                    report.rejected.push(field);
                }
            }
        }

        if let Some(value) = data.get("board") {
            match self.parse_grid(value) {
                Some(rows) => {
                    self.rows = rows;
                    report.accepted.push("board");
                }
                None => {
                    tracing::warn!("ignoring malformed board grid in snapshot");
                    report.rejected.push("board");
                }
            }
        }

        if let Some(value) = data.get("linesCleared") {
            match value.as_u64() {
                Some(lines) => {
                    self.lines_cleared = lines;
                    report.accepted.push("linesCleared");
                }
                None => {
                    tracing::warn!(%value, "ignoring non-numeric linesCleared in snapshot");
                    report.rejected.push("linesCleared");
                }
            }
        }

        report
    }

    fn parse_grid(&self, value: &Value) -> Option<Vec<Vec<Cell>>> {
        let rows = value.as_array()?;
        if rows.len() != self.height {
            return None;
        }
        rows.iter()
            .map(|row| -> Option<Vec<Cell>> {
                let cols = row.as_array()?;
                if cols.len() != self.width {
                    return None;
                }
                cols.iter().map(parse_cell).collect()
            })
            .collect()
    }
}

/// `null`, `0` and `""` are empty; a kind letter is filled
fn parse_cell(value: &Value) -> Option<Cell> {
    match value {
        Value::Null => Some(Cell::Empty),
        Value::Number(n) if n.as_u64() == Some(0) => Some(Cell::Empty),
        Value::String(s) if s.is_empty() => Some(Cell::Empty),
        Value::String(s) => TetrominoType::from_letter(s).map(Cell::Filled),
        _ => None,
    }
}
