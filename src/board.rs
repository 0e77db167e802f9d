use crate::config::BoardConfig;
use crate::random::RandomGenerator;
use std::fmt;
use thiserror::Error;

/// One of the two sides of the game.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Returns the other side.
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// The authoritative state of a game, as reported by [`Board::state`].
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameState {
    /// No winning line and at least one empty cell.
    InProgress,
    /// The given side completed a line through the last placed piece.
    Win(Side),
    /// The board is full and nobody won.
    Draw,
}

impl GameState {
    pub fn is_over(self) -> bool {
        self != GameState::InProgress
    }

    /// Translates the state into the outcome seen by `side`, or `None` while the game is running.
    pub fn outcome_for(self, side: Side) -> Option<GameOutcome> {
        match self {
            GameState::InProgress => None,
            GameState::Win(winner) if winner == side => Some(GameOutcome::Win),
            GameState::Win(_) => Some(GameOutcome::Lose),
            GameState::Draw => Some(GameOutcome::Draw),
        }
    }
}

/// The end of a game from one side's point of view.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum GameOutcome {
    Win,
    Lose,
    Draw,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("column {column} is full")]
    InvalidMove { column: usize },

    #[error("column {column} is outside a board with {columns} columns")]
    ColumnOutOfBounds { column: usize, columns: usize },

    #[error("grid does not match the board: {0}")]
    GridMismatch(&'static str),
}

const ORTHOGONAL_AXES: [(isize, isize); 2] = [(0, 1), (1, 0)];
const ALL_AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A Connect-N board.
///
/// Cells are stored column by column with row 0 at the bottom, so a dropped piece
/// lands in the lowest empty row of its column:
/// ```text
/// row 2: [2][5][8]
/// row 1: [1][4][7]
/// row 0: [0][3][6]
/// ```
///
/// Placing a piece and passing the turn are separate steps ([`Board::drop_piece`] and
/// [`Board::switch_turn`]), so real moves and search look-ahead share the same primitive.
#[derive(Debug)]
pub struct Board {
    config: BoardConfig,
    cells: Vec<Option<Side>>,
    current_side: Side,
    piece_count: usize,
    last_move: Option<(usize, usize)>,
}

impl Board {
    /// Creates an empty board with a randomly chosen side to move first.
    pub fn new(config: BoardConfig) -> Self {
        let first = if rand::random::<bool>() { Side::A } else { Side::B };
        Board::with_first_side(config, first)
    }

    /// Creates an empty board where `first` moves first.
    pub fn with_first_side(config: BoardConfig, first: Side) -> Self {
        Self {
            config,
            cells: vec![None; config.cell_count()],
            current_side: first,
            piece_count: 0,
            last_move: None,
        }
    }

    /// Builds a board from an explicit grid, indexed as `grid[column][row]`.
    ///
    /// `last_move` must point at an occupied cell, and is required as soon as the grid holds
    /// a piece.
    pub fn from_grid(
        config: BoardConfig,
        grid: Vec<Vec<Option<Side>>>,
        side_to_move: Side,
        last_move: Option<(usize, usize)>,
    ) -> Result<Self, BoardError> {
        if grid.len() != config.columns() {
            return Err(BoardError::GridMismatch("wrong number of columns"));
        }
        if grid.iter().any(|column| column.len() != config.rows()) {
            return Err(BoardError::GridMismatch("wrong number of rows"));
        }

        let cells: Vec<Option<Side>> = grid.into_iter().flatten().collect();
        let piece_count = cells.iter().filter(|cell| cell.is_some()).count();
        let board = Self {
            config,
            cells,
            current_side: side_to_move,
            piece_count,
            last_move,
        };

        match last_move {
            None if piece_count > 0 => Err(BoardError::GridMismatch("last move is missing")),
            Some((column, row)) if board.cell(column, row).is_none() => {
                Err(BoardError::GridMismatch("last move points at an empty cell"))
            }
            _ => Ok(board),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn rows(&self) -> usize {
        self.config.rows()
    }

    pub fn columns(&self) -> usize {
        self.config.columns()
    }

    /// The side whose piece the next drop places.
    pub fn current_side(&self) -> Side {
        self.current_side
    }

    pub fn piece_count(&self) -> usize {
        self.piece_count
    }

    /// `(column, row)` of the most recently placed piece.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Returns the piece at `(column, row)`; out of bounds cells read as empty.
    pub fn cell(&self, column: usize, row: usize) -> Option<Side> {
        if column >= self.columns() || row >= self.rows() {
            return None;
        }
        self.cells[self.index(column, row)]
    }

    /// A column is full when its topmost cell is occupied. Columns outside the board count as full.
    pub fn is_column_full(&self, column: usize) -> bool {
        column >= self.columns() || self.cell(column, self.rows() - 1).is_some()
    }

    /// Columns that can still take a piece, in ascending order.
    pub fn possible_moves(&self) -> Vec<usize> {
        (0..self.columns())
            .filter(|&column| !self.is_column_full(column))
            .collect()
    }

    /// Number of columns that can still take a piece.
    pub fn legal_move_count(&self) -> usize {
        (0..self.columns())
            .filter(|&column| !self.is_column_full(column))
            .count()
    }

    /// `(column, row)` where a piece dropped into each non-full column would land.
    pub fn possible_cells(&self) -> Vec<(usize, usize)> {
        (0..self.columns())
            .filter_map(|column| self.lowest_empty_row(column).map(|row| (column, row)))
            .collect()
    }

    /// Picks a uniformly random legal column, or `None` when the board is full.
    pub fn random_move<R: RandomGenerator>(&self, rng: &mut R) -> Option<usize> {
        let count = self.legal_move_count();
        if count == 0 {
            return None;
        }
        let nth = rng.next_range(0, count);
        (0..self.columns())
            .filter(|&column| !self.is_column_full(column))
            .nth(nth)
    }

    /// Places a piece of the current side in `column` and returns the row it landed in.
    ///
    /// The turn is not passed. On error the board is left untouched.
    pub fn drop_piece(&mut self, column: usize) -> Result<usize, BoardError> {
        if column >= self.columns() {
            return Err(BoardError::ColumnOutOfBounds {
                column,
                columns: self.columns(),
            });
        }
        if self.is_column_full(column) {
            return Err(BoardError::InvalidMove { column });
        }
        let row = self
            .lowest_empty_row(column)
            .ok_or(BoardError::InvalidMove { column })?;

        let index = self.index(column, row);
        self.cells[index] = Some(self.current_side);
        self.piece_count += 1;
        self.last_move = Some((column, row));
        Ok(row)
    }

    /// Passes the turn to the other side.
    pub fn switch_turn(&mut self) {
        self.current_side = self.current_side.opposite();
    }

    /// Drops a piece and passes the turn.
    pub fn play(&mut self, column: usize) -> Result<usize, BoardError> {
        let row = self.drop_piece(column)?;
        self.switch_turn();
        Ok(row)
    }

    pub fn is_full(&self) -> bool {
        self.piece_count == self.config.cell_count()
    }

    /// Checks whether the last placed piece completes a line of `win_length` pieces.
    ///
    /// Any new line has to pass through the last piece, so only the axes through that
    /// cell are counted, in both directions, and each direction stops at the first
    /// foreign piece, empty cell or edge.
    pub fn has_winning_line_through_last_move(&self) -> bool {
        let Some((column, row)) = self.last_move else {
            return false;
        };
        let Some(side) = self.cell(column, row) else {
            return false;
        };

        let needed = self.config.win_length() - 1;
        let axes: &[(isize, isize)] = if self.config.allow_diagonal() {
            &ALL_AXES
        } else {
            &ORTHOGONAL_AXES
        };

        axes.iter().any(|&(dc, dr)| {
            let forward = self.count_direction(column, row, (dc, dr), side, needed);
            let backward = self.count_direction(column, row, (-dc, -dr), side, needed - forward);
            forward + backward >= needed
        })
    }

    /// True when the game cannot continue from this position.
    pub fn is_terminal(&self) -> bool {
        self.is_full() || self.has_winning_line_through_last_move()
    }

    pub fn state(&self) -> GameState {
        if self.has_winning_line_through_last_move() {
            if let Some(winner) = self.last_move.and_then(|(column, row)| self.cell(column, row)) {
                return GameState::Win(winner);
            }
        }
        if self.is_full() {
            GameState::Draw
        } else {
            GameState::InProgress
        }
    }

    #[inline]
    fn index(&self, column: usize, row: usize) -> usize {
        column * self.rows() + row
    }

    fn lowest_empty_row(&self, column: usize) -> Option<usize> {
        (0..self.rows()).find(|&row| self.cell(column, row).is_none())
    }

    /// Counts consecutive pieces of `side` starting next to `(column, row)`, up to `limit`.
    fn count_direction(
        &self,
        column: usize,
        row: usize,
        (dc, dr): (isize, isize),
        side: Side,
        limit: usize,
    ) -> usize {
        let (mut c, mut r) = (column as isize, row as isize);
        let mut count = 0;
        while count < limit {
            c += dc;
            r += dr;
            if c < 0 || r < 0 || self.cell(c as usize, r as usize) != Some(side) {
                break;
            }
            count += 1;
        }
        count
    }
}

impl Clone for Board {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            cells: self.cells.clone(),
            current_side: self.current_side,
            piece_count: self.piece_count,
            last_move: self.last_move,
        }
    }

    /// Reuses the grid allocation, which keeps resetting the search board cheap.
    fn clone_from(&mut self, source: &Self) {
        self.config = source.config;
        self.cells.clone_from(&source.cells);
        self.current_side = source.current_side;
        self.piece_count = source.piece_count;
        self.last_move = source.last_move;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows()).rev() {
            for column in 0..self.columns() {
                let symbol = match self.cell(column, row) {
                    None => '.',
                    Some(Side::A) => 'A',
                    Some(Side::B) => 'B',
                };
                write!(f, "{symbol} ")?;
            }
            writeln!(f)?;
        }
        for column in 0..self.columns() {
            write!(f, "{column} ")?;
        }
        writeln!(f)
    }
}
