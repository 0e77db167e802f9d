use log::warn;
use thiserror::Error;

/// Smallest accepted number of rows or columns.
pub const MIN_DIMENSION: usize = 4;
/// Largest accepted number of rows or columns.
pub const MAX_DIMENSION: usize = 8;
pub const MIN_WIN_LENGTH: usize = 1;

pub const MIN_ITERATIONS: u32 = 1;
pub const MAX_ITERATIONS: u32 = 1_000_000;
pub const MIN_WORKERS: usize = 1;
pub const MAX_WORKERS: usize = 64;

pub const DEFAULT_ITERATIONS: u32 = 100;
pub const DEFAULT_WORKERS: usize = 2;

/// Errors reported by the strict `try_new` constructors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} = {value} is outside the accepted range {min}..={max}")]
    OutOfRange {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

fn clamp_logged(name: &'static str, value: usize, min: usize, max: usize) -> usize {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("{name} = {value} is outside {min}..={max}, using {clamped}");
    }
    clamped
}

fn check_range(
    name: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<usize, ConfigError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Shape and winning rule of a board.
///
/// Values are always within range: [`BoardConfig::new`] clamps, [`BoardConfig::try_new`] rejects.
/// The win length never exceeds the larger board dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    rows: usize,
    columns: usize,
    win_length: usize,
    allow_diagonal: bool,
}

impl Default for BoardConfig {
    /// The classic 6x7 board with four in a row, diagonals included.
    fn default() -> Self {
        Self {
            rows: 6,
            columns: 7,
            win_length: 4,
            allow_diagonal: true,
        }
    }
}

impl BoardConfig {
    /// Creates a configuration, clamping every value into its accepted range.
    pub fn new(rows: usize, columns: usize, win_length: usize, allow_diagonal: bool) -> Self {
        let rows = clamp_logged("rows", rows, MIN_DIMENSION, MAX_DIMENSION);
        let columns = clamp_logged("columns", columns, MIN_DIMENSION, MAX_DIMENSION);
        let win_length = clamp_logged(
            "win_length",
            win_length,
            MIN_WIN_LENGTH,
            rows.max(columns),
        );
        Self {
            rows,
            columns,
            win_length,
            allow_diagonal,
        }
    }

    /// Creates a configuration, failing on the first value outside its accepted range.
    pub fn try_new(
        rows: usize,
        columns: usize,
        win_length: usize,
        allow_diagonal: bool,
    ) -> Result<Self, ConfigError> {
        let rows = check_range("rows", rows, MIN_DIMENSION, MAX_DIMENSION)?;
        let columns = check_range("columns", columns, MIN_DIMENSION, MAX_DIMENSION)?;
        let win_length = check_range("win_length", win_length, MIN_WIN_LENGTH, rows.max(columns))?;
        Ok(Self {
            rows,
            columns,
            win_length,
            allow_diagonal,
        })
    }

    /// Enables or disables diagonal lines.
    pub fn with_allow_diagonal(mut self, allow_diagonal: bool) -> Self {
        self.allow_diagonal = allow_diagonal;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn allow_diagonal(&self) -> bool {
        self.allow_diagonal
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }
}

/// Preset search strengths.
///
/// Around 20 iterations per worker is easy to beat, 80 is hard, and beyond a few
/// hundred the player rarely loses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Challenging,
}

impl Difficulty {
    /// Number of iterations each worker runs at this difficulty.
    pub fn iterations(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 40,
            Difficulty::Hard => 80,
            Difficulty::Challenging => 1000,
        }
    }
}

/// Budget of one move search: `worker_count` independent trees of `iterations_per_worker`
/// iterations each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    iterations_per_worker: u32,
    worker_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations_per_worker: DEFAULT_ITERATIONS,
            worker_count: DEFAULT_WORKERS,
        }
    }
}

impl SearchConfig {
    /// Creates a search budget, clamping both values into their accepted ranges.
    pub fn new(iterations_per_worker: u32, worker_count: usize) -> Self {
        let iterations_per_worker = clamp_logged(
            "iterations_per_worker",
            iterations_per_worker as usize,
            MIN_ITERATIONS as usize,
            MAX_ITERATIONS as usize,
        ) as u32;
        let worker_count = clamp_logged("worker_count", worker_count, MIN_WORKERS, MAX_WORKERS);
        Self {
            iterations_per_worker,
            worker_count,
        }
    }

    /// Creates a search budget, failing when a value is outside its accepted range.
    pub fn try_new(iterations_per_worker: u32, worker_count: usize) -> Result<Self, ConfigError> {
        let iterations_per_worker = check_range(
            "iterations_per_worker",
            iterations_per_worker as usize,
            MIN_ITERATIONS as usize,
            MAX_ITERATIONS as usize,
        )? as u32;
        let worker_count = check_range("worker_count", worker_count, MIN_WORKERS, MAX_WORKERS)?;
        Ok(Self {
            iterations_per_worker,
            worker_count,
        })
    }

    pub fn for_difficulty(difficulty: Difficulty, worker_count: usize) -> Self {
        Self::new(difficulty.iterations(), worker_count)
    }

    pub fn iterations_per_worker(&self) -> u32 {
        self.iterations_per_worker
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Iterations run across all workers for one move.
    pub fn total_iterations(&self) -> u64 {
        self.iterations_per_worker as u64 * self.worker_count as u64
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{BoardConfig, ConfigError, Difficulty, SearchConfig};

    #[test]
    fn board_config_clamps_dimensions_and_win_length() {
        // act
        let config = BoardConfig::new(2, 12, 20, false);

        // assert
        assert_eq!(config.rows(), 4);
        assert_eq!(config.columns(), 8);
        assert_eq!(config.win_length(), 8);
        assert!(!config.allow_diagonal());
    }

    #[test]
    fn win_length_is_bounded_by_larger_dimension() {
        let config = BoardConfig::new(4, 5, 6, true);
        assert_eq!(config.win_length(), 5);

        let config = BoardConfig::new(6, 7, 0, true);
        assert_eq!(config.win_length(), 1);
    }

    #[test]
    fn diagonal_toggle_keeps_shape() {
        let config = BoardConfig::default().with_allow_diagonal(false);
        assert!(!config.allow_diagonal());
        assert_eq!((config.rows(), config.columns(), config.win_length()), (6, 7, 4));
        assert!(config.with_allow_diagonal(true).allow_diagonal());
    }

    #[test]
    fn try_new_rejects_out_of_range_values() {
        assert_eq!(
            BoardConfig::try_new(6, 9, 4, true),
            Err(ConfigError::OutOfRange {
                name: "columns",
                value: 9,
                min: 4,
                max: 8,
            })
        );
        assert!(matches!(
            BoardConfig::try_new(4, 4, 5, true),
            Err(ConfigError::OutOfRange { name: "win_length", .. })
        ));
        assert!(BoardConfig::try_new(8, 8, 8, false).is_ok());
    }

    #[test]
    fn search_config_clamps_and_counts() {
        let config = SearchConfig::new(0, 0);
        assert_eq!(config.iterations_per_worker(), 1);
        assert_eq!(config.worker_count(), 1);

        let config = SearchConfig::new(250, 4);
        assert_eq!(config.total_iterations(), 1000);

        assert!(SearchConfig::try_new(10, 0).is_err());
        assert_eq!(
            SearchConfig::for_difficulty(Difficulty::Hard, 2).iterations_per_worker(),
            80
        );
    }
}
