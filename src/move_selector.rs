//! Root-parallel move selection.
//!
//! Several independent trees are grown from the same position on a fixed-size worker
//! pool. Once every worker has finished, the root moves are merged by column and the
//! column with the best combined win rate is played.

use crate::board::Board;
use crate::config::{Difficulty, SearchConfig};
use crate::mcts::MonteCarloTreeSearch;
use crate::mcts_node::{ColumnStats, best_column};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use log::{debug, trace};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

/// Errors that can occur while choosing a move.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No legal moves available")]
    NoLegalMove,

    #[error("Failed to start search workers: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// What a single worker found.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerReport {
    pub seed: u64,
    pub iterations: u32,
    pub root_plays: u32,
    /// Root moves in the order the worker expanded them.
    pub children: Vec<ColumnStats>,
}

/// Result of one move search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub column: usize,
    /// Empty when the move was chosen without searching.
    pub workers: Vec<WorkerReport>,
    pub merged: Vec<ColumnStats>,
}

impl SearchReport {
    /// Iterations run across all workers.
    pub fn total_iterations(&self) -> u64 {
        self.workers
            .iter()
            .map(|worker| worker.iterations as u64)
            .sum()
    }
}

/// Sums root statistics by column. Columns keep the order in which they were first seen,
/// and a column missing from a worker simply contributes nothing.
pub fn merge_root_statistics<'a, I>(workers: I) -> Vec<ColumnStats>
where
    I: IntoIterator<Item = &'a [ColumnStats]>,
{
    let mut merged: Vec<ColumnStats> = Vec::new();
    for children in workers {
        for child in children {
            match merged.iter_mut().find(|entry| entry.column == child.column) {
                Some(entry) => {
                    entry.wins += child.wins;
                    entry.plays += child.plays;
                }
                None => merged.push(*child),
            }
        }
    }
    merged
}

fn format_stats(stats: &[ColumnStats]) -> String {
    stats
        .iter()
        .map(|entry| format!("{}: {:.0}%", entry.column, entry.wins_rate() * 100.0))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn run_worker<K: RandomGenerator>(board: &Board, seed: u64, iterations: u32) -> WorkerReport {
    let mut mcts = MonteCarloTreeSearch::builder(board.clone())
        .with_random_generator(K::from_seed(seed))
        .with_node_capacity(iterations as usize + 1)
        .build();
    mcts.iterate_n_times(iterations);

    WorkerReport {
        seed,
        iterations: mcts.iterations(),
        root_plays: mcts.get_root().value().plays,
        children: mcts.root_statistics(),
    }
}

/// Picks columns for the non-human player.
pub struct MoveSelector<K: RandomGenerator = StandardRandomGenerator> {
    config: SearchConfig,
    pool: ThreadPool,
    random: K,
}

/// A builder for creating instances of `MoveSelector`.
pub struct MoveSelectorBuilder<K: RandomGenerator> {
    config: SearchConfig,
    random_generator: K,
}

impl<K: RandomGenerator> Default for MoveSelectorBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RandomGenerator> MoveSelectorBuilder<K> {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
            random_generator: K::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses the iteration budget of a difficulty preset, keeping the worker count.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.config = SearchConfig::for_difficulty(difficulty, self.config.worker_count());
        self
    }

    /// Sets the generator that opens games and seeds the workers.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    pub fn build(self) -> Result<MoveSelector<K>, SearchError> {
        MoveSelector::new(self.config, self.random_generator)
    }
}

impl<K: RandomGenerator> MoveSelector<K> {
    /// Returns a new builder for `MoveSelector`.
    pub fn builder() -> MoveSelectorBuilder<K> {
        MoveSelectorBuilder::new()
    }

    /// Creates a selector with a pool of exactly `config.worker_count()` threads.
    pub fn new(config: SearchConfig, random: K) -> Result<Self, SearchError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_count())
            .thread_name(|index| format!("mcts-worker-{index}"))
            .build()?;
        Ok(Self {
            config,
            pool,
            random,
        })
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Returns the column the side to move in `board` should play.
    pub fn choose_column(&mut self, board: &Board) -> Result<usize, SearchError> {
        Ok(self.search(board)?.column)
    }

    /// Chooses a column and reports the statistics behind the choice.
    ///
    /// An empty board gets a random opening without searching. A finished game has no move.
    pub fn search(&mut self, board: &Board) -> Result<SearchReport, SearchError> {
        if board.is_terminal() {
            return Err(SearchError::NoLegalMove);
        }

        if board.piece_count() == 0 {
            let column = board
                .random_move(&mut self.random)
                .ok_or(SearchError::NoLegalMove)?;
            trace!("Empty board, opening in column {column}");
            return Ok(SearchReport {
                column,
                workers: Vec::new(),
                merged: Vec::new(),
            });
        }

        let iterations = self.config.iterations_per_worker();
        let seeds: Vec<u64> = (0..self.config.worker_count())
            .map(|_| self.random.next_seed())
            .collect();

        let workers: Vec<WorkerReport> = self.pool.install(|| {
            seeds
                .par_iter()
                .map(|&seed| run_worker::<K>(board, seed, iterations))
                .collect()
        });

        let merged = merge_root_statistics(workers.iter().map(|worker| worker.children.as_slice()));
        for (index, worker) in workers.iter().enumerate() {
            debug!("Worker {index}: ( {} )", format_stats(&worker.children));
        }
        debug!("Merged: ( {} )", format_stats(&merged));

        let column = best_column(merged.iter().copied()).ok_or(SearchError::NoLegalMove)?;
        Ok(SearchReport {
            column,
            workers,
            merged,
        })
    }
}

/// One-shot move selection with OS-seeded randomness.
///
/// The budget is clamped like [`SearchConfig::new`].
pub fn choose_column(
    board: &Board,
    iterations_per_worker: u32,
    worker_count: usize,
) -> Result<usize, SearchError> {
    let config = SearchConfig::new(iterations_per_worker, worker_count);
    MoveSelector::new(config, StandardRandomGenerator::default())?.choose_column(board)
}
