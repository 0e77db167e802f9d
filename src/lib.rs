//! A Connect-N board model with a Monte Carlo tree search player.
//!
//! The [`board::Board`] tracks pieces, turns and wins for any board between 4x4 and 8x8
//! and any line length. The [`move_selector::MoveSelector`] picks a column for the
//! computer player by growing several independent search trees in parallel from the
//! current position, each driven by uniformly random rollouts, and merging their
//! statistics at the root.
//!
//! # Example
//!
//! ```rust
//! use connect_n_mcts::board::{Board, GameState, Side};
//! use connect_n_mcts::config::{BoardConfig, SearchConfig};
//! use connect_n_mcts::move_selector::MoveSelector;
//! use connect_n_mcts::random::StandardRandomGenerator;
//!
//! let mut board = Board::with_first_side(BoardConfig::default(), Side::A);
//! board.drop_piece(3).unwrap();
//! board.switch_turn();
//!
//! let mut selector: MoveSelector<StandardRandomGenerator> = MoveSelector::builder()
//!     .with_config(SearchConfig::new(200, 2))
//!     .build()
//!     .unwrap();
//!
//! let column = selector.choose_column(&board).unwrap();
//! board.drop_piece(column).unwrap();
//! assert_eq!(board.state(), GameState::InProgress);
//! ```

/// The game board, sides, and game states.
pub mod board;
/// Board and search settings with range checking.
pub mod config;
/// A single search tree and its builder.
pub mod mcts;
/// Search tree nodes and the four MCTS phases.
pub mod mcts_node;
/// Parallel root search and statistics merging.
pub mod move_selector;
/// Traits and implementations for random number generation.
pub mod random;
