use crate::board::Board;
use crate::mcts_node::{self, ColumnStats, MctsNode};
use crate::random::{RandomGenerator, StandardRandomGenerator};
use ego_tree::{NodeId, NodeRef, Tree};

/// Initial arena size of a search tree. Each iteration adds at most one node.
pub const DEFAULT_NODE_CAPACITY: usize = 1024;

/// A single search worker: one tree grown from one position.
///
/// Every iteration resets a private working board to the searched position and runs
/// selection, expansion, simulation and backpropagation against it, in that order.
/// The searched position itself is never modified.
pub struct MonteCarloTreeSearch<K: RandomGenerator = StandardRandomGenerator> {
    tree: Tree<MctsNode>,
    board: Board,
    working_board: Board,
    random: K,
    iterations: u32,
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
pub struct MonteCarloTreeSearchBuilder<K: RandomGenerator> {
    board: Board,
    random_generator: K,
    node_capacity: usize,
}

impl<K: RandomGenerator> MonteCarloTreeSearchBuilder<K> {
    /// Creates a new builder searching the given position.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            random_generator: K::default(),
            node_capacity: DEFAULT_NODE_CAPACITY,
        }
    }

    /// Sets the random number generator used for expansion and rollouts.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Sets how many nodes the tree arena reserves up front.
    pub fn with_node_capacity(mut self, node_capacity: usize) -> Self {
        self.node_capacity = node_capacity;
        self
    }

    pub fn build(self) -> MonteCarloTreeSearch<K> {
        MonteCarloTreeSearch::new(self.board, self.random_generator, self.node_capacity)
    }
}

impl<K: RandomGenerator> MonteCarloTreeSearch<K> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(board: Board) -> MonteCarloTreeSearchBuilder<K> {
        MonteCarloTreeSearchBuilder::new(board)
    }

    /// Creates a search whose root is credited to the side to move in `board`.
    ///
    /// It is recommended to use the builder pattern via `MonteCarloTreeSearch::builder()` instead.
    pub fn new(board: Board, rg: K, node_capacity: usize) -> Self {
        let root = MctsNode::root(board.current_side());
        let working_board = board.clone();
        Self {
            tree: Tree::with_capacity(root, node_capacity.max(1)),
            board,
            working_board,
            random: rg,
            iterations: 0,
        }
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn get_tree(&self) -> &Tree<MctsNode> {
        &self.tree
    }

    /// Returns the root node of the search tree.
    pub fn get_root(&self) -> NodeRef<'_, MctsNode> {
        self.tree.root()
    }

    /// The position being searched.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of iterations run so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Performs one full iteration and returns the node the rollout started from.
    pub fn do_iteration(&mut self) -> NodeId {
        let Self {
            tree,
            board,
            working_board,
            random,
            iterations,
        } = self;

        working_board.clone_from(board);
        let total_plays = tree.root().value().plays;
        let selected = mcts_node::select_node_to_expand(tree, total_plays, working_board);
        let expanded = mcts_node::expand(tree, selected, working_board, random);
        let winner = mcts_node::simulate(working_board, random);
        mcts_node::backpropagate(tree, expanded, winner);

        *iterations += 1;
        expanded
    }

    /// Runs the search for a specified number of iterations.
    pub fn iterate_n_times(&mut self, n: u32) {
        for _ in 0..n {
            self.do_iteration();
        }
    }

    /// The root move with the best win rate, or `None` before anything was expanded.
    pub fn most_selected_move(&self) -> Option<usize> {
        mcts_node::most_selected_move(self.tree.root())
    }

    /// Statistics of every expanded root move, in expansion order.
    pub fn root_statistics(&self) -> Vec<ColumnStats> {
        self.tree
            .root()
            .children()
            .filter_map(|child| child.value().stats())
            .collect()
    }
}

impl MonteCarloTreeSearch<StandardRandomGenerator> {
    pub fn from_board(board: Board) -> Self {
        MonteCarloTreeSearchBuilder::new(board).build()
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Side};
    use crate::config::BoardConfig;
    use crate::mcts::MonteCarloTreeSearch;
    use crate::random::{CustomNumberGenerator, RandomGenerator};

    #[test]
    fn statistics_are_consistent_after_search() {
        // arrange
        let mut board = Board::with_first_side(BoardConfig::default(), Side::A);
        board.play(3).unwrap();
        let mut mcts = MonteCarloTreeSearch::builder(board)
            .with_random_generator(CustomNumberGenerator::default())
            .with_node_capacity(512)
            .build();

        // act
        mcts.iterate_n_times(500);

        // assert
        let root = mcts.get_root().value();
        assert_eq!(root.plays, 500);
        assert_eq!(root.side, Side::B);
        assert_eq!(mcts.iterations(), 500);
        assert_eq!(mcts.root_statistics().len(), 7);
        for node in mcts.get_tree().nodes() {
            let children_plays: u32 = node.children().map(|child| child.value().plays).sum();
            assert!(node.value().plays >= children_plays);
            assert!(node.value().wins <= node.value().plays);
        }
        assert_eq!(mcts.board().piece_count(), 1);
    }

    #[test]
    fn finds_the_winning_column() {
        // arrange: A has three in the bottom row and moves next
        let mut board = Board::with_first_side(BoardConfig::default(), Side::A);
        for column in 0..3 {
            board.play(column).unwrap();
            board.play(column).unwrap();
        }
        assert_eq!(board.current_side(), Side::A);
        let mut mcts = MonteCarloTreeSearch::builder(board)
            .with_random_generator(CustomNumberGenerator::from_seed(11))
            .build();

        // act
        mcts.iterate_n_times(3000);

        // assert
        assert_eq!(mcts.most_selected_move(), Some(3));
    }

    #[test]
    fn same_seed_gives_same_tree() {
        let mut board = Board::with_first_side(BoardConfig::new(5, 5, 4, true), Side::B);
        board.play(2).unwrap();

        let mut first = MonteCarloTreeSearch::builder(board.clone())
            .with_random_generator(CustomNumberGenerator::from_seed(3))
            .build();
        let mut second = MonteCarloTreeSearch::builder(board)
            .with_random_generator(CustomNumberGenerator::from_seed(3))
            .build();
        first.iterate_n_times(300);
        second.iterate_n_times(300);

        assert_eq!(first.root_statistics(), second.root_statistics());
        assert_eq!(first.most_selected_move(), second.most_selected_move());
    }

    #[test]
    fn finished_position_is_never_expanded() {
        let mut board = Board::with_first_side(BoardConfig::new(4, 4, 4, true), Side::A);
        for _ in 0..4 {
            board.drop_piece(1).unwrap();
        }
        board.switch_turn();

        let mut mcts = MonteCarloTreeSearch::from_board(board);
        mcts.iterate_n_times(20);

        let root = mcts.get_root();
        assert!(!root.has_children());
        assert_eq!(root.value().plays, 20);
        assert_eq!(root.value().wins, 0);
        assert_eq!(mcts.most_selected_move(), None);
    }
}
