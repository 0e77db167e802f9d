use crate::board::{Board, Side};
use crate::random::RandomGenerator;
use ego_tree::{NodeId, NodeRef, Tree};

/// Weight of the exploration term in `wins/plays + sqrt(C * ln(total_plays) / plays)`.
const EXPLORATION_PARAMETER: f64 = 2.0;

/// Represents a single node in the Monte Carlo search tree.
///
/// Nodes live in an [`ego_tree::Tree`] arena: children and the parent are reached through
/// node ids, and the parent link is only followed while backpropagating.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsNode {
    /// The column played to reach this node from its parent. `None` for the root.
    pub action: Option<usize>,
    /// The side credited with a win here: the side that chose `action`, or the side to move
    /// at the root.
    pub side: Side,
    /// Rollouts through this node won by `side`.
    pub wins: u32,
    /// Rollouts through this node.
    pub plays: u32,
}

impl MctsNode {
    /// Creates the root node for a position where `side_to_move` plays next.
    pub fn root(side_to_move: Side) -> Self {
        MctsNode {
            action: None,
            side: side_to_move,
            wins: 0,
            plays: 0,
        }
    }

    /// Creates the node reached when `side` plays `column`.
    pub fn new(column: usize, side: Side) -> Self {
        MctsNode {
            action: Some(column),
            side,
            wins: 0,
            plays: 0,
        }
    }

    /// Calculates the win rate of this node.
    pub fn wins_rate(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            (self.wins as f64) / (self.plays as f64)
        }
    }

    /// Calculates the UCT value of this node for a search that has run `total_plays` iterations.
    pub fn uct_value(&self, total_plays: u32) -> f64 {
        if self.plays == 0 {
            return f64::INFINITY;
        }
        let plays = self.plays as f64;
        self.wins_rate() + f64::sqrt(EXPLORATION_PARAMETER * f64::ln(total_plays as f64) / plays)
    }

    /// Counts one finished rollout. `None` is a draw and only counts the play.
    pub fn record(&mut self, winner: Option<Side>) {
        self.plays += 1;
        if winner == Some(self.side) {
            self.wins += 1;
        }
    }

    /// Statistics keyed by the column leading here; `None` for the root.
    pub fn stats(&self) -> Option<ColumnStats> {
        self.action.map(|column| ColumnStats {
            column,
            wins: self.wins,
            plays: self.plays,
        })
    }
}

/// Rollout statistics of one root move, the unit that is merged across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnStats {
    pub column: usize,
    pub wins: u32,
    pub plays: u32,
}

impl ColumnStats {
    pub fn wins_rate(&self) -> f64 {
        if self.plays == 0 {
            0.0
        } else {
            (self.wins as f64) / (self.plays as f64)
        }
    }
}

/// Returns the column with the highest win rate. The first one wins ties.
pub fn best_column<I>(stats: I) -> Option<usize>
where
    I: IntoIterator<Item = ColumnStats>,
{
    let mut max_win_rate = -1.0;
    let mut best = None;
    for entry in stats {
        let win_rate = entry.wins_rate();
        if win_rate > max_win_rate {
            max_win_rate = win_rate;
            best = Some(entry.column);
        }
    }
    best
}

/// Returns the action of the child with the best win rate, ignoring exploration.
pub fn most_selected_move(node: NodeRef<'_, MctsNode>) -> Option<usize> {
    best_column(node.children().filter_map(|child| child.value().stats()))
}

fn best_uct_child(
    node: NodeRef<'_, MctsNode>,
    total_parent_plays: u32,
) -> Option<NodeRef<'_, MctsNode>> {
    let mut max_uct = f64::NEG_INFINITY;
    let mut best = None;
    for child in node.children() {
        let uct = child.value().uct_value(total_parent_plays);
        if uct > max_uct {
            max_uct = uct;
            best = Some(child);
        }
    }
    best
}

/// Selection: walks down from the root along the best UCT children, playing their moves on `board`.
///
/// Every depth scores its children against `total_parent_plays`, the visit count of the root.
/// Stops at the first node that is terminal or still has an untried move.
pub fn select_node_to_expand(
    tree: &Tree<MctsNode>,
    total_parent_plays: u32,
    board: &mut Board,
) -> NodeId {
    let mut node = tree.root();
    loop {
        if board.is_terminal() {
            return node.id();
        }
        if node.children().count() < board.legal_move_count() {
            return node.id();
        }
        let Some(child) = best_uct_child(node, total_parent_plays) else {
            return node.id();
        };
        let Some(column) = child.value().action else {
            return node.id();
        };
        if board.play(column).is_err() {
            return node.id();
        }
        node = child;
    }
}

/// Expansion: adds one random untried move below `node_id` and plays it on `board`.
///
/// Returns the new child, or `node_id` itself when the position is terminal.
pub fn expand<R: RandomGenerator>(
    tree: &mut Tree<MctsNode>,
    node_id: NodeId,
    board: &mut Board,
    random: &mut R,
) -> NodeId {
    if board.is_terminal() {
        return node_id;
    }
    let Some(node) = tree.get(node_id) else {
        return node_id;
    };

    let untried: Vec<usize> = board
        .possible_moves()
        .into_iter()
        .filter(|&column| !node.children().any(|child| child.value().action == Some(column)))
        .collect();
    let Some(&column) = random.get_random_from_slice(&untried) else {
        return node_id;
    };

    let mover = board.current_side();
    if board.play(column).is_err() {
        return node_id;
    }
    match tree.get_mut(node_id) {
        Some(mut parent) => parent.append(MctsNode::new(column, mover)).id(),
        None => node_id,
    }
}

/// Simulation: plays uniformly random moves until someone wins or the board fills up.
///
/// Returns the winner, or `None` for a draw.
pub fn simulate<R: RandomGenerator>(board: &mut Board, random: &mut R) -> Option<Side> {
    if board.has_winning_line_through_last_move() {
        return Some(board.current_side().opposite());
    }
    while let Some(column) = board.random_move(random) {
        if board.drop_piece(column).is_err() {
            break;
        }
        if board.has_winning_line_through_last_move() {
            return Some(board.current_side());
        }
        board.switch_turn();
    }
    None
}

/// Backpropagation: records the rollout result on `node_id` and every ancestor.
pub fn backpropagate(tree: &mut Tree<MctsNode>, node_id: NodeId, winner: Option<Side>) {
    let mut current = Some(node_id);
    while let Some(id) = current {
        let Some(mut node) = tree.get_mut(id) else {
            break;
        };
        node.value().record(winner);
        current = node.parent().map(|parent| parent.id());
    }
}
