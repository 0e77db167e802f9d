extern crate connect_n_mcts;

use connect_n_mcts::board::{Board, GameOutcome, Side};
use connect_n_mcts::config::{BoardConfig, Difficulty, SearchConfig};
use connect_n_mcts::move_selector::MoveSelector;
use connect_n_mcts::random::StandardRandomGenerator;
use flexi_logger::Logger;
use log::info;

/// Plays a full game: the search player is side A, a random player is side B.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    let mut board = Board::new(BoardConfig::new(6, 7, 4, true));
    let mut selector: MoveSelector<StandardRandomGenerator> = MoveSelector::builder()
        .with_config(SearchConfig::for_difficulty(Difficulty::Challenging, 2))
        .build()?;
    let mut random_player = StandardRandomGenerator::default();

    info!("Side {:?} opens", board.current_side());

    let outcome = loop {
        let column = match board.current_side() {
            Side::A => selector.choose_column(&board)?,
            Side::B => board
                .random_move(&mut random_player)
                .ok_or("no legal move left")?,
        };
        let row = board.drop_piece(column)?;
        info!("{:?} drops into column {column}, row {row}", board.current_side());

        if let Some(outcome) = board.state().outcome_for(Side::A) {
            break outcome;
        }
        board.switch_turn();
    };

    info!("Final position:\n{board}");
    match outcome {
        GameOutcome::Win => info!("The search player won"),
        GameOutcome::Lose => info!("The random player won"),
        GameOutcome::Draw => info!("Draw"),
    }

    Ok(())
}
