use std::env;
use std::process;

use chess_logic::board::search::{SearchConfig, DEFAULT_DEPTH};
use chess_logic::engine::{GameController, SearchUpdate};

const DEFAULT_PLIES: usize = 40;

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> T {
    match args.get(index) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("usage: chess_logic [depth] [plies]");
            process::exit(2);
        }),
        None => default,
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let depth = parse_arg(&args, 1, DEFAULT_DEPTH);
    let plies = parse_arg(&args, 2, DEFAULT_PLIES);

    let mut controller = GameController::new(SearchConfig::default().with_depth(depth));
    println!("self-play at depth {depth} for up to {plies} plies");

    for ply in 0..plies {
        if controller.game().status().is_over() {
            break;
        }
        if let Err(err) = controller.start_search() {
            eprintln!("cannot search: {err}");
            break;
        }
        match controller.wait_for_search() {
            Ok(SearchUpdate::Finished {
                result,
                record: Some(record),
            }) => {
                let number = ply / 2 + 1;
                let prefix = if ply % 2 == 0 {
                    format!("{number}.")
                } else {
                    format!("{number}...")
                };
                println!("{prefix} {} ({})", record.label, result.score);
            }
            Ok(other) => {
                eprintln!("search ended without a move: {other:?}");
                break;
            }
            Err(err) => {
                eprintln!("engine move rejected: {err}");
                break;
            }
        }
    }

    let game = controller.game();
    println!("status: {}", game.status());
    println!("material: {:+}", game.material_score_difference());
    println!("fen: {}", game.position().to_fen());
}
