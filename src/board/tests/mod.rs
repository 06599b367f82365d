//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move path counts against published perft results
//! - `special_moves.rs` - Castling, en passant and promotion
//! - `legality.rs` - Pins, checks and move rejection
//! - `draw.rs` - Outcome classification (mate, stalemate, draws)
//! - `search.rs` - Minimax search and static evaluation
//! - `proptest.rs` - Property-based tests

mod legality;
mod special_moves;

use crate::board::{Position, Square};

pub(super) fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

pub(super) fn fen(s: &str) -> Position {
    Position::from_fen(s).unwrap()
}
