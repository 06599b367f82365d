//! Chess position representation and rules.
//!
//! Uses bitboards for piece placement and an incremental Zobrist hash for
//! repetition tracking. Supports full chess rules including castling, en
//! passant and promotions, plus outcome classification and a fixed-depth
//! minimax search.
//!
//! # Example
//! ```
//! use chess_logic::board::{GameStatus, Position, Square};
//!
//! let mut position = Position::new();
//! let from: Square = "e2".parse().unwrap();
//! println!("e2 pawn has {} legal moves", position.legal_moves(from).len());
//! position.make_move(from, "e4".parse().unwrap()).unwrap();
//! assert_eq!(position.status(), GameStatus::Playing);
//! ```

mod builder;
pub mod error;
mod fen;
mod make_move;
mod movegen;
mod perft;
mod rules;
mod san;
pub mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use builder::PositionBuilder;
pub use error::{FenError, InvariantViolation, MoveError, PromotionError, SquareError};
pub use make_move::MoveEffect;
pub use rules::GameStatus;
pub use search::{find_best_move, SearchConfig, SearchResult, SearchStats};
pub use state::{PendingPromotion, Position};
pub use types::{Bitboard, BitboardIter, CastlingRights, Color, Move, Piece, PieceKind, Square};
