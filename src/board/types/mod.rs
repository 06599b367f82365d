//! Core chess types.
//!
//! This module contains the fundamental types used throughout the engine:
//! - `Piece`, `Color` and `PieceKind` - piece types, colors and colored pieces
//! - `Square` - validated 0-63 board index
//! - `Bitboard` - 64-bit occupancy mask
//! - `Move` - from/to square pair
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::Move;
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;
