pub mod board;
pub mod engine;
pub mod game;
mod zobrist;

pub use board::{Color, GameStatus, Move, Piece, PieceKind, Position, Square};
pub use engine::GameController;
pub use game::Game;
