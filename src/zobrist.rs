//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes used for
//! repetition detection.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Color, Piece, PieceKind, Square};

pub(crate) struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    piece_keys: [[[u64; 64]; 2]; 6],
    black_to_move_key: u64,
    // castling_keys[color][side]: 0=White, 1=Black; 0=Kingside, 1=Queenside
    castling_keys: [[u64; 2]; 2],
    // en_passant_keys[file_index] (only the file matters for the EP target)
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        // Fixed seed so hashes are stable across runs and threads
        let mut rng = StdRng::seed_from_u64(1_234_567_890_u64);
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut castling_keys = [[0; 2]; 2];
        let mut en_passant_keys = [0; 8];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for color in &mut castling_keys {
            for key in color.iter_mut() {
                *key = rng.gen();
            }
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, kind: PieceKind, sq: Square) -> u64 {
        self.piece_keys[kind.piece.index()][kind.color.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn black_to_move(&self) -> u64 {
        self.black_to_move_key
    }

    #[inline]
    pub(crate) fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_keys[sq.file()]
    }

    /// XOR of the keys for every right held in `rights`
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for (side, kingside) in [true, false].into_iter().enumerate() {
                if rights.has(color, kingside) {
                    hash ^= self.castling_keys[color.index()][side];
                }
            }
        }
        hash
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

/// Key for a single colored piece on a square
#[inline]
pub(crate) fn piece_key(color: Color, piece: Piece, sq: Square) -> u64 {
    ZOBRIST.piece(PieceKind::new(color, piece), sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct() {
        let e4: Square = "e4".parse().unwrap();
        let e5: Square = "e5".parse().unwrap();
        assert_ne!(
            piece_key(Color::White, Piece::Pawn, e4),
            piece_key(Color::White, Piece::Pawn, e5)
        );
        assert_ne!(
            piece_key(Color::White, Piece::Pawn, e4),
            piece_key(Color::Black, Piece::Pawn, e4)
        );
        assert_ne!(ZOBRIST.black_to_move(), 0);
    }

    #[test]
    fn test_castling_key_of_no_rights_is_zero() {
        assert_eq!(ZOBRIST.castling(CastlingRights::none()), 0);
        assert_ne!(ZOBRIST.castling(CastlingRights::all()), 0);
    }
}
