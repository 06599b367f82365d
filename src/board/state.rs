use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::zobrist::ZOBRIST;

use super::error::InvariantViolation;
use super::{Bitboard, CastlingRights, Color, Piece, PieceKind, Square};

/// A pawn that reached the last rank and is waiting for its new identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PendingPromotion {
    pub square: Square,
    pub color: Color,
}

/// Complete state of a chess position.
///
/// A `Position` is plain data: cloning it yields an independent copy, which
/// is how legality probing and search explore moves without touching the
/// original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied_by: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) promotion_pending: Option<PendingPromotion>,
    pub(crate) halfmove_clock: u32,
    pub(crate) hash: u64, // Zobrist hash
    pub(crate) position_history: Vec<u64>,
}

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Position {
    /// The standard starting position, White to move.
    #[must_use]
    pub fn new() -> Self {
        let mut position = Position::empty();
        for (file, piece) in BACK_RANK.iter().enumerate() {
            position.place(Color::White, *piece, 0, file);
            position.place(Color::Black, *piece, 7, file);
            position.place(Color::White, Piece::Pawn, 1, file);
            position.place(Color::Black, Piece::Pawn, 6, file);
        }
        position.castling_rights = CastlingRights::all();
        position.finish_setup();
        position
    }

    fn place(&mut self, color: Color, piece: Piece, rank: usize, file: usize) {
        if let Some(sq) = Square::from_coords(rank, file) {
            self.set_piece(sq, color, piece);
        }
    }

    /// A board with no pieces; only useful as a starting point for setup.
    pub(crate) fn empty() -> Self {
        Position {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied_by: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            en_passant_target: None,
            castling_rights: CastlingRights::none(),
            promotion_pending: None,
            halfmove_clock: 0,
            hash: 0,
            position_history: Vec::new(),
        }
    }

    /// Recompute derived state after pieces and flags were placed directly.
    pub(crate) fn finish_setup(&mut self) {
        self.recompute_occupancy();
        self.hash = self.calculate_hash();
        self.position_history.clear();
        self.position_history.push(self.hash);
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[must_use]
    pub fn promotion_pending(&self) -> Option<PendingPromotion> {
        self.promotion_pending
    }

    /// Hashes of every position reached so far, oldest first
    #[must_use]
    pub fn position_history(&self) -> &[u64] {
        &self.position_history
    }

    /// Union of all piece bitboards
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Bitboard of one colored piece type
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Union of every piece of one color
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied_by[color.index()]
    }

    pub(crate) fn set_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.pieces[color.index()][piece.index()].set(sq);
    }

    pub(crate) fn remove_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        self.pieces[color.index()][piece.index()].clear(sq);
    }

    /// Rebuild the occupancy masks from the piece bitboards.
    pub(crate) fn recompute_occupancy(&mut self) {
        for color in Color::BOTH {
            let c_idx = color.index();
            self.occupied_by[c_idx] = self.pieces[c_idx]
                .iter()
                .fold(Bitboard::EMPTY, |acc, bb| acc.or(*bb));
        }
        self.occupied = self.occupied_by[0].or(self.occupied_by[1]);
    }

    /// The piece on a square, or `None` when the square is empty.
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<PieceKind> {
        if !self.occupied.contains(sq) {
            return None;
        }
        for color in Color::BOTH {
            for piece in Piece::ALL {
                if self.pieces(color, piece).contains(sq) {
                    return Some(PieceKind::new(color, piece));
                }
            }
        }
        None
    }

    /// Like [`Position::piece_at`] for a raw index; out-of-range is empty.
    #[must_use]
    pub fn piece_at_index(&self, index: usize) -> Option<PieceKind> {
        Square::new(index).and_then(|sq| self.piece_at(sq))
    }

    #[inline]
    pub(crate) fn is_empty(&self, sq: Square) -> bool {
        !self.occupied.contains(sq)
    }

    #[inline]
    pub(crate) fn is_enemy(&self, sq: Square, color: Color) -> bool {
        self.occupied_by(color.opponent()).contains(sq)
    }

    /// Every occupied square with its piece, keyed by square
    #[must_use]
    pub fn board_state(&self) -> BTreeMap<Square, PieceKind> {
        let mut state = BTreeMap::new();
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece).iter() {
                    state.insert(sq, PieceKind::new(color, piece));
                }
            }
        }
        state
    }

    /// Location of the king of `color`.
    pub fn king_square(&self, color: Color) -> Result<Square, InvariantViolation> {
        self.pieces(color, Piece::King)
            .lsb()
            .ok_or(InvariantViolation::MissingKing { color })
    }

    /// Zobrist hash computed from scratch.
    #[must_use]
    pub fn calculate_hash(&self) -> u64 {
        let mut hash = 0;

        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces(color, piece).iter() {
                    hash ^= ZOBRIST.piece(PieceKind::new(color, piece), sq);
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move();
        }

        hash ^= ZOBRIST.castling(self.castling_rights);

        if let Some(ep_square) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant(ep_square);
        }

        hash
    }

    /// How many times the current position has been reached
    #[must_use]
    pub fn repetition_count(&self) -> usize {
        self.position_history
            .iter()
            .filter(|&&h| h == self.hash)
            .count()
    }

    /// White material minus Black material, in pawns
    #[must_use]
    pub fn material_balance(&self) -> i32 {
        let mut balance = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let count = self.pieces(color, piece).popcount() as i32;
                balance += color.sign() * piece.value() * count;
            }
        }
        balance
    }

    /// Check every structural invariant of the position.
    ///
    /// Bitboards must be disjoint, the occupancy masks must equal the union
    /// of the pieces, each side must have exactly one king, and the
    /// incremental hash must match a full recomputation. Unless a promotion
    /// is pending, the side not on move must not be in check.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let mut seen = Bitboard::EMPTY;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                let bb = self.pieces(color, piece);
                if let Some(square) = seen.and(bb).lsb() {
                    return Err(InvariantViolation::OverlappingBitboards { square });
                }
                seen = seen.or(bb);
            }
        }

        for color in Color::BOTH {
            let expected = Piece::ALL
                .iter()
                .fold(Bitboard::EMPTY, |acc, &piece| acc.or(self.pieces(color, piece)));
            if self.occupied_by(color) != expected {
                return Err(InvariantViolation::OccupancyMismatch {
                    cached: self.occupied_by(color).0,
                    expected: expected.0,
                });
            }
        }
        if self.occupied != seen {
            return Err(InvariantViolation::OccupancyMismatch {
                cached: self.occupied.0,
                expected: seen.0,
            });
        }

        for color in Color::BOTH {
            match self.pieces(color, Piece::King).popcount() {
                0 => return Err(InvariantViolation::MissingKing { color }),
                1 => {}
                count => return Err(InvariantViolation::MultipleKings { color, count }),
            }
        }

        let recomputed = self.calculate_hash();
        if recomputed != self.hash {
            return Err(InvariantViolation::HashMismatch {
                incremental: self.hash,
                recomputed,
            });
        }

        // A pending promotion may have uncovered a check on the side about
        // to move; the turn has not passed yet
        if self.promotion_pending.is_none() {
            let waiting = self.side_to_move.opponent();
            let king = self.king_square(waiting)?;
            if self.is_square_attacked(king, self.side_to_move) {
                return Err(InvariantViolation::OpponentInCheck { color: waiting });
            }
        }

        Ok(())
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::new()
    }
}
