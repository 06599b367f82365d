//! Pseudo-legal move generation and attack detection.
//!
//! Destinations are produced in a fixed order per piece type; the search
//! relies on that order for its tie-breaking, so changing a table below
//! changes which of two equally scored moves the engine plays.

use super::error::InvariantViolation;
use super::{Color, Piece, PieceKind, Position, Square};

/// (rank, file) deltas
type Delta = (isize, isize);

const KNIGHT_OFFSETS: [Delta; 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const BISHOP_RAYS: [Delta; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_RAYS: [Delta; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const QUEEN_RAYS: [Delta; 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

const KING_OFFSETS: [Delta; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Position {
    /// Pseudo-legal destinations for `kind` standing on `from`.
    ///
    /// Ignores whether the move leaves the own king in check, and never
    /// contains castling; both are the rules layer's job.
    #[must_use]
    pub fn raw_moves(&self, kind: PieceKind, from: Square) -> Vec<Square> {
        let mut moves = Vec::with_capacity(28);
        match kind.piece {
            Piece::Pawn => self.pawn_moves(kind.color, from, &mut moves),
            Piece::Knight => self.step_moves(kind.color, from, &KNIGHT_OFFSETS, &mut moves),
            Piece::Bishop => self.ray_moves(kind.color, from, &BISHOP_RAYS, &mut moves),
            Piece::Rook => self.ray_moves(kind.color, from, &ROOK_RAYS, &mut moves),
            Piece::Queen => self.ray_moves(kind.color, from, &QUEEN_RAYS, &mut moves),
            Piece::King => self.step_moves(kind.color, from, &KING_OFFSETS, &mut moves),
        }
        moves
    }

    fn pawn_moves(&self, color: Color, from: Square, moves: &mut Vec<Square>) {
        let dir = color.pawn_direction();

        if let Some(one) = from.offset(dir, 0) {
            if self.is_empty(one) {
                moves.push(one);
                if from.rank() == color.pawn_start_rank() {
                    if let Some(two) = from.offset(2 * dir, 0) {
                        if self.is_empty(two) {
                            moves.push(two);
                        }
                    }
                }
            }
        }

        for file_delta in [-1, 1] {
            if let Some(target) = from.offset(dir, file_delta) {
                if self.is_enemy(target, color) || self.is_en_passant_target_for(target, color) {
                    moves.push(target);
                }
            }
        }
    }

    /// True when a pawn of `color` may capture en passant onto `sq`.
    ///
    /// The target only counts for the side that did not just double-step,
    /// which is the side whose capture lands on rank 6 (White) or 3 (Black).
    pub(crate) fn is_en_passant_target_for(&self, sq: Square, color: Color) -> bool {
        let capture_rank = match color {
            Color::White => 5,
            Color::Black => 2,
        };
        self.en_passant_target == Some(sq) && sq.rank() == capture_rank
    }

    fn step_moves(&self, color: Color, from: Square, deltas: &[Delta], moves: &mut Vec<Square>) {
        for &(dr, df) in deltas {
            if let Some(target) = from.offset(dr, df) {
                if self.is_empty(target) || self.is_enemy(target, color) {
                    moves.push(target);
                }
            }
        }
    }

    fn ray_moves(&self, color: Color, from: Square, rays: &[Delta], moves: &mut Vec<Square>) {
        for &(dr, df) in rays {
            let mut current = from;
            while let Some(target) = current.offset(dr, df) {
                if self.is_empty(target) {
                    moves.push(target);
                } else {
                    if self.is_enemy(target, color) {
                        moves.push(target);
                    }
                    break;
                }
                current = target;
            }
        }
    }

    /// True if any piece of `by` could capture on `sq`.
    ///
    /// Equivalent to asking whether `sq` is among the raw moves of some piece
    /// of `by`, for an `sq` occupied by the other side, but walks outward from
    /// the target instead of generating every enemy move.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        // A pawn of `by` attacks sq from one rank behind it
        let pawn_rank_delta = -by.pawn_direction();
        for file_delta in [-1, 1] {
            if let Some(origin) = sq.offset(pawn_rank_delta, file_delta) {
                if self.pieces(by, Piece::Pawn).contains(origin) {
                    return true;
                }
            }
        }

        let steppers = [
            (Piece::Knight, &KNIGHT_OFFSETS),
            (Piece::King, &KING_OFFSETS),
        ];
        for (piece, deltas) in steppers {
            let bb = self.pieces(by, piece);
            if deltas
                .iter()
                .filter_map(|&(dr, df)| sq.offset(dr, df))
                .any(|origin| bb.contains(origin))
            {
                return true;
            }
        }

        let queens = self.pieces(by, Piece::Queen);
        let diagonal = self.pieces(by, Piece::Bishop).or(queens);
        let straight = self.pieces(by, Piece::Rook).or(queens);
        for (rays, sliders) in [(&BISHOP_RAYS, diagonal), (&ROOK_RAYS, straight)] {
            for &(dr, df) in rays {
                let mut current = sq;
                while let Some(next) = current.offset(dr, df) {
                    if !self.is_empty(next) {
                        if sliders.contains(next) {
                            return true;
                        }
                        break;
                    }
                    current = next;
                }
            }
        }

        false
    }

    /// Whether the king of `color` is attacked.
    ///
    /// A missing king is reported as an invariant violation rather than as
    /// "not in check".
    pub fn is_king_in_check(&self, color: Color) -> Result<bool, InvariantViolation> {
        let king = self.king_square(color)?;
        Ok(self.is_square_attacked(king, color.opponent()))
    }

    /// [`Position::is_king_in_check`] for code that already relies on both
    /// kings being present.
    ///
    /// # Panics
    /// Panics if the king is missing; positions reachable through the public
    /// API always have one.
    pub(crate) fn in_check(&self, color: Color) -> bool {
        match self.is_king_in_check(color) {
            Ok(in_check) => in_check,
            Err(err) => panic!("{err}"),
        }
    }
}
