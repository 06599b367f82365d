use crate::zobrist::{piece_key, ZOBRIST};

use super::error::PromotionError;
use super::state::PendingPromotion;
use super::{Color, Piece, PieceKind, Position, Square};

/// What a single move did to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveEffect {
    /// The piece that moved, as it was before any promotion
    pub moved: PieceKind,
    /// Captured piece and the square it stood on (differs from the
    /// destination for en passant)
    pub captured: Option<(PieceKind, Square)>,
    /// Rook relocation performed for a castling move
    pub castling_rook: Option<(Square, Square)>,
}

impl MoveEffect {
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[must_use]
    pub fn is_en_passant(&self, to: Square) -> bool {
        matches!(self.captured, Some((_, sq)) if sq != to)
    }
}

/// Home square of the rook that castles on the given side
fn rook_home(color: Color, kingside: bool) -> Square {
    let file = if kingside { 7 } else { 0 };
    Square::at(color.back_rank(), file)
}

/// Rook origin and destination for a king moving two files to `king_to`
pub(crate) fn castling_rook_squares(color: Color, king_to: Square) -> (Square, Square) {
    let kingside = king_to.file() == 6;
    let rook_to_file = if kingside { 5 } else { 3 };
    (
        rook_home(color, kingside),
        Square::at(color.back_rank(), rook_to_file),
    )
}

impl Position {
    /// Move the pieces for `from -> to` without touching turn, clock, flags
    /// or hash.
    ///
    /// Handles ordinary captures, the en passant capture of the pawn behind
    /// the destination, and the rook jump of a castling king. Returns `None`
    /// when `from` is empty.
    pub(crate) fn apply_structural(&mut self, from: Square, to: Square) -> Option<MoveEffect> {
        let moved = self.piece_at(from)?;
        let mut captured = None;

        if let Some(victim) = self.piece_at(to) {
            self.remove_piece(to, victim.color, victim.piece);
            captured = Some((victim, to));
        } else if moved.piece == Piece::Pawn && self.is_en_passant_target_for(to, moved.color) {
            let victim_sq = to.offset(-moved.color.pawn_direction(), 0)?;
            let victim_color = moved.color.opponent();
            if self.pieces(victim_color, Piece::Pawn).contains(victim_sq) {
                self.remove_piece(victim_sq, victim_color, Piece::Pawn);
                captured = Some((PieceKind::new(victim_color, Piece::Pawn), victim_sq));
            }
        }

        self.remove_piece(from, moved.color, moved.piece);
        self.set_piece(to, moved.color, moved.piece);

        let mut castling_rook = None;
        if moved.piece == Piece::King && from.file().abs_diff(to.file()) == 2 {
            let (rook_from, rook_to) = castling_rook_squares(moved.color, to);
            if self.pieces(moved.color, Piece::Rook).contains(rook_from) {
                self.remove_piece(rook_from, moved.color, Piece::Rook);
                self.set_piece(rook_to, moved.color, Piece::Rook);
                castling_rook = Some((rook_from, rook_to));
            }
        }

        self.recompute_occupancy();

        Some(MoveEffect {
            moved,
            captured,
            castling_rook,
        })
    }

    /// Play `from -> to` unconditionally.
    ///
    /// This does not check legality; callers go through the rules layer
    /// (`Position::make_move`) for that. Besides moving pieces it updates
    /// castling rights, the en passant target, the promotion gate, the side
    /// to move, the halfmove clock, the hash and the position history.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Option<MoveEffect> {
        let previous_rights = self.castling_rights;
        let previous_ep = self.en_passant_target;

        let effect = self.apply_structural(from, to)?;
        let moved = effect.moved;
        let mut hash = self.hash;

        hash ^= ZOBRIST.piece(moved, from) ^ ZOBRIST.piece(moved, to);
        if let Some((victim, sq)) = effect.captured {
            hash ^= ZOBRIST.piece(victim, sq);
        }
        if let Some((rook_from, rook_to)) = effect.castling_rook {
            hash ^= piece_key(moved.color, Piece::Rook, rook_from)
                ^ piece_key(moved.color, Piece::Rook, rook_to);
        }

        match moved.piece {
            Piece::King => self.castling_rights.remove_color(moved.color),
            Piece::Rook => self.revoke_rook_right(moved.color, from),
            _ => {}
        }
        if let Some((victim, sq)) = effect.captured {
            if victim.piece == Piece::Rook {
                self.revoke_rook_right(victim.color, sq);
            }
        }
        hash ^= ZOBRIST.castling(previous_rights) ^ ZOBRIST.castling(self.castling_rights);

        if let Some(ep) = previous_ep {
            hash ^= ZOBRIST.en_passant(ep);
        }
        self.en_passant_target = None;
        if moved.piece == Piece::Pawn && from.rank().abs_diff(to.rank()) == 2 {
            if let Some(skipped) = from.offset(moved.color.pawn_direction(), 0) {
                self.en_passant_target = Some(skipped);
                hash ^= ZOBRIST.en_passant(skipped);
            }
        }

        if moved.piece == Piece::Pawn || effect.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if moved.piece == Piece::Pawn && to.rank() == moved.color.pawn_promotion_rank() {
            self.promotion_pending = Some(PendingPromotion {
                square: to,
                color: moved.color,
            });
            self.hash = hash;
        } else {
            self.side_to_move = self.side_to_move.opponent();
            self.hash = hash ^ ZOBRIST.black_to_move();
            self.position_history.push(self.hash);
        }

        Some(effect)
    }

    fn revoke_rook_right(&mut self, color: Color, sq: Square) {
        for kingside in [true, false] {
            if sq == rook_home(color, kingside) {
                self.castling_rights.remove(color, kingside);
            }
        }
    }

    /// Replace the pawn waiting on `square` with `piece` and pass the turn.
    ///
    /// Fails without changing anything when no promotion is pending, when
    /// it is pending on another square, or when `piece` is a pawn or king.
    pub fn promote_pawn(&mut self, square: Square, piece: Piece) -> Result<(), PromotionError> {
        let pending = self.promotion_pending.ok_or(PromotionError::NotPending)?;
        if pending.square != square {
            return Err(PromotionError::WrongSquare {
                requested: square,
                pending: pending.square,
            });
        }
        if !piece.is_promotion_target() {
            return Err(PromotionError::InvalidPiece { piece });
        }
        debug_assert!(self.pieces(pending.color, Piece::Pawn).contains(square));

        self.remove_piece(square, pending.color, Piece::Pawn);
        self.set_piece(square, pending.color, piece);
        self.recompute_occupancy();

        self.promotion_pending = None;
        self.side_to_move = self.side_to_move.opponent();
        self.hash ^= piece_key(pending.color, Piece::Pawn, square)
            ^ piece_key(pending.color, piece, square)
            ^ ZOBRIST.black_to_move();
        self.position_history.push(self.hash);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_apply_move_keeps_hash_in_sync() {
        let mut position = Position::new();
        for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5"), ("g8", "f6")] {
            position.apply_move(sq(from), sq(to)).unwrap();
            assert_eq!(position.hash(), position.calculate_hash());
            assert!(position.verify().is_ok());
        }
        assert_eq!(position.position_history().len(), 5);
    }

    #[test]
    fn test_apply_move_from_empty_square_is_none() {
        let mut position = Position::new();
        let before = position.clone();
        assert!(position.apply_move(sq("e4"), sq("e5")).is_none());
        assert_eq!(position, before);
    }

    #[test]
    fn test_double_step_sets_en_passant_target() {
        let mut position = Position::new();
        position.apply_move(sq("e2"), sq("e4")).unwrap();
        assert_eq!(position.en_passant_target(), Some(sq("e3")));
        position.apply_move(sq("g8"), sq("f6")).unwrap();
        assert_eq!(position.en_passant_target(), None);
    }

    #[test]
    fn test_promotion_holds_the_turn() {
        let mut position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let history_len = position.position_history().len();
        position.apply_move(sq("a7"), sq("a8")).unwrap();
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(
            position.promotion_pending(),
            Some(PendingPromotion {
                square: sq("a8"),
                color: Color::White
            })
        );
        assert_eq!(position.hash(), position.calculate_hash());
        assert_eq!(position.position_history().len(), history_len);

        position.promote_pawn(sq("a8"), Piece::Queen).unwrap();
        assert_eq!(position.side_to_move(), Color::Black);
        assert_eq!(
            position.piece_at(sq("a8")),
            Some(PieceKind::new(Color::White, Piece::Queen))
        );
        assert_eq!(position.hash(), position.calculate_hash());
        assert_eq!(position.position_history().len(), history_len + 1);
    }

    #[test]
    fn test_promotion_misuse_changes_nothing() {
        let mut position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(
            position.promote_pawn(sq("a8"), Piece::Queen),
            Err(PromotionError::NotPending)
        );

        position.apply_move(sq("a7"), sq("a8")).unwrap();
        let before = position.clone();
        assert_eq!(
            position.promote_pawn(sq("b8"), Piece::Queen),
            Err(PromotionError::WrongSquare {
                requested: sq("b8"),
                pending: sq("a8")
            })
        );
        assert_eq!(
            position.promote_pawn(sq("a8"), Piece::King),
            Err(PromotionError::InvalidPiece { piece: Piece::King })
        );
        assert_eq!(
            position.promote_pawn(sq("a8"), Piece::Pawn),
            Err(PromotionError::InvalidPiece { piece: Piece::Pawn })
        );
        assert_eq!(position, before);
        assert_eq!(
            position.piece_at(sq("a8")),
            Some(PieceKind::new(Color::White, Piece::Pawn))
        );
    }

    #[test]
    fn test_capturing_home_rook_revokes_right() {
        let mut position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        position.apply_move(sq("a1"), sq("a8")).unwrap();
        let rights = position.castling_rights();
        assert!(!rights.has(Color::White, false));
        assert!(!rights.has(Color::Black, false));
        assert!(rights.has(Color::White, true));
        assert!(rights.has(Color::Black, true));
        assert_eq!(position.hash(), position.calculate_hash());
    }
}
