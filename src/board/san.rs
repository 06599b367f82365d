//! Standard Algebraic Notation (SAN) labels for move lists.
//!
//! Examples: "e4", "Nf3", "Bxc6+", "O-O", "e8=Q#"
//!
//! # Examples
//! ```
//! use chess_logic::board::Position;
//!
//! let position = Position::new();
//! let label = position.move_label("g1".parse().unwrap(), "f3".parse().unwrap(), None);
//! assert_eq!(label, "Nf3");
//! ```

use super::{Move, Piece, Position, Square};

impl Position {
    /// Label the move `from -> to` in SAN, as played from this position.
    ///
    /// `promotion` names the piece a pawn reaching the last rank becomes.
    /// The move is assumed legal; the check and mate suffixes are derived by
    /// playing it on a copy.
    #[must_use]
    pub fn move_label(&self, from: Square, to: Square, promotion: Option<Piece>) -> String {
        let Some(kind) = self.piece_at(from) else {
            return format!("{from}{to}");
        };
        let mut san = String::new();

        let is_castling = kind.piece == Piece::King && from.file().abs_diff(to.file()) == 2;
        if is_castling {
            san.push_str(if to.file() == 6 { "O-O" } else { "O-O-O" });
        } else {
            let is_capture = self.piece_at(to).is_some()
                || (kind.piece == Piece::Pawn && self.is_en_passant_target_for(to, kind.color));

            if kind.piece == Piece::Pawn {
                if is_capture {
                    san.push((b'a' + from.file() as u8) as char);
                }
            } else {
                san.push(kind.piece.to_char().to_ascii_uppercase());
                let (needs_file, needs_rank) =
                    self.needs_disambiguation(Move::new(from, to), kind.piece);
                if needs_file {
                    san.push((b'a' + from.file() as u8) as char);
                }
                if needs_rank {
                    san.push((b'1' + from.rank() as u8) as char);
                }
            }

            if is_capture {
                san.push('x');
            }
            san.push_str(&to.to_string());

            if let Some(promo) = promotion {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        let mut after = self.clone();
        if after.apply_move(from, to).is_some() {
            if let (Some(pending), Some(piece)) = (after.promotion_pending(), promotion) {
                let _ = after.promote_pawn(pending.square, piece);
            }
            if after.promotion_pending().is_none() {
                if after.is_checkmate() {
                    san.push('#');
                } else if after.in_check(after.side_to_move()) {
                    san.push('+');
                }
            }
        }

        san
    }

    /// Determine if disambiguation is needed for a piece move.
    /// Returns (`needs_file`, `needs_rank`).
    fn needs_disambiguation(&self, mv: Move, piece: Piece) -> (bool, bool) {
        let rivals: Vec<Square> = self
            .all_legal_moves()
            .into_iter()
            .filter(|m| {
                m.to == mv.to
                    && m.from != mv.from
                    && self.piece_at(m.from).map(|k| k.piece) == Some(piece)
            })
            .map(|m| m.from)
            .collect();

        if rivals.is_empty() {
            return (false, false);
        }

        let same_file = rivals.iter().any(|sq| sq.file() == mv.from.file());
        let same_rank = rivals.iter().any(|sq| sq.rank() == mv.from.rank());

        match (same_file, same_rank) {
            (false, _) => (true, false),    // File disambiguates
            (true, false) => (false, true), // Rank disambiguates
            (true, true) => (true, true),   // Need both
        }
    }
}
