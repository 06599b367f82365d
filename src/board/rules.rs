//! Legal move filtering and game outcome classification.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::MoveError;
use super::make_move::{castling_rook_squares, MoveEffect};
use super::{Color, Move, Piece, Position, Square};

/// Outcome of a position from the point of view of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameStatus {
    Playing,
    Checkmate,
    Stalemate,
    FiftyMoveDraw,
    RepetitionDraw,
    InsufficientMaterial,
}

impl GameStatus {
    /// True for every status except `Playing`
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::Playing)
    }

    /// True for the drawn outcomes, stalemate included
    #[must_use]
    pub const fn is_draw(self) -> bool {
        matches!(
            self,
            GameStatus::Stalemate
                | GameStatus::FiftyMoveDraw
                | GameStatus::RepetitionDraw
                | GameStatus::InsufficientMaterial
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GameStatus::Playing => "playing",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
            GameStatus::FiftyMoveDraw => "draw by the fifty-move rule",
            GameStatus::RepetitionDraw => "draw by threefold repetition",
            GameStatus::InsufficientMaterial => "draw by insufficient material",
        };
        f.write_str(text)
    }
}

impl Position {
    /// A copy of the board without the repetition ledger, for probing.
    fn probe_copy(&self) -> Position {
        Position {
            pieces: self.pieces,
            occupied_by: self.occupied_by,
            occupied: self.occupied,
            side_to_move: self.side_to_move,
            en_passant_target: self.en_passant_target,
            castling_rights: self.castling_rights,
            promotion_pending: self.promotion_pending,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
            position_history: Vec::new(),
        }
    }

    /// Would playing `from -> to` leave the king of `color` attacked?
    ///
    /// The move is played on an owned copy, so `self` is never mutated,
    /// not even transiently.
    #[must_use]
    pub fn would_expose_check(&self, from: Square, to: Square, color: Color) -> bool {
        let mut probe = self.probe_copy();
        if probe.apply_structural(from, to).is_none() {
            return false;
        }
        probe.in_check(color)
    }

    /// Legal destinations for the piece on `from`.
    ///
    /// Empty when the square is empty, holds a piece of the side not on
    /// move, or a promotion is waiting. Castling appears as a two-file king
    /// move, kingside before queenside, after the ordinary moves.
    #[must_use]
    pub fn legal_moves(&self, from: Square) -> Vec<Square> {
        if self.promotion_pending.is_some() {
            return Vec::new();
        }
        let Some(kind) = self.piece_at(from) else {
            return Vec::new();
        };
        if kind.color != self.side_to_move {
            return Vec::new();
        }

        let mut moves: Vec<Square> = self
            .raw_moves(kind, from)
            .into_iter()
            .filter(|&to| !self.would_expose_check(from, to, kind.color))
            .collect();

        if kind.piece == Piece::King {
            self.push_castling_moves(from, kind.color, &mut moves);
        }
        moves
    }

    fn push_castling_moves(&self, from: Square, color: Color, moves: &mut Vec<Square>) {
        let rank = color.back_rank();
        if from != Square::at(rank, 4) {
            return;
        }

        let mut king_in_check = None;
        for kingside in [true, false] {
            if !self.castling_rights.has(color, kingside) {
                continue;
            }
            let (transit_file, dest_file, between): (usize, usize, &[usize]) = if kingside {
                (5, 6, &[5, 6])
            } else {
                (3, 2, &[1, 2, 3])
            };
            let dest = Square::at(rank, dest_file);
            let (rook_from, _) = castling_rook_squares(color, dest);
            if !self.pieces(color, Piece::Rook).contains(rook_from) {
                continue;
            }
            if between.iter().any(|&file| !self.is_empty(Square::at(rank, file))) {
                continue;
            }
            if *king_in_check.get_or_insert_with(|| self.in_check(color)) {
                return;
            }
            let transit = Square::at(rank, transit_file);
            if self.would_expose_check(from, transit, color)
                || self.would_expose_check(from, dest, color)
            {
                continue;
            }
            moves.push(dest);
        }
    }

    /// Membership test against [`Position::legal_moves`]
    #[must_use]
    pub fn is_valid_move(&self, from: Square, to: Square) -> bool {
        self.legal_moves(from).contains(&to)
    }

    /// Validate and play `from -> to`.
    ///
    /// On error the position is unchanged. A pawn reaching the last rank
    /// leaves a pending promotion that must be resolved with
    /// [`Position::promote_pawn`].
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<MoveEffect, MoveError> {
        if let Some(pending) = self.promotion_pending {
            return Err(MoveError::PromotionPending {
                square: pending.square,
            });
        }
        let kind = self
            .piece_at(from)
            .ok_or(MoveError::EmptySquare { square: from })?;
        if kind.color != self.side_to_move {
            return Err(MoveError::NotYourTurn { square: from });
        }
        if !self.is_valid_move(from, to) {
            return Err(MoveError::IllegalMove { from, to });
        }
        self.apply_move(from, to)
            .ok_or(MoveError::EmptySquare { square: from })
    }

    /// Every legal move of the side to move: pieces in ascending square
    /// order, each piece's destinations in generator order.
    #[must_use]
    pub fn all_legal_moves(&self) -> Vec<Move> {
        let own = self.occupied_by(self.side_to_move);
        own.iter()
            .flat_map(|from| {
                self.legal_moves(from)
                    .into_iter()
                    .map(move |to| Move::new(from, to))
            })
            .collect()
    }

    /// True if the side to move has at least one legal move
    #[must_use]
    pub fn has_legal_move(&self) -> bool {
        self.occupied_by(self.side_to_move)
            .iter()
            .any(|from| !self.legal_moves(from).is_empty())
    }

    /// True if the side to move is checkmated
    #[must_use]
    pub fn is_checkmate(&self) -> bool {
        self.status() == GameStatus::Checkmate
    }

    /// Classify the position.
    ///
    /// Priority is fixed: checkmate and stalemate first, then the
    /// fifty-move rule, then threefold repetition, then insufficient
    /// material. While a promotion is pending the game is still `Playing`.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.promotion_pending.is_some() {
            return GameStatus::Playing;
        }
        if !self.has_legal_move() {
            return if self.in_check(self.side_to_move) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if self.halfmove_clock >= 100 {
            return GameStatus::FiftyMoveDraw;
        }
        if self.repetition_count() >= 3 {
            return GameStatus::RepetitionDraw;
        }
        if self.is_insufficient_material() {
            return GameStatus::InsufficientMaterial;
        }
        GameStatus::Playing
    }

    /// Dead positions recognised by material alone.
    ///
    /// Bare kings, a single minor piece against a bare king, two knights
    /// against a bare king, and one bishop each on the same square color.
    /// Any pawn, rook or queen on the board rules this out.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        for color in Color::BOTH {
            for piece in [Piece::Pawn, Piece::Rook, Piece::Queen] {
                if !self.pieces(color, piece).is_empty() {
                    return false;
                }
            }
        }

        let knights = |color| self.pieces(color, Piece::Knight).popcount();
        let bishops = |color| self.pieces(color, Piece::Bishop);
        let white_minors = knights(Color::White) + bishops(Color::White).popcount();
        let black_minors = knights(Color::Black) + bishops(Color::Black).popcount();

        match (white_minors, black_minors) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (2, 0) => knights(Color::White) == 2,
            (0, 2) => knights(Color::Black) == 2,
            (1, 1) => match (bishops(Color::White).lsb(), bishops(Color::Black).lsb()) {
                (Some(white), Some(black)) => white.is_light() == black.is_light(),
                _ => false,
            },
            _ => false,
        }
    }
}
