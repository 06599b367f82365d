//! A game session: the position being played plus its navigable history.
//!
//! `Game` is the surface a presentation layer talks to. It takes raw square
//! indices, validates them, applies moves through the rules layer, labels
//! them, and keeps one snapshot per completed move so earlier positions can
//! be shown again.
//!
//! # Example
//! ```
//! use chess_logic::board::{GameStatus, Piece};
//! use chess_logic::game::Game;
//!
//! let mut game = Game::new();
//! game.make_move(12, 28).unwrap(); // e2e4
//! assert_eq!(game.move_labels(), ["e4"]);
//! assert_eq!(game.status(), GameStatus::Playing);
//! assert!(game.make_move(12, 64).is_err());
//! ```

mod history;

use std::collections::BTreeMap;

use crate::board::{
    Color, GameStatus, InvariantViolation, MoveEffect, MoveError, Piece, PieceKind, Position,
    PromotionError, Square,
};
use history::History;
pub use history::MoveRecord;

/// Result of a successful [`Game::make_move`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move is complete and recorded
    Moved(MoveRecord),
    /// A pawn reached the last rank; call [`Game::promote_pawn`] next
    PromotionPending { square: Square },
}

impl MoveOutcome {
    #[must_use]
    pub fn is_promotion_pending(&self) -> bool {
        matches!(self, MoveOutcome::PromotionPending { .. })
    }
}

/// A move waiting for its promotion piece before it can be recorded.
#[derive(Clone, Copy, Debug)]
struct HeldMove {
    from: Square,
    to: Square,
    effect: MoveEffect,
}

#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    history: History,
    held: Option<HeldMove>,
    poisoned: Option<InvariantViolation>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A new game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let position = Position::new();
        Game {
            history: History::new(position.clone()),
            position,
            held: None,
            poisoned: None,
        }
    }

    /// A game starting from an arbitrary position.
    pub fn from_position(position: Position) -> Result<Self, InvariantViolation> {
        position.verify()?;
        Ok(Game {
            history: History::new(position.clone()),
            position,
            held: None,
            poisoned: None,
        })
    }

    /// The position under the cursor
    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Play the piece on `from` to `to`, both raw 0-63 indices.
    ///
    /// On error nothing changes. A pawn reaching the last rank returns
    /// [`MoveOutcome::PromotionPending`] and the move is only recorded once
    /// [`Game::promote_pawn`] resolves it. Moving while an earlier snapshot
    /// is restored discards every later snapshot and record.
    pub fn make_move(&mut self, from: usize, to: usize) -> Result<MoveOutcome, MoveError> {
        self.check_healthy()?;
        let from = Square::try_from(from)?;
        let to = Square::try_from(to)?;
        if let Some(pending) = self.position.promotion_pending() {
            return Err(MoveError::PromotionPending {
                square: pending.square,
            });
        }
        if self.position.status().is_over() {
            return Err(MoveError::GameOver);
        }

        let effect = self.position.make_move(from, to)?;
        self.check_position()?;

        if let Some(pending) = self.position.promotion_pending() {
            self.held = Some(HeldMove { from, to, effect });
            log::debug!("{from}{to} waits for a promotion on {}", pending.square);
            return Ok(MoveOutcome::PromotionPending {
                square: pending.square,
            });
        }

        Ok(MoveOutcome::Moved(self.record_move(from, to, effect, None)))
    }

    /// Resolve the pending promotion and record the move.
    pub fn promote_pawn(&mut self, piece: Piece) -> Result<MoveRecord, MoveError> {
        self.check_healthy()?;
        let (Some(held), Some(pending)) = (self.held, self.position.promotion_pending()) else {
            log::warn!("promotion to {piece:?} requested with none pending");
            return Err(PromotionError::NotPending.into());
        };

        if let Err(err) = self.position.promote_pawn(pending.square, piece) {
            log::warn!("promotion rejected: {err}");
            return Err(err.into());
        }
        self.check_position()?;
        self.held = None;

        Ok(self.record_move(held.from, held.to, held.effect, Some(piece)))
    }

    fn record_move(
        &mut self,
        from: Square,
        to: Square,
        effect: MoveEffect,
        promotion: Option<Piece>,
    ) -> MoveRecord {
        let label = self.history.current().move_label(from, to, promotion);
        let record = MoveRecord {
            from,
            to,
            piece: effect.moved,
            captured: effect.captured.map(|(kind, _)| kind),
            promotion,
            label,
        };
        log::debug!("played {} ({})", record.label, self.position.status());
        self.history.push(self.position.clone(), record.clone());
        record
    }

    fn check_healthy(&self) -> Result<(), MoveError> {
        match &self.poisoned {
            Some(violation) => Err(MoveError::Corrupted(violation.clone())),
            None => Ok(()),
        }
    }

    /// Verify the position after a mutation, poisoning the session on failure.
    fn check_position(&mut self) -> Result<(), MoveError> {
        if let Err(violation) = self.position.verify() {
            log::error!("game session corrupted: {violation}");
            self.poisoned = Some(violation.clone());
            return Err(MoveError::Corrupted(violation));
        }
        Ok(())
    }

    /// The invariant violation that stopped this session, if any
    #[must_use]
    pub fn corruption(&self) -> Option<&InvariantViolation> {
        self.poisoned.as_ref()
    }

    /// Legal destinations from a raw index; empty for invalid indices.
    #[must_use]
    pub fn legal_moves(&self, from: usize) -> Vec<Square> {
        Square::new(from).map_or_else(Vec::new, |sq| self.position.legal_moves(sq))
    }

    #[must_use]
    pub fn piece_at(&self, index: usize) -> Option<PieceKind> {
        self.position.piece_at_index(index)
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.position.side_to_move()
    }

    #[must_use]
    pub fn is_promotion_pending(&self) -> bool {
        self.position.promotion_pending().is_some()
    }

    #[must_use]
    pub fn promotion_square(&self) -> Option<Square> {
        self.position.promotion_pending().map(|p| p.square)
    }

    #[must_use]
    pub fn promotion_color(&self) -> Option<Color> {
        self.position.promotion_pending().map(|p| p.color)
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.position.status()
    }

    #[must_use]
    pub fn board_state(&self) -> BTreeMap<Square, PieceKind> {
        self.position.board_state()
    }

    /// Every recorded move, including moves past a restored snapshot
    #[must_use]
    pub fn records(&self) -> &[MoveRecord] {
        self.history.records()
    }

    #[must_use]
    pub fn move_labels(&self) -> Vec<String> {
        self.history
            .records()
            .iter()
            .map(|record| record.label.clone())
            .collect()
    }

    /// Pieces captured by `color` on the way to the current snapshot
    #[must_use]
    pub fn captured_by(&self, color: Color) -> Vec<PieceKind> {
        self.history
            .records_to_cursor()
            .iter()
            .filter(|record| record.piece.color == color)
            .filter_map(|record| record.captured)
            .collect()
    }

    /// Show snapshot `index` and make it the position to play from.
    ///
    /// Refused (returning `false`) for an out-of-range index, while a
    /// promotion is pending, or once the session is corrupted.
    pub fn restore_snapshot(&mut self, index: usize) -> bool {
        if self.poisoned.is_some() || self.held.is_some() {
            return false;
        }
        match self.history.restore(index) {
            Some(snapshot) => {
                self.position = snapshot.clone();
                log::debug!("restored snapshot {index}");
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn current_snapshot_index(&self) -> usize {
        self.history.cursor()
    }

    /// Material balance of the current position, White minus Black, in pawns
    #[must_use]
    pub fn material_score_difference(&self) -> i32 {
        self.position.material_balance()
    }
}
