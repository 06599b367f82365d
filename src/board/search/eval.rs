//! Static evaluation, in centipawn-like units from White's point of view.

use crate::board::{Color, Piece, Position};

const MATERIAL_WEIGHT: i32 = 100;
const MOBILITY_WEIGHT: i32 = 3;
const PAWN_BONUS_WEIGHT: i32 = 2;

/// Static score of `position`.
///
/// `100 * material + 3 * mobility + 2 * pawn bonus`, where material is
/// White minus Black, mobility is the number of legal moves of the side to
/// move, and the pawn bonus rewards central pawns for how far they have
/// advanced. Only the side to move has moves, so mobility never counts
/// against it.
#[must_use]
pub fn evaluate(position: &Position) -> i32 {
    let mobility = position.all_legal_moves().len() as i32;
    evaluate_with_mobility(position, mobility)
}

pub(super) fn evaluate_with_mobility(position: &Position, mobility: i32) -> i32 {
    let material = position.material_balance();
    MATERIAL_WEIGHT * material
        + MOBILITY_WEIGHT * mobility
        + PAWN_BONUS_WEIGHT * pawn_advancement_bonus(position)
}

/// Advancement of pawns on files c through f, White minus Black.
///
/// A White pawn counts its rank index, a Black pawn `7 - rank`.
#[must_use]
pub fn pawn_advancement_bonus(position: &Position) -> i32 {
    let mut bonus = 0;
    for color in Color::BOTH {
        for sq in position.pieces(color, Piece::Pawn).iter() {
            if !(2..=5).contains(&sq.file()) {
                continue;
            }
            let advancement = match color {
                Color::White => sq.rank(),
                Color::Black => 7 - sq.rank(),
            };
            bonus += color.sign() * advancement as i32;
        }
    }
    bonus
}
