use super::{Piece, Position};

const PROMOTION_PIECES: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];

impl Position {
    /// Count the leaf move paths `depth` plies below this position.
    ///
    /// A move onto the last rank counts once per promotion piece.
    #[must_use]
    pub fn perft(&self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let mut nodes = 0;
        for mv in self.all_legal_moves() {
            let mut child = self.clone();
            if child.apply_move(mv.from, mv.to).is_none() {
                continue;
            }
            match child.promotion_pending() {
                Some(pending) => {
                    for piece in PROMOTION_PIECES {
                        let mut promoted = child.clone();
                        if promoted.promote_pawn(pending.square, piece).is_ok() {
                            nodes += promoted.perft(depth - 1);
                        }
                    }
                }
                None => nodes += child.perft(depth - 1),
            }
        }

        nodes
    }
}
