//! Castling, en passant and promotion.

use super::{fen, sq};
use crate::board::{
    Color, GameStatus, MoveError, Piece, PieceKind, Position, PromotionError,
};

#[test]
fn test_en_passant_capture_removes_pawn_behind() {
    let mut position = fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
    let moves = position.legal_moves(sq("e5"));
    assert_eq!(moves, vec![sq("e6"), sq("d6")]);

    let effect = position.make_move(sq("e5"), sq("d6")).unwrap();
    assert_eq!(
        effect.captured,
        Some((PieceKind::new(Color::Black, Piece::Pawn), sq("d5")))
    );
    assert!(effect.is_en_passant(sq("d6")));
    assert!(position.piece_at(sq("d5")).is_none());
    assert_eq!(
        position.piece_at(sq("d6")),
        Some(PieceKind::new(Color::White, Piece::Pawn))
    );
    assert_eq!(position.halfmove_clock(), 0);
    assert!(position.verify().is_ok());
}

#[test]
fn test_en_passant_expires_after_one_move() {
    let mut position = Position::new();
    for (from, to) in [("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")] {
        position.make_move(sq(from), sq(to)).unwrap();
    }
    assert!(position.is_valid_move(sq("e5"), sq("d6")));

    position.make_move(sq("a2"), sq("a3")).unwrap();
    position.make_move(sq("h7"), sq("h6")).unwrap();
    assert!(!position.is_valid_move(sq("e5"), sq("d6")));
}

#[test]
fn test_black_captures_en_passant() {
    let mut position = fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1");
    position.make_move(sq("e2"), sq("e4")).unwrap();
    assert_eq!(position.en_passant_target(), Some(sq("e3")));
    assert!(position.is_valid_move(sq("d4"), sq("e3")));

    position.make_move(sq("d4"), sq("e3")).unwrap();
    assert!(position.piece_at(sq("e4")).is_none());
    assert!(position.verify().is_ok());
}

#[test]
fn test_castling_is_listed_after_king_steps() {
    let position = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let moves = position.legal_moves(sq("e1"));
    assert_eq!(&moves[moves.len() - 2..], &[sq("g1"), sq("c1")]);
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut position = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let effect = position.make_move(sq("e1"), sq("g1")).unwrap();
    assert_eq!(effect.castling_rook, Some((sq("h1"), sq("f1"))));
    assert_eq!(
        position.piece_at(sq("f1")),
        Some(PieceKind::new(Color::White, Piece::Rook))
    );
    assert!(position.piece_at(sq("h1")).is_none());
    assert!(!position.castling_rights().has(Color::White, true));
    assert!(!position.castling_rights().has(Color::White, false));

    position.make_move(sq("e8"), sq("c8")).unwrap();
    assert_eq!(
        position.piece_at(sq("d8")),
        Some(PieceKind::new(Color::Black, Piece::Rook))
    );
    assert!(position.piece_at(sq("a8")).is_none());
    assert_eq!(position.hash(), position.calculate_hash());
}

#[test]
fn test_no_castling_out_of_check() {
    let position = fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQkq - 0 1");
    let moves = position.legal_moves(sq("e1"));
    assert!(!moves.contains(&sq("g1")));
    assert!(!moves.contains(&sq("c1")));
}

#[test]
fn test_no_castling_through_attacked_square() {
    let position = fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    let moves = position.legal_moves(sq("e1"));
    assert!(!moves.contains(&sq("g1")));
    assert!(moves.contains(&sq("c1")));
}

#[test]
fn test_queenside_castling_ignores_attacked_b_file() {
    let position = fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
    assert!(position.legal_moves(sq("e1")).contains(&sq("c1")));
}

#[test]
fn test_queenside_castling_needs_empty_b_file() {
    let position = fen("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1");
    assert!(!position.legal_moves(sq("e1")).contains(&sq("c1")));
}

#[test]
fn test_castling_requires_rook_on_home_square() {
    let position = fen("4k3/8/8/8/8/8/8/4K2R w KQ - 0 1");
    let moves = position.legal_moves(sq("e1"));
    assert!(moves.contains(&sq("g1")));
    assert!(!moves.contains(&sq("c1")));
}

#[test]
fn test_rook_move_revokes_one_side() {
    let mut position = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    position.make_move(sq("h1"), sq("h2")).unwrap();
    position.make_move(sq("e8"), sq("e7")).unwrap();
    position.make_move(sq("h2"), sq("h1")).unwrap();
    let rights = position.castling_rights();
    assert!(!rights.has(Color::White, true));
    assert!(rights.has(Color::White, false));
    assert!(!rights.has(Color::Black, true));
    assert!(!rights.has(Color::Black, false));
    assert!(!position.legal_moves(sq("e1")).contains(&sq("g1")));
}

#[test]
fn test_promotion_gate_blocks_everything_else() {
    let mut position = fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    position.make_move(sq("a7"), sq("a8")).unwrap();

    assert!(position.promotion_pending().is_some());
    assert_eq!(position.side_to_move(), Color::White);
    assert_eq!(position.status(), GameStatus::Playing);
    assert!(position.legal_moves(sq("e1")).is_empty());
    assert!(position.all_legal_moves().is_empty());
    assert_eq!(
        position.make_move(sq("e1"), sq("e2")),
        Err(MoveError::PromotionPending { square: sq("a8") })
    );

    position.promote_pawn(sq("a8"), Piece::Knight).unwrap();
    assert_eq!(
        position.piece_at(sq("a8")),
        Some(PieceKind::new(Color::White, Piece::Knight))
    );
    assert_eq!(position.side_to_move(), Color::Black);
    assert!(position.verify().is_ok());
}

#[test]
fn test_promotion_by_capture() {
    let mut position = fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
    assert_eq!(position.legal_moves(sq("a7")), vec![sq("a8"), sq("b8")]);
    let effect = position.make_move(sq("a7"), sq("b8")).unwrap();
    assert!(effect.is_capture());
    position.promote_pawn(sq("b8"), Piece::Queen).unwrap();
    assert_eq!(position.material_balance(), 9);
    assert_eq!(position.promote_pawn(sq("b8"), Piece::Queen), Err(PromotionError::NotPending));
}
