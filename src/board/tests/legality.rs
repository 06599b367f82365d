//! Legal move filtering and move rejection.

use super::{fen, sq};
use crate::board::{Color, Move, MoveError, Position};

#[test]
fn test_start_position_move_order() {
    let position = Position::new();
    let moves = position.all_legal_moves();
    assert_eq!(moves.len(), 20);
    assert_eq!(moves[0], Move::new(sq("b1"), sq("c3")));
    assert_eq!(moves[1], Move::new(sq("b1"), sq("a3")));
    assert_eq!(moves[2], Move::new(sq("g1"), sq("h3")));
    assert_eq!(moves[3], Move::new(sq("g1"), sq("f3")));
    assert_eq!(moves[4], Move::new(sq("a2"), sq("a3")));
    assert_eq!(moves[5], Move::new(sq("a2"), sq("a4")));
}

#[test]
fn test_pinned_piece_cannot_move() {
    let position = fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
    assert!(position.legal_moves(sq("e2")).is_empty());
}

#[test]
fn test_pinned_rook_slides_along_pin() {
    let position = fen("4k3/4r3/8/8/8/8/4R3/4K3 w - - 0 1");
    let moves = position.legal_moves(sq("e2"));
    assert_eq!(
        moves,
        vec![sq("e3"), sq("e4"), sq("e5"), sq("e6"), sq("e7")]
    );
}

#[test]
fn test_check_must_be_answered() {
    let position = fen("4k3/4r3/8/8/8/8/8/R3K3 w - - 0 1");
    assert!(position.is_king_in_check(Color::White).unwrap());
    assert!(position.legal_moves(sq("a1")).is_empty());
    for to in position.legal_moves(sq("e1")) {
        assert_ne!(to.file(), 4, "king stayed on the checking file");
    }
}

#[test]
fn test_en_passant_cannot_expose_king() {
    let position = fen("8/8/8/KPp4r/8/8/8/7k w - c6 0 1");
    let moves = position.legal_moves(sq("b5"));
    assert!(!moves.contains(&sq("c6")));
    assert!(moves.contains(&sq("b6")));
}

#[test]
fn test_king_cannot_step_into_attack() {
    let position = fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
    let moves = position.legal_moves(sq("e1"));
    assert!(!moves.contains(&sq("d1")));
    assert!(!moves.contains(&sq("f1")));
    assert!(moves.contains(&sq("e2")));
}

#[test]
fn test_would_expose_check_does_not_mutate() {
    let position = fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1");
    let before = position.clone();
    assert!(position.would_expose_check(sq("e2"), sq("d3"), Color::White));
    assert!(!position.would_expose_check(sq("e1"), sq("d1"), Color::White));
    assert_eq!(position, before);
}

#[test]
fn test_rejected_moves_leave_position_unchanged() {
    let mut position = Position::new();
    let before = position.clone();

    assert_eq!(
        position.make_move(sq("e4"), sq("e5")),
        Err(MoveError::EmptySquare { square: sq("e4") })
    );
    assert_eq!(
        position.make_move(sq("e7"), sq("e5")),
        Err(MoveError::NotYourTurn { square: sq("e7") })
    );
    assert_eq!(
        position.make_move(sq("e2"), sq("e5")),
        Err(MoveError::IllegalMove {
            from: sq("e2"),
            to: sq("e5")
        })
    );
    assert_eq!(position, before);
}

#[test]
fn test_opponent_pieces_have_no_legal_moves() {
    let position = Position::new();
    assert!(position.legal_moves(sq("e7")).is_empty());
    assert!(position.legal_moves(sq("e4")).is_empty());
    assert!(position.piece_at_index(64).is_none());
}

#[test]
fn test_square_attack_detection() {
    let position = Position::new();
    assert!(position.is_square_attacked(sq("f3"), Color::White));
    assert!(position.is_square_attacked(sq("d3"), Color::White));
    assert!(!position.is_square_attacked(sq("e4"), Color::White));
    assert!(position.is_square_attacked(sq("f6"), Color::Black));
    assert!(!position.is_square_attacked(sq("e5"), Color::Black));
}
