//! End-to-end game sessions driven through raw square indices.

use std::thread;
use std::time::Duration;

use chess_logic::board::{
    Color, GameStatus, MoveError, Piece, PieceKind, Position, PromotionError, SearchConfig,
};
use chess_logic::engine::{GameController, SearchUpdate};
use chess_logic::game::{Game, MoveOutcome};

fn idx(s: &str) -> usize {
    s.parse::<chess_logic::Square>().unwrap().index()
}

fn play_all(game: &mut Game, moves: &[(&str, &str)]) {
    for (from, to) in moves {
        match game.make_move(idx(from), idx(to)) {
            Ok(MoveOutcome::Moved(_)) => {}
            other => panic!("{from}{to} failed: {other:?}"),
        }
    }
}

#[test]
fn kingside_castling_moves_the_rook() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("b8", "c6"),
            ("f1", "c4"),
            ("f8", "c5"),
        ],
    );
    assert!(game.legal_moves(idx("e1")).contains(&"g1".parse().unwrap()));
    play_all(&mut game, &[("e1", "g1")]);

    assert_eq!(
        game.move_labels(),
        ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"]
    );
    assert_eq!(
        game.piece_at(idx("f1")),
        Some(PieceKind::new(Color::White, Piece::Rook))
    );
    assert_eq!(game.piece_at(idx("h1")), None);
    assert!(!game.position().castling_rights().has(Color::White, true));
}

#[test]
fn en_passant_removes_the_passed_pawn() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5"), ("e5", "d6")],
    );

    assert_eq!(game.move_labels().last().map(String::as_str), Some("exd6"));
    assert_eq!(game.piece_at(idx("d5")), None);
    assert_eq!(
        game.captured_by(Color::White),
        [PieceKind::new(Color::Black, Piece::Pawn)]
    );
    assert_eq!(game.material_score_difference(), 1);
}

#[test]
fn underpromotion_through_the_session() {
    let position = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let mut game = Game::from_position(position).unwrap();

    let outcome = game.make_move(idx("a7"), idx("a8")).unwrap();
    assert_eq!(
        outcome,
        MoveOutcome::PromotionPending {
            square: "a8".parse().unwrap()
        }
    );
    assert!(game.is_promotion_pending());
    assert_eq!(game.promotion_color(), Some(Color::White));
    assert!(game.legal_moves(idx("e8")).is_empty());
    assert!(!game.restore_snapshot(0));
    assert!(matches!(
        game.make_move(idx("e1"), idx("d1")),
        Err(MoveError::PromotionPending { .. })
    ));
    assert_eq!(
        game.promote_pawn(Piece::King),
        Err(MoveError::Promotion(PromotionError::InvalidPiece {
            piece: Piece::King
        }))
    );

    let record = game.promote_pawn(Piece::Knight).unwrap();
    assert_eq!(record.label, "a8=N");
    assert_eq!(record.promotion, Some(Piece::Knight));
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(game.snapshot_count(), 2);
    assert_eq!(
        game.promote_pawn(Piece::Queen),
        Err(MoveError::Promotion(PromotionError::NotPending))
    );
}

#[test]
fn moving_from_an_earlier_snapshot_replaces_the_tail() {
    let mut game = Game::new();
    play_all(&mut game, &[("e2", "e4"), ("e7", "e5"), ("g1", "f3")]);
    assert_eq!(game.snapshot_count(), 4);

    assert!(game.restore_snapshot(1));
    assert_eq!(game.side_to_move(), Color::Black);
    assert_eq!(game.current_snapshot_index(), 1);
    assert!(!game.restore_snapshot(4));

    play_all(&mut game, &[("d7", "d5")]);
    assert_eq!(game.move_labels(), ["e4", "d5"]);
    assert_eq!(game.snapshot_count(), 3);
    assert_eq!(game.current_snapshot_index(), 2);
}

#[test]
fn finished_game_refuses_moves() {
    let mut game = Game::new();
    play_all(
        &mut game,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );
    assert_eq!(game.status(), GameStatus::Checkmate);
    assert_eq!(game.move_labels().last().map(String::as_str), Some("Qh4#"));
    assert_eq!(
        game.make_move(idx("a2"), idx("a3")),
        Err(MoveError::GameOver)
    );
}

#[test]
fn invalid_indices_are_rejected() {
    let mut game = Game::new();
    assert!(matches!(
        game.make_move(64, 0),
        Err(MoveError::InvalidSquare(_))
    ));
    assert!(game.legal_moves(100).is_empty());
    assert_eq!(game.piece_at(64), None);
    assert_eq!(game.snapshot_count(), 1);
}

#[test]
fn controller_answers_a_human_move() {
    let mut controller = GameController::new(SearchConfig::default().with_depth(2));
    controller.make_move(idx("e2"), idx("e4")).unwrap();
    controller.start_search().unwrap();

    let record = loop {
        match controller.poll_search().unwrap() {
            SearchUpdate::Running => thread::sleep(Duration::from_millis(1)),
            SearchUpdate::Finished {
                record: Some(record),
                ..
            } => break record,
            other => panic!("unexpected update {other:?}"),
        }
    };

    assert_eq!(record.piece.color, Color::Black);
    assert_eq!(controller.game().side_to_move(), Color::White);
    assert_eq!(controller.game().snapshot_count(), 3);
}
