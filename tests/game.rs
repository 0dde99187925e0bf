use pretty_assertions::assert_eq;
use shatranj::core::{MoveKind, PieceId, PieceKind, Position, Team};
use shatranj::game::{Game, GameStatus, MoveOutcome};

fn at(coordinate: &str) -> Position {
    coordinate.try_into().expect("tests use valid coordinates")
}

fn piece_at(game: &Game, coordinate: &str) -> PieceId {
    game.board()
        .occupant(at(coordinate))
        .unwrap_or_else(|| panic!("expected a piece on {coordinate}"))
}

/// Plays a move the way a front end would: confirm the destination is on
/// offer, then execute it.
fn play(game: &mut Game, from: &str, to: &str) -> MoveOutcome {
    let piece = piece_at(game, from);
    assert!(
        game.legal_destinations(piece).contains(&at(to)),
        "{from}{to} should be offered as legal"
    );
    game.move_piece(piece, at(to)).expect("legal move executes")
}

fn arrange(placements: &[(PieceKind, Team, &str)]) -> Game {
    let mut game = Game::new(8);
    for &(kind, team, coordinate) in placements {
        game.add_piece(kind, team, at(coordinate))
            .expect("test positions place pieces on distinct squares");
    }
    game
}

#[test]
fn en_passant_capture_removes_the_passed_pawn() {
    let mut game = Game::standard();
    play(&mut game, "e2", "e4");
    play(&mut game, "a7", "a6");
    play(&mut game, "e4", "e5");
    play(&mut game, "d7", "d5");

    // The black pawn just double-stepped past e5's attack square.
    let pawn = piece_at(&game, "e5");
    let victim = piece_at(&game, "d5");
    assert!(game.legal_destinations(pawn).contains(&at("d6")));

    let outcome = play(&mut game, "e5", "d6");
    assert_eq!(outcome.captured, Some(victim));
    assert_eq!(game.piece(victim).position(), None);
    assert_eq!(game.board().occupant(at("d5")), None);
    assert_eq!(game.board().occupant(at("d6")), Some(pawn));
    let (_, record) = game.last_move().expect("a move was just played");
    assert_eq!(record.kind, MoveKind::EnPassant);
}

#[test]
fn en_passant_expires_one_turn_later() {
    let mut game = Game::standard();
    play(&mut game, "e2", "e4");
    play(&mut game, "a7", "a6");
    play(&mut game, "e4", "e5");
    play(&mut game, "d7", "d5");
    // White declines the capture...
    play(&mut game, "h2", "h3");
    play(&mut game, "a6", "a5");

    // ...and the window has closed.
    let pawn = piece_at(&game, "e5");
    assert!(!game.legal_destinations(pawn).contains(&at("d6")));
}

#[test]
fn en_passant_is_not_offered_against_a_single_step() {
    let mut game = Game::standard();
    play(&mut game, "e2", "e4");
    play(&mut game, "d7", "d6");
    play(&mut game, "e4", "e5");
    play(&mut game, "d6", "d5");

    // The d pawn arrived next to e5 in two single steps, not one double.
    let pawn = piece_at(&game, "e5");
    assert!(!game.legal_destinations(pawn).contains(&at("d6")));
}

#[test]
fn castling_both_sides_are_offered_and_move_the_rook() {
    let game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Rook, Team::White, "a1"),
        (PieceKind::Rook, Team::White, "h1"),
        (PieceKind::King, Team::Black, "e8"),
    ]);
    let king = piece_at(&game, "e1");
    let destinations = game.legal_destinations(king);
    assert!(destinations.contains(&at("g1")));
    assert!(destinations.contains(&at("c1")));

    // Kingside: the h rook crosses to f1.
    let mut kingside = game;
    let outcome = play(&mut kingside, "e1", "g1");
    assert_eq!(outcome.captured, None);
    let rook = piece_at(&kingside, "f1");
    assert_eq!(kingside.piece(rook).kind(), PieceKind::Rook);
    assert_eq!(kingside.piece(rook).move_count(), 1);
    assert_eq!(kingside.board().occupant(at("h1")), None);
    let (_, record) = kingside.last_move().expect("the castle was just played");
    assert_eq!(record.kind, MoveKind::Castle { rook });
}

#[test]
fn castling_queenside_moves_the_far_rook() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Rook, Team::White, "a1"),
        (PieceKind::Rook, Team::White, "h1"),
        (PieceKind::King, Team::Black, "e8"),
    ]);
    play(&mut game, "e1", "c1");
    let rook = piece_at(&game, "d1");
    assert_eq!(game.piece(rook).kind(), PieceKind::Rook);
    assert_eq!(game.board().occupant(at("a1")), None);
    // The kingside rook never moved.
    assert_eq!(game.piece(piece_at(&game, "h1")).move_count(), 0);
}

#[test]
fn castling_is_gone_once_the_king_has_moved() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Rook, Team::White, "a1"),
        (PieceKind::Rook, Team::White, "h1"),
        (PieceKind::King, Team::Black, "e8"),
    ]);
    play(&mut game, "e1", "e2");
    play(&mut game, "e8", "e7");
    play(&mut game, "e2", "e1");
    play(&mut game, "e7", "e8");

    // Back on its square, but the history says it moved.
    let king = piece_at(&game, "e1");
    let destinations = game.legal_destinations(king);
    assert!(!destinations.contains(&at("g1")));
    assert!(!destinations.contains(&at("c1")));
}

#[test]
fn castling_is_gone_only_for_a_moved_rook() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Rook, Team::White, "a1"),
        (PieceKind::Rook, Team::White, "h1"),
        (PieceKind::King, Team::Black, "e8"),
    ]);
    play(&mut game, "h1", "h3");
    play(&mut game, "e8", "e7");
    play(&mut game, "h3", "h1");
    play(&mut game, "e7", "e8");

    let king = piece_at(&game, "e1");
    let destinations = game.legal_destinations(king);
    assert!(!destinations.contains(&at("g1")));
    assert!(destinations.contains(&at("c1")));
}

#[test]
fn castling_is_denied_through_an_attacked_square() {
    let game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Rook, Team::White, "a1"),
        (PieceKind::Rook, Team::White, "h1"),
        (PieceKind::King, Team::Black, "d8"),
        (PieceKind::Rook, Team::Black, "f8"),
    ]);
    let king = piece_at(&game, "e1");
    let destinations = game.legal_destinations(king);
    // The f file is covered, so no kingside castle and no stepping onto f1
    // or f2 either; queenside transit is clean.
    assert!(!destinations.contains(&at("g1")));
    assert!(!destinations.contains(&at("f1")));
    assert!(!destinations.contains(&at("f2")));
    assert!(destinations.contains(&at("c1")));
}

#[test]
fn castling_is_denied_while_in_check() {
    let game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Rook, Team::White, "a1"),
        (PieceKind::Rook, Team::White, "h1"),
        (PieceKind::King, Team::Black, "a8"),
        (PieceKind::Rook, Team::Black, "e5"),
    ]);
    let king = piece_at(&game, "e1");
    let destinations = game.legal_destinations(king);
    assert!(!destinations.contains(&at("g1")));
    assert!(!destinations.contains(&at("c1")));
    // Stepping out of the rook's file is still fine.
    assert!(destinations.contains(&at("d1")));
    assert!(destinations.contains(&at("f1")));
}

#[test]
fn castling_is_denied_through_a_blocking_piece() {
    let game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Rook, Team::White, "a1"),
        (PieceKind::Rook, Team::White, "h1"),
        (PieceKind::Bishop, Team::White, "f1"),
        (PieceKind::King, Team::Black, "e8"),
    ]);
    let king = piece_at(&game, "e1");
    let destinations = game.legal_destinations(king);
    assert!(!destinations.contains(&at("g1")));
    assert!(destinations.contains(&at("c1")));
}

#[test]
fn fools_mate_is_detected() {
    let mut game = Game::standard();
    play(&mut game, "f2", "f3");
    play(&mut game, "e7", "e5");
    play(&mut game, "g2", "g4");
    let outcome = play(&mut game, "d8", "h4");

    assert_eq!(outcome.status, GameStatus::Checkmate(Team::White));
    assert!(game.checkmate());
    // The mated team stays the team to move.
    assert_eq!(game.team_turn(), Team::White);
    assert!(game.summary().contains("checkmate"));

    // Terminal: no further moves are offered or accepted.
    let king = piece_at(&game, "e1");
    assert_eq!(game.legal_destinations(king), Vec::new());
    assert!(game.move_piece(king, at("f2")).is_err());
}

#[test]
fn check_with_an_escape_is_not_mate() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::Pawn, Team::White, "h2"),
        (PieceKind::King, Team::Black, "e8"),
        (PieceKind::Rook, Team::Black, "a7"),
    ]);
    play(&mut game, "h2", "h3");
    let outcome = play(&mut game, "a7", "e7");

    assert_eq!(outcome.status, GameStatus::Check(Team::White));
    assert!(!game.checkmate());
    assert!(game.summary().contains("White is in check"));

    // Stepping off the file clears the check.
    play(&mut game, "e1", "d1");
    assert_eq!(game.status(), GameStatus::Normal);
}

#[test]
fn promotion_by_push_awaits_a_choice() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::King, Team::Black, "e8"),
        (PieceKind::Pawn, Team::White, "a7"),
    ]);
    let pawn = piece_at(&game, "a7");
    let outcome = play(&mut game, "a7", "a8");
    assert_eq!(outcome.promotion, Some(pawn));
    assert_eq!(game.pending_promotion(), Some(pawn));
    // Still a pawn until the caller chooses.
    assert_eq!(game.piece(pawn).kind(), PieceKind::Pawn);

    let queen = game.promote_pawn(pawn, PieceKind::Queen).unwrap();
    assert_eq!(game.board().occupant(at("a8")), Some(queen));
    assert_eq!(game.piece(queen).kind(), PieceKind::Queen);
    assert_eq!(game.piece(queen).team(), Team::White);
    // The queen inherits the pawn's move history.
    assert_eq!(game.piece(queen).move_count(), 1);
    // The pawn is off the board and out of the roster.
    assert_eq!(game.piece(pawn).position(), None);
    assert!(!game.roster(Team::White).contains(&pawn));
    assert!(game.roster(Team::White).contains(&queen));
    // The new queen sweeps the back rank: that is check.
    assert_eq!(game.status(), GameStatus::Check(Team::Black));
}

#[test]
fn promotion_by_capture_uses_the_same_path() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::King, Team::Black, "e5"),
        (PieceKind::Pawn, Team::White, "b7"),
        (PieceKind::Rook, Team::Black, "a8"),
    ]);
    let pawn = piece_at(&game, "b7");
    let rook = piece_at(&game, "a8");
    let outcome = play(&mut game, "b7", "a8");
    assert_eq!(outcome.captured, Some(rook));
    assert_eq!(outcome.promotion, Some(pawn));
}

#[test]
fn promotion_rejects_invalid_choices() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::King, Team::Black, "e5"),
        (PieceKind::Pawn, Team::White, "a7"),
        (PieceKind::Pawn, Team::White, "h2"),
    ]);
    let pawn = piece_at(&game, "a7");
    let bystander = piece_at(&game, "h2");
    // Nothing pending yet.
    assert!(game.promote_pawn(pawn, PieceKind::Queen).is_err());

    play(&mut game, "a7", "a8");
    assert!(game.promote_pawn(bystander, PieceKind::Queen).is_err());
    assert!(game.promote_pawn(pawn, PieceKind::King).is_err());
    assert!(game.promote_pawn(pawn, PieceKind::Pawn).is_err());

    let knight = game.promote_pawn(pawn, PieceKind::Knight).unwrap();
    assert_eq!(game.piece(knight).kind(), PieceKind::Knight);
    // Once resolved, the window is shut.
    assert!(game.promote_pawn(pawn, PieceKind::Queen).is_err());
}

#[test]
fn unresolved_promotion_defaults_to_a_queen() {
    let mut game = arrange(&[
        (PieceKind::King, Team::White, "e1"),
        (PieceKind::King, Team::Black, "e5"),
        (PieceKind::Pawn, Team::White, "a7"),
        (PieceKind::Pawn, Team::Black, "h7"),
    ]);
    play(&mut game, "a7", "a8");

    // Black plays on without answering the promotion prompt.
    let outcome = play(&mut game, "h7", "h6");
    assert_eq!(outcome.promotion, None);
    assert_eq!(game.pending_promotion(), None);
    let promoted = piece_at(&game, "a8");
    assert_eq!(game.piece(promoted).kind(), PieceKind::Queen);
    assert_eq!(game.piece(promoted).team(), Team::White);
}

#[test]
fn simulation_traffic_leaves_no_trace() {
    let game = Game::standard();
    let board_before = game.board().clone();
    let positions_before: Vec<_> = game.pieces().iter().map(|piece| piece.position()).collect();

    // Legality filtering simulates every candidate move of every piece.
    for team in [Team::White, Team::Black] {
        for &id in game.roster(team) {
            let _ = game.legal_destinations(id);
        }
    }

    assert_eq!(game.board(), &board_before);
    let positions_after: Vec<_> = game.pieces().iter().map(|piece| piece.position()).collect();
    assert_eq!(positions_after, positions_before);
}

#[test]
fn coverage_is_stable_across_unrelated_moves() {
    let mut game = Game::standard();
    let before = game.coverage(Team::Black);

    // Plenty of simulation in between, then a white move that touches no
    // black piece and no square black reaches.
    for &id in game.roster(Team::White) {
        let _ = game.legal_destinations(id);
    }
    play(&mut game, "g1", "f3");

    assert_eq!(game.coverage(Team::Black), before);
}
