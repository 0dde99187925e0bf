//! Geometric move generation: where each piece kind may go by its movement
//! rules alone, reading only the current occupancy. Whether a destination
//! would expose the mover's own king is the game's concern (see
//! [`crate::game::Game::legal_destinations`]), not the geometry's; the same
//! goes for en passant and castling, which depend on move history.

use crate::board::Board;
use crate::core::{Delta, Piece, PieceKind, Position, Team};

const ORTHOGONAL: [Delta; 4] = [
    Delta::new(1, 0),
    Delta::new(0, 1),
    Delta::new(-1, 0),
    Delta::new(0, -1),
];

const DIAGONAL: [Delta; 4] = [
    Delta::new(1, 1),
    Delta::new(-1, 1),
    Delta::new(-1, -1),
    Delta::new(1, -1),
];

const EVERY_DIRECTION: [Delta; 8] = [
    Delta::new(1, 1),
    Delta::new(-1, 1),
    Delta::new(-1, -1),
    Delta::new(1, -1),
    Delta::new(1, 0),
    Delta::new(0, 1),
    Delta::new(-1, 0),
    Delta::new(0, -1),
];

const KNIGHT_JUMPS: [Delta; 8] = [
    Delta::new(1, 2),
    Delta::new(-1, 2),
    Delta::new(-1, -2),
    Delta::new(1, -2),
    Delta::new(2, 1),
    Delta::new(-2, 1),
    Delta::new(-2, -1),
    Delta::new(2, -1),
];

/// Destinations the piece standing on `from` can reach by its own movement
/// geometry, ignoring check. Dispatch is a closed match over [`PieceKind`]:
/// sliders walk their direction sets until blocked, king and knight take the
/// same walk capped at a single step, pawns have their own asymmetric rules.
///
/// Returns an empty set when `from` is empty or off the board.
#[must_use]
pub fn reachable(board: &Board, pieces: &[Piece], from: Position) -> Vec<Position> {
    let Some(occupant) = board.occupant(from) else {
        return Vec::new();
    };
    let mover = &pieces[occupant.index()];
    match mover.kind() {
        PieceKind::Queen => slide(board, pieces, from, mover.team(), &EVERY_DIRECTION, None),
        PieceKind::Rook => slide(board, pieces, from, mover.team(), &ORTHOGONAL, None),
        PieceKind::Bishop => slide(board, pieces, from, mover.team(), &DIAGONAL, None),
        PieceKind::King => slide(board, pieces, from, mover.team(), &EVERY_DIRECTION, Some(1)),
        PieceKind::Knight => slide(board, pieces, from, mover.team(), &KNIGHT_JUMPS, Some(1)),
        PieceKind::Pawn => pawn_reachable(board, pieces, from, mover),
    }
}

/// Walks every direction in turn, accumulating empty squares, plus exactly
/// one opposing square to capture on. A friendly piece or the board edge
/// ends the walk; `range` caps it for the king and the knight (whose
/// "directions" are its eight jump offsets).
fn slide(
    board: &Board,
    pieces: &[Piece],
    from: Position,
    team: Team,
    directions: &[Delta],
    range: Option<u8>,
) -> Vec<Position> {
    let mut allowed = Vec::new();
    for &direction in directions {
        let mut position = from;
        let mut steps = 0;
        loop {
            position = position + direction;
            if !board.contains(position) {
                break;
            }
            match board.occupant(position) {
                None => allowed.push(position),
                Some(occupant) => {
                    if pieces[occupant.index()].team() != team {
                        allowed.push(position);
                    }
                    break;
                }
            }
            steps += 1;
            if range.is_some_and(|cap| steps >= cap) {
                break;
            }
        }
    }
    allowed
}

fn pawn_reachable(board: &Board, pieces: &[Piece], from: Position, pawn: &Piece) -> Vec<Position> {
    let mut allowed = Vec::new();
    let forward = Delta::new(pawn.team().forward(), 0);

    let single = from + forward;
    let single_open = board.contains(single) && board.occupant(single).is_none();
    if single_open {
        allowed.push(single);
    }

    // The opening double step needs both squares free and an untouched pawn.
    if single_open && pawn.move_count() == 0 {
        let double = single + forward;
        if board.contains(double) && board.occupant(double).is_none() {
            allowed.push(double);
        }
    }

    for side in [-1, 1] {
        let attack = from + Delta::new(pawn.team().forward(), side);
        if let Some(occupant) = board.occupant(attack) {
            if pieces[occupant.index()].team() != pawn.team() {
                allowed.push(attack);
            }
        }
    }
    allowed
}
