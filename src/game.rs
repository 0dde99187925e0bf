//! Game orchestration: the one owner of all mutable chess state. A [`Game`]
//! holds the board, the piece arena and the per-team rosters, and is the
//! only writer of any of them; movement geometry and check simulation just
//! read. The single mutating entry point is [`Game::move_piece`], and everything
//! a caller needs to react to a move comes back in its [`MoveOutcome`].

use std::collections::HashSet;
use std::fmt;

use anyhow::{bail, Result};
use strum::IntoEnumIterator;

use crate::board::Board;
use crate::core::{
    Delta, Move, MoveKind, Piece, PieceId, PieceKind, Position, Team, DEFAULT_BOARD_SIZE,
};
use crate::movement;

/// Check state facing the team to move. Checkmate is terminal: the game
/// accepts no further moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Nobody is in check.
    Normal,
    /// The named team is in check and must answer it.
    Check(Team),
    /// The named team is mated.
    Checkmate(Team),
}

/// What a completed move did, returned from [`Game::move_piece`] for the
/// caller to inspect: the turn-changed and promotion-needed notifications
/// in result form.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Piece removed from play by this move, by ordinary or en passant
    /// capture.
    pub captured: Option<PieceId>,
    /// Pawn that reached the far rank and now awaits a
    /// [`Game::promote_pawn`] choice.
    pub promotion: Option<PieceId>,
    /// Check state facing the team now to move.
    pub status: GameStatus,
}

/// One match of chess: board, pieces, rosters, turn counter and check
/// state.
///
/// Captured pieces and promoted-away pawns stay in the arena with their
/// history; only their placement is cleared. [`PieceId`] handles therefore
/// stay valid for the whole game.
pub struct Game {
    board: Board,
    pieces: Vec<Piece>,
    rosters: [Vec<PieceId>; 2],
    turn: u32,
    status: GameStatus,
    pending_promotion: Option<PieceId>,
    last_move: Option<(PieceId, Move)>,
}

impl Game {
    /// Creates a match with an empty board of the given side length,
    /// White to move on turn 1. Populate it with [`Game::setup_board`] or
    /// piece by piece with [`Game::add_piece`].
    ///
    /// # Panics
    ///
    /// If `size` is not within `1..=`[`crate::core::MAX_BOARD_SIZE`].
    #[must_use]
    pub fn new(size: i8) -> Self {
        Self {
            board: Board::new(size),
            pieces: Vec::new(),
            rosters: [Vec::new(), Vec::new()],
            turn: 1,
            status: GameStatus::Normal,
            pending_promotion: None,
            last_move: None,
        }
    }

    /// A standard match: default board, full armies.
    ///
    /// # Panics
    ///
    /// Never in practice; the standard setup always fits a fresh default
    /// board.
    #[must_use]
    pub fn standard() -> Self {
        let mut game = Self::new(DEFAULT_BOARD_SIZE);
        game.setup_board()
            .expect("the standard setup fits a fresh default board");
        game
    }

    /// Places both armies in the standard arrangement: eight pawns on each
    /// team's second rank, rooks/knights/bishops mirrored around the back
    /// rank center, queen on the d file, king on the e file.
    ///
    /// # Errors
    ///
    /// If the board is too narrow for the standard back rank or any target
    /// square is already taken (e.g. when called twice).
    pub fn setup_board(&mut self) -> Result<()> {
        if self.board.size() < DEFAULT_BOARD_SIZE {
            bail!(
                "standard setup needs {DEFAULT_BOARD_SIZE} files, the board has {}",
                self.board.size()
            );
        }
        for team in Team::iter() {
            let back_rank = self.relative_row(team, 0);
            let pawn_rank = self.relative_row(team, 1);
            for col in 0..self.board.size() {
                self.add_piece(PieceKind::Pawn, team, Position::new(pawn_rank, col))?;
            }
            for (kind, col) in [
                (PieceKind::Rook, 0),
                (PieceKind::Knight, 1),
                (PieceKind::Bishop, 2),
                (PieceKind::Queen, 3),
                (PieceKind::King, 4),
                (PieceKind::Bishop, 5),
                (PieceKind::Knight, 6),
                (PieceKind::Rook, 7),
            ] {
                self.add_piece(kind, team, Position::new(back_rank, col))?;
            }
        }
        Ok(())
    }

    /// Creates a piece and binds it to a square, registering it in its
    /// team's roster. Board setup uses this for every piece; it is also the
    /// hook for arranging bespoke positions.
    ///
    /// # Errors
    ///
    /// If `position` is off the board or already occupied.
    pub fn add_piece(&mut self, kind: PieceKind, team: Team, position: Position) -> Result<PieceId> {
        if !self.board.contains(position) {
            bail!("{position} is off the board");
        }
        if self.board.occupant(position).is_some() {
            bail!("{position} is already occupied");
        }
        let id = PieceId(self.pieces.len());
        let mut piece = Piece::new(kind, team);
        piece.set_position(Some(position));
        self.pieces.push(piece);
        self.rosters[team.index()].push(id);
        self.board.place(position, id);
        Ok(id)
    }

    /// Team-relative row index: White counts from its own edge of the
    /// board, Black from the opposite one, so both armies face each other.
    fn relative_row(&self, team: Team, index: i8) -> i8 {
        match team {
            Team::White => index,
            Team::Black => self.board.size() - index - 1,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The piece arena, indexable through the positions recorded on the
    /// board's squares.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Resolves a handle issued by this game.
    ///
    /// # Panics
    ///
    /// If the handle comes from a different [`Game`] instance.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// Every piece ever fielded by `team`, dead or alive, in creation
    /// order.
    #[must_use]
    pub fn roster(&self, team: Team) -> &[PieceId] {
        &self.rosters[team.index()]
    }

    /// Current turn number, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The team to move: White on odd turns.
    #[must_use]
    pub const fn team_turn(&self) -> Team {
        if self.turn % 2 == 1 {
            Team::White
        } else {
            Team::Black
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Whether the game has ended in a mate.
    #[must_use]
    pub const fn checkmate(&self) -> bool {
        matches!(self.status, GameStatus::Checkmate(_))
    }

    /// The pawn waiting for a [`Game::promote_pawn`] choice, if any.
    #[must_use]
    pub const fn pending_promotion(&self) -> Option<PieceId> {
        self.pending_promotion
    }

    /// The most recent move and its mover.
    #[must_use]
    pub const fn last_move(&self) -> Option<(PieceId, Move)> {
        self.last_move
    }

    /// The team's king.
    ///
    /// # Panics
    ///
    /// If the roster holds no king still on the board. Every team fields
    /// exactly one king while the game is live, so a kingless roster is a
    /// corrupted game and this fails loudly rather than limping on.
    #[must_use]
    pub fn king(&self, team: Team) -> PieceId {
        self.rosters[team.index()]
            .iter()
            .copied()
            .find(|&id| {
                let piece = &self.pieces[id.index()];
                piece.kind() == PieceKind::King && piece.is_on_board()
            })
            .unwrap_or_else(|| panic!("no {team} king on the board"))
    }

    /// Union of the squares `team`'s pieces reach by raw geometry, the set
    /// used to decide whether the enemy king stands attacked.
    #[must_use]
    pub fn coverage(&self, team: Team) -> HashSet<Position> {
        let mut covered = HashSet::new();
        for &id in &self.rosters[team.index()] {
            if let Some(from) = self.pieces[id.index()].position() {
                covered.extend(movement::reachable(&self.board, &self.pieces, from));
            }
        }
        covered
    }

    /// Raw geometric reachability for one piece, no check filtering; the
    /// building block of [`Game::coverage`]. Empty for a captured piece.
    #[must_use]
    pub fn reachable_squares(&self, piece: PieceId) -> Vec<Position> {
        match self.pieces[piece.index()].position() {
            Some(from) => movement::reachable(&self.board, &self.pieces, from),
            None => Vec::new(),
        }
    }

    /// The player-facing move set: reachable squares that leave the mover's
    /// own king safe, plus any legal castle and en passant destinations.
    /// Empty once the game is over.
    #[must_use]
    pub fn legal_destinations(&self, piece: PieceId) -> Vec<Position> {
        if self.checkmate() {
            return Vec::new();
        }
        let subject = &self.pieces[piece.index()];
        if !subject.is_on_board() {
            return Vec::new();
        }
        let mut allowed: Vec<Position> = self
            .reachable_squares(piece)
            .into_iter()
            .filter(|&to| !self.endangers_king(piece, to))
            .collect();
        match subject.kind() {
            PieceKind::King => allowed.extend(self.castle_destinations(piece)),
            PieceKind::Pawn => allowed.extend(
                self.en_passant_destinations(piece)
                    .into_iter()
                    .filter(|&to| !self.endangers_king(piece, to)),
            ),
            _ => {}
        }
        allowed
    }

    /// Executes a move and advances the turn.
    ///
    /// The target is expected to come from [`Game::legal_destinations`]:
    /// only the cheap structural violations (game over, dead piece, wrong
    /// team, off-board target) are rejected here, before any state changes.
    /// Full legality is the caller's contract and is not re-checked; a
    /// caller that bypasses [`Game::legal_destinations`] can corrupt the
    /// game.
    ///
    /// # Errors
    ///
    /// On the structural violations above; nothing has changed when an
    /// error comes back.
    pub fn move_piece(&mut self, piece: PieceId, target: Position) -> Result<MoveOutcome> {
        if self.checkmate() {
            bail!("the game is over");
        }
        let Some(mover) = self.pieces.get(piece.index()) else {
            bail!("unknown piece handle");
        };
        let kind = mover.kind();
        let team = mover.team();
        let Some(from) = mover.position() else {
            bail!("that {team} {kind:?} is no longer on the board");
        };
        if team != self.team_turn() {
            bail!("it is {}'s turn", self.team_turn());
        }
        if !self.board.contains(target) {
            bail!("target {target} is off the board");
        }

        // A promotion choice the caller never made defaults to a queen.
        self.resolve_stale_promotion();

        // En passant: the victim leaves its square before the mover lands.
        let mut captured = None;
        let mut move_kind = MoveKind::Normal;
        if kind == PieceKind::Pawn
            && target.col != from.col
            && self.board.occupant(target).is_none()
        {
            if let Some(victim) = self.en_passant_victim(team, target) {
                let square = self.pieces[victim.index()]
                    .position()
                    .expect("an eligible victim stands on its square");
                let _ = self.board.vacate(square);
                self.pieces[victim.index()].set_position(None);
                captured = Some(victim);
                move_kind = MoveKind::EnPassant;
            }
        }

        // Vacate the origin, capture whatever held the target, land the
        // mover.
        let _ = self.board.vacate(from);
        if let Some(occupant) = self.board.vacate(target) {
            self.pieces[occupant.index()].set_position(None);
            captured = Some(occupant);
        }
        self.board.place(target, piece);
        self.pieces[piece.index()].set_position(Some(target));

        // A king landing two files away just castled; bring the rook
        // across.
        if kind == PieceKind::King && target.row == from.row && (target.col - from.col).abs() == 2 {
            let rook = self.relocate_castling_rook(team, from, target);
            move_kind = MoveKind::Castle { rook };
        }

        let record = Move::new(from, target, self.turn, move_kind);
        self.pieces[piece.index()].record(record);
        self.last_move = Some((piece, record));

        // A pawn on the far rank promotes, by push and capture alike.
        let far_rank = self.relative_row(team, self.board.size() - 1);
        let promotion = (kind == PieceKind::Pawn && target.row == far_rank).then_some(piece);
        self.pending_promotion = promotion;

        self.turn += 1;
        self.refresh_status();
        Ok(MoveOutcome {
            captured,
            promotion,
            status: self.status,
        })
    }

    /// Replaces a pawn that reached the far rank with a piece of the chosen
    /// kind on the same square. The pawn leaves its roster (its arena slot
    /// and history remain); the replacement inherits the history, so
    /// move-count rules keep working. Check state is recomputed, since the
    /// new piece may itself give check.
    ///
    /// # Errors
    ///
    /// If no promotion is pending for `pawn`, or the chosen kind is a king
    /// or a pawn.
    pub fn promote_pawn(&mut self, pawn: PieceId, kind: PieceKind) -> Result<PieceId> {
        if self.pending_promotion != Some(pawn) {
            bail!("no promotion is pending for that piece");
        }
        if matches!(kind, PieceKind::King | PieceKind::Pawn) {
            bail!("a pawn may not promote to a {kind:?}");
        }
        Ok(self.replace_pawn(pawn, kind))
    }

    fn replace_pawn(&mut self, pawn: PieceId, kind: PieceKind) -> PieceId {
        let (team, position, history) = {
            let piece = &self.pieces[pawn.index()];
            (
                piece.team(),
                piece
                    .position()
                    .expect("a promoting pawn stands on the far rank"),
                piece.history().to_vec(),
            )
        };
        let id = PieceId(self.pieces.len());
        self.pieces.push(Piece::promoted(kind, team, position, history));
        let _ = self.board.vacate(position);
        self.board.place(position, id);
        self.pieces[pawn.index()].set_position(None);
        let roster = &mut self.rosters[team.index()];
        roster.retain(|&entry| entry != pawn);
        roster.push(id);
        self.pending_promotion = None;
        self.refresh_status();
        id
    }

    fn resolve_stale_promotion(&mut self) {
        if let Some(pawn) = self.pending_promotion {
            let _ = self.replace_pawn(pawn, PieceKind::Queen);
        }
    }

    /// Finds the never-moved rook beyond the king's landing square (the
    /// two-file direction says which side was castled) and relocates it to
    /// the square the king skipped.
    fn relocate_castling_rook(
        &mut self,
        team: Team,
        king_from: Position,
        king_to: Position,
    ) -> PieceId {
        let step = Delta::new(0, (king_to.col - king_from.col).signum());
        let mut probe = king_to + step;
        let (rook, corner) = loop {
            assert!(
                self.board.contains(probe),
                "a castling king has an unmoved rook beyond its landing square"
            );
            if let Some(occupant) = self.board.occupant(probe) {
                let candidate = &self.pieces[occupant.index()];
                assert!(
                    candidate.kind() == PieceKind::Rook
                        && candidate.team() == team
                        && candidate.move_count() == 0,
                    "expected an unmoved {team} rook beyond the castling king, found {candidate}"
                );
                break (occupant, probe);
            }
            probe = probe + step;
        };
        let landing = Position::new(king_to.row, king_to.col - step.col);
        let _ = self.board.vacate(corner);
        self.board.place(landing, rook);
        self.pieces[rook.index()].set_position(Some(landing));
        let record = Move::new(corner, landing, self.turn, MoveKind::Normal);
        self.pieces[rook.index()].record(record);
        rook
    }

    /// Castle destinations for the king: never moved, not in check, a
    /// never-moved rook on its row with nothing in between, and the king
    /// neither crossing nor landing on an attacked square.
    fn castle_destinations(&self, piece: PieceId) -> Vec<Position> {
        let king = &self.pieces[piece.index()];
        let mut allowed = Vec::new();
        if king.move_count() != 0 {
            return allowed;
        }
        let Some(from) = king.position() else {
            return allowed;
        };
        if self.is_in_check(king.team()) {
            return allowed;
        }
        for &candidate in &self.rosters[king.team().index()] {
            let rook = &self.pieces[candidate.index()];
            if rook.kind() != PieceKind::Rook || rook.move_count() != 0 {
                continue;
            }
            let Some(corner) = rook.position() else {
                continue;
            };
            if corner.row != from.row {
                continue;
            }
            let step = Delta::new(0, (corner.col - from.col).signum());
            let destination = from + step + step;
            // The two-file hop must stay strictly between king and rook.
            if (destination.col - from.col).abs() >= (corner.col - from.col).abs() {
                continue;
            }
            let mut lane = from + step;
            let mut clear = true;
            while lane.col != corner.col {
                if self.board.occupant(lane).is_some() {
                    clear = false;
                    break;
                }
                lane = lane + step;
            }
            if !clear {
                continue;
            }
            // One simulated step at a time: crossing square, then landing
            // square.
            if self.endangers_king(piece, from + step) || self.endangers_king(piece, destination) {
                continue;
            }
            allowed.push(destination);
        }
        allowed
    }

    /// En passant destinations for a pawn: an empty forward diagonal whose
    /// rear neighbor holds an enemy pawn that double-stepped exactly one
    /// turn ago.
    fn en_passant_destinations(&self, piece: PieceId) -> Vec<Position> {
        let pawn = &self.pieces[piece.index()];
        if pawn.kind() != PieceKind::Pawn {
            return Vec::new();
        }
        let Some(from) = pawn.position() else {
            return Vec::new();
        };
        let mut allowed = Vec::new();
        for side in [-1, 1] {
            let to = from + Delta::new(pawn.team().forward(), side);
            if self.board.contains(to)
                && self.board.occupant(to).is_none()
                && self.en_passant_victim(pawn.team(), to).is_some()
            {
                allowed.push(to);
            }
        }
        allowed
    }

    /// The pawn an en passant capture landing on `to` would remove: it sits
    /// one rank behind the destination and its last move was a double step
    /// made exactly one turn before the current one.
    fn en_passant_victim(&self, team: Team, to: Position) -> Option<PieceId> {
        let behind = Position::new(to.row - team.forward(), to.col);
        let occupant = self.board.occupant(behind)?;
        let victim = &self.pieces[occupant.index()];
        if victim.team() == team || victim.kind() != PieceKind::Pawn {
            return None;
        }
        let last = victim.last_move()?;
        (last.is_double_step() && last.turn + 1 == self.turn).then_some(occupant)
    }

    /// Whether moving `piece` to `target` would leave its own king
    /// attacked.
    ///
    /// The displacement happens on a throwaway copy of the occupancy index
    /// and check is read off that copy. Live state is untouched on every
    /// path, so there is no rewind to get wrong.
    fn endangers_king(&self, piece: PieceId, target: Position) -> bool {
        let mover = &self.pieces[piece.index()];
        let team = mover.team();
        let from = mover
            .position()
            .expect("a simulated mover stands on the board");

        let mut board = self.board.clone();
        let _ = board.vacate(from);
        if mover.kind() == PieceKind::Pawn
            && target.col != from.col
            && board.occupant(target).is_none()
        {
            if let Some(victim) = self.en_passant_victim(team, target) {
                let square = self.pieces[victim.index()]
                    .position()
                    .expect("an eligible victim stands on its square");
                let _ = board.vacate(square);
            }
        }
        let _ = board.vacate(target);
        board.place(target, piece);

        let king = self.king(team);
        let king_square = if king == piece {
            target
        } else {
            self.pieces[king.index()]
                .position()
                .expect("a live king stands on its square")
        };
        Self::covered(&board, &self.pieces, team.opponent(), king_square)
    }

    /// Whether any of `by`'s pieces on `board` reaches `target`.
    fn covered(board: &Board, pieces: &[Piece], by: Team, target: Position) -> bool {
        board.squares().any(|square| match square.occupant {
            Some(occupant) if pieces[occupant.index()].team() == by => {
                movement::reachable(board, pieces, square.position).contains(&target)
            }
            _ => false,
        })
    }

    fn is_in_check(&self, team: Team) -> bool {
        let king = self.king(team);
        let square = self.pieces[king.index()]
            .position()
            .expect("a live king stands on its square");
        Self::covered(&self.board, &self.pieces, team.opponent(), square)
    }

    /// Whether any unfiltered candidate move of `team` ends with its king
    /// safe. Castling is absent from the candidates, as it is never legal
    /// while in check.
    fn has_escape(&self, team: Team) -> bool {
        self.rosters[team.index()].iter().copied().any(|id| {
            let Some(from) = self.pieces[id.index()].position() else {
                return false;
            };
            let mut candidates = movement::reachable(&self.board, &self.pieces, from);
            candidates.extend(self.en_passant_destinations(id));
            candidates
                .into_iter()
                .any(|to| !self.endangers_king(id, to))
        })
    }

    /// Recomputes the check state for the team to move; only ever called at
    /// the tail of a mutation, never mid-move.
    fn refresh_status(&mut self) {
        let team = self.team_turn();
        self.status = if self.is_in_check(team) {
            if self.has_escape(team) {
                GameStatus::Check(team)
            } else {
                GameStatus::Checkmate(team)
            }
        } else {
            GameStatus::Normal
        };
    }

    /// One-line human-readable state: turn, team to move, last move and
    /// any check or mate. Exact phrasing is not load-bearing.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = format!("turn {}, {} to move", self.turn, self.team_turn());
        if let Some((piece, last)) = &self.last_move {
            text.push_str(&format!(", last move {}{}", self.pieces[piece.index()], last));
        }
        match self.status {
            GameStatus::Normal => {}
            GameStatus::Check(team) => text.push_str(&format!("; {team} is in check")),
            GameStatus::Checkmate(team) => {
                text.push_str(&format!("; checkmate, {team} has no way out"));
            }
        }
        text
    }
}

impl fmt::Display for Game {
    /// Renders the board from White's perspective with rank and file
    /// labels, followed by the [`Game::summary`] line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.board.size()).rev() {
            write!(f, "{:>2}", row + 1)?;
            for col in 0..self.board.size() {
                match self.board.occupant(Position::new(row, col)) {
                    Some(id) => write!(f, " {}", self.pieces[id.index()])?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for col in 0..self.board.size() {
            write!(f, " {}", (b'a' + col as u8) as char)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.summary())
    }
}
