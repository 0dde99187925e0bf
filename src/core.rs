//! Chess primitives used across the crate: teams, piece kinds, board
//! coordinates and the per-piece move records the special-move rules are
//! built on.

use std::fmt::{self, Write};
use std::ops::{Add, Sub};

use anyhow::bail;

/// Standard chess is played on an 8x8 board.
pub const DEFAULT_BOARD_SIZE: i8 = 8;
/// Algebraic coordinates spend one letter per file, which caps supported
/// board sizes at the alphabet.
pub const MAX_BOARD_SIZE: i8 = 26;

/// One of the two sides of a chess game. White always has the first turn.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Team {
    White,
    Black,
}

impl Team {
    /// "Flips" the side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row direction this team's pawns advance in: White pawns climb towards
    /// higher rows, Black pawns descend.
    #[must_use]
    pub const fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "White",
            Self::Black => "Black",
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Rook,
    Knight,
    Pawn,
}

impl PieceKind {
    /// Conventional piece letter, uppercase for White and lowercase for
    /// Black (knights take `n`, the king owns `k`).
    #[must_use]
    pub const fn symbol(self, team: Team) -> char {
        match (team, self) {
            (Team::White, Self::King) => 'K',
            (Team::White, Self::Queen) => 'Q',
            (Team::White, Self::Rook) => 'R',
            (Team::White, Self::Bishop) => 'B',
            (Team::White, Self::Knight) => 'N',
            (Team::White, Self::Pawn) => 'P',
            (Team::Black, Self::King) => 'k',
            (Team::Black, Self::Queen) => 'q',
            (Team::Black, Self::Rook) => 'r',
            (Team::Black, Self::Bishop) => 'b',
            (Team::Black, Self::Knight) => 'n',
            (Team::Black, Self::Pawn) => 'p',
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol(Team::White))
    }
}

/// A board coordinate: 0-indexed row (rank) and column (file).
///
/// Positions are plain values and may temporarily hold coordinates outside
/// any particular board: bounds are the board's concern, so movement code
/// can step past an edge and simply get "no such square" back.
///
/// ```
/// use shatranj::core::Position;
///
/// assert_eq!(Position::new(3, 4).to_string(), "e4");
/// let parsed: Position = "e4".try_into().unwrap();
/// assert_eq!(parsed, Position::new(3, 4));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Rank, counted from White's side of the board.
    pub row: i8,
    /// File, counted from the queenside.
    pub col: i8,
}

impl Position {
    /// Connects a row (rank) and column (file) to form a full coordinate.
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }
}

impl Add<Delta> for Position {
    type Output = Self;

    fn add(self, offset: Delta) -> Self {
        Self::new(self.row + offset.row, self.col + offset.col)
    }
}

impl Sub for Position {
    type Output = Delta;

    fn sub(self, origin: Self) -> Delta {
        Delta::new(self.row - origin.row, self.col - origin.col)
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Parses a coordinate in algebraic style: a file letter followed by a
    /// 1-based rank number, e.g. `e4`.
    ///
    /// # Errors
    ///
    /// If the input has no leading file letter or the rank is not a positive
    /// number.
    fn try_from(coordinate: &str) -> anyhow::Result<Self> {
        let mut chars = coordinate.chars();
        let col = match chars.next() {
            Some(file @ 'a'..='z') => file as i8 - 'a' as i8,
            _ => bail!("coordinate should start with a file letter, got '{coordinate}'"),
        };
        let rank: i8 = match chars.as_str().parse() {
            Ok(rank) if rank >= 1 => rank,
            _ => bail!("coordinate rank should be a positive number, got '{coordinate}'"),
        };
        Ok(Self::new(rank - 1, col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col as u8) as char, self.row + 1)
    }
}

/// A row/column offset between two [`Position`]s, also used as a direction
/// vector when walking the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Delta {
    #[allow(missing_docs)]
    pub row: i8,
    #[allow(missing_docs)]
    pub col: i8,
}

impl Delta {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }
}

/// Stable handle to a piece in a game's arena.
///
/// Handles stay valid for the whole game: captured pieces and promoted-away
/// pawns keep their slot, only their placement changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// What kind of displacement a [`Move`] was, beyond from/to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// An ordinary move or capture.
    Normal,
    /// A castle, recorded on the king's move along with the rook that came
    /// with it.
    Castle {
        #[allow(missing_docs)]
        rook: PieceId,
    },
    /// An en passant capture, recorded on the capturing pawn's move.
    EnPassant,
}

/// Immutable record of one displacement of one piece.
///
/// Records accumulate in each piece's history and drive the history-based
/// rules: "has this piece ever moved" (castling, pawn double step) and "did
/// that pawn double-step one turn ago" (en passant).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    #[allow(missing_docs)]
    pub from: Position,
    #[allow(missing_docs)]
    pub to: Position,
    /// Turn the move was made on.
    pub turn: u32,
    #[allow(missing_docs)]
    pub kind: MoveKind,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Position, to: Position, turn: u32, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            turn,
            kind,
        }
    }

    /// Offset from origin to destination.
    #[must_use]
    pub fn delta(&self) -> Delta {
        self.to - self.from
    }

    /// True for a two-square advance along a file, the pawn opening step
    /// that en passant eligibility keys on.
    #[must_use]
    pub fn is_double_step(&self) -> bool {
        let delta = self.delta();
        delta.col == 0 && delta.row.abs() == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A piece owned by a team: identity, current placement and move history.
///
/// The piece does not hold a board reference: its `position` mirrors the
/// board's occupancy index, and the [`crate::game::Game`] is the only writer
/// keeping the two in sync.
#[derive(Clone, Debug)]
pub struct Piece {
    kind: PieceKind,
    team: Team,
    position: Option<Position>,
    history: Vec<Move>,
}

impl Piece {
    pub(crate) fn new(kind: PieceKind, team: Team) -> Self {
        Self {
            kind,
            team,
            position: None,
            history: Vec::new(),
        }
    }

    /// A replacement piece created by pawn promotion: same team and square,
    /// with the pawn's history carried over so move-count rules stay correct.
    pub(crate) fn promoted(
        kind: PieceKind,
        team: Team,
        position: Position,
        history: Vec<Move>,
    ) -> Self {
        Self {
            kind,
            team,
            position: Some(position),
            history,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Current square, or `None` once captured or promoted away.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_on_board(&self) -> bool {
        self.position.is_some()
    }

    /// Every move this piece has made, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of moves this piece has made.
    #[must_use]
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    pub(crate) fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    pub(crate) fn record(&mut self, displacement: Move) {
        self.history.push(displacement);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.kind.symbol(self.team))
    }
}
