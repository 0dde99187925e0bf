//! The board is the single authoritative record of where pieces stand: one
//! occupancy slot per square, indexed by [`Position`]. Pieces mirror their
//! own placement as a plain value, and the game keeps the two in sync; no
//! live back-references exist to drift apart.

use itertools::Itertools;

use crate::core::{PieceId, Position, MAX_BOARD_SIZE};

/// Snapshot view of a single board cell: its coordinate and the occupying
/// piece, if any. Recomputed on demand from the occupancy index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Square {
    #[allow(missing_docs)]
    pub position: Position,
    #[allow(missing_docs)]
    pub occupant: Option<PieceId>,
}

/// A fixed-size square grid of piece placements, created once per game.
///
/// Lookups outside the grid answer "no such square" (`None`) rather than
/// failing: movement code walks off the edge freely and simply stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: i8,
    occupancy: Vec<Option<PieceId>>,
}

impl Board {
    /// Creates an empty board of the given side length.
    ///
    /// # Panics
    ///
    /// If `size` is not within `1..=`[`MAX_BOARD_SIZE`].
    #[must_use]
    pub fn new(size: i8) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&size),
            "board size should be in 1..={MAX_BOARD_SIZE}, got {size}"
        );
        Self {
            size,
            occupancy: vec![None; size as usize * size as usize],
        }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> i8 {
        self.size
    }

    /// Whether the coordinate lies on this board.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.row >= 0
            && position.row < self.size
            && position.col >= 0
            && position.col < self.size
    }

    const fn index(&self, position: Position) -> usize {
        position.row as usize * self.size as usize + position.col as usize
    }

    /// The piece standing on `position`, or `None` for an empty or
    /// nonexistent square.
    #[must_use]
    pub fn occupant(&self, position: Position) -> Option<PieceId> {
        if !self.contains(position) {
            return None;
        }
        self.occupancy[self.index(position)]
    }

    /// The [`Square`] view at `position`, or `None` if the coordinate is off
    /// the board.
    #[must_use]
    pub fn square(&self, position: Position) -> Option<Square> {
        if !self.contains(position) {
            return None;
        }
        Some(Square {
            position,
            occupant: self.occupancy[self.index(position)],
        })
    }

    /// Enumerates every square in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        (0..self.size)
            .cartesian_product(0..self.size)
            .map(|(row, col)| {
                let position = Position::new(row, col);
                Square {
                    position,
                    occupant: self.occupancy[self.index(position)],
                }
            })
    }

    pub(crate) fn place(&mut self, position: Position, piece: PieceId) {
        debug_assert!(self.contains(position), "placing {piece:?} off the board");
        let slot = self.index(position);
        debug_assert!(
            self.occupancy[slot].is_none(),
            "placing {piece:?} on an occupied square {position}"
        );
        self.occupancy[slot] = Some(piece);
    }

    pub(crate) fn vacate(&mut self, position: Position) -> Option<PieceId> {
        if !self.contains(position) {
            return None;
        }
        let slot = self.index(position);
        self.occupancy[slot].take()
    }
}
