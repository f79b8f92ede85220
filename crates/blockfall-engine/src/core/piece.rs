use std::fmt;

use serde::{Deserialize, Serialize};

/// A (row, column) position on the board.
///
/// Coordinates are signed so that a candidate position produced by a move or a
/// rotation can be represented even when it lies outside the board. Legality is
/// decided by [`Board::is_legal`](super::board::Board::is_legal).
///
/// # Coordinate System
///
/// - (0, 0) is the top-left cell
/// - `row` increases downward
/// - `col` increases rightward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns this coordinate shifted by `dy` rows and `dx` columns.
    #[must_use]
    pub const fn offset(self, dy: i32, dx: i32) -> Self {
        Self::new(self.row + dy, self.col + dx)
    }

    /// Returns this coordinate rotated a quarter turn about `pivot`.
    ///
    /// Applies `(y, x) -> (py + px - x, y + px - py)` where `(py, px)` is the pivot.
    #[must_use]
    pub const fn rotated_about(self, pivot: Coord) -> Self {
        Self::new(
            pivot.row + pivot.col - self.col,
            self.row + pivot.col - pivot.row,
        )
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four cells of a piece, in catalog order.
///
/// The second cell is the rotation pivot.
pub type PieceCells = [Coord; 4];

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// O-piece (square, single orientation).
    O = 0,
    /// Z-piece.
    Z = 1,
    /// S-piece.
    S = 2,
    /// T-piece.
    T = 3,
    /// I-piece.
    I = 4,
    /// L-piece.
    L = 5,
    /// J-piece.
    J = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in catalog order.
    pub const ALL: [PieceKind; PieceKind::LEN] = [
        PieceKind::O,
        PieceKind::Z,
        PieceKind::S,
        PieceKind::T,
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
    ];

    /// Returns the board cells this piece occupies when it spawns.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::{Coord, PieceKind};
    ///
    /// let cells = PieceKind::I.spawn_cells();
    /// assert_eq!(cells[0], Coord::new(0, 3));
    /// assert_eq!(cells[3], Coord::new(0, 6));
    /// ```
    #[must_use]
    pub const fn spawn_cells(self) -> PieceCells {
        SPAWN_CELLS[self as usize]
    }

    /// Returns whether the piece has a single orientation and never rotates.
    #[must_use]
    pub const fn is_rotation_invariant(self) -> bool {
        matches!(self, PieceKind::O)
    }

    /// Returns the `(width, height)` of the spawn shape's bounding box.
    #[must_use]
    pub fn size(self) -> (usize, usize) {
        let (min, max) = bounding_box(&self.spawn_cells());
        (
            (max.col - min.col + 1).unsigned_abs() as usize,
            (max.row - min.row + 1).unsigned_abs() as usize,
        )
    }

    /// Returns whether the spawn shape covers `(x, y)` relative to its bounding box.
    ///
    /// Used to draw the next-piece preview.
    #[must_use]
    pub fn is_occupied(self, (x, y): (usize, usize)) -> bool {
        let cells = self.spawn_cells();
        let (min, _) = bounding_box(&cells);
        cells.iter().any(|c| {
            usize::try_from(c.col - min.col) == Ok(x) && usize::try_from(c.row - min.row) == Ok(y)
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::O => 'O',
            PieceKind::Z => 'Z',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::I => 'I',
            PieceKind::L => 'L',
            PieceKind::J => 'J',
        }
    }

    /// Parses a piece kind from a single character (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('o'), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_char('J'), Some(PieceKind::J));
    /// assert_eq!(PieceKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'O' => Some(PieceKind::O),
            'Z' => Some(PieceKind::Z),
            'S' => Some(PieceKind::S),
            'T' => Some(PieceKind::T),
            'I' => Some(PieceKind::I),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

fn bounding_box(cells: &PieceCells) -> (Coord, Coord) {
    let mut min = cells[0];
    let mut max = cells[0];
    for c in &cells[1..] {
        min = Coord::new(min.row.min(c.row), min.col.min(c.col));
        max = Coord::new(max.row.max(c.row), max.col.max(c.col));
    }
    (min, max)
}

/// Spawn cells for every piece kind, indexed by `PieceKind as usize`.
///
/// Order within each entry matters: the second cell is the rotation pivot.
const SPAWN_CELLS: [PieceCells; PieceKind::LEN] = {
    const fn c(row: i32, col: i32) -> Coord {
        Coord::new(row, col)
    }
    [
        // O-piece
        [c(0, 4), c(0, 5), c(1, 4), c(1, 5)],
        // Z-piece
        [c(0, 4), c(0, 5), c(1, 5), c(1, 6)],
        // S-piece
        [c(0, 6), c(0, 5), c(1, 4), c(1, 5)],
        // T-piece
        [c(1, 4), c(1, 5), c(1, 6), c(0, 5)],
        // I-piece
        [c(0, 3), c(0, 4), c(0, 5), c(0, 6)],
        // L-piece
        [c(0, 6), c(1, 5), c(1, 4), c(1, 6)],
        // J-piece
        [c(1, 4), c(1, 5), c(1, 6), c(0, 4)],
    ]
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_spawn_cells_are_distinct() {
        for kind in PieceKind::ALL {
            let cells = kind.spawn_cells();
            let unique = cells.iter().collect::<HashSet<_>>();
            assert_eq!(unique.len(), 4, "{kind} has overlapping spawn cells");
        }
    }

    #[test]
    fn test_spawn_cells_fit_default_board() {
        for kind in PieceKind::ALL {
            for c in kind.spawn_cells() {
                assert!((0..2).contains(&c.row), "{kind} spawns below row 1: {c}");
                assert!((3..7).contains(&c.col), "{kind} spawns outside cols 3..7: {c}");
            }
        }
    }

    #[test]
    fn test_rotated_about_quarter_turn() {
        let pivot = Coord::new(1, 5);
        // left of pivot -> below pivot
        assert_eq!(Coord::new(1, 4).rotated_about(pivot), Coord::new(2, 5));
        // above pivot -> left of pivot
        assert_eq!(Coord::new(0, 5).rotated_about(pivot), Coord::new(1, 4));
        // Pivot is fixed.
        assert_eq!(pivot.rotated_about(pivot), pivot);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in PieceKind::ALL {
            let cells = kind.spawn_cells();
            let pivot = cells[1];
            let mut rotated = cells;
            for _ in 0..4 {
                rotated = rotated.map(|c| c.rotated_about(pivot));
            }
            assert_eq!(rotated, cells, "{kind} did not return after four turns");
        }
    }

    #[test]
    fn test_size_and_occupancy() {
        assert_eq!(PieceKind::I.size(), (4, 1));
        assert_eq!(PieceKind::O.size(), (2, 2));
        assert_eq!(PieceKind::T.size(), (3, 2));

        // T: top middle and full bottom row.
        assert!(PieceKind::T.is_occupied((1, 0)));
        assert!(!PieceKind::T.is_occupied((0, 0)));
        assert!(PieceKind::T.is_occupied((0, 1)));
        assert!(PieceKind::T.is_occupied((2, 1)));

        // J: top-left corner.
        assert!(PieceKind::J.is_occupied((0, 0)));
        assert!(!PieceKind::J.is_occupied((2, 0)));
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(
                PieceKind::from_char(kind.as_char().to_ascii_lowercase()),
                Some(kind)
            );
        }
        assert_eq!(PieceKind::from_char('X'), None);
    }

    #[test]
    fn test_piece_kind_serialization() {
        let serialized = serde_json::to_string(&PieceKind::T).unwrap();
        assert_eq!(serialized, "\"T\"");
        let deserialized: PieceKind = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, PieceKind::T);
    }
}
