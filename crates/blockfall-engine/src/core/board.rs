use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
    piece::{Coord, PieceCells},
};

/// State of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[repr(u8)]
pub enum CellState {
    /// Nothing occupies the cell.
    #[default]
    Empty,
    /// Occupied by the active (falling) piece.
    Falling,
    /// Occupied by a piece that has landed.
    Locked,
}

impl CellState {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == CellState::Empty
    }

    #[must_use]
    pub fn is_locked(self) -> bool {
        self == CellState::Locked
    }

    /// Returns the character used by [`Board::from_ascii`] and the `Display` impl.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            CellState::Empty => '.',
            CellState::Falling => '*',
            CellState::Locked => '#',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(CellState::Empty),
            '*' => Some(CellState::Falling),
            '#' => Some(CellState::Locked),
            _ => None,
        }
    }
}

/// Error returned by [`Board::from_ascii`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardParseError {
    #[display("board must have at least one row and one column")]
    Empty,
    #[display("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[display("invalid cell {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

/// Fixed-size grid of cell states.
///
/// The board owns collision testing, freezing and line clearing. It never
/// changes size after creation.
///
/// Row 0 is the top of the board. Rows are stored contiguously, row-major.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, CellState, Coord};
///
/// let mut board = Board::default();
/// let cells = [Coord::new(19, 0), Coord::new(19, 1), Coord::new(19, 2), Coord::new(19, 3)];
///
/// assert!(board.is_legal(&cells));
/// board.mark_falling(&cells);
/// board.freeze(&cells);
/// assert_eq!(board.cell(Coord::new(19, 0)), Some(CellState::Locked));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<CellState>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_HEIGHT, DEFAULT_WIDTH)
    }
}

impl Board {
    /// Creates an empty board of `height` rows by `width` columns.
    ///
    /// Sessions validate their dimensions through `SessionConfig` before
    /// reaching this point.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or the cell count overflows `usize`.
    #[must_use]
    pub fn new(height: usize, width: usize) -> Self {
        assert!(height > 0 && width > 0, "board must not be empty");
        let Some(len) = height.checked_mul(width) else {
            panic!("board of {height}x{width} cells is too large");
        };
        Self {
            height,
            width,
            cells: vec![CellState::Empty; len],
        }
    }

    /// Builds a board from rows of `.` (empty), `*` (falling) and `#` (locked).
    ///
    /// # Example
    ///
    /// ```
    /// use blockfall_engine::{Board, CellState, Coord};
    ///
    /// let board = Board::from_ascii(&["....", "##.#"]).unwrap();
    /// assert_eq!(board.height(), 2);
    /// assert_eq!(board.width(), 4);
    /// assert_eq!(board.cell(Coord::new(1, 3)), Some(CellState::Locked));
    /// ```
    pub fn from_ascii(rows: &[&str]) -> Result<Self, BoardParseError> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(BoardParseError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * width);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(BoardParseError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let cell =
                    CellState::from_char(ch).ok_or(BoardParseError::InvalidCell { row, col, ch })?;
                cells.push(cell);
            }
        }

        Ok(Self {
            height: rows.len(),
            width,
            cells,
        })
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the state of the cell at `coord`, or `None` if it lies outside the board.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> Option<CellState> {
        self.index(coord).map(|i| self.cells[i])
    }

    /// Returns an iterator over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks_exact(self.width)
    }

    /// Returns whether every coordinate is on the board and not locked.
    #[must_use]
    pub fn is_legal(&self, coords: &[Coord]) -> bool {
        coords
            .iter()
            .all(|&c| self.cell(c).is_some_and(|cell| !cell.is_locked()))
    }

    /// Marks the given cells as occupied by the falling piece.
    ///
    /// The caller guarantees the coordinates are legal.
    pub fn mark_falling(&mut self, coords: &PieceCells) {
        self.fill(coords, CellState::Falling);
    }

    /// Resets the given cells to empty.
    ///
    /// The caller guarantees the coordinates are on the board.
    pub fn clear_falling(&mut self, coords: &PieceCells) {
        self.fill(coords, CellState::Empty);
    }

    /// Turns the given falling cells into locked cells.
    ///
    /// This is called when a piece has permanently landed.
    pub fn freeze(&mut self, coords: &PieceCells) {
        self.fill(coords, CellState::Locked);
    }

    /// Removes every fully locked row and returns how many were removed.
    ///
    /// A row is complete when it has no empty and no falling cells. Rows above
    /// a removed row shift down, keeping their order, and empty rows fill in at
    /// the top. Only call this when no piece is falling: falling cells would be
    /// shifted along with the rows that hold them.
    pub fn clear_completed_rows(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;
        for y in (0..self.height).rev() {
            if self.is_row_complete(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                let start = y * width;
                self.cells
                    .copy_within(start..start + width, (y + count) * width);
            }
        }
        self.cells[..count * width].fill(CellState::Empty);
        count
    }

    fn is_row_complete(&self, y: usize) -> bool {
        self.cells[y * self.width..][..self.width]
            .iter()
            .all(|cell| cell.is_locked())
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        let row = usize::try_from(coord.row).ok()?;
        let col = usize::try_from(coord.col).ok()?;
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    fn fill(&mut self, coords: &PieceCells, state: CellState) {
        for &c in coords {
            let i = self
                .index(c)
                .unwrap_or_else(|| panic!("cell {c} is outside the board"));
            self.cells[i] = state;
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {}x{}", self.height, self.width)?;
        fmt::Display::fmt(self, f)
    }
}
