use crate::{
    PieceCollisionError, SpawnCollisionError,
    core::{
        board::Board,
        piece::{Coord, PieceCells, PieceKind},
    },
};

/// The currently falling piece.
///
/// Holds the piece identity and the four board cells it occupies. Every
/// mutation goes through the [`Board`], which keeps the board's falling cells
/// in step with the controller's coordinates.
///
/// Illegal moves are rejected without touching the board or the piece.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceController, PieceKind};
///
/// let mut board = Board::default();
/// let mut piece = PieceController::spawn(&mut board, PieceKind::T).unwrap();
///
/// piece.translate(&mut board, 0, -1).unwrap();
/// _ = piece.rotate(&mut board);
/// assert!(!piece.is_grounded(&board));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceController {
    kind: PieceKind,
    cells: PieceCells,
}

impl PieceController {
    /// Places `kind` at its spawn cells.
    ///
    /// Fails without mutating the board when any spawn cell is already locked.
    pub fn spawn(board: &mut Board, kind: PieceKind) -> Result<Self, SpawnCollisionError> {
        let cells = kind.spawn_cells();
        if !board.is_legal(&cells) {
            return Err(SpawnCollisionError { kind });
        }
        board.mark_falling(&cells);
        Ok(Self { kind, cells })
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn cells(&self) -> &PieceCells {
        &self.cells
    }

    /// Shifts the piece by `dy` rows and `dx` columns.
    pub fn translate(
        &mut self,
        board: &mut Board,
        dy: i32,
        dx: i32,
    ) -> Result<(), PieceCollisionError> {
        let moved = self.cells.map(|c| c.offset(dy, dx));
        self.commit(board, moved)
    }

    /// Turns the piece a quarter turn about its second cell.
    ///
    /// The O-piece never rotates. Other pieces use a single fixed pivot and
    /// are not kicked away from walls or locked cells when the turn collides.
    pub fn rotate(&mut self, board: &mut Board) -> Result<(), PieceCollisionError> {
        if self.kind.is_rotation_invariant() {
            return Ok(());
        }
        let pivot = self.cells[1];
        let rotated = self.cells.map(|c| c.rotated_about(pivot));
        self.commit(board, rotated)
    }

    /// Returns whether the piece can no longer fall.
    ///
    /// True when any cell is on the bottom row or sits directly above a locked cell.
    #[must_use]
    pub fn is_grounded(&self, board: &Board) -> bool {
        self.cells.iter().any(|c| {
            let below = c.offset(1, 0);
            match board.cell(below) {
                None => true,
                Some(cell) => cell.is_locked(),
            }
        })
    }

    /// Returns the falling cells as `(row, col)` pairs.
    #[must_use]
    pub fn positions(&self) -> [(i32, i32); 4] {
        self.cells.map(|Coord { row, col }| (row, col))
    }

    /// Locks the piece into the board, consuming the controller.
    pub fn freeze(self, board: &mut Board) -> PieceCells {
        board.freeze(&self.cells);
        self.cells
    }

    fn commit(&mut self, board: &mut Board, cells: PieceCells) -> Result<(), PieceCollisionError> {
        if !board.is_legal(&cells) {
            return Err(PieceCollisionError);
        }
        board.clear_falling(&self.cells);
        board.mark_falling(&cells);
        self.cells = cells;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::CellState;

    fn falling_cells(board: &Board) -> Vec<Coord> {
        let mut cells = vec![];
        for (row, line) in board.rows().enumerate() {
            for (col, cell) in line.iter().enumerate() {
                if *cell == CellState::Falling {
                    cells.push(Coord::new(row as i32, col as i32));
                }
            }
        }
        cells
    }

    fn sorted(mut cells: Vec<Coord>) -> Vec<Coord> {
        cells.sort_by_key(|c| (c.row, c.col));
        cells
    }

    #[test]
    fn test_spawn_marks_falling_cells() {
        for kind in PieceKind::ALL {
            let mut board = Board::default();
            let piece = PieceController::spawn(&mut board, kind).unwrap();
            assert_eq!(piece.kind(), kind);
            assert_eq!(
                sorted(falling_cells(&board)),
                sorted(kind.spawn_cells().to_vec())
            );
        }
    }

    #[test]
    fn test_spawn_into_locked_cells_fails_without_mutation() {
        let mut board = Board::from_ascii(&[
            "....####..",
            "....####..",
            "..........",
        ])
        .unwrap();
        let before = board.clone();

        let err = PieceController::spawn(&mut board, PieceKind::O).unwrap_err();
        assert_eq!(err.kind, PieceKind::O);
        assert_eq!(board, before);
    }

    #[test]
    fn test_spawn_partially_blocked_fails() {
        let mut board = Board::from_ascii(&[
            "..........",
            "......#...",
            "..........",
        ])
        .unwrap();
        let before = board.clone();

        assert!(PieceController::spawn(&mut board, PieceKind::Z).is_err());
        assert_eq!(board, before);
        // T also covers (1, 6).
        assert!(PieceController::spawn(&mut board, PieceKind::T).is_err());
        assert!(PieceController::spawn(&mut board, PieceKind::O).is_ok());
    }

    #[test]
    fn test_translate_moves_falling_cells() {
        let mut board = Board::default();
        let mut piece = PieceController::spawn(&mut board, PieceKind::I).unwrap();

        piece.translate(&mut board, 1, 0).unwrap();
        piece.translate(&mut board, 0, -1).unwrap();

        let expected = [(1, 2), (1, 3), (1, 4), (1, 5)];
        assert_eq!(piece.positions(), expected);
        assert_eq!(
            falling_cells(&board),
            expected.map(|(r, c)| Coord::new(r, c)).to_vec()
        );
    }

    #[test]
    fn test_translate_out_of_bounds_is_rejected() {
        let mut board = Board::default();
        let mut piece = PieceController::spawn(&mut board, PieceKind::I).unwrap();
        while piece.translate(&mut board, 0, 1).is_ok() {}

        // Rightmost cell now sits at the last column.
        assert_eq!(piece.cells()[3].col, 9);
        let before_cells = *piece.cells();
        let before_board = board.clone();

        assert_eq!(piece.translate(&mut board, 0, 1), Err(PieceCollisionError));
        assert_eq!(*piece.cells(), before_cells);
        assert_eq!(board, before_board);
        assert_eq!(falling_cells(&board).len(), 4);
    }

    #[test]
    fn test_translate_into_locked_is_rejected() {
        let mut board = Board::from_ascii(&[
            "..........",
            "..........",
            "...#......",
        ])
        .unwrap();
        let mut piece = PieceController::spawn(&mut board, PieceKind::I).unwrap();
        piece.translate(&mut board, 1, 0).unwrap();
        let before = board.clone();

        assert!(piece.translate(&mut board, 1, 0).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn test_rotate_o_never_changes() {
        let boards = [
            Board::default(),
            Board::from_ascii(&[
                "...#..#...",
                "...#..#...",
                "##########",
            ])
            .unwrap(),
        ];
        for mut board in boards {
            let mut piece = PieceController::spawn(&mut board, PieceKind::O).unwrap();
            let before = *piece.cells();
            for _ in 0..4 {
                assert_eq!(piece.rotate(&mut board), Ok(()));
                assert_eq!(*piece.cells(), before);
            }
        }
    }

    #[test]
    fn test_rotate_t_about_pivot() {
        let mut board = Board::default();
        let mut piece = PieceController::spawn(&mut board, PieceKind::T).unwrap();
        piece.translate(&mut board, 1, 0).unwrap();
        // T: (2,4) (2,5) (2,6) (1,5), pivot (2,5)
        piece.rotate(&mut board).unwrap();
        assert_eq!(piece.positions(), [(3, 5), (2, 5), (1, 5), (2, 4)]);
        assert_eq!(falling_cells(&board).len(), 4);
    }

    #[test]
    fn test_rotate_blocked_is_rejected() {
        // I at spawn is horizontal on row 0. Rotating would need rows -1..=2.
        let mut board = Board::default();
        let mut piece = PieceController::spawn(&mut board, PieceKind::I).unwrap();
        let before = *piece.cells();

        assert_eq!(piece.rotate(&mut board), Err(PieceCollisionError));
        assert_eq!(*piece.cells(), before);
    }

    #[test]
    fn test_rotate_against_wall_does_not_kick() {
        let mut board = Board::default();
        let mut piece = PieceController::spawn(&mut board, PieceKind::I).unwrap();
        piece.translate(&mut board, 2, 0).unwrap();
        piece.rotate(&mut board).unwrap();
        // Vertical I in column 4. Slide to the left wall.
        while piece.translate(&mut board, 0, -1).is_ok() {}
        assert!(piece.cells().iter().all(|c| c.col == 0));

        let before = *piece.cells();
        assert!(piece.rotate(&mut board).is_err());
        assert_eq!(*piece.cells(), before);
    }

    #[test]
    fn test_cell_count_stays_four() {
        for kind in PieceKind::ALL {
            let mut board = Board::default();
            let mut piece = PieceController::spawn(&mut board, kind).unwrap();
            for step in 0..40 {
                match step % 4 {
                    0 => _ = piece.translate(&mut board, 1, 0),
                    1 => _ = piece.rotate(&mut board),
                    2 => _ = piece.translate(&mut board, 0, -1),
                    _ => _ = piece.translate(&mut board, 0, 1),
                }
                assert_eq!(piece.cells().len(), 4);
                assert_eq!(falling_cells(&board).len(), 4);
            }
        }
    }

    #[test]
    fn test_is_grounded() {
        let mut board = Board::from_ascii(&[
            "..........",
            "..........",
            "..........",
            "......#...",
        ])
        .unwrap();
        let mut piece = PieceController::spawn(&mut board, PieceKind::O).unwrap();
        assert!(!piece.is_grounded(&board));

        piece.translate(&mut board, 1, 0).unwrap();
        assert!(!piece.is_grounded(&board));

        piece.translate(&mut board, 1, 0).unwrap();
        // Bottom row reached.
        assert!(piece.is_grounded(&board));

        let mut board = Board::from_ascii(&[
            "..........",
            "..........",
            ".....#....",
            "..........",
        ])
        .unwrap();
        let piece = PieceController::spawn(&mut board, PieceKind::O).unwrap();
        assert!(piece.is_grounded(&board));
    }

    #[test]
    fn test_freeze_locks_cells() {
        let mut board = Board::new(4, 10);
        let mut piece = PieceController::spawn(&mut board, PieceKind::O).unwrap();
        piece.translate(&mut board, 2, 0).unwrap();
        let cells = piece.freeze(&mut board);
        for c in cells {
            assert_eq!(board.cell(c), Some(CellState::Locked));
        }
        assert!(falling_cells(&board).is_empty());
    }
}
