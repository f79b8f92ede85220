use serde::{Deserialize, Serialize};

/// Score values for line clears.
///
/// Index corresponds to number of rows cleared by one placement:
/// - 0 rows: 0 points
/// - 1 row: 40 points
/// - 2 rows: 100 points
/// - 3 rows: 300 points
/// - 4 rows: 1200 points
const SCORE_TABLE: [u64; 5] = [0, 40, 100, 300, 1200];

/// Returns the points awarded for clearing `rows` rows at once.
///
/// A single placement clears at most four rows. Larger counts, which only a
/// hand-built board can produce, score as four.
///
/// # Example
///
/// ```
/// use blockfall_engine::line_clear_score;
///
/// assert_eq!(line_clear_score(1), 40);
/// assert_eq!(line_clear_score(4), 1200);
/// ```
#[must_use]
pub fn line_clear_score(rows: usize) -> u64 {
    SCORE_TABLE[rows.min(SCORE_TABLE.len() - 1)]
}

/// Game statistics tracking score, rows cleared, and piece count.
///
/// - **Score**: line clear points plus one point per soft-dropped row
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of single, double, triple, quad clears
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
/// stats.soft_drop_step();
///
/// assert_eq!(stats.score(), 101);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameStats {
    score: u64,
    soft_drop_points: u64,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            soft_drop_points: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Returns the current score.
    ///
    /// The score never decreases.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the part of the score earned by soft drop.
    #[must_use]
    pub const fn soft_drop_points(&self) -> u64 {
        self.soft_drop_points
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of line clears by count.
    ///
    /// - `[0]`: placements that cleared nothing
    /// - `[1]` to `[4]`: singles, doubles, triples and quads
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece locks and `cleared_lines` rows are removed.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;
        self.score += line_clear_score(cleared_lines);
    }

    /// Awards the point for one soft-dropped row.
    pub const fn soft_drop_step(&mut self) {
        self.soft_drop_points += 1;
        self.score += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score_table() {
        assert_eq!(line_clear_score(0), 0);
        assert_eq!(line_clear_score(1), 40);
        assert_eq!(line_clear_score(2), 100);
        assert_eq!(line_clear_score(3), 300);
        assert_eq!(line_clear_score(4), 1200);
        assert_eq!(line_clear_score(5), 1200);
    }

    #[test]
    fn test_complete_piece_drop_accumulates() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(1);
        stats.complete_piece_drop(4);

        assert_eq!(stats.score(), 1240);
        assert_eq!(stats.completed_pieces(), 3);
        assert_eq!(stats.total_cleared_lines(), 5);
        assert_eq!(stats.line_cleared_counter(), &[1, 1, 0, 0, 1]);
    }

    #[test]
    fn test_soft_drop_step() {
        let mut stats = GameStats::new();
        for _ in 0..3 {
            stats.soft_drop_step();
        }
        assert_eq!(stats.score(), 3);
        assert_eq!(stats.soft_drop_points(), 3);
        assert_eq!(stats.completed_pieces(), 0);
    }
}
