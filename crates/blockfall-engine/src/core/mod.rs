pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Default number of rows on the board.
pub const DEFAULT_HEIGHT: usize = 20;
/// Default number of columns on the board.
pub const DEFAULT_WIDTH: usize = 10;
