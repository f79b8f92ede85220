pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Returned when a translated or rotated piece would leave the board or overlap locked cells.
///
/// The move is discarded and the piece stays where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when moving falling piece")]
pub struct PieceCollisionError;

/// Returned when a new piece cannot be placed at its spawn cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece {kind} colliding at spawn position")]
pub struct SpawnCollisionError {
    #[error(not(source))]
    pub kind: PieceKind,
}
