//! Game rules built on top of the board and piece model.
//!
//! - [`PieceController`]: the falling piece and its legal moves
//! - [`PieceSequencer`]: shuffled-bag piece generation
//! - [`GameStats`]: score and line clear counters
//! - [`GameSession`]: the tick-driven state machine tying them together

pub use self::{game_session::*, game_stats::*, piece_controller::*, piece_sequencer::*};

mod game_session;
mod game_stats;
mod piece_controller;
mod piece_sequencer;
