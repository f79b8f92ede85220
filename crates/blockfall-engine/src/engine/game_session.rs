use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    PieceCollisionError,
    core::{
        DEFAULT_HEIGHT, DEFAULT_WIDTH,
        board::Board,
        piece::{PieceCells, PieceKind},
    },
};

use super::{
    game_stats::GameStats,
    piece_controller::PieceController,
    piece_sequencer::{PieceSeed, PieceSequencer},
};

/// Logical ticks per second delivered by the presentation layer.
pub const TICK_RATE: u32 = 30;
/// Speed while no soft drop is held (gravity every 20 ticks).
pub const NORMAL_SPEED: u32 = 10;
/// Speed while soft drop is held (gravity every 2 ticks).
pub const SOFT_DROP_SPEED: u32 = 28;

/// Narrowest board that fits every spawn shape.
pub const MIN_WIDTH: usize = 7;
/// Shortest board that fits every spawn shape.
pub const MIN_HEIGHT: usize = 2;
/// Widest board a session accepts.
pub const MAX_WIDTH: usize = 100;
/// Tallest board a session accepts.
pub const MAX_HEIGHT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Running,
    GameOver,
}

/// Logical input commands, already decoded from raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateCw,
    SoftDropStart,
    SoftDropStop,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board width {width} is below the minimum of {MIN_WIDTH}")]
    TooNarrow { width: usize },
    #[display("board height {height} is below the minimum of {MIN_HEIGHT}")]
    TooShort { height: usize },
    #[display("board width {width} exceeds the maximum of {MAX_WIDTH}")]
    TooWide { width: usize },
    #[display("board height {height} exceeds the maximum of {MAX_HEIGHT}")]
    TooTall { height: usize },
}

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub height: usize,
    pub width: usize,
    /// Seed for the piece sequence. A random seed is used when `None`.
    pub seed: Option<PieceSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_WIDTH {
            return Err(ConfigError::TooNarrow { width: self.width });
        }
        if self.height < MIN_HEIGHT {
            return Err(ConfigError::TooShort {
                height: self.height,
            });
        }
        if self.width > MAX_WIDTH {
            return Err(ConfigError::TooWide { width: self.width });
        }
        if self.height > MAX_HEIGHT {
            return Err(ConfigError::TooTall {
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub ticks: u64,
    pub score: u64,
    pub stats: GameStats,
    pub next_piece: Option<PieceKind>,
    pub next_shape: Option<PieceCells>,
    /// Board rows from top to bottom, `.` empty, `*` falling, `#` locked.
    pub board: Vec<String>,
}

/// A single game from first spawn to game over.
///
/// Owns the board, the falling piece, the piece sequencer and the score. The
/// presentation layer calls [`Self::tick`] at [`TICK_RATE`] and forwards
/// decoded input through [`Self::apply`]. Every call runs to completion, so
/// moves, locks and clears never interleave.
///
/// # Gravity
///
/// A tick counter `i` is incremented on every tick. When
/// `i % (30 - speed) == 0` the falling piece is locked if it is grounded (the
/// next piece spawns in its place), and then the falling piece is moved one
/// row down. A freshly spawned piece therefore takes its first step in the
/// same tick.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Command, GameSession, SessionConfig};
///
/// let mut session = GameSession::new(SessionConfig::default()).unwrap();
///
/// session.apply(Command::MoveLeft);
/// session.apply(Command::SoftDropStart);
/// for _ in 0..10 {
///     session.tick();
/// }
/// assert!(session.score() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    falling_piece: Option<PieceController>,
    sequencer: PieceSequencer,
    stats: GameStats,
    state: SessionState,
    speed: u32,
    ticks: u64,
}

impl GameSession {
    /// Starts a session on an empty board and spawns the first piece.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sequencer = config
            .seed
            .map_or_else(PieceSequencer::new, PieceSequencer::with_seed);
        Ok(Self::with_board(
            Board::new(config.height, config.width),
            sequencer,
        ))
    }

    /// Starts a session on a prepared board.
    ///
    /// The session begins in [`SessionState::GameOver`] if the first piece cannot spawn.
    #[must_use]
    pub fn with_board(board: Board, sequencer: PieceSequencer) -> Self {
        let mut session = Self {
            board,
            falling_piece: None,
            sequencer,
            stats: GameStats::new(),
            state: SessionState::Running,
            speed: NORMAL_SPEED,
            ticks: 0,
        };
        session.spawn_next();
        session
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the falling piece, or `None` once the game is over.
    #[must_use]
    pub fn falling_piece(&self) -> Option<&PieceController> {
        self.falling_piece.as_ref()
    }

    /// Returns the kind that will spawn after the falling piece locks.
    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.sequencer.peek()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the number of ticks between gravity steps at the current speed.
    #[must_use]
    pub fn gravity_period(&self) -> u32 {
        TICK_RATE - self.speed
    }

    /// Returns the play time implied by the tick count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.ticks as f64 / f64::from(TICK_RATE))
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let next_piece = self.next_piece();
        SessionSnapshot {
            state: self.state,
            ticks: self.ticks,
            score: self.score(),
            stats: self.stats.clone(),
            next_piece,
            next_shape: next_piece.map(PieceKind::spawn_cells),
            board: self.board.to_string().lines().map(str::to_owned).collect(),
        }
    }

    /// Advances the session by one tick.
    pub fn tick(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        self.ticks += 1;
        if self.ticks % u64::from(self.gravity_period()) != 0 {
            return;
        }

        if self
            .falling_piece
            .as_ref()
            .is_some_and(|piece| piece.is_grounded(&self.board))
        {
            self.lock_falling_piece();
            if self.state.is_game_over() {
                return;
            }
        }

        if self.try_step_down().is_ok() && self.speed == SOFT_DROP_SPEED {
            self.stats.soft_drop_step();
        }
    }

    /// Applies one input command. Commands are ignored once the game is over.
    pub fn apply(&mut self, command: Command) {
        if self.state.is_game_over() {
            return;
        }
        match command {
            Command::MoveLeft => _ = self.try_move_left(),
            Command::MoveRight => _ = self.try_move_right(),
            Command::RotateCw => _ = self.try_rotate(),
            Command::SoftDropStart => self.speed = SOFT_DROP_SPEED,
            Command::SoftDropStop => self.speed = NORMAL_SPEED,
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), PieceCollisionError> {
        self.try_translate(0, -1)
    }

    pub fn try_move_right(&mut self) -> Result<(), PieceCollisionError> {
        self.try_translate(0, 1)
    }

    pub fn try_rotate(&mut self) -> Result<(), PieceCollisionError> {
        let piece = self.falling_piece.as_mut().ok_or(PieceCollisionError)?;
        piece.rotate(&mut self.board)
    }

    fn try_step_down(&mut self) -> Result<(), PieceCollisionError> {
        self.try_translate(1, 0)
    }

    fn try_translate(&mut self, dy: i32, dx: i32) -> Result<(), PieceCollisionError> {
        let piece = self.falling_piece.as_mut().ok_or(PieceCollisionError)?;
        piece.translate(&mut self.board, dy, dx)
    }

    fn lock_falling_piece(&mut self) {
        let Some(piece) = self.falling_piece.take() else {
            return;
        };
        let kind = piece.kind();
        let cells = piece.freeze(&mut self.board);
        let cleared_lines = self.board.clear_completed_rows();
        self.stats.complete_piece_drop(cleared_lines);
        tracing::debug!(
            %kind,
            ?cells,
            cleared_lines,
            score = self.stats.score(),
            "piece locked"
        );
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let kind = self.sequencer.next();
        match PieceController::spawn(&mut self.board, kind) {
            Ok(piece) => {
                tracing::debug!(%kind, next = ?self.sequencer.peek(), "piece spawned");
                self.falling_piece = Some(piece);
            }
            Err(err) => {
                tracing::info!(
                    %err,
                    score = self.stats.score(),
                    pieces = self.stats.completed_pieces(),
                    "game over"
                );
                self.state = SessionState::GameOver;
            }
        }
    }
}
