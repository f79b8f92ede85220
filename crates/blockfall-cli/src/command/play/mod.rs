use blockfall_engine::{DEFAULT_HEIGHT, DEFAULT_WIDTH, GameSession, PieceSeed, SessionConfig};
use blockfall_tui::Runtime;

use self::app::PlayApp;

mod app;
mod input;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex characters); random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Board height in rows
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,
    /// Board width in columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = SessionConfig {
        height: arg.height,
        width: arg.width,
        seed: arg.seed,
    };
    let session = GameSession::new(config)?;
    tracing::info!(height = arg.height, width = arg.width, seed = ?arg.seed, "game started");

    let mut app = PlayApp::new(session);
    Runtime::new().run(&mut app)?;

    let session = app.into_session();
    tracing::info!(score = session.score(), state = ?session.state(), "game closed");
    println!("Final score: {}", session.score());
    Ok(())
}
