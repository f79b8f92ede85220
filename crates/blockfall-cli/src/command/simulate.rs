use std::path::PathBuf;

use blockfall_engine::{
    Command, DEFAULT_HEIGHT, DEFAULT_WIDTH, GameSession, PieceSeed, SessionConfig,
    SessionSnapshot, TICK_RATE,
};
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for pieces and input (32 hex characters); random when omitted
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Maximum number of ticks to run; stops early on game over
    #[arg(long, default_value_t = u64::from(TICK_RATE) * 60 * 5)]
    ticks: u64,
    /// Board height in rows
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,
    /// Board width in columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    ticks_run: u64,
    snapshot: SessionSnapshot,
}

/// PCG stream selector for scripted input, distinct from the piece sequencer's.
const INPUT_STREAM: u64 = 0x5eed_1a7e_f00d_c0de;

/// Random commands standing in for a player.
///
/// Issues a command on about half of the ticks, which is enough to steer
/// pieces around the board and to toggle soft drop on and off. Draws from
/// its own PCG stream so that commands do not track the bag shuffles.
#[derive(Debug)]
struct ScriptedInput {
    rng: Pcg32,
}

impl ScriptedInput {
    fn new(seed: PieceSeed) -> Self {
        let seed = u128::from_le_bytes(seed.to_bytes());
        #[allow(clippy::cast_possible_truncation)]
        let (state, stream) = (seed as u64, (seed >> 64) as u64);
        Self {
            rng: Pcg32::new(state, stream ^ INPUT_STREAM),
        }
    }

    fn next_command(&mut self) -> Option<Command> {
        match self.rng.random_range(0..15) {
            0 | 1 => Some(Command::MoveLeft),
            2 | 3 => Some(Command::MoveRight),
            4 => Some(Command::RotateCw),
            5 => Some(Command::SoftDropStart),
            6 => Some(Command::SoftDropStop),
            _ => None,
        }
    }
}

fn simulate(
    config: SessionConfig,
    seed: PieceSeed,
    max_ticks: u64,
) -> anyhow::Result<SimulationReport> {
    let mut session = GameSession::new(config)?;
    let mut input = ScriptedInput::new(seed);

    let mut ticks_run = 0;
    while ticks_run < max_ticks && session.state().is_running() {
        if let Some(command) = input.next_command() {
            session.apply(command);
        }
        session.tick();
        ticks_run += 1;
    }

    tracing::info!(
        %seed,
        ticks_run,
        score = session.score(),
        state = ?session.state(),
        "simulation finished"
    );
    Ok(SimulationReport {
        seed,
        ticks_run,
        snapshot: session.snapshot(),
    })
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let config = SessionConfig {
        height: arg.height,
        width: arg.width,
        seed: Some(seed),
    };
    let report = simulate(config, seed, arg.ticks)?;
    Output::save_json(&report, arg.output.clone())
}
