use std::path::PathBuf;

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use stackfall_engine::{
    Action, Board, GameConfig, GameSession, PieceSeed, SessionState, SessionStats,
};

use crate::{command::config_arg::ConfigArg, util::Output};

const PROGRESS_INTERVAL: usize = 1000;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(crate) config: ConfigArg,
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    pub(crate) seed: Option<PieceSeed>,
    /// Seed for the random input policy
    #[arg(long, default_value_t = 0)]
    pub(crate) policy_seed: u64,
    /// Maximum number of descent ticks to run
    #[arg(long, default_value_t = 10_000)]
    pub(crate) ticks: usize,
    /// Random inputs applied before each tick
    #[arg(long, default_value_t = 2)]
    pub(crate) inputs_per_tick: usize,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SimulationSummary<'a> {
    config: &'a GameConfig,
    seed: PieceSeed,
    policy_seed: u64,
    final_state: SessionState,
    stats: &'a SessionStats,
    board: &'a Board,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let config = arg.config.to_config()?;
    let mut session = match arg.seed {
        Some(seed) => GameSession::with_seed(config, seed)?,
        None => GameSession::new(config)?,
    };
    let mut policy = Pcg32::seed_from_u64(arg.policy_seed);

    eprintln!(
        "Simulating up to {} ticks on a {}x{} board (seed {})...",
        arg.ticks,
        config.rows,
        config.cols,
        session.seed()
    );
    simulate(&mut session, &mut policy, arg.ticks, arg.inputs_per_tick);
    eprintln!(
        "Finished after {} ticks: {} lines cleared, state {:?}",
        session.stats().ticks(),
        session.stats().cleared_lines(),
        session.session_state()
    );

    let summary = SimulationSummary {
        config: session.config(),
        seed: session.seed(),
        policy_seed: arg.policy_seed,
        final_state: session.session_state(),
        stats: session.stats(),
        board: session.board(),
    };
    Output::save_json(&summary, arg.output.clone())
}

/// Plays until game over or `ticks` ticks, with random input before each tick.
fn simulate<R>(session: &mut GameSession, policy: &mut R, ticks: usize, inputs_per_tick: usize)
where
    R: Rng + ?Sized,
{
    const ACTIONS: [Action; 4] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Rotate,
        Action::MoveDown,
    ];

    for tick in 1..=ticks {
        if !session.session_state().is_playing() {
            break;
        }
        for _ in 0..inputs_per_tick {
            let action = ACTIONS[policy.random_range(0..ACTIONS.len())];
            session.apply(action);
        }
        session.tick();
        if tick.is_multiple_of(PROGRESS_INTERVAL) {
            eprintln!(
                "  tick {tick}: {} lines cleared",
                session.stats().cleared_lines()
            );
        }
    }
}
