use stackfall_engine::{GameSession, PieceSeed};

use self::app::PlayApp;
use crate::{command::config_arg::ConfigArg, tui::Tui};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(crate) config: ConfigArg,
    /// Piece seed as 32 hex digits (random if omitted)
    #[arg(long)]
    pub(crate) seed: Option<PieceSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let config = arg.config.to_config()?;
    let session = match arg.seed {
        Some(seed) => GameSession::with_seed(config, seed)?,
        None => GameSession::new(config)?,
    };

    let mut app = PlayApp::new(session);
    Tui::new().run(&mut app)?;

    let session = app.session();
    let stats = session.stats();
    eprintln!(
        "Seed {}: {} lines cleared, {} pieces, {} ticks",
        session.seed(),
        stats.cleared_lines(),
        stats.spawned_pieces(),
        stats.ticks()
    );
    Ok(())
}
