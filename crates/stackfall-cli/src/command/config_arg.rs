use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use stackfall_engine::GameConfig;

use crate::util;

/// Game settings shared by every mode.
///
/// Values given on the command line override the ones read from `--config`.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// JSON file with game settings
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of board rows
    #[arg(long)]
    rows: Option<usize>,
    /// Number of board columns
    #[arg(long)]
    cols: Option<usize>,
    /// Milliseconds between descent ticks
    #[arg(long)]
    interval_ms: Option<u64>,
    /// Rotations allowed between two ticks
    #[arg(long)]
    rotation_cap: Option<u8>,
}

impl ConfigArg {
    pub(crate) fn to_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<GameConfig, _>("config", path)?,
            None => GameConfig::default(),
        };
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.descent_interval = Duration::from_millis(interval_ms);
        }
        if let Some(rotation_cap) = self.rotation_cap {
            config.rotation_cap = rotation_cap;
        }
        config.validate().context("Invalid game settings")?;
        Ok(config)
    }
}
