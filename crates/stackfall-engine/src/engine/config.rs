use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, core::board::Board};

/// Construction-time game settings.
///
/// Serialised with the descent interval in milliseconds:
///
/// ```json
/// { "rows": 25, "cols": 12, "descent_interval_ms": 1000, "rotation_cap": 4 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(rename = "descent_interval_ms", with = "millis")]
    pub descent_interval: Duration,
    pub rotation_cap: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: Board::DEFAULT_ROWS,
            cols: Board::DEFAULT_COLS,
            descent_interval: Duration::from_millis(1000),
            rotation_cap: Board::DEFAULT_ROTATION_CAP,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.descent_interval.is_zero() {
            return Err(ConfigError::ZeroDescentInterval);
        }
        Board::check_dimensions(self.rows, self.cols)
    }

    /// Builds an empty board with these dimensions and rotation cap.
    pub fn build_board(&self) -> Result<Board, ConfigError> {
        self.validate()?;
        Ok(Board::new(self.rows, self.cols)?.with_rotation_cap(self.rotation_cap))
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
