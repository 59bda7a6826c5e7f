use serde::Serialize;

/// Counters collected over a game session.
///
/// # Example
///
/// ```
/// use stackfall_engine::SessionStats;
///
/// let mut stats = SessionStats::new();
/// stats.record_tick(2);
///
/// assert_eq!(stats.ticks(), 1);
/// assert_eq!(stats.cleared_lines(), 2);
/// assert_eq!(stats.line_clear_counter()[2], 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    ticks: usize,
    spawned_pieces: usize,
    locked_pieces: usize,
    cleared_lines: usize,
    line_clear_counter: [usize; 5],
}

impl SessionStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            spawned_pieces: 0,
            locked_pieces: 0,
            cleared_lines: 0,
            line_clear_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    #[must_use]
    pub const fn spawned_pieces(&self) -> usize {
        self.spawned_pieces
    }

    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.cleared_lines
    }

    /// Histogram of line clears per tick.
    ///
    /// Index `n` counts ticks that removed `n` rows; index 4 also counts the
    /// rare ticks that removed more.
    #[must_use]
    pub const fn line_clear_counter(&self) -> &[usize; 5] {
        &self.line_clear_counter
    }

    pub fn record_tick(&mut self, cleared_lines: usize) {
        self.ticks += 1;
        self.cleared_lines += cleared_lines;
        let bucket = cleared_lines.min(self.line_clear_counter.len() - 1);
        self.line_clear_counter[bucket] += 1;
    }

    pub fn record_spawn(&mut self) {
        self.spawned_pieces += 1;
    }

    pub fn record_lock(&mut self) {
        self.locked_pieces += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = SessionStats::new();
        stats.record_spawn();
        stats.record_lock();
        stats.record_tick(0);
        stats.record_tick(1);
        stats.record_tick(6);

        assert_eq!(stats.spawned_pieces(), 1);
        assert_eq!(stats.locked_pieces(), 1);
        assert_eq!(stats.ticks(), 3);
        assert_eq!(stats.cleared_lines(), 7);
        assert_eq!(stats.line_clear_counter(), &[1, 1, 0, 0, 1]);
    }
}
