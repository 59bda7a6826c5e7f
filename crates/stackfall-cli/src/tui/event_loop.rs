use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event as CrosstermEvent};

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::From)]
pub(super) enum TuiEvent {
    /// The tick interval elapsed.
    Tick,
    /// The screen is dirty and the frame interval elapsed.
    Render,
    /// Terminal events such as key input and resize.
    Crossterm(CrosstermEvent),
}

/// Schedules ticks, renders and terminal input.
///
/// Renders happen only after a tick or an input event, at most once per frame
/// interval. Ticks are skipped while no tick interval is set.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    frame_interval: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            tick_interval: None,
            frame_interval: Self::DEFAULT_FRAME_INTERVAL,
            last_tick: now,
            last_render: now.checked_sub(Self::DEFAULT_FRAME_INTERVAL).unwrap_or(now),
            dirty: true,
        }
    }

    /// Sets the tick interval and restarts the tick clock.
    ///
    /// Pass `None` to stop ticking.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    pub(super) fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    pub(super) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Blocks until the next tick, render or terminal event.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(tick_interval) = self.tick_interval
                && now.duration_since(self.last_tick) >= tick_interval
            {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty && now.duration_since(self.last_render) >= self.frame_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// Time until the next scheduled tick or render, or `None` to wait for input only.
    fn timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = self.dirty.then(|| self.last_render + self.frame_interval);
        let next_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_waits_for_input_when_idle() {
        let mut events = EventLoop::new();
        events.dirty = false;
        assert_eq!(events.timeout(Instant::now()), None);
    }

    #[test]
    fn test_timeout_tracks_nearest_deadline() {
        let mut events = EventLoop::new();
        events.dirty = false;
        events.set_tick_interval(Some(Duration::from_secs(1)));
        let now = events.last_tick;
        assert_eq!(events.timeout(now), Some(Duration::from_secs(1)));

        events.mark_dirty();
        events.last_render = now;
        assert_eq!(events.timeout(now), Some(EventLoop::DEFAULT_FRAME_INTERVAL));
    }
}
