use std::time::Duration;

use crate::tui::{
    App,
    event_loop::{EventLoop, TuiEvent},
};

/// TUI application runtime.
///
/// Owns the event loop and drives an [`App`] until it asks to exit.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick interval. `None` stops ticking, e.g. while paused.
    pub fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.events.set_tick_interval(interval);
    }

    /// Sets the frame rate limit (frames per second).
    pub fn set_frame_rate(&mut self, rate: f64) {
        self.events.set_frame_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Requests a redraw even if nothing ticked.
    pub fn request_redraw(&mut self) {
        self.events.mark_dirty();
    }

    /// Runs the application.
    ///
    /// 1. Calls `app.init()`
    /// 2. Dispatches events until `app.should_exit()` returns true
    ///    - `Tick`: `app.update()`
    ///    - `Render`: `app.draw()`
    ///    - terminal event: `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => {
                        app.update(&mut self);
                    }
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Crossterm(event) => {
                        app.handle_event(&mut self, event);
                    }
                }
            }
            Ok(())
        })
    }
}
