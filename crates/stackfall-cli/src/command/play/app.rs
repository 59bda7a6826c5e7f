use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};
use stackfall_engine::{Action, GameSession, SessionState};

use crate::{
    tui::{App, Tui},
    view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

const FPS: f64 = 60.0;

const PLAYING_KEYS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑"], "Rotate"),
    (&["↓"], "Down"),
    (&["P"], "Pause"),
    (&["R"], "Reset"),
    (&["Q"], "Quit"),
];
const PAUSED_KEYS: &[KeyBinding] = &[(&["P"], "Resume"), (&["R"], "Reset"), (&["Q"], "Quit")];
const GAME_OVER_KEYS: &[KeyBinding] = &[(&["R"], "Reset"), (&["Q"], "Quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Input(Action),
    TogglePause,
    Reset,
    Quit,
}

impl Command {
    fn from_key(key: KeyCode) -> Option<Self> {
        let command = match key {
            KeyCode::Left => Command::Input(Action::MoveLeft),
            KeyCode::Right => Command::Input(Action::MoveRight),
            KeyCode::Up => Command::Input(Action::Rotate),
            KeyCode::Down => Command::Input(Action::MoveDown),
            KeyCode::Char('p' | 'P') => Command::TogglePause,
            KeyCode::Char('r' | 'R') => Command::Reset,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Command::Quit,
            _ => return None,
        };
        Some(command)
    }
}

#[derive(Debug)]
pub(crate) struct PlayApp {
    session: GameSession,
    is_exiting: bool,
}

impl PlayApp {
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            session,
            is_exiting: false,
        }
    }

    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    /// Ticks run only while playing.
    fn sync_tick_interval(&self, tui: &mut Tui) {
        let interval = self
            .session
            .session_state()
            .is_playing()
            .then_some(self.session.config().descent_interval);
        tui.set_tick_interval(interval);
    }

    fn execute(&mut self, tui: &mut Tui, command: Command) {
        match command {
            Command::Input(action) => _ = self.session.apply(action),
            Command::TogglePause => {
                self.session.toggle_pause();
                self.sync_tick_interval(tui);
            }
            Command::Reset => {
                self.session.reset();
                self.sync_tick_interval(tui);
            }
            Command::Quit => self.is_exiting = true,
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_frame_rate(FPS);
        self.sync_tick_interval(tui);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, tui: &mut Tui, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
            && let Some(command) = Command::from_key(key.code)
        {
            self.execute(tui, command);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let bindings = match self.session.session_state() {
            SessionState::Playing => PLAYING_KEYS,
            SessionState::Paused => PAUSED_KEYS,
            SessionState::GameOver => GAME_OVER_KEYS,
        };
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(SessionDisplay::new(&self.session), main_area);
        frame.render_widget(KeyBindingDisplay::new(bindings), help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        self.session.tick();
        if self.session.session_state().is_game_over() {
            self.sync_tick_interval(tui);
            tui.request_redraw();
        }
    }
}
