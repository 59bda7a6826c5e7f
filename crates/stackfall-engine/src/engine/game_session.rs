use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    core::board::{Board, DropOutcome},
};

use super::{
    config::GameConfig,
    piece_source::{PieceSeed, PieceSource},
    session_stats::SessionStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Player input, mapped one-to-one onto board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    Rotate,
    MoveDown,
}

/// What happened during one descent tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub drop: DropOutcome,
    pub cleared_lines: usize,
    pub spawned: bool,
}

/// Drives a [`Board`] the way a game controller does.
///
/// The session owns no timer: the caller invokes [`tick`](Self::tick) once
/// per descent interval and [`apply`](Self::apply) for every input.
///
/// # Example
///
/// ```
/// use stackfall_engine::{Action, GameConfig, GameSession, PieceSeed};
///
/// let seed = PieceSeed::from_u128(42);
/// let mut session = GameSession::with_seed(GameConfig::default(), seed).unwrap();
///
/// session.apply(Action::MoveLeft);
/// session.apply(Action::Rotate);
/// while session.session_state().is_playing() {
///     session.tick();
/// }
/// assert!(session.session_state().is_game_over());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    pieces: PieceSource,
    stats: SessionStats,
    session_state: SessionState,
}

impl GameSession {
    /// Starts a session with a random seed and spawns the first piece.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::from_source(config, PieceSource::new())
    }

    /// Like [`Self::new`], but with a fixed seed for a reproducible game.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::from_source(config, PieceSource::with_seed(seed))
    }

    fn from_source(config: GameConfig, pieces: PieceSource) -> Result<Self, ConfigError> {
        let board = config.build_board()?;
        let mut session = Self {
            config,
            board,
            pieces,
            stats: SessionStats::new(),
            session_state: SessionState::Playing,
        };
        session.spawn_next();
        Ok(session)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.pieces.seed()
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Empties the board and starts over with a fresh piece.
    ///
    /// The piece sequence continues from the current random state.
    pub fn reset(&mut self) {
        self.board.clear();
        self.stats = SessionStats::new();
        self.session_state = SessionState::Playing;
        self.spawn_next();
    }

    /// Applies one player input. Ignored unless playing.
    ///
    /// Returns whether the board changed. A blocked [`Action::MoveDown`] locks
    /// the piece; the next [`tick`](Self::tick) clears lines and spawns.
    pub fn apply(&mut self, action: Action) -> bool {
        if !self.session_state.is_playing() {
            return false;
        }
        match action {
            Action::MoveLeft => self.board.move_left(),
            Action::MoveRight => self.board.move_right(),
            Action::Rotate => self.board.rotate(),
            Action::MoveDown => match self.board.move_down() {
                DropOutcome::Moved => true,
                DropOutcome::Locked => {
                    self.stats.record_lock();
                    true
                }
                DropOutcome::NoPiece => false,
            },
        }
    }

    /// Runs one descent step.
    ///
    /// Moves the piece down (locking it if blocked), re-arms rotations, clears
    /// complete rows and spawns a new piece when nothing is falling. The game
    /// ends when a locked block reaches the top row or a spawn overflows.
    ///
    /// Returns `None` unless playing.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.session_state.is_playing() {
            return None;
        }

        let drop = self.board.move_down();
        if drop.is_locked() {
            self.stats.record_lock();
        }
        self.board.reset_rotations();
        let cleared_lines = self.board.clear_completed_lines();
        self.stats.record_tick(cleared_lines);

        let spawned = self.board.all_locked();
        if spawned {
            self.spawn_next();
        }
        if self.board.has_locked_in_top_row() {
            self.session_state = SessionState::GameOver;
        }

        Some(TickReport {
            drop,
            cleared_lines,
            spawned,
        })
    }

    fn spawn_next(&mut self) {
        let piece = self.pieces.next_piece();
        self.stats.record_spawn();
        if self.board.spawn(&piece).is_err() {
            self.session_state = SessionState::GameOver;
        }
    }
}
