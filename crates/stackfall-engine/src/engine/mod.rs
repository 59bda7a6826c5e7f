//! Game flow on top of the [`core`](crate::core) board.
//!
//! - [`GameConfig`] - Board dimensions, descent interval and rotation cap
//! - [`GameSession`] - Tick/input driver with pause, reset and game over
//! - [`SessionStats`] - Counters collected during a session
//! - [`PieceSource`] - Uniform random piece generation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//!
//! # Game Flow
//!
//! 1. Build a [`GameSession`] from a [`GameConfig`]; the first piece spawns
//! 2. Feed player input through [`GameSession::apply`]
//! 3. Call [`GameSession::tick`] once per descent interval: the piece falls
//!    or locks, complete rows are cleared, and a new piece spawns once
//!    nothing is falling
//! 4. Repeat until a locked block reaches the top row
//!
//! # Example
//!
//! ```
//! use stackfall_engine::{Action, GameConfig, GameSession};
//!
//! let mut session = GameSession::new(GameConfig::default()).unwrap();
//!
//! session.apply(Action::MoveRight);
//! if let Some(report) = session.tick() {
//!     println!("cleared {} line(s)", report.cleared_lines);
//! }
//!
//! if session.session_state().is_game_over() {
//!     println!("Game over!");
//! }
//! ```

pub use self::{config::*, game_session::*, piece_source::*, session_stats::*};

mod config;
mod game_session;
mod piece_source;
mod session_stats;
