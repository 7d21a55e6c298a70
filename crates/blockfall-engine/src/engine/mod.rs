//! Session logic on top of the core [`Board`](crate::Board).
//!
//! - [`GameSession`] - Board plus statistics and an event log
//! - [`GameStats`] - Pieces placed and lines cleared
//! - [`GameEvent`] / [`EventLog`] - Inputs and ticks, recorded in order
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`], optionally with a [`PieceSeed`](crate::PieceSeed)
//! 2. Feed it [`GameEvent`]s: moves and rotations from input, ticks from a timer
//! 3. Placed pieces clear rows and score points; a new piece spawns
//! 4. Stop once [`GameSession::is_game_over`] returns `true`
//!
//! The recorded [`EventLog`] together with the seed reproduces the game with
//! [`GameSession::replay`].
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameEvent, GameSession};
//!
//! let mut session = GameSession::new(10, 20);
//! session.handle(GameEvent::MoveLeft)?;
//! session.handle(GameEvent::RotateClockwise)?;
//! session.handle(GameEvent::HardDrop)?;
//!
//! assert_eq!(session.stats().completed_pieces(), 1);
//! # Ok::<(), blockfall_engine::AdvanceError>(())
//! ```

pub use self::{game_event::*, game_session::*, game_stats::*};

mod game_event;
mod game_session;
mod game_stats;
