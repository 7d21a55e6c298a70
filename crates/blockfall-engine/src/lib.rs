//! Game-state engine for a falling-block puzzle game.
//!
//! The [`core`] module holds the geometric model ([`Block`], [`Piece`]) and the
//! mutable [`Board`]. The [`engine`] module layers session bookkeeping on top:
//! statistics, input events, and deterministic replay.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece is out of bounds or overlaps placed blocks")]
pub struct InvalidPlacementError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("{cleared_rows} rows completed in one step, more than the score table covers")]
pub struct ScoreTableGapError {
    pub cleared_rows: usize,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AdvanceError {
    #[display("cannot place current piece")]
    InvalidPlacement(InvalidPlacementError),
    #[display("cannot score line clear")]
    ScoreTableGap(ScoreTableGapError),
}
