use rand::Rng as _;
use tracing::debug;

use crate::{
    AdvanceError,
    core::{
        board::{AdvanceOutcome, Board},
        piece::Piece,
        shape_chooser::{PieceSeed, ShapeChooser},
    },
};

use super::{
    game_event::{EventLog, GameEvent},
    game_stats::GameStats,
};

/// What handling a single [`GameEvent`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EventOutcome {
    /// The current piece moved or rotated.
    Moved,
    /// The move was blocked by a wall or the stack.
    Rejected,
    /// A tick moved the current piece down one row.
    Fell,
    /// The current piece was placed and a new piece spawned.
    Landed { cleared_rows: usize },
    /// The game is over; the event was dropped.
    Ignored,
}

/// A game in progress: the board, its statistics and the events that led to
/// it.
///
/// `GameSession` is the single dispatch point for front ends. Movement events
/// become candidate pieces offered to [`Board::set_current_piece`], ticks call
/// [`Board::step`], and a hard drop ticks until the piece lands.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    stats: GameStats,
    event_log: EventLog,
    seed: Option<PieceSeed>,
}

impl GameSession {
    /// Creates a session with a random seed.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_seed(width, height, rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(width: i32, height: i32, seed: PieceSeed) -> Self {
        Self {
            board: Board::with_seed(width, height, seed),
            stats: GameStats::new(),
            event_log: EventLog::new(),
            seed: Some(seed),
        }
    }

    /// Creates a session with a custom chooser. Such a session has no seed
    /// and cannot be replayed through [`Self::replay`].
    #[must_use]
    pub fn with_chooser<C>(width: i32, height: i32, chooser: C) -> Self
    where
        C: ShapeChooser + 'static,
    {
        Self {
            board: Board::with_chooser(width, height, chooser),
            stats: GameStats::new(),
            event_log: EventLog::new(),
            seed: None,
        }
    }

    /// Rebuilds a session by handling every event of `log` in order.
    ///
    /// With the seed of the recorded session, the result matches the
    /// recorded session's board, score and statistics.
    pub fn replay(
        width: i32,
        height: i32,
        seed: PieceSeed,
        log: &EventLog,
    ) -> Result<Self, AdvanceError> {
        let mut session = Self::with_seed(width, height, seed);
        for event in log.iter() {
            session.handle(event)?;
        }
        Ok(session)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    #[must_use]
    pub fn seed(&self) -> Option<PieceSeed> {
        self.seed
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    /// Applies one event and records it.
    ///
    /// Events arriving after game over are ignored and not recorded. A failing
    /// event is not recorded; the failing [`Board::step`] itself leaves the
    /// board untouched, but a `HardDrop` keeps the rows it fell before the
    /// failure.
    pub fn handle(&mut self, event: GameEvent) -> Result<EventOutcome, AdvanceError> {
        if self.board.is_game_over() {
            return Ok(EventOutcome::Ignored);
        }
        let outcome = match event {
            GameEvent::MoveLeft => self.try_move(Piece::left),
            GameEvent::MoveRight => self.try_move(Piece::right),
            GameEvent::MoveDown => self.try_move(Piece::down),
            GameEvent::RotateClockwise => self.try_move(Piece::rotate_clockwise),
            GameEvent::Tick => self.tick()?,
            GameEvent::HardDrop => self.hard_drop()?,
        };
        self.event_log.push(event);
        Ok(outcome)
    }

    fn try_move(&mut self, transform: fn(&Piece) -> Piece) -> EventOutcome {
        let candidate = transform(&self.board.current_piece());
        if self.board.set_current_piece(candidate) {
            EventOutcome::Moved
        } else {
            EventOutcome::Rejected
        }
    }

    fn tick(&mut self) -> Result<EventOutcome, AdvanceError> {
        match self.board.step()? {
            AdvanceOutcome::Fell => Ok(EventOutcome::Fell),
            AdvanceOutcome::Landed { cleared_rows } => {
                self.stats.complete_piece_drop(cleared_rows);
                Ok(EventOutcome::Landed { cleared_rows })
            }
        }
    }

    fn hard_drop(&mut self) -> Result<EventOutcome, AdvanceError> {
        let mut rows_fallen = 0;
        loop {
            let outcome = self.tick()?;
            if outcome.is_landed() {
                debug!(rows_fallen, "hard drop");
                return Ok(outcome);
            }
            rows_fallen += 1;
        }
    }
}
