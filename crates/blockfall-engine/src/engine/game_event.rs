use serde::{Deserialize, Serialize};

/// An input or timer event that drives a [`GameSession`](super::GameSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    MoveLeft,
    MoveRight,
    MoveDown,
    RotateClockwise,
    /// Gravity step from the periodic timer.
    Tick,
    /// Advance until the current piece is placed.
    HardDrop,
}

impl GameEvent {
    pub const ALL: [Self; 6] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::MoveDown,
        Self::RotateClockwise,
        Self::Tick,
        Self::HardDrop,
    ];
}

/// Events handled by a session, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    #[must_use]
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.iter().copied()
    }
}

impl FromIterator<GameEvent> for EventLog {
    fn from_iter<I: IntoIterator<Item = GameEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}
