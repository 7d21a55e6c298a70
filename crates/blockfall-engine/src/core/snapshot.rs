use serde::{Deserialize, Serialize};

use super::{block::Block, piece::Piece};

/// Read-only view of a [`Board`](super::board::Board) for one frame.
///
/// `current_piece` is `None` once the game is over, since a blocked piece is
/// not drawn.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    /// Placed blocks in row-major order.
    pub blocks: Vec<Block>,
    pub current_piece: Option<Piece>,
    pub score: usize,
    pub is_game_over: bool,
}
