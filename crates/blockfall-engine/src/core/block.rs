use serde::{Deserialize, Serialize};

/// Color tag carried by every block.
///
/// Each piece shape has one fixed color; the tag is opaque to the engine and
/// only exists for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockColor {
    Cyan,
    Red,
    Yellow,
    Orange,
    Green,
    Brown,
}

/// Grid coordinate of a cell.
///
/// `y` grows downward, so row 0 is the top of the board. Ordering is
/// row-major: by `y` first, then by `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Position {
    // Field order drives the derived `Ord`.
    pub y: i32,
    pub x: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }
}

/// A single colored cell at a grid position.
///
/// Blocks are immutable values: every movement returns a new `Block` with the
/// same color. Coordinates wrap at the `i32` limits, so movement never fails.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Block, BlockColor};
///
/// let block = Block::new(3, 4, BlockColor::Red);
/// assert_eq!(block.down().y(), 5);
/// assert_eq!(block.left().x(), 2);
/// assert_eq!(block.right().color(), BlockColor::Red);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Block {
    x: i32,
    y: i32,
    color: BlockColor,
}

impl Block {
    #[must_use]
    pub const fn new(x: i32, y: i32, color: BlockColor) -> Self {
        Self { x, y, color }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn color(self) -> BlockColor {
        self.color
    }

    #[must_use]
    pub const fn position(self) -> Position {
        Position::new(self.x, self.y)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.x, self.y.wrapping_add(1), self.color)
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.x.wrapping_sub(1), self.y, self.color)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.x.wrapping_add(1), self.y, self.color)
    }
}
