use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::block::{Block, BlockColor};

/// A rigid group of four blocks that moves and rotates around a pivot.
///
/// The pivot (`center`) is itself a block; its color is the color of the
/// whole piece. Pieces are immutable - movement and rotation return new
/// `Piece` instances and keep the block order index-for-index.
///
/// # Coordinate System
///
/// - `x` grows to the right, `y` grows downward
/// - Rotation is 90° clockwise about the center, on the integer grid
/// - Positions may be negative or beyond the board; validity is the
///   board's concern
///
/// # Example
///
/// ```
/// use blockfall_engine::Piece;
///
/// let piece = Piece::line(1, 2);
/// let moved = piece.down().right();
/// assert_eq!((moved.center().x(), moved.center().y()), (2, 3));
///
/// let rotated = piece.rotate_clockwise();
/// let coords: Vec<_> = rotated.blocks().iter().map(|b| (b.x(), b.y())).collect();
/// assert_eq!(coords, [(2, 2), (1, 2), (0, 2), (-1, 2)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Piece {
    center: Block,
    blocks: [Block; 4],
}

impl Piece {
    /// Builds a piece from a pivot position, a color and the member offsets.
    #[must_use]
    pub fn from_offsets(x: i32, y: i32, color: BlockColor, offsets: [(i32, i32); 4]) -> Self {
        Self {
            center: Block::new(x, y, color),
            blocks: offsets
                .map(|(dx, dy)| Block::new(x.wrapping_add(dx), y.wrapping_add(dy), color)),
        }
    }

    #[must_use]
    pub fn line(x: i32, y: i32) -> Self {
        PieceShape::Line.spawn(x, y)
    }

    #[must_use]
    pub fn square(x: i32, y: i32) -> Self {
        PieceShape::Square.spawn(x, y)
    }

    #[must_use]
    pub fn l_shape1(x: i32, y: i32) -> Self {
        PieceShape::LShape1.spawn(x, y)
    }

    #[must_use]
    pub fn l_shape2(x: i32, y: i32) -> Self {
        PieceShape::LShape2.spawn(x, y)
    }

    #[must_use]
    pub fn n_shape1(x: i32, y: i32) -> Self {
        PieceShape::NShape1.spawn(x, y)
    }

    #[must_use]
    pub fn n_shape2(x: i32, y: i32) -> Self {
        PieceShape::NShape2.spawn(x, y)
    }

    /// Creates a piece of a uniformly chosen shape using the thread-local RNG.
    ///
    /// For reproducible sequences, pick the shape through a
    /// [`ShapeChooser`](super::shape_chooser::ShapeChooser) instead.
    #[must_use]
    pub fn random_piece(x: i32, y: i32) -> Self {
        rand::rng().random::<PieceShape>().spawn(x, y)
    }

    #[must_use]
    pub fn center(&self) -> Block {
        self.center
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block; 4] {
        &self.blocks
    }

    #[must_use]
    pub fn color(&self) -> BlockColor {
        self.center.color()
    }

    fn map<F>(&self, f: F) -> Self
    where
        F: Fn(Block) -> Block,
    {
        Self {
            center: f(self.center),
            blocks: self.blocks.map(f),
        }
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.map(Block::down)
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.map(Block::left)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.map(Block::right)
    }

    /// Rotates every block 90° clockwise about the center.
    ///
    /// A block at offset `(dx, dy)` from the center moves to offset
    /// `(-dy, dx)`. Every resulting block takes the center's color.
    #[must_use]
    pub fn rotate_clockwise(&self) -> Self {
        let center = self.center;
        self.map(|b| {
            let dx = b.x().wrapping_sub(center.x());
            let dy = b.y().wrapping_sub(center.y());
            Block::new(
                center.x().wrapping_sub(dy),
                center.y().wrapping_add(dx),
                center.color(),
            )
        })
    }
}

/// The six piece shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PieceShape {
    Line = 0,
    Square = 1,
    LShape1 = 2,
    LShape2 = 3,
    NShape1 = 4,
    NShape2 = 5,
}

impl Distribution<PieceShape> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceShape {
        PieceShape::ALL[rng.random_range(0..PieceShape::LEN)]
    }
}

impl PieceShape {
    /// Number of shapes (6).
    pub const LEN: usize = 6;

    pub const ALL: [Self; Self::LEN] = [
        Self::Line,
        Self::Square,
        Self::LShape1,
        Self::LShape2,
        Self::NShape1,
        Self::NShape2,
    ];

    #[must_use]
    pub const fn color(self) -> BlockColor {
        match self {
            Self::Line => BlockColor::Cyan,
            Self::Square => BlockColor::Red,
            Self::LShape1 => BlockColor::Yellow,
            Self::LShape2 => BlockColor::Orange,
            Self::NShape1 => BlockColor::Green,
            Self::NShape2 => BlockColor::Brown,
        }
    }

    /// Returns the single character name of this shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_engine::PieceShape;
    ///
    /// assert_eq!(PieceShape::Line.as_char(), 'I');
    /// assert_eq!(PieceShape::from_char('O'), Some(PieceShape::Square));
    /// assert_eq!(PieceShape::from_char('T'), None);
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Line => 'I',
            Self::Square => 'O',
            Self::LShape1 => 'L',
            Self::LShape2 => 'J',
            Self::NShape1 => 'Z',
            Self::NShape2 => 'S',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::Line),
            'O' => Some(Self::Square),
            'L' => Some(Self::LShape1),
            'J' => Some(Self::LShape2),
            'Z' => Some(Self::NShape1),
            'S' => Some(Self::NShape2),
            _ => None,
        }
    }

    /// Member block offsets from the pivot, in construction order.
    #[must_use]
    pub const fn offsets(self) -> [(i32, i32); 4] {
        PIECE_OFFSETS[self as usize]
    }

    /// Creates a piece of this shape with its pivot at `(x, y)`.
    #[must_use]
    pub fn spawn(self, x: i32, y: i32) -> Piece {
        Piece::from_offsets(x, y, self.color(), self.offsets())
    }
}

const PIECE_OFFSETS: [[(i32, i32); 4]; PieceShape::LEN] = [
    // line
    [(0, -1), (0, 0), (0, 1), (0, 2)],
    // square
    [(0, 0), (1, 0), (1, 1), (0, 1)],
    // l_shape1
    [(-1, 0), (0, 0), (1, 0), (1, 1)],
    // l_shape2
    [(-1, 0), (0, 0), (1, 0), (1, -1)],
    // n_shape1
    [(-1, 0), (0, 0), (0, 1), (1, 1)],
    // n_shape2
    [(-1, 0), (0, 0), (0, -1), (1, -1)],
];
