use std::{fmt, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::piece::PieceShape;

/// Selects the shape of each newly spawned piece.
///
/// The board asks its chooser for one shape per spawn. Implementations decide
/// the distribution; the engine itself never touches a global RNG here, which
/// keeps games reproducible when a deterministic chooser is supplied.
pub trait ShapeChooser: fmt::Debug + Send {
    fn choose(&mut self) -> PieceShape;
}

/// Seed for deterministic shape selection.
///
/// A 128-bit (16-byte) seed for [`RandomShapeChooser`]. The same seed always
/// produces the same sequence of shapes, which is what makes recorded event
/// logs replayable.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceSeed, RandomShapeChooser, ShapeChooser as _};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
/// let mut a = RandomShapeChooser::with_seed(seed);
/// let mut b = RandomShapeChooser::with_seed(seed);
/// assert_eq!(a.choose(), b.choose());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for PieceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParsePieceSeedError {
    reason: String,
}

impl std::str::FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParsePieceSeedError {
                reason: format!("expected 32 characters, got {}", s.len()),
            });
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| ParsePieceSeedError {
            reason: format!("{s} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Uniform shape selection driven by a seeded PCG generator.
#[derive(Debug, Clone)]
pub struct RandomShapeChooser {
    rng: Pcg32,
    seed: PieceSeed,
}

impl Default for RandomShapeChooser {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomShapeChooser {
    /// Creates a chooser seeded from the thread-local RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            seed,
        }
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }
}

impl ShapeChooser for RandomShapeChooser {
    fn choose(&mut self) -> PieceShape {
        self.rng.random()
    }
}

/// Cycles through a fixed list of shapes.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceShape, SequenceShapeChooser, ShapeChooser as _};
///
/// let mut chooser = SequenceShapeChooser::new([PieceShape::Line, PieceShape::Square]);
/// assert_eq!(chooser.choose(), PieceShape::Line);
/// assert_eq!(chooser.choose(), PieceShape::Square);
/// assert_eq!(chooser.choose(), PieceShape::Line);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceShapeChooser {
    shapes: Vec<PieceShape>,
    next: usize,
}

impl SequenceShapeChooser {
    /// # Panics
    ///
    /// Panics if `shapes` is empty.
    #[must_use]
    pub fn new<I>(shapes: I) -> Self
    where
        I: IntoIterator<Item = PieceShape>,
    {
        let shapes: Vec<_> = shapes.into_iter().collect();
        assert!(!shapes.is_empty(), "shape sequence must not be empty");
        Self { shapes, next: 0 }
    }
}

impl ShapeChooser for SequenceShapeChooser {
    fn choose(&mut self) -> PieceShape {
        let shape = self.shapes[self.next];
        self.next = (self.next + 1) % self.shapes.len();
        shape
    }
}
