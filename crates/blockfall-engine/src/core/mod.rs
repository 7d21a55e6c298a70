pub use self::{block::*, board::*, piece::*, scoring::*, shape_chooser::*, snapshot::*};

pub(crate) mod block;
pub(crate) mod board;
pub(crate) mod piece;
pub(crate) mod scoring;
pub(crate) mod shape_chooser;
pub(crate) mod snapshot;
