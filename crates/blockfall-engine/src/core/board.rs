use std::{collections::BTreeMap, mem};

use tracing::{debug, info, warn};

use crate::{AdvanceError, InvalidPlacementError};

use super::{
    block::{Block, Position},
    piece::Piece,
    scoring,
    shape_chooser::{PieceSeed, RandomShapeChooser, ShapeChooser},
    snapshot::BoardSnapshot,
};

/// Result of a single [`Board::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum AdvanceOutcome {
    /// The current piece moved down one row.
    Fell,
    /// The current piece was placed and a new piece spawned.
    Landed {
        /// Number of rows cleared by the placement.
        cleared_rows: usize,
    },
}

/// The mutable game state: placed blocks, the falling piece, score, and the
/// game-over flag.
///
/// Placed blocks are stored keyed by coordinate, so two blocks can never share
/// a cell. The falling piece is not part of the placed blocks; it only becomes
/// part of them when it is placed.
///
/// # Layout
///
/// - `x` ranges over `0..width`, left to right
/// - `y` ranges over `0..height`, top to bottom
/// - New pieces spawn with their pivot at `(width / 2 - 1, 1)`
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, PieceShape, SequenceShapeChooser};
///
/// let mut board = Board::with_chooser(10, 20, SequenceShapeChooser::new([PieceShape::Square]));
/// assert_eq!(board.current_piece().center().x(), 4);
///
/// // Move left, then let gravity drop the piece until it lands.
/// board.set_current_piece(board.current_piece().left());
/// while !board.advance().unwrap() {}
///
/// assert_eq!(board.blocks().count(), 4);
/// assert!(!board.is_game_over());
/// ```
#[derive(Debug)]
pub struct Board {
    width: i32,
    height: i32,
    blocks: BTreeMap<Position, Block>,
    current_piece: Piece,
    score: usize,
    is_game_over: bool,
    chooser: Box<dyn ShapeChooser>,
}

impl Board {
    /// Creates an empty board whose shapes come from a freshly seeded
    /// [`RandomShapeChooser`].
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_chooser(width, height, RandomShapeChooser::new())
    }

    #[must_use]
    pub fn with_seed(width: i32, height: i32, seed: PieceSeed) -> Self {
        Self::with_chooser(width, height, RandomShapeChooser::with_seed(seed))
    }

    /// Creates an empty board that draws every spawned shape from `chooser`.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    #[must_use]
    pub fn with_chooser<C>(width: i32, height: i32, chooser: C) -> Self
    where
        C: ShapeChooser + 'static,
    {
        assert!(
            width > 0 && height > 0,
            "board dimensions must be positive, got {width}x{height}"
        );
        let mut chooser: Box<dyn ShapeChooser> = Box::new(chooser);
        let (x, y) = spawn_position(width);
        let current_piece = chooser.choose().spawn(x, y);
        Self {
            width,
            height,
            blocks: BTreeMap::new(),
            current_piece,
            score: 0,
            is_game_over: false,
            chooser,
        }
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Pivot position of newly spawned pieces.
    #[must_use]
    pub fn spawn_position(&self) -> (i32, i32) {
        spawn_position(self.width)
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current_piece
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Returns the placed block at `(x, y)`, if any.
    #[must_use]
    pub fn block_at(&self, x: i32, y: i32) -> Option<Block> {
        self.blocks.get(&Position::new(x, y)).copied()
    }

    /// Iterates over the placed blocks in row-major order.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.blocks.values().copied()
    }

    /// Returns the cells of row `y`, one entry per column.
    #[must_use]
    pub fn row(&self, y: i32) -> Vec<Option<Block>> {
        (0..self.width).map(|x| self.block_at(x, y)).collect()
    }

    #[must_use]
    pub fn is_row_complete(&self, y: i32) -> bool {
        (0..self.width).all(|x| self.block_at(x, y).is_some())
    }

    /// Returns the indices of all complete rows, in ascending order.
    #[must_use]
    pub fn find_complete_rows(&self) -> Vec<i32> {
        (0..self.height)
            .filter(|y| self.is_row_complete(*y))
            .collect()
    }

    /// Checks that `block` is inside the board and its cell holds no placed
    /// block. The current piece does not occupy cells.
    #[must_use]
    pub fn is_block_valid(&self, block: Block) -> bool {
        (0..self.width).contains(&block.x())
            && (0..self.height).contains(&block.y())
            && !self.blocks.contains_key(&block.position())
    }

    #[must_use]
    pub fn is_piece_valid(&self, piece: Piece) -> bool {
        piece.blocks().iter().all(|b| self.is_block_valid(*b))
    }

    /// Adds the piece's blocks to the placed blocks.
    ///
    /// Rows are not cleared and the score is not touched; see
    /// [`Self::advance`] for the full placement step.
    pub fn place_piece(&mut self, piece: Piece) -> Result<(), InvalidPlacementError> {
        if !self.is_piece_valid(piece) {
            return Err(InvalidPlacementError);
        }
        for block in piece.blocks() {
            self.blocks.insert(block.position(), *block);
        }
        Ok(())
    }

    /// Removes every block on row `y` and moves every block above it down by
    /// one row. Blocks below `y` stay where they are.
    pub fn remove_row(&mut self, y: i32) {
        self.blocks = mem::take(&mut self.blocks)
            .into_values()
            .filter(|b| b.y() != y)
            .map(|b| if b.y() < y { b.down() } else { b })
            .map(|b| (b.position(), b))
            .collect();
    }

    /// Whether `piece` cannot move one row further down.
    #[must_use]
    pub fn is_piece_on_bottom(&self, piece: Piece) -> bool {
        !self.is_piece_valid(piece.down())
    }

    /// Replaces the current piece if `piece` is valid.
    ///
    /// Invalid candidates (against a wall or the stack) are silently ignored;
    /// the return value tells whether the piece was accepted.
    pub fn set_current_piece(&mut self, piece: Piece) -> bool {
        if !self.is_piece_valid(piece) {
            return false;
        }
        self.current_piece = piece;
        true
    }

    /// Drives the game forward by one tick.
    ///
    /// Returns `true` when the current piece was placed and a new one spawned,
    /// `false` when it only moved down.
    pub fn advance(&mut self) -> Result<bool, AdvanceError> {
        self.step().map(|outcome| outcome.is_landed())
    }

    /// Like [`Self::advance`], but also reports how many rows were cleared.
    ///
    /// # Game Flow
    ///
    /// 1. If the current piece is on the bottom, place it, clear complete rows
    ///    from the top down, add their points and spawn a new piece
    /// 2. Otherwise move the current piece down by one row
    /// 3. If the resulting current piece is invalid, the game is over
    ///
    /// On error the board is left as it was before the call.
    pub fn step(&mut self) -> Result<AdvanceOutcome, AdvanceError> {
        let outcome = if self.is_piece_on_bottom(self.current_piece) {
            let cleared_rows = self.lock_current_piece()?;
            self.current_piece = self.spawn_piece();
            AdvanceOutcome::Landed { cleared_rows }
        } else {
            self.current_piece = self.current_piece.down();
            AdvanceOutcome::Fell
        };

        if !self.is_game_over && !self.is_piece_valid(self.current_piece) {
            info!(score = self.score, "current piece blocked, game over");
            self.is_game_over = true;
        }

        Ok(outcome)
    }

    /// Returns a serializable view of the board for the current frame.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            width: self.width,
            height: self.height,
            blocks: self.blocks().collect(),
            current_piece: (!self.is_game_over).then_some(self.current_piece),
            score: self.score,
            is_game_over: self.is_game_over,
        }
    }

    /// Places the current piece, clears complete rows and scores them.
    fn lock_current_piece(&mut self) -> Result<usize, AdvanceError> {
        let piece = self.current_piece;
        self.place_piece(piece)?;

        let complete_rows = self.find_complete_rows();
        let points = match scoring::line_clear_points(complete_rows.len()) {
            Ok(points) => points,
            Err(err) => {
                warn!(cleared_rows = err.cleared_rows, "no score for line clear");
                for block in piece.blocks() {
                    self.blocks.remove(&block.position());
                }
                return Err(err.into());
            }
        };

        // Ascending order: removing a row only moves rows above it, so the
        // remaining indices still point at the rows found before the collapse.
        for y in &complete_rows {
            self.remove_row(*y);
        }
        self.score += points;
        if !complete_rows.is_empty() {
            debug!(rows = ?complete_rows, points, score = self.score, "rows cleared");
        }
        Ok(complete_rows.len())
    }

    fn spawn_piece(&mut self) -> Piece {
        let shape = self.chooser.choose();
        let (x, y) = self.spawn_position();
        debug!(?shape, x, y, "spawning piece");
        shape.spawn(x, y)
    }
}

fn spawn_position(width: i32) -> (i32, i32) {
    (width / 2 - 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockColor, PieceShape, SequenceShapeChooser};

    fn board_with(width: i32, height: i32, shapes: &[PieceShape]) -> Board {
        Board::with_chooser(
            width,
            height,
            SequenceShapeChooser::new(shapes.iter().copied()),
        )
    }

    fn put(board: &mut Board, x: i32, y: i32, color: BlockColor) {
        let block = Block::new(x, y, color);
        board.blocks.insert(block.position(), block);
    }

    fn coords(board: &Board) -> Vec<(i32, i32)> {
        board.blocks().map(|b| (b.x(), b.y())).collect()
    }

    #[test]
    fn test_initial_state() {
        let board = board_with(10, 20, &[PieceShape::Line]);
        assert_eq!(board.current_piece(), Piece::line(4, 1));
        assert_eq!(board.score(), 0);
        assert!(!board.is_game_over());
        assert_eq!(board.blocks().count(), 0);
    }

    #[test]
    fn test_random_board_spawns_valid_piece() {
        let board = Board::new(10, 20);
        assert!(board.is_piece_valid(board.current_piece()));
        assert_eq!(
            (board.current_piece().center().x(), board.current_piece().center().y()),
            (4, 1)
        );
    }

    #[test]
    fn test_block_at() {
        let mut board = Board::new(10, 10);
        put(&mut board, 1, 1, BlockColor::Red);
        assert_eq!(board.block_at(1, 1), Some(Block::new(1, 1, BlockColor::Red)));
        assert_eq!(board.block_at(2, 1), None);
    }

    #[test]
    fn test_empty_row() {
        let board = Board::new(10, 10);
        let row = board.row(1);
        assert_eq!(row.len(), 10);
        assert!(row.iter().all(Option::is_none));
        assert!(!board.is_row_complete(1));
    }

    #[test]
    fn test_partial_row() {
        let mut board = Board::new(10, 10);
        for x in 0..4 {
            put(&mut board, x, 1, BlockColor::Red);
        }
        let row = board.row(1);
        assert_eq!(row.len(), 10);
        assert_eq!(row.iter().filter(|c| c.is_some()).count(), 4);
        assert!(!board.is_row_complete(1));
    }

    #[test]
    fn test_find_complete_rows() {
        let mut board = Board::new(10, 10);
        for x in 0..10 {
            put(&mut board, x, 1, BlockColor::Red);
        }
        assert_eq!(board.find_complete_rows(), [1]);
        assert!(board.is_row_complete(1));
        assert!(!board.is_row_complete(2));
    }

    #[test]
    fn test_is_block_valid() {
        let mut board = Board::new(10, 10);
        assert!(board.is_block_valid(Block::new(1, 1, BlockColor::Red)));
        assert!(!board.is_block_valid(Block::new(-1, 1, BlockColor::Red)));
        assert!(!board.is_block_valid(Block::new(10, 1, BlockColor::Red)));
        assert!(!board.is_block_valid(Block::new(1, -1, BlockColor::Red)));
        assert!(!board.is_block_valid(Block::new(1, 10, BlockColor::Red)));

        put(&mut board, 1, 1, BlockColor::Green);
        assert!(!board.is_block_valid(Block::new(1, 1, BlockColor::Red)));
    }

    #[test]
    fn test_current_piece_does_not_occupy() {
        let board = board_with(10, 10, &[PieceShape::Square]);
        let piece = board.current_piece();
        assert!(board.is_piece_valid(piece));
        assert!(board.is_block_valid(piece.center()));
    }

    #[test]
    fn test_place_piece() {
        let mut board = Board::new(10, 10);
        board.place_piece(Piece::line(3, 3)).unwrap();
        assert_eq!(coords(&board), [(3, 2), (3, 3), (3, 4), (3, 5)]);

        assert!(board.place_piece(Piece::line(0, 0)).is_err());
        assert!(board.place_piece(Piece::line(3, 6)).is_err());
        assert_eq!(board.blocks().count(), 4);
    }

    #[test]
    fn test_remove_row() {
        let mut board = Board::new(10, 10);
        for x in 0..5 {
            put(&mut board, x, 5, BlockColor::Red);
        }
        for x in 0..10 {
            put(&mut board, x, 6, BlockColor::Cyan);
        }
        for x in 4..10 {
            put(&mut board, x, 7, BlockColor::Green);
        }

        board.remove_row(6);

        // Row 7 is below the removed row and stays put.
        assert_eq!(board.block_at(7, 7), Some(Block::new(7, 7, BlockColor::Green)));
        // Row 5 moved into row 6; the original row 6 blocks are gone.
        assert_eq!(board.block_at(3, 6), Some(Block::new(3, 6, BlockColor::Red)));
        assert_eq!(board.block_at(7, 6), None);
        assert_eq!(board.block_at(3, 5), None);
        assert_eq!(board.blocks().count(), 11);
    }

    #[test]
    fn test_is_piece_on_bottom() {
        let mut board = Board::new(10, 10);
        assert!(board.is_piece_on_bottom(Piece::square(0, 8)));
        assert!(!board.is_piece_on_bottom(Piece::square(0, 7)));

        put(&mut board, 0, 5, BlockColor::Red);
        assert!(board.is_piece_on_bottom(Piece::square(0, 3)));
    }

    #[test]
    fn test_set_current_piece_rejects_invalid() {
        let mut board = board_with(10, 10, &[PieceShape::Line]);
        let original = board.current_piece();

        assert!(!board.set_current_piece(Piece::line(1, 0).rotate_clockwise()));
        assert_eq!(board.current_piece(), original);

        assert!(board.set_current_piece(original.right()));
        assert_eq!(board.current_piece(), original.right());
    }

    #[test]
    fn test_advance_lands_rotated_line() {
        let mut board = board_with(10, 10, &[PieceShape::Square]);
        assert!(board.set_current_piece(Piece::line(2, 0).rotate_clockwise()));

        let landed: Vec<_> = (0..10).map(|_| board.advance().unwrap()).collect();

        assert_eq!(landed.iter().filter(|l| **l).count(), 1);
        assert!(landed[9]);
        assert_eq!(coords(&board), [(0, 9), (1, 9), (2, 9), (3, 9)]);
        assert!(board.current_piece().center().y() <= 4);
        assert_eq!(board.current_piece(), Piece::square(4, 1));
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_advance_clears_single_row() {
        let mut board = board_with(4, 6, &[PieceShape::Square]);
        put(&mut board, 2, 5, BlockColor::Red);
        put(&mut board, 3, 5, BlockColor::Red);
        put(&mut board, 3, 4, BlockColor::Red);
        assert!(board.set_current_piece(Piece::square(0, 4)));

        let outcome = board.step().unwrap();

        assert_eq!(outcome, AdvanceOutcome::Landed { cleared_rows: 1 });
        assert_eq!(board.score(), 10);
        // Row 4 (the square's top half plus one block) moved into row 5.
        assert_eq!(coords(&board), [(0, 5), (1, 5), (3, 5)]);
    }

    #[test]
    fn test_advance_clears_separated_rows_iteratively() {
        let mut board = board_with(4, 10, &[PieceShape::Line]);
        for x in 1..4 {
            put(&mut board, x, 7, BlockColor::Red);
            put(&mut board, x, 9, BlockColor::Red);
        }
        put(&mut board, 1, 8, BlockColor::Green);
        put(&mut board, 2, 6, BlockColor::Green);
        assert!(board.set_current_piece(Piece::line(0, 7)));

        let outcome = board.step().unwrap();

        assert_eq!(outcome, AdvanceOutcome::Landed { cleared_rows: 2 });
        assert_eq!(board.score(), 25);
        assert_eq!(coords(&board), [(0, 8), (2, 8), (0, 9), (1, 9)]);
        assert_eq!(board.current_piece(), Piece::line(1, 1));
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_score_table_gap_restores_board() {
        let mut board = board_with(4, 10, &[PieceShape::Line]);
        for y in 5..=8 {
            board
                .place_piece(Piece::line(2, y).rotate_clockwise())
                .unwrap();
        }
        let bottom = Piece::line(2, 9).rotate_clockwise();
        assert!(board.set_current_piece(bottom));
        let before = coords(&board);

        let err = board.advance().unwrap_err();

        assert!(matches!(
            err,
            AdvanceError::ScoreTableGap(crate::ScoreTableGapError { cleared_rows: 5 })
        ));
        assert_eq!(coords(&board), before);
        assert_eq!(board.current_piece(), bottom);
        assert_eq!(board.score(), 0);
        assert!(!board.is_game_over());
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut board = board_with(10, 10, &[PieceShape::Square]);
        put(&mut board, 4, 1, BlockColor::Red);
        assert!(board.set_current_piece(Piece::square(0, 8)));

        assert!(board.advance().unwrap());
        assert!(board.is_game_over());

        let snapshot = board.snapshot();
        assert!(snapshot.is_game_over);
        assert_eq!(snapshot.current_piece, None);

        // The engine keeps accepting ticks; the flag never reverts.
        let _ = board.advance();
        assert!(board.is_game_over());
    }

    #[test]
    fn test_score_never_decreases_over_a_game() {
        let mut board = Board::with_seed(10, 12, PieceSeed::from_bytes([7; 16]));
        let mut last_score = 0;
        for _ in 0..2000 {
            if board.is_game_over() {
                break;
            }
            board.advance().unwrap();
            assert!(board.score() >= last_score);
            last_score = board.score();
        }
        assert!(board.is_game_over());
    }

    #[test]
    #[should_panic(expected = "board dimensions must be positive")]
    fn test_zero_width_panics() {
        let _ = Board::new(0, 10);
    }
}
