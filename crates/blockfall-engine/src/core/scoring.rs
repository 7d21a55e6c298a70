use crate::ScoreTableGapError;

/// Points awarded for rows cleared by a single placement.
///
/// Index is the number of rows cleared at once:
/// - 0 rows: 0 points
/// - 1 row: 10 points
/// - 2 rows: 25 points
/// - 3 rows: 40 points
/// - 4 rows: 55 points
pub const SCORE_TABLE: [usize; 5] = [0, 10, 25, 40, 55];

/// Looks up the points for clearing `cleared_rows` rows in one placement.
///
/// A four-block piece cannot complete more than four rows, so anything past
/// the end of [`SCORE_TABLE`] is reported as an error.
///
/// # Example
///
/// ```
/// use blockfall_engine::line_clear_points;
///
/// assert_eq!(line_clear_points(2).unwrap(), 25);
/// assert!(line_clear_points(5).is_err());
/// ```
pub fn line_clear_points(cleared_rows: usize) -> Result<usize, ScoreTableGapError> {
    SCORE_TABLE
        .get(cleared_rows)
        .copied()
        .ok_or(ScoreTableGapError { cleared_rows })
}
