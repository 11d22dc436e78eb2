//! Points and effect placement for removal batches.

use lane_cascade_core::{CellCoord, GridPoint, Piece};

/// Piece cleared by a match, captured before its cell was emptied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovedPiece {
    /// Cell the piece occupied.
    pub at: CellCoord,
    /// Kind and retired identity of the piece.
    pub piece: Piece,
}

/// Points and centroid derived from one removal batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreGain {
    /// Total points for the batch.
    pub amount: u32,
    /// Arithmetic mean of the removed cells.
    pub centroid: GridPoint,
}

/// Converts removal batches into score gains.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreAccumulator {
    points_per_piece: u32,
}

impl ScoreAccumulator {
    /// Creates an accumulator awarding a fixed value per removed piece.
    #[must_use]
    pub const fn new(points_per_piece: u32) -> Self {
        Self { points_per_piece }
    }

    /// Scores a batch. Returns `None` for an empty batch.
    #[must_use]
    pub fn record_removal(&self, batch: &[RemovedPiece]) -> Option<ScoreGain> {
        if batch.is_empty() {
            return None;
        }

        let count = batch.len() as f64;
        let (sum_x, sum_y) = batch.iter().fold((0.0_f64, 0.0_f64), |(x, y), removed| {
            (
                x + f64::from(removed.at.column()),
                y + f64::from(removed.at.row()),
            )
        });
        let pieces = u32::try_from(batch.len()).unwrap_or(u32::MAX);

        Some(ScoreGain {
            amount: pieces.saturating_mul(self.points_per_piece),
            centroid: GridPoint::new((sum_x / count) as f32, (sum_y / count) as f32),
        })
    }
}
