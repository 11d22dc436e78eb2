//! Column compaction toward row zero.

use lane_cascade_core::{BoardError, CellCoord};

use crate::{BoardState, PieceMove};

/// Compacts every column so that no empty cell sits beneath an occupied one.
///
/// Each empty cell, scanned upward from row zero, is filled by the nearest
/// piece above it in the same column. A single pass reaches the fixed point.
/// The returned moves are ordered by column, then by destination row; an
/// empty result means nothing fell.
pub fn resolve(board: &mut BoardState) -> Result<Vec<PieceMove>, BoardError> {
    let size = board.size();
    let mut moves = Vec::new();

    for column in 0..size {
        for row in 0..size {
            let target = CellCoord::new(column, row);
            if !board.get(target)?.is_empty() {
                continue;
            }

            for above in row + 1..size {
                if let Some(fall) = board.relocate(CellCoord::new(column, above), target)? {
                    moves.push(fall);
                    break;
                }
            }
        }
    }

    Ok(moves)
}

/// Reports whether any column holds an empty cell beneath an occupied one.
pub fn has_floating_pieces(board: &BoardState) -> Result<bool, BoardError> {
    let size = board.size();
    for column in 0..size {
        let mut seen_gap = false;
        for row in 0..size {
            let empty = board.get(CellCoord::new(column, row))?.is_empty();
            if empty {
                seen_gap = true;
            } else if seen_gap {
                return Ok(true);
            }
        }
    }
    Ok(false)
}
