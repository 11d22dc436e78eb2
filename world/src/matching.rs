//! Run detection along rows and columns.

use std::collections::BTreeSet;

use lane_cascade_core::{BoardError, CellCoord, PieceKind, MIN_RUN_LENGTH};

use crate::BoardState;

/// Axis a run lies along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Cells share a row.
    Horizontal,
    /// Cells share a column.
    Vertical,
}

/// Maximal sequence of at least [`MIN_RUN_LENGTH`] adjacent same-kind pieces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    /// Axis the run lies along.
    pub axis: Axis,
    /// Kind shared by every piece of the run.
    pub kind: PieceKind,
    /// Cells of the run in increasing coordinate order.
    pub cells: Vec<CellCoord>,
}

/// Finds every run on the board, rows first, then columns.
pub fn find_runs(board: &BoardState) -> Result<Vec<Run>, BoardError> {
    let size = board.size();
    let mut runs = Vec::new();

    for row in 0..size {
        let line: Vec<CellCoord> = (0..size).map(|column| CellCoord::new(column, row)).collect();
        scan_line(board, &line, Axis::Horizontal, &mut runs)?;
    }
    for column in 0..size {
        let line: Vec<CellCoord> = (0..size).map(|row| CellCoord::new(column, row)).collect();
        scan_line(board, &line, Axis::Vertical, &mut runs)?;
    }

    Ok(runs)
}

/// Collects every cell that belongs to at least one run.
///
/// A cell on both a horizontal and a vertical run appears once.
pub fn find_matches(board: &BoardState) -> Result<BTreeSet<CellCoord>, BoardError> {
    let mut matched = BTreeSet::new();
    for run in find_runs(board)? {
        matched.extend(run.cells);
    }
    Ok(matched)
}

fn scan_line(
    board: &BoardState,
    line: &[CellCoord],
    axis: Axis,
    out: &mut Vec<Run>,
) -> Result<(), BoardError> {
    let mut start = 0;
    let mut current: Option<PieceKind> = None;

    for (position, cell) in line.iter().enumerate() {
        let kind = board.get(*cell)?.kind();
        if kind != current {
            push_run(line, start, position, current, axis, out);
            start = position;
            current = kind;
        }
    }
    push_run(line, start, line.len(), current, axis, out);

    Ok(())
}

fn push_run(
    line: &[CellCoord],
    start: usize,
    end: usize,
    kind: Option<PieceKind>,
    axis: Axis,
    out: &mut Vec<Run>,
) {
    let Some(kind) = kind else {
        return;
    };
    if end - start < MIN_RUN_LENGTH {
        return;
    }
    out.push(Run {
        axis,
        kind,
        cells: line[start..end].to_vec(),
    });
}
