//! Edge insertion into a single row or column.
//!
//! A lane is read entry-to-exit via [`Lane::cells`]. When every cell is
//! occupied the piece at the exit edge is ejected and the rest shift one step
//! toward the exit. Otherwise the pieces between the entry edge and the first
//! gap shift one step into that gap. Either way the new piece lands on the
//! entry cell. The lane is fully validated and planned before the board is
//! touched.

use lane_cascade_core::{
    BoardError, CellCoord, ConsistencyFault, Direction, InsertionError, Lane, Piece,
};

use crate::{BoardState, PieceMove};

/// Result of a successful insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Cell the new piece occupies.
    pub placed_at: CellCoord,
    /// Piece pushed off the exit edge together with the cell it left.
    pub ejected: Option<(Piece, CellCoord)>,
    /// Pieces that shifted along the lane, ordered from the exit side.
    pub shifts: Vec<PieceMove>,
}

/// Inserts `piece` into `lane`, shifting or ejecting existing pieces.
///
/// Rejections and consistency faults are reported before any cell is written.
pub fn insert(
    board: &mut BoardState,
    lane: Lane,
    piece: Piece,
) -> Result<InsertOutcome, InsertionError> {
    let plan = plan(board, lane)?;
    let cells = &plan.cells;

    let ejected = if plan.ejects {
        let exit = cells[plan.end];
        board.set(exit, None)?.map(|piece| (piece, exit))
    } else {
        None
    };

    let mut shifts = Vec::with_capacity(plan.end);
    for step in (1..=plan.end).rev() {
        if let Some(shift) = board.relocate(cells[step - 1], cells[step])? {
            shifts.push(shift);
        }
    }

    let entry = cells[0];
    let _ = board.set(entry, Some(piece))?;

    Ok(InsertOutcome {
        placed_at: entry,
        ejected,
        shifts,
    })
}

/// Reports whether every cell of the lane holds a piece.
pub fn is_lane_full(board: &BoardState, lane: Lane) -> Result<bool, BoardError> {
    for cell in lane.cells(board.size()) {
        if board.get(cell)?.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}

#[derive(Debug)]
struct Plan {
    cells: Vec<CellCoord>,
    /// Index of the cell that absorbs the shift: the exit cell or the first gap.
    end: usize,
    ejects: bool,
}

fn plan(board: &BoardState, lane: Lane) -> Result<Plan, InsertionError> {
    if lane.direction() == Direction::Down {
        return Err(InsertionError::UnsupportedDirection(Direction::Down));
    }

    let size = board.size();
    if lane.index() >= size {
        return Err(InsertionError::LaneOutOfBounds {
            lane: lane.index(),
            size,
        });
    }

    let cells: Vec<CellCoord> = lane.cells(size).collect();
    if is_lane_full(board, lane)? {
        return Ok(Plan {
            end: cells.len() - 1,
            cells,
            ejects: true,
        });
    }

    let mut gap = None;
    for (position, cell) in cells.iter().enumerate() {
        if board.get(*cell)?.is_empty() {
            gap = Some(position);
            break;
        }
    }
    let end = gap.ok_or(InsertionError::InternalConsistency(
        ConsistencyFault::NoGapInOpenLane { lane },
    ))?;

    Ok(Plan {
        cells,
        end,
        ejects: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_cascade_core::{BoardLayout, Cell, PieceId, PieceKind};

    const R: Cell = Cell::Occupied(PieceKind::new(0));
    const B: Cell = Cell::Occupied(PieceKind::new(1));
    const E: Cell = Cell::Empty;

    fn board_with_row(row: u32, cells: [Cell; 5]) -> BoardState {
        let layout = BoardLayout::from_fn(5, |coord| {
            if coord.row() == row {
                cells[coord.column() as usize]
            } else {
                E
            }
        })
        .expect("valid layout");
        let mut next = 0;
        BoardState::from_layout(&layout, || {
            next += 1;
            PieceId::new(next)
        })
    }

    fn row_kinds(board: &BoardState, row: u32) -> Vec<Cell> {
        (0..board.size())
            .map(|column| board.get(CellCoord::new(column, row)).expect("in bounds"))
            .collect()
    }

    fn new_piece(cell: Cell) -> Piece {
        Piece {
            kind: cell.kind().expect("occupied"),
            id: PieceId::new(100),
        }
    }

    #[test]
    fn left_insertion_closes_the_first_gap() {
        let mut board = board_with_row(2, [R, B, E, B, R]);

        let outcome =
            insert(&mut board, Lane::new(Direction::Left, 2), new_piece(R)).expect("accepted");

        assert_eq!(row_kinds(&board, 2), vec![R, R, B, B, R]);
        assert_eq!(outcome.placed_at, CellCoord::new(0, 2));
        assert_eq!(outcome.ejected, None);
        assert_eq!(
            outcome.shifts,
            vec![
                PieceMove {
                    piece: PieceId::new(2),
                    from: CellCoord::new(1, 2),
                    to: CellCoord::new(2, 2),
                },
                PieceMove {
                    piece: PieceId::new(1),
                    from: CellCoord::new(0, 2),
                    to: CellCoord::new(1, 2),
                },
            ]
        );
    }

    #[test]
    fn left_insertion_into_full_row_ejects_far_piece() {
        let mut board = board_with_row(2, [B, R, B, B, R]);
        let far = board.piece(CellCoord::new(4, 2)).expect("in bounds");

        let outcome =
            insert(&mut board, Lane::new(Direction::Left, 2), new_piece(R)).expect("accepted");

        assert_eq!(row_kinds(&board, 2), vec![R, B, R, B, B]);
        assert_eq!(
            outcome.ejected,
            far.map(|piece| (piece, CellCoord::new(4, 2)))
        );
        assert_eq!(outcome.shifts.len(), 4);
    }

    #[test]
    fn right_insertion_shifts_toward_column_zero() {
        let mut board = board_with_row(0, [R, B, E, B, R]);

        let outcome =
            insert(&mut board, Lane::new(Direction::Right, 0), new_piece(B)).expect("accepted");

        assert_eq!(row_kinds(&board, 0), vec![R, B, B, R, B]);
        assert_eq!(outcome.placed_at, CellCoord::new(4, 0));
    }

    #[test]
    fn insertion_onto_empty_entry_cell_moves_nothing() {
        let mut board = board_with_row(1, [E, B, E, B, R]);

        let outcome =
            insert(&mut board, Lane::new(Direction::Left, 1), new_piece(R)).expect("accepted");

        assert!(outcome.shifts.is_empty());
        assert_eq!(row_kinds(&board, 1), vec![R, B, E, B, R]);
    }

    #[test]
    fn up_insertion_enters_at_the_top_row() {
        let mut board = board_with_row(4, [B, E, E, E, E]);

        let outcome =
            insert(&mut board, Lane::new(Direction::Up, 0), new_piece(R)).expect("accepted");

        assert_eq!(outcome.placed_at, CellCoord::new(0, 4));
        assert_eq!(board.get(CellCoord::new(0, 3)), Ok(B));
        assert_eq!(board.get(CellCoord::new(0, 4)), Ok(R));
    }

    #[test]
    fn down_is_rejected_before_mutation() {
        let mut board = board_with_row(0, [R, B, E, B, R]);
        let before = board.clone();

        let result = insert(&mut board, Lane::new(Direction::Down, 0), new_piece(R));

        assert_eq!(
            result,
            Err(InsertionError::UnsupportedDirection(Direction::Down))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn lane_outside_board_is_rejected() {
        let mut board = board_with_row(0, [R, B, E, B, R]);
        let before = board.clone();

        let result = insert(&mut board, Lane::new(Direction::Left, 5), new_piece(R));

        assert_eq!(
            result,
            Err(InsertionError::LaneOutOfBounds { lane: 5, size: 5 })
        );
        assert_eq!(board, before);
    }

    #[test]
    fn lane_fullness_reflects_gaps() {
        let board = board_with_row(3, [R, B, R, B, R]);
        assert_eq!(is_lane_full(&board, Lane::new(Direction::Left, 3)), Ok(true));
        assert_eq!(is_lane_full(&board, Lane::new(Direction::Up, 3)), Ok(false));
    }
}
