//! Authoritative grid storage.

use lane_cascade_core::{BoardError, BoardLayout, Cell, CellCoord, LayoutError, Piece, PieceId};

/// Square grid of cells, each either empty or holding a single [`Piece`].
///
/// Identity tokens are stored alongside kinds, so an occupied cell always
/// carries an identity and an empty one never does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    size: u32,
    slots: Vec<Option<Piece>>,
}

impl BoardState {
    /// Creates an empty board with the provided edge length.
    pub fn new(size: u32) -> Result<Self, LayoutError> {
        let layout = BoardLayout::empty(size)?;
        let edge = layout.size() as usize;
        Ok(Self {
            size: layout.size(),
            slots: vec![None; edge * edge],
        })
    }

    /// Builds a board from a layout, minting an identity for every occupied cell.
    ///
    /// Identities are requested in row-major order starting at row zero.
    pub fn from_layout<F>(layout: &BoardLayout, mut mint: F) -> Self
    where
        F: FnMut() -> PieceId,
    {
        let slots = layout
            .iter()
            .map(|(_, cell)| cell.kind().map(|kind| Piece { kind, id: mint() }))
            .collect();
        Self {
            size: layout.size(),
            slots,
        }
    }

    /// Edge length of the board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether the coordinate addresses a cell of this board.
    #[must_use]
    pub fn is_in_bounds(&self, coord: CellCoord) -> bool {
        coord.column() < self.size && coord.row() < self.size
    }

    /// Logical content of the cell.
    pub fn get(&self, coord: CellCoord) -> Result<Cell, BoardError> {
        self.piece(coord).map(Cell::from)
    }

    /// Piece occupying the cell, including its identity.
    pub fn piece(&self, coord: CellCoord) -> Result<Option<Piece>, BoardError> {
        let index = self.index(coord)?;
        Ok(self.slots[index])
    }

    /// Stores `slot` at the cell and returns whatever occupied it before.
    pub fn set(
        &mut self,
        coord: CellCoord,
        slot: Option<Piece>,
    ) -> Result<Option<Piece>, BoardError> {
        let index = self.index(coord)?;
        Ok(std::mem::replace(&mut self.slots[index], slot))
    }

    /// Moves the occupant of `from` into `to`, leaving `from` empty.
    ///
    /// Returns `None` without touching the board when `from` is empty.
    pub fn relocate(
        &mut self,
        from: CellCoord,
        to: CellCoord,
    ) -> Result<Option<PieceMove>, BoardError> {
        let _ = self.index(to)?;
        let Some(piece) = self.set(from, None)? else {
            return Ok(None);
        };
        let _ = self.set(to, Some(piece))?;
        Ok(Some(PieceMove {
            piece: piece.id,
            from,
            to,
        }))
    }

    /// Iterator over every coordinate and its cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let size = self.size;
        self.slots.iter().enumerate().map(move |(index, slot)| {
            let index = index as u32;
            (CellCoord::new(index % size, index / size), Cell::from(*slot))
        })
    }

    /// Iterator over every occupied cell in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (CellCoord, Piece)> + '_ {
        let size = self.size;
        self.slots.iter().enumerate().filter_map(move |(index, slot)| {
            let index = index as u32;
            slot.map(|piece| (CellCoord::new(index % size, index / size), piece))
        })
    }

    /// Captures the kinds currently on the board as a layout.
    #[must_use]
    pub fn layout(&self) -> BoardLayout {
        let cells = self.slots.iter().map(|slot| Cell::from(*slot)).collect();
        match BoardLayout::new(self.size, cells) {
            Ok(layout) => layout,
            Err(_) => unreachable!("board dimensions are validated on construction"),
        }
    }

    fn index(&self, coord: CellCoord) -> Result<usize, BoardError> {
        if !self.is_in_bounds(coord) {
            return Err(BoardError::OutOfBounds {
                column: coord.column(),
                row: coord.row(),
                size: self.size,
            });
        }
        let row = coord.row() as usize;
        let column = coord.column() as usize;
        Ok(row * self.size as usize + column)
    }
}

/// Record of a piece changing cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PieceMove {
    /// Identity of the piece that moved.
    pub piece: PieceId,
    /// Cell the piece left.
    pub from: CellCoord,
    /// Cell the piece arrived at.
    pub to: CellCoord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_cascade_core::PieceKind;

    fn piece(kind: u8, id: u32) -> Piece {
        Piece {
            kind: PieceKind::new(kind),
            id: PieceId::new(id),
        }
    }

    #[test]
    fn new_board_is_entirely_empty() {
        let board = BoardState::new(4).expect("valid size");
        assert_eq!(board.cells().count(), 16);
        assert!(board.cells().all(|(_, cell)| cell.is_empty()));
        assert_eq!(board.pieces().count(), 0);
    }

    #[test]
    fn new_rejects_boards_too_small_for_a_run() {
        assert_eq!(BoardState::new(2), Err(LayoutError::TooSmall { size: 2 }));
    }

    #[test]
    fn get_and_set_reject_out_of_bounds_cells() {
        let mut board = BoardState::new(3).expect("valid size");
        let outside = CellCoord::new(3, 1);
        let expected = BoardError::OutOfBounds {
            column: 3,
            row: 1,
            size: 3,
        };

        assert_eq!(board.get(outside), Err(expected));
        assert_eq!(board.set(outside, Some(piece(0, 1))), Err(expected));
        assert!(!board.is_in_bounds(outside));
        assert_eq!(board.pieces().count(), 0, "rejected set must not write");
    }

    #[test]
    fn set_returns_previous_occupant() {
        let mut board = BoardState::new(3).expect("valid size");
        let cell = CellCoord::new(1, 2);
        assert_eq!(board.set(cell, Some(piece(1, 4))), Ok(None));
        assert_eq!(board.set(cell, None), Ok(Some(piece(1, 4))));
        assert_eq!(board.get(cell), Ok(Cell::Empty));
    }

    #[test]
    fn relocate_carries_identity() {
        let mut board = BoardState::new(3).expect("valid size");
        let from = CellCoord::new(0, 2);
        let to = CellCoord::new(0, 0);
        let _ = board.set(from, Some(piece(2, 7))).expect("in bounds");

        let moved = board.relocate(from, to).expect("in bounds");

        assert_eq!(
            moved,
            Some(PieceMove {
                piece: PieceId::new(7),
                from,
                to,
            })
        );
        assert_eq!(board.piece(to), Ok(Some(piece(2, 7))));
        assert_eq!(board.piece(from), Ok(None));
    }

    #[test]
    fn relocate_from_empty_cell_is_a_no_op() {
        let mut board = BoardState::new(3).expect("valid size");
        let moved = board
            .relocate(CellCoord::new(0, 1), CellCoord::new(0, 0))
            .expect("in bounds");
        assert_eq!(moved, None);
    }

    #[test]
    fn from_layout_mints_identities_in_row_major_order() {
        let layout = BoardLayout::from_fn(3, |cell| {
            if cell.row() == 0 {
                Cell::Occupied(PieceKind::new(cell.column() as u8))
            } else {
                Cell::Empty
            }
        })
        .expect("valid layout");
        let mut next = 10;
        let board = BoardState::from_layout(&layout, || {
            next += 1;
            PieceId::new(next)
        });

        let ids: Vec<u32> = board.pieces().map(|(_, piece)| piece.id.get()).collect();
        assert_eq!(ids, vec![11, 12, 13]);
        assert_eq!(board.layout(), layout);
    }
}
