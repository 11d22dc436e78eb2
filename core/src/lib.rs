#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Cascade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation collaborators to react to. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest board edge length that can host a run of three pieces.
pub const MIN_BOARD_SIZE: u32 = 3;

/// Minimum number of aligned, same-kind pieces that form a run.
pub const MIN_RUN_LENGTH: usize = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the board with the provided initial layout.
    PopulateBoard {
        /// Cells to install, including their edge length.
        layout: BoardLayout,
    },
    /// Inserts a piece into a lane from one of the board edges.
    Insert {
        /// Player issuing the insertion.
        player: Player,
        /// Edge the piece enters from.
        direction: Direction,
        /// Row or column index addressed by the insertion.
        lane: u32,
        /// Kind of the piece being inserted.
        kind: PieceKind,
    },
    /// Hands the turn to the provided player.
    SetActivePlayer {
        /// Player that becomes current.
        player: Player,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a freshly populated board replaced the previous one.
    BoardPopulated {
        /// Edge length of the new board.
        size: u32,
    },
    /// Confirms that a piece was created by the initial fill.
    PieceSpawned {
        /// Piece that now occupies the cell.
        piece: Piece,
        /// Cell the piece occupies.
        at: CellCoord,
    },
    /// Reports that a layout was refused by the world.
    BoardRejected {
        /// Specific reason the layout failed validation.
        reason: LayoutError,
    },
    /// Reports that an insertion was refused before any mutation took effect.
    InsertionRejected {
        /// Player that requested the insertion.
        player: Player,
        /// Edge named by the request.
        direction: Direction,
        /// Lane index named by the request.
        lane: u32,
        /// Specific reason the insertion failed.
        reason: InsertionError,
    },
    /// Reports that a full lane pushed a piece off the board.
    PieceEjected {
        /// Piece that left the board.
        piece: Piece,
        /// Cell the piece occupied before ejection.
        from: CellCoord,
    },
    /// Confirms that a piece changed cells, either by lane shift or by falling.
    PieceMoved {
        /// Identity of the moved piece.
        piece: PieceId,
        /// Cell the piece occupied before moving.
        from: CellCoord,
        /// Cell the piece occupies after moving.
        to: CellCoord,
    },
    /// Confirms that the inserted piece came to rest at the lane's entry edge.
    PieceInserted {
        /// Newly created piece.
        piece: Piece,
        /// Cell the piece occupies.
        at: CellCoord,
        /// Edge the piece entered from.
        direction: Direction,
    },
    /// Confirms that a matched piece was cleared from the board.
    PieceRemoved {
        /// Piece that was cleared. Its identity is retired.
        piece: Piece,
        /// Cell the piece occupied before removal.
        at: CellCoord,
    },
    /// Reports the points earned by a single removal batch.
    ScoreGained {
        /// Player credited with the points.
        player: Player,
        /// Points awarded for the batch.
        amount: u32,
        /// Arithmetic mean of the removed pieces' cells.
        centroid: GridPoint,
    },
    /// Summarises one cascade iteration that changed the board.
    CascadeStepCompleted {
        /// One-based iteration number within the current cascade.
        iteration: u32,
        /// Indicates whether any piece fell during the iteration.
        fell: bool,
        /// Number of pieces removed by matches during the iteration.
        removed: u32,
    },
    /// Diagnostic emitted when a cascade hit its iteration cap before settling.
    CascadeCapReached {
        /// Number of iterations executed before the cap forced stability.
        iterations: u32,
    },
    /// Announces that the cascade following an insertion reached its fixed point.
    BoardStable {
        /// Number of iterations the cascade executed.
        iterations: u32,
    },
    /// Announces that a new player holds the turn.
    TurnChanged {
        /// Player that became current.
        player: Player,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Row zero is the board's fixed "down" edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Board edges a piece can be inserted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Enters a column from the top edge and travels toward row zero.
    Up,
    /// Enters a column from the bottom edge. Never accepted by the world.
    Down,
    /// Enters a row from column zero and travels toward the last column.
    Left,
    /// Enters a row from the last column and travels toward column zero.
    Right,
}

impl Direction {
    /// Every direction in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Row or column addressed by an insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lane {
    direction: Direction,
    index: u32,
}

impl Lane {
    /// Creates a lane view for the provided direction and index.
    #[must_use]
    pub const fn new(direction: Direction, index: u32) -> Self {
        Self { direction, index }
    }

    /// Edge the lane is entered from.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Row index for horizontal lanes, column index for vertical lanes.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Cells of the lane on a board of `size`, ordered from entry edge to exit edge.
    pub fn cells(self, size: u32) -> impl Iterator<Item = CellCoord> {
        let Self { direction, index } = self;
        (0..size).map(move |step| {
            let far = size - 1 - step;
            match direction {
                Direction::Up => CellCoord::new(index, far),
                Direction::Down => CellCoord::new(index, step),
                Direction::Left => CellCoord::new(step, index),
                Direction::Right => CellCoord::new(far, index),
            }
        })
    }
}

/// Kind of a piece, drawn from a closed palette chosen by the piece supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceKind(u8);

impl PieceKind {
    /// Creates a piece kind from its palette index.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the palette index of the kind.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Opaque identity token that follows a piece across coordinate changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u32);

impl PieceId {
    /// Creates a new piece identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// A piece resting on the board: its kind plus its identity token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Kind used for run detection.
    pub kind: PieceKind,
    /// Identity that observers use to correlate movement.
    pub id: PieceId,
}

/// Logical content of a single board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// No piece occupies the cell.
    #[default]
    Empty,
    /// A piece of the given kind occupies the cell.
    Occupied(PieceKind),
}

impl Cell {
    /// Reports whether the cell holds no piece.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Kind of the occupying piece, if any.
    #[must_use]
    pub const fn kind(&self) -> Option<PieceKind> {
        match self {
            Self::Empty => None,
            Self::Occupied(kind) => Some(*kind),
        }
    }
}

impl From<Option<Piece>> for Cell {
    fn from(slot: Option<Piece>) -> Self {
        slot.map_or(Self::Empty, |piece| Self::Occupied(piece.kind))
    }
}

/// Participants that alternate turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    /// First player; holds the opening turn by default.
    One,
    /// Second player.
    Two,
}

impl Player {
    /// Every player in turn order.
    pub const ALL: [Player; 2] = [Player::One, Player::Two];

    /// Player that moves after this one.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Fractional board position used for effect placement.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GridPoint {
    /// Horizontal position measured in columns.
    pub x: f32,
    /// Vertical position measured in rows.
    pub y: f32,
}

impl GridPoint {
    /// Creates a new point from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Square arrangement of cells used to seed a board, stored row-major from row zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    size: u32,
    cells: Vec<Cell>,
}

impl BoardLayout {
    /// Creates a layout after validating its dimensions.
    pub fn new(size: u32, cells: Vec<Cell>) -> Result<Self, LayoutError> {
        let layout = Self { size, cells };
        layout.validate()?;
        Ok(layout)
    }

    /// Checks the edge length and cell count.
    ///
    /// Deserialized layouts bypass [`BoardLayout::new`], so consumers revalidate.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.size < MIN_BOARD_SIZE {
            return Err(LayoutError::TooSmall { size: self.size });
        }
        let expected = u64::from(self.size) * u64::from(self.size);
        let actual = self.cells.len() as u64;
        if expected != actual {
            return Err(LayoutError::CellCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Builds a layout by evaluating `cell_at` for every coordinate.
    pub fn from_fn<F>(size: u32, mut cell_at: F) -> Result<Self, LayoutError>
    where
        F: FnMut(CellCoord) -> Cell,
    {
        let mut cells = Vec::new();
        for row in 0..size {
            for column in 0..size {
                cells.push(cell_at(CellCoord::new(column, row)));
            }
        }
        Self::new(size, cells)
    }

    /// Creates a layout with every cell empty.
    pub fn empty(size: u32) -> Result<Self, LayoutError> {
        Self::from_fn(size, |_| Cell::Empty)
    }

    /// Edge length of the layout.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Cell stored at the provided coordinate, or `None` outside the layout.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<Cell> {
        if coord.column() >= self.size || coord.row() >= self.size {
            return None;
        }
        let index = usize::try_from(coord.row() * self.size + coord.column()).ok()?;
        self.cells.get(index).copied()
    }

    /// Iterator over every coordinate and its cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as u32;
            (CellCoord::new(index % size, index / size), *cell)
        })
    }
}

/// Reasons a board access may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum BoardError {
    /// The coordinate lies outside `[0, size)` on at least one axis.
    #[error("cell ({column}, {row}) is outside a {size}x{size} board")]
    OutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
        /// Edge length of the board.
        size: u32,
    },
}

/// Reasons a layout may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum LayoutError {
    /// The board cannot host a run of three pieces.
    #[error("board size {size} is below the minimum of 3")]
    TooSmall {
        /// Requested edge length.
        size: u32,
    },
    /// The number of cells does not match the square of the edge length.
    #[error("expected {expected} cells but received {actual}")]
    CellCountMismatch {
        /// Cells required by the edge length.
        expected: u64,
        /// Cells supplied by the caller.
        actual: u64,
    },
}

/// Reasons an insertion request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum InsertionError {
    /// Insertion from the bottom edge is not part of the rules.
    #[error("insertion from {0:?} is not supported")]
    UnsupportedDirection(Direction),
    /// The lane index does not address a row or column of the board.
    #[error("lane {lane} is outside a board of size {size}")]
    LaneOutOfBounds {
        /// Requested lane index.
        lane: u32,
        /// Edge length of the board.
        size: u32,
    },
    /// A board access addressed a cell outside the grid.
    #[error(transparent)]
    Board(#[from] BoardError),
    /// The request named a player that does not hold the turn.
    #[error("{requested:?} cannot move while {expected:?} holds the turn")]
    OutOfTurn {
        /// Player holding the turn.
        expected: Player,
        /// Player named by the request.
        requested: Player,
    },
    /// The board contradicted itself; the insertion was rolled back.
    #[error("internal consistency fault: {0}")]
    InternalConsistency(ConsistencyFault),
}

/// Contradictions that indicate corrupted board state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ConsistencyFault {
    /// The lane was reported not full, yet no empty cell was found in it.
    #[error("lane {lane:?} reported a gap that does not exist")]
    NoGapInOpenLane {
        /// Lane that was being scanned.
        lane: Lane,
    },
    /// A matched cell was already empty when removal reached it.
    #[error("removal targeted empty cell {at:?}")]
    RemovedEmptyCell {
        /// Cell that was expected to hold a piece.
        at: CellCoord,
    },
}
