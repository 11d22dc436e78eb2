#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded piece supply: the opening fill and the piece waiting to be inserted.

use lane_cascade_core::{BoardLayout, Cell, CellCoord, Event, LayoutError, PieceKind};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fewest distinct kinds a supply can draw from.
pub const MIN_KINDS: u8 = 2;

/// Configuration parameters required to construct the piece supply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    seed: u64,
    kinds: u8,
}

impl Config {
    /// Creates a configuration drawing from `kinds` piece kinds with the given seed.
    ///
    /// Fewer than [`MIN_KINDS`] kinds are raised to the minimum.
    #[must_use]
    pub fn new(seed: u64, kinds: u8) -> Self {
        Self {
            seed,
            kinds: kinds.max(MIN_KINDS),
        }
    }

    /// Number of distinct kinds in play.
    #[must_use]
    pub const fn kinds(&self) -> u8 {
        self.kinds
    }
}

/// Deterministic source of piece kinds.
///
/// The same seed always produces the same opening board and the same
/// sequence of pending pieces.
#[derive(Debug)]
pub struct PieceSupply {
    rng: ChaCha8Rng,
    kinds: u8,
    pending: PieceKind,
}

impl PieceSupply {
    /// Creates a supply and draws its first pending piece.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let pending = PieceKind::new(rng.gen_range(0..config.kinds));
        Self {
            rng,
            kinds: config.kinds,
            pending,
        }
    }

    /// Kind the next insertion will use.
    #[must_use]
    pub const fn pending(&self) -> PieceKind {
        self.pending
    }

    /// Fills every cell of a `size` × `size` board with a random kind.
    ///
    /// Rows are filled bottom to top. Within a row, a cell never takes a kind
    /// that completes a run with the two cells to its left or the two cells
    /// below it; when a cell has no kind left, the row backtracks to the
    /// previous cell and tries its next candidate. The opening board therefore
    /// never starts with a match, even with only two kinds.
    pub fn initial_layout(&mut self, size: u32) -> Result<BoardLayout, LayoutError> {
        let width = size as usize;
        let mut kinds: Vec<u8> = Vec::with_capacity(width * width);

        for row in 0..width {
            if !self.fill_row(&mut kinds, row, 0, width) {
                return checkerboard(size);
            }
        }

        BoardLayout::from_fn(size, |coord: CellCoord| {
            let index = coord.row() as usize * width + coord.column() as usize;
            Cell::Occupied(PieceKind::new(kinds[index]))
        })
    }

    /// Consumes world events, drawing a new pending piece whenever the board settles.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if matches!(event, Event::BoardStable { .. }) {
                self.pending = PieceKind::new(self.rng.gen_range(0..self.kinds));
            }
        }
    }

    fn fill_row(&mut self, kinds: &mut Vec<u8>, row: usize, column: usize, width: usize) -> bool {
        if column == width {
            return true;
        }

        let filled: &[u8] = kinds;
        let mut candidates: Vec<u8> = (0..self.kinds)
            .filter(|&kind| !completes_run(filled, row, column, width, kind))
            .collect();
        candidates.shuffle(&mut self.rng);

        for kind in candidates {
            kinds.push(kind);
            if self.fill_row(kinds, row, column + 1, width) {
                return true;
            }
            let _ = kinds.pop();
        }
        false
    }
}

/// Reports whether placing `kind` at `(column, row)` lines up three of a kind
/// with the cells already filled to its left or below it.
fn completes_run(kinds: &[u8], row: usize, column: usize, width: usize, kind: u8) -> bool {
    let at = |row: usize, column: usize| kinds[row * width + column];
    let horizontal = column >= 2 && at(row, column - 1) == kind && at(row, column - 2) == kind;
    let vertical = row >= 2 && at(row - 1, column) == kind && at(row - 2, column) == kind;
    horizontal || vertical
}

/// Alternating two-kind board, used when no random row fits.
fn checkerboard(size: u32) -> Result<BoardLayout, LayoutError> {
    BoardLayout::from_fn(size, |coord| {
        Cell::Occupied(PieceKind::new(((coord.column() + coord.row()) % 2) as u8))
    })
}
