#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for Lane Cascade.
//!
//! The world owns the single [`BoardState`] of a session. Every mutation is
//! funnelled through [`apply`], which runs an insertion and its cascade as one
//! transaction and reports the outcome as an ordered event stream.

mod board;
pub mod cascade;
pub mod gravity;
pub mod insertion;
pub mod matching;
pub mod scoring;

pub use board::{BoardState, PieceMove};

use lane_cascade_core::{
    BoardLayout, Command, Event, InsertionError, Lane, Piece, PieceId, PieceKind, Player,
};

use crate::{cascade::CascadeController, scoring::ScoreAccumulator};

const DEFAULT_BOARD_SIZE: u32 = 5;
const DEFAULT_POINTS_PER_PIECE: u32 = 10;
const DEFAULT_MAX_CASCADE_ITERATIONS: u32 = 50;

/// Tunable rules that stay fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Points awarded for each piece cleared by a match.
    pub points_per_piece: u32,
    /// Safety cap on cascade iterations per insertion.
    pub max_cascade_iterations: u32,
    /// Player holding the opening turn.
    pub initial_player: Player,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            points_per_piece: DEFAULT_POINTS_PER_PIECE,
            max_cascade_iterations: DEFAULT_MAX_CASCADE_ITERATIONS,
            initial_player: Player::One,
        }
    }
}

/// Represents the authoritative Lane Cascade world state.
#[derive(Debug)]
pub struct World {
    board: BoardState,
    rules: Rules,
    cascade: CascadeController,
    active_player: Player,
    next_piece_id: PieceId,
}

impl World {
    /// Creates a world with default rules and an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a world governed by the provided rules and an empty board.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        let board = match BoardState::new(DEFAULT_BOARD_SIZE) {
            Ok(board) => board,
            Err(_) => unreachable!("default board size satisfies the minimum"),
        };
        Self {
            board,
            cascade: CascadeController::new(
                rules.max_cascade_iterations,
                ScoreAccumulator::new(rules.points_per_piece),
            ),
            active_player: rules.initial_player,
            rules,
            next_piece_id: PieceId::new(0),
        }
    }

    fn mint_piece_id(&mut self) -> PieceId {
        let id = self.next_piece_id;
        self.next_piece_id = PieceId::new(id.get().wrapping_add(1));
        id
    }

    fn populate(&mut self, layout: &BoardLayout, out_events: &mut Vec<Event>) {
        if let Err(reason) = layout.validate() {
            out_events.push(Event::BoardRejected { reason });
            return;
        }

        let mut next = self.next_piece_id.get();
        self.board = BoardState::from_layout(layout, || {
            let id = PieceId::new(next);
            next = next.wrapping_add(1);
            id
        });
        self.next_piece_id = PieceId::new(next);

        out_events.push(Event::BoardPopulated {
            size: self.board.size(),
        });
        out_events.extend(
            self.board
                .pieces()
                .map(|(at, piece)| Event::PieceSpawned { piece, at }),
        );
    }

    /// Runs one insertion transaction, staging events until it succeeds.
    fn insert(
        &mut self,
        player: Player,
        lane: Lane,
        kind: PieceKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), InsertionError> {
        if player != self.active_player {
            return Err(InsertionError::OutOfTurn {
                expected: self.active_player,
                requested: player,
            });
        }

        let snapshot = self.board.clone();
        let piece = Piece {
            kind,
            id: self.next_piece_id,
        };
        let mut staged = Vec::new();

        match self.run_insertion(lane, piece, player, &mut staged) {
            Ok(()) => {
                let _ = self.mint_piece_id();
                out_events.append(&mut staged);
                Ok(())
            }
            Err(error) => {
                if let InsertionError::InternalConsistency(fault) = error {
                    log::error!("rolling back insertion into {lane:?}: {fault}");
                }
                self.board = snapshot;
                Err(error)
            }
        }
    }

    fn run_insertion(
        &mut self,
        lane: Lane,
        piece: Piece,
        player: Player,
        staged: &mut Vec<Event>,
    ) -> Result<(), InsertionError> {
        let outcome = insertion::insert(&mut self.board, lane, piece)?;

        if let Some((piece, from)) = outcome.ejected {
            staged.push(Event::PieceEjected { piece, from });
        }
        staged.extend(outcome.shifts.into_iter().map(|shift| Event::PieceMoved {
            piece: shift.piece,
            from: shift.from,
            to: shift.to,
        }));
        staged.push(Event::PieceInserted {
            piece,
            at: outcome.placed_at,
            direction: lane.direction(),
        });

        let _ = self.cascade.run(&mut self.board, player, staged)?;
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PopulateBoard { layout } => world.populate(&layout, out_events),
        Command::Insert {
            player,
            direction,
            lane,
            kind,
        } => {
            let target = Lane::new(direction, lane);
            if let Err(reason) = world.insert(player, target, kind, out_events) {
                log::debug!("rejected insertion from {direction:?} into lane {lane}: {reason}");
                out_events.push(Event::InsertionRejected {
                    player,
                    direction,
                    lane,
                    reason,
                });
            }
        }
        Command::SetActivePlayer { player } => {
            world.active_player = player;
            out_events.push(Event::TurnChanged { player });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use lane_cascade_core::{BoardError, BoardLayout, CellCoord, Lane, Piece, Player};

    use super::{insertion, BoardState, Rules, World};

    /// Provides read-only access to the board.
    #[must_use]
    pub fn board(world: &World) -> &BoardState {
        &world.board
    }

    /// Captures the kinds currently on the board.
    #[must_use]
    pub fn layout(world: &World) -> BoardLayout {
        world.board.layout()
    }

    /// Retrieves the piece at the provided cell, if any.
    pub fn piece_at(world: &World, cell: CellCoord) -> Result<Option<Piece>, BoardError> {
        world.board.piece(cell)
    }

    /// Reports whether an insertion into `lane` would eject a piece.
    pub fn is_lane_full(world: &World, lane: Lane) -> Result<bool, BoardError> {
        insertion::is_lane_full(&world.board, lane)
    }

    /// Player currently holding the turn.
    #[must_use]
    pub fn active_player(world: &World) -> Player {
        world.active_player
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }
}
