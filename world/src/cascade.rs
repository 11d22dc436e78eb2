//! Gravity and match resolution to a fixed point.

use std::collections::BTreeSet;

use lane_cascade_core::{CellCoord, ConsistencyFault, Event, InsertionError, Player};

use crate::{
    gravity, matching,
    scoring::{RemovedPiece, ScoreAccumulator},
    BoardState,
};

/// Phases a cascade moves through after an insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CascadePhase {
    /// Pieces fall toward row zero.
    Settling,
    /// The board is scanned for runs.
    Matching,
    /// Matched pieces are cleared and scored.
    Removing,
    /// Neither gravity nor matching changed the board, or the cap was hit.
    Stable,
}

/// Summary of a completed cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Iterations executed, including the final inert one.
    pub iterations: u32,
    /// Indicates whether the iteration cap forced stability.
    pub capped: bool,
    /// Pieces removed across every iteration.
    pub removed: u32,
    /// Points awarded across every iteration.
    pub points: u32,
}

/// Drives the settle, match, remove loop until the board stops changing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadeController {
    max_iterations: u32,
    scoring: ScoreAccumulator,
}

impl CascadeController {
    /// Creates a controller bounded by `max_iterations` (at least one).
    #[must_use]
    pub fn new(max_iterations: u32, scoring: ScoreAccumulator) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            scoring,
        }
    }

    /// Upper bound on iterations per cascade.
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Runs the cascade, crediting `player` with any removals.
    ///
    /// Emits per-piece movement and removal events as they happen, one
    /// `CascadeStepCompleted` per changing iteration and exactly one
    /// `BoardStable` at the end. A consistency fault aborts the run and leaves
    /// rollback to the caller.
    pub fn run(
        &self,
        board: &mut BoardState,
        player: Player,
        out_events: &mut Vec<Event>,
    ) -> Result<CascadeReport, InsertionError> {
        let mut report = CascadeReport::default();
        let mut phase = CascadePhase::Settling;
        let mut fell = false;
        let mut removed = 0;
        let mut matches = BTreeSet::new();

        while phase != CascadePhase::Stable {
            phase = match phase {
                CascadePhase::Settling => {
                    report.iterations += 1;
                    removed = 0;
                    let falls = gravity::resolve(board)?;
                    fell = !falls.is_empty();
                    out_events.extend(falls.into_iter().map(|fall| Event::PieceMoved {
                        piece: fall.piece,
                        from: fall.from,
                        to: fall.to,
                    }));
                    CascadePhase::Matching
                }
                CascadePhase::Matching => {
                    matches = matching::find_matches(board)?;
                    if matches.is_empty() {
                        self.conclude_iteration(&mut report, fell, removed, out_events)
                    } else {
                        CascadePhase::Removing
                    }
                }
                CascadePhase::Removing => {
                    let batch = std::mem::take(&mut matches);
                    let (count, points) = self.remove(board, &batch, player, out_events)?;
                    removed = count;
                    report.removed += count;
                    report.points = report.points.saturating_add(points);
                    self.conclude_iteration(&mut report, fell, removed, out_events)
                }
                CascadePhase::Stable => CascadePhase::Stable,
            };
        }

        if report.capped {
            log::warn!(
                "cascade hit its cap of {} iterations before settling",
                self.max_iterations
            );
            out_events.push(Event::CascadeCapReached {
                iterations: report.iterations,
            });
        } else {
            log::debug!("board stable after {} iterations", report.iterations);
        }
        out_events.push(Event::BoardStable {
            iterations: report.iterations,
        });

        Ok(report)
    }

    fn conclude_iteration(
        &self,
        report: &mut CascadeReport,
        fell: bool,
        removed: u32,
        out_events: &mut Vec<Event>,
    ) -> CascadePhase {
        if !fell && removed == 0 {
            return CascadePhase::Stable;
        }

        log::debug!(
            "cascade iteration {}: fell={fell}, removed={removed}",
            report.iterations
        );
        out_events.push(Event::CascadeStepCompleted {
            iteration: report.iterations,
            fell,
            removed,
        });

        if report.iterations >= self.max_iterations {
            report.capped = true;
            return CascadePhase::Stable;
        }
        CascadePhase::Settling
    }

    fn remove(
        &self,
        board: &mut BoardState,
        matches: &BTreeSet<CellCoord>,
        player: Player,
        out_events: &mut Vec<Event>,
    ) -> Result<(u32, u32), InsertionError> {
        let mut batch = Vec::with_capacity(matches.len());
        for &at in matches {
            let piece = board
                .set(at, None)?
                .ok_or(InsertionError::InternalConsistency(
                    ConsistencyFault::RemovedEmptyCell { at },
                ))?;
            out_events.push(Event::PieceRemoved { piece, at });
            batch.push(RemovedPiece { at, piece });
        }

        let Some(gain) = self.scoring.record_removal(&batch) else {
            return Ok((0, 0));
        };
        out_events.push(Event::ScoreGained {
            player,
            amount: gain.amount,
            centroid: gain.centroid,
        });

        let count = u32::try_from(batch.len()).unwrap_or(u32::MAX);
        Ok((count, gain.amount))
    }
}
