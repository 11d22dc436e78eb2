#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Composition root for a single Lane Cascade game.
//!
//! A [`Session`] owns the world together with every system that reacts to it.
//! Each request is applied to the world, the resulting events are pumped
//! through the systems until they stop issuing commands, and the full event
//! stream is then delivered to subscribers in the order they subscribed.

use lane_cascade_core::{
    BoardLayout, Command, Direction, Event, InsertionError, LayoutError, PieceKind, Player,
};
use lane_cascade_system_scoreboard::Scoreboard;
use lane_cascade_system_supply::{self as supply, PieceSupply};
use lane_cascade_system_turns::{self as turns, TurnOrchestrator};
use lane_cascade_world::{self as world, query, BoardState, Rules, World};

const DEFAULT_BOARD_SIZE: u32 = 5;
const DEFAULT_KINDS: u8 = 4;

/// Receives every event a session produces.
pub trait EventSink {
    /// Called once per event, in emission order.
    fn on_event(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn on_event(&mut self, event: &Event) {
        self(event);
    }
}

/// Everything needed to start a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Edge length of the square board.
    pub board_size: u32,
    /// Number of distinct piece kinds in play.
    pub kinds: u8,
    /// Seed for the opening board and the pending piece sequence.
    pub seed: u64,
    /// Scoring, cascade cap and opening player.
    pub rules: Rules,
    /// Hands the turn to the opponent whenever the board settles.
    pub rotate_on_stable: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            kinds: DEFAULT_KINDS,
            seed: 0,
            rules: Rules::default(),
            rotate_on_stable: true,
        }
    }
}

/// One game between two players on one board.
pub struct Session {
    world: World,
    turns: TurnOrchestrator,
    scoreboard: Scoreboard,
    supply: PieceSupply,
    sinks: Vec<Box<dyn EventSink>>,
    opening: Vec<Event>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("world", &self.world)
            .field("turns", &self.turns)
            .field("scoreboard", &self.scoreboard)
            .field("supply", &self.supply)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Session {
    /// Creates a session and fills the board from the seeded supply.
    pub fn new(config: SessionConfig) -> Result<Self, LayoutError> {
        let mut supply = PieceSupply::new(supply::Config::new(config.seed, config.kinds));
        let layout = supply.initial_layout(config.board_size)?;
        Self::with_layout(config, supply, layout)
    }

    /// Creates a session on a caller-provided opening board.
    pub fn from_layout(config: SessionConfig, layout: BoardLayout) -> Result<Self, LayoutError> {
        let supply = PieceSupply::new(supply::Config::new(config.seed, config.kinds));
        Self::with_layout(config, supply, layout)
    }

    fn with_layout(
        config: SessionConfig,
        supply: PieceSupply,
        layout: BoardLayout,
    ) -> Result<Self, LayoutError> {
        layout.validate()?;
        let size = layout.size();

        let mut world = World::with_rules(config.rules);
        let mut opening = Vec::new();
        world::apply(&mut world, Command::PopulateBoard { layout }, &mut opening);
        log::info!(
            "session started on a {size}x{size} board with seed {}",
            config.seed
        );

        Ok(Self {
            world,
            turns: TurnOrchestrator::new(turns::Config::new(
                config.rules.initial_player,
                config.rotate_on_stable,
            )),
            scoreboard: Scoreboard::new(),
            supply,
            sinks: Vec::new(),
            opening,
        })
    }

    /// Registers a sink. Sinks are notified in subscription order.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Events produced while populating the opening board.
    #[must_use]
    pub fn opening_events(&self) -> &[Event] {
        &self.opening
    }

    /// Inserts the pending piece for the current player.
    ///
    /// On success returns the complete event stream of the transaction,
    /// including any turn change it triggered. A rejected request is still
    /// announced to subscribers before its reason is returned.
    pub fn request_insert(
        &mut self,
        direction: Direction,
        lane: u32,
    ) -> Result<Vec<Event>, InsertionError> {
        let player = query::active_player(&self.world);
        let kind = self.supply.pending();
        let events = self.execute(Command::Insert {
            player,
            direction,
            lane,
            kind,
        });

        let rejection = events.iter().find_map(|event| match event {
            Event::InsertionRejected { reason, .. } => Some(*reason),
            _ => None,
        });
        self.dispatch(&events);

        match rejection {
            Some(reason) => {
                log::info!("{player:?} could not insert from {direction:?} into lane {lane}: {reason}");
                Err(reason)
            }
            None => Ok(events),
        }
    }

    /// Player whose move it is.
    #[must_use]
    pub fn active_player(&self) -> Player {
        query::active_player(&self.world)
    }

    /// Kind the next insertion will use.
    #[must_use]
    pub fn pending(&self) -> PieceKind {
        self.supply.pending()
    }

    /// Running score totals.
    #[must_use]
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Read-only view of the board.
    #[must_use]
    pub fn board(&self) -> &BoardState {
        query::board(&self.world)
    }

    /// Read-only view of the world for richer queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut log = Vec::new();
        world::apply(&mut self.world, command, &mut log);

        let mut pending = log.clone();
        while !pending.is_empty() {
            self.scoreboard.handle(&pending);
            self.supply.handle(&pending);

            let mut commands = Vec::new();
            self.turns.handle(&pending, &mut commands);
            if commands.is_empty() {
                break;
            }

            pending.clear();
            for command in commands {
                let mut generated = Vec::new();
                world::apply(&mut self.world, command, &mut generated);
                log.extend(generated.iter().cloned());
                pending.extend(generated);
            }
        }
        log
    }

    fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }
    }
}
