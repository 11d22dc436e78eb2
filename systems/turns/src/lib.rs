#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn rotation system that hands the move to the opponent once the board settles.

use lane_cascade_core::{Command, Event, Player};

/// Configuration parameters required to construct the turn orchestrator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    initial_player: Player,
    rotate_on_stable: bool,
}

impl Config {
    /// Creates a configuration with the opening player and the rotation switch.
    #[must_use]
    pub const fn new(initial_player: Player, rotate_on_stable: bool) -> Self {
        Self {
            initial_player,
            rotate_on_stable,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Player::One, true)
    }
}

/// Pure system alternating turns between the two players.
///
/// The turn only ever changes in response to `BoardStable`, never on the
/// insertion itself and never while a cascade is still resolving.
#[derive(Debug)]
pub struct TurnOrchestrator {
    current: Player,
    rotate_on_stable: bool,
}

impl TurnOrchestrator {
    /// Creates a new orchestrator from the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            current: config.initial_player,
            rotate_on_stable: config.rotate_on_stable,
        }
    }

    /// Player the orchestrator believes holds the turn.
    #[must_use]
    pub const fn current(&self) -> Player {
        self.current
    }

    /// Consumes world events and emits at most one turn change per settled board.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TurnChanged { player } => self.current = *player,
                Event::BoardStable { .. } if self.rotate_on_stable => {
                    let next = self.current.opponent();
                    self.current = next;
                    out.push(Command::SetActivePlayer { player: next });
                }
                _ => {}
            }
        }
    }
}

impl Default for TurnOrchestrator {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_board_hands_turn_to_opponent() {
        let mut turns = TurnOrchestrator::default();
        let mut commands = Vec::new();

        turns.handle(&[Event::BoardStable { iterations: 1 }], &mut commands);

        assert_eq!(
            commands,
            vec![Command::SetActivePlayer {
                player: Player::Two,
            }]
        );
        assert_eq!(turns.current(), Player::Two);
    }

    #[test]
    fn disabled_rotation_keeps_the_turn() {
        let mut turns = TurnOrchestrator::new(Config::new(Player::Two, false));
        let mut commands = Vec::new();

        turns.handle(&[Event::BoardStable { iterations: 2 }], &mut commands);

        assert!(commands.is_empty());
        assert_eq!(turns.current(), Player::Two);
    }

    #[test]
    fn external_turn_change_is_tracked() {
        let mut turns = TurnOrchestrator::default();
        let mut commands = Vec::new();

        turns.handle(
            &[
                Event::TurnChanged {
                    player: Player::Two,
                },
                Event::BoardStable { iterations: 1 },
            ],
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![Command::SetActivePlayer {
                player: Player::One,
            }]
        );
    }
}
