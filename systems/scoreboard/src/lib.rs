#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Running score totals for both players.

use lane_cascade_core::{Event, Player};

/// Pure system that accumulates `ScoreGained` amounts per player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scoreboard {
    player_one: u64,
    player_two: u64,
}

impl Scoreboard {
    /// Creates a scoreboard with both totals at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            player_one: 0,
            player_two: 0,
        }
    }

    /// Total accumulated by `player`.
    #[must_use]
    pub const fn total(&self, player: Player) -> u64 {
        match player {
            Player::One => self.player_one,
            Player::Two => self.player_two,
        }
    }

    /// Player with the higher total, or `None` on a tie.
    #[must_use]
    pub fn leader(&self) -> Option<Player> {
        match self.player_one.cmp(&self.player_two) {
            std::cmp::Ordering::Greater => Some(Player::One),
            std::cmp::Ordering::Less => Some(Player::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Consumes world events, crediting every score gain to its player.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if let Event::ScoreGained { player, amount, .. } = event {
                let total = match player {
                    Player::One => &mut self.player_one,
                    Player::Two => &mut self.player_two,
                };
                *total = total.saturating_add(u64::from(*amount));
            }
        }
    }
}
