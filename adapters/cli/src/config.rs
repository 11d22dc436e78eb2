use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use lane_cascade_core::MIN_BOARD_SIZE;
use lane_cascade_session::SessionConfig;
use lane_cascade_world::Rules;
use serde::Deserialize;

/// Game configuration loadable from TOML.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Seed for the opening board and the pending piece sequence.
    pub(crate) seed: u64,
    pub(crate) board: BoardSection,
    pub(crate) rules: RulesSection,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct BoardSection {
    pub(crate) size: u32,
    pub(crate) kinds: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RulesSection {
    pub(crate) points_per_piece: u32,
    pub(crate) max_cascade_iterations: u32,
    pub(crate) rotate_on_stable: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            seed: session.seed,
            board: BoardSection {
                size: session.board_size,
                kinds: session.kinds,
            },
            rules: RulesSection {
                points_per_piece: session.rules.points_per_piece,
                max_cascade_iterations: session.rules.max_cascade_iterations,
                rotate_on_stable: session.rotate_on_stable,
            },
        }
    }
}

impl Default for BoardSection {
    fn default() -> Self {
        GameConfig::default().board
    }
}

impl Default for RulesSection {
    fn default() -> Self {
        GameConfig::default().rules
    }
}

impl GameConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        Ok(config)
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the game cannot run with.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.board.size < MIN_BOARD_SIZE {
            bail!(
                "board.size must be at least {MIN_BOARD_SIZE}, got {}",
                self.board.size
            );
        }
        if self.board.kinds < 2 {
            bail!("board.kinds must be at least 2, got {}", self.board.kinds);
        }
        if self.rules.max_cascade_iterations == 0 {
            bail!("rules.max_cascade_iterations must be > 0");
        }
        Ok(())
    }

    pub(crate) fn session_config(&self) -> SessionConfig {
        SessionConfig {
            board_size: self.board.size,
            kinds: self.board.kinds,
            seed: self.seed,
            rules: Rules {
                points_per_piece: self.rules.points_per_piece,
                max_cascade_iterations: self.rules.max_cascade_iterations,
                ..Rules::default()
            },
            rotate_on_stable: self.rules.rotate_on_stable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config = GameConfig::parse(
            r#"
            seed = 17

            [board]
            size = 6
        "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, 17);
        assert_eq!(config.board.size, 6);
        assert_eq!(config.board.kinds, GameConfig::default().board.kinds);
        assert_eq!(config.rules, GameConfig::default().rules);
    }

    #[test]
    fn rules_section_reaches_session_config() {
        let config = GameConfig::parse(
            r#"
            [rules]
            points_per_piece = 5
            max_cascade_iterations = 12
            rotate_on_stable = false
        "#,
        )
        .expect("valid config");

        let session = config.session_config();
        assert_eq!(session.rules.points_per_piece, 5);
        assert_eq!(session.rules.max_cascade_iterations, 12);
        assert!(!session.rotate_on_stable);
    }

    #[test]
    fn undersized_board_is_rejected() {
        let error = GameConfig::parse("[board]\nsize = 2\n").expect_err("too small");
        assert!(error.to_string().contains("board.size"));
    }

    #[test]
    fn single_kind_is_rejected() {
        assert!(GameConfig::parse("[board]\nkinds = 1\n").is_err());
    }

    #[test]
    fn zero_cascade_cap_is_rejected() {
        assert!(GameConfig::parse("[rules]\nmax_cascade_iterations = 0\n").is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GameConfig::parse("[board]\nwidth = 5\n").is_err());
    }
}
