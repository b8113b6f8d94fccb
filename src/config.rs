//! Engine configuration using TOML
//!
//! Stored in ~/.config/tetrs-engine/engine.toml (or platform equivalent).
//! Every section is optional; missing keys fall back to the defaults.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::difficulty::DifficultyConfig;
use crate::error::EngineError;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub board: BoardConfig,
    pub difficulty: DifficultyConfig,
    pub game: GameConfig,
}

/// Board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed RNG seed for reproducible piece sequences
    pub seed: Option<u64>,
    /// Level a fresh game starts at
    pub starting_level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            starting_level: 1,
        }
    }
}

impl EngineConfig {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetrs", "tetrs-engine")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("engine.toml"))
    }

    /// Load from the default path, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("using default engine config: {:#}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("in {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse engine config")?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize engine config")?;
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.difficulty.validate()?;
        if self.game.starting_level == 0 || self.game.starting_level > self.difficulty.max_level {
            return Err(EngineError::InvalidConfig(format!(
                "starting_level must be in 1..={}",
                self.difficulty.max_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::SpeedCurve;

    #[test]
    fn test_empty_toml_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = EngineConfig::from_toml_str(
            r#"
            [board]
            width = 12

            [difficulty]
            lines_per_level = 5

            [difficulty.curve]
            kind = "linear"
            step_ms = 40

            [game]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.board.width, 12);
        assert_eq!(config.board.height, BOARD_HEIGHT);
        assert_eq!(config.difficulty.lines_per_level, 5);
        assert_eq!(config.difficulty.max_level, 30);
        assert_eq!(config.difficulty.curve, SpeedCurve::Linear { step_ms: 40 });
        assert_eq!(config.game.seed, Some(42));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(EngineConfig::from_toml_str("[game]\nstarting_level = 31").is_err());
        assert!(EngineConfig::from_toml_str("[difficulty]\nmin_interval_ms = 5000").is_err());
        assert!(EngineConfig::from_toml_str("board = 3").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("tetrs-engine-test-{}", std::process::id()));
        let path = dir.join("engine.toml");
        let config = EngineConfig {
            game: GameConfig {
                seed: Some(7),
                starting_level: 3,
            },
            ..EngineConfig::default()
        };
        config.save_to(&path).unwrap();
        let loaded = EngineConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_dir_all(&dir);
    }
}
