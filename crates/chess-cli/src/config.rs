//! Configuration file loading for the terminal driver.
//!
//! Settings come from `chess.toml` in the current directory unless another
//! path is given. A missing file means all defaults.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Deepest search the driver allows.
pub const MAX_PLY: u32 = 4;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Search depth outside 1..=MAX_PLY.
    #[error("ply must be between 1 and 4, got {0}")]
    InvalidPly(u32),
}

/// Which side, if any, the engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineSide {
    White,
    Black,
    #[default]
    None,
}

impl EngineSide {
    /// Returns true if the engine moves for `color`.
    pub fn plays(self, color: chess_core::Color) -> bool {
        matches!(
            (self, color),
            (EngineSide::White, chess_core::Color::White)
                | (EngineSide::Black, chess_core::Color::Black)
        )
    }
}

/// Driver settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Search depth in half-moves. Defaults to 1.
    #[serde(default = "default_ply")]
    pub ply: u32,
    /// Side played by the engine. Defaults to neither.
    #[serde(default)]
    pub engine: EngineSide,
    /// Search top-level moves on separate threads.
    #[serde(default)]
    pub parallel: bool,
}

fn default_ply() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ply: default_ply(),
            engine: EngineSide::default(),
            parallel: false,
        }
    }
}

impl Config {
    /// Loads the configuration from `path`, or the defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::InvalidPly`] if the depth is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses and validates configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        validate_ply(config.ply)?;
        Ok(config)
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("chess.toml")
    }
}

/// Checks that a search depth is in the supported range.
pub fn validate_ply(ply: u32) -> Result<u32, ConfigError> {
    if (1..=MAX_PLY).contains(&ply) {
        Ok(ply)
    } else {
        Err(ConfigError::InvalidPly(ply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Color;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
ply = 3
engine = "black"
parallel = true
"#,
        )
        .unwrap();
        assert_eq!(config.ply, 3);
        assert_eq!(config.engine, EngineSide::Black);
        assert!(config.parallel);
    }

    #[test]
    fn test_empty_config_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.ply, 1);
        assert_eq!(config.engine, EngineSide::None);
        assert!(!config.parallel);
    }

    #[test]
    fn test_rejects_out_of_range_ply() {
        assert!(matches!(
            Config::parse("ply = 0"),
            Err(ConfigError::InvalidPly(0))
        ));
        assert!(matches!(
            Config::parse("ply = 5"),
            Err(ConfigError::InvalidPly(5))
        ));
    }

    #[test]
    fn test_rejects_unknown_engine_side() {
        assert!(matches!(
            Config::parse(r#"engine = "both""#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let config = Config::load(Path::new("definitely/not/here/chess.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config {
            ply: 2,
            engine: EngineSide::White,
            parallel: true,
        };
        let serialized = toml::to_string(&config).unwrap();
        assert_eq!(Config::parse(&serialized).unwrap(), config);
    }

    #[test]
    fn test_engine_side_plays() {
        assert!(EngineSide::White.plays(Color::White));
        assert!(!EngineSide::White.plays(Color::Black));
        assert!(!EngineSide::None.plays(Color::Black));
    }
}
