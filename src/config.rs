use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::expectimax::ExpectimaxConfig;

/// Who supplies the moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    /// Keyboard input.
    Human,
    /// Expectimax search.
    Ai,
    /// Uniformly random moves.
    Random,
}

/// Settings for a single session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    pub mode: PlayMode,
    /// Seed for tile spawns and AI sampling; fresh entropy when absent.
    pub seed: Option<u64>,
    /// Pause after each computer move so the game stays watchable.
    pub delay_ms: u64,
    /// Clear the screen before every redraw.
    pub clear_screen: bool,
    /// Stop after this many turns even if the game is still going.
    pub max_turns: Option<u64>,
}

impl Default for PlayConfig {
    fn default() -> Self {
        PlayConfig { mode: PlayMode::Human, seed: None, delay_ms: 30, clear_screen: true, max_turns: None }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub play: PlayConfig,
    pub search: ExpectimaxConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == 0 {
            return Err(ConfigError::Validation("search.depth must be >= 1".into()));
        }
        if self.search.samples == 0 {
            return Err(ConfigError::Validation("search.samples must be >= 1".into()));
        }
        if self.search.par_min_depth == 0 {
            return Err(ConfigError::Validation("search.par_min_depth must be >= 1".into()));
        }
        if self.play.max_turns == Some(0) {
            return Err(ConfigError::Validation("play.max_turns must be > 0 when set".into()));
        }
        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        AppConfig::default().validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[search]
depth = 2
parallel = true
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.search.depth, 2);
        assert!(config.search.parallel);
        assert_eq!(config.search.samples, 4);
        assert_eq!(config.play.mode, PlayMode::Human);
        assert_eq!(config.play.delay_ms, 30);
    }

    #[test]
    fn test_mode_parses_lowercase() {
        let config: AppConfig = toml::from_str("[play]\nmode = \"ai\"\nseed = 9\n").unwrap();
        assert_eq!(config.play.mode, PlayMode::Ai);
        assert_eq!(config.play.seed, Some(9));
        assert!(toml::from_str::<AppConfig>("[play]\nmode = \"robot\"\n").is_err());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = AppConfig::default();
        config.search.depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_samples() {
        let mut config = AppConfig::default();
        config.search.samples = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_max_turns() {
        let mut config = AppConfig::default();
        config.play.max_turns = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_2048.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[play]
mode = "random"
max_turns = 500

[search]
samples = 8
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.play.mode, PlayMode::Random);
        assert_eq!(config.play.max_turns, Some(500));
        assert_eq!(config.search.samples, 8);
        assert_eq!(config.search.depth, 3);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[search]\ndepth = 0\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
