use std::path::PathBuf;

/// Errors that can end a game before it reaches a terminal outcome.
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    /// The player asked to leave. Not a failure: callers exit cleanly.
    #[error("player quit")]
    Quit,

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
