use std::path::PathBuf;

use thiserror::Error;

/// A sound clip could not be played. Never fatal: callers log it and move on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SoundError {
    #[error("Sound file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("Could not play sound {}: {reason}", path.display())]
    Unplayable { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Could not read settings from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
