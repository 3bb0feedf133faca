use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// First whitespace-separated token as a non-negative integer.
pub fn parse_high_score(raw: &str) -> Option<u32> {
    raw.split_whitespace().next()?.parse().ok()
}

/// A stored score of 0 means no game has been won yet.
pub fn beats_high_score(previous: u32, attempts: u32) -> bool {
    previous == 0 || attempts < previous
}

/// Fewest attempts ever used to win, kept in a one-line text file.
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: PathBuf) -> Self {
        HighScoreStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_high_score(&raw).unwrap_or_else(|| {
                log::warn!(
                    "Ignoring malformed high score in {}",
                    self.path.display()
                );
                0
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => 0,
            Err(err) => {
                log::warn!("Could not read high score: {err}");
                0
            }
        }
    }

    pub fn write(&self, score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, score.to_string())
    }

    /// Stores `attempts` if it beats the current record. Returns whether a new
    /// record was saved.
    pub fn record_win(&self, attempts: u32) -> bool {
        let previous = self.read();
        if !beats_high_score(previous, attempts) {
            return false;
        }
        match self.write(attempts) {
            Ok(()) => {
                log::info!("New high score: {attempts} attempts (was {previous})");
                true
            }
            Err(err) => {
                log::warn!("Could not save high score: {err}");
                false
            }
        }
    }
}
