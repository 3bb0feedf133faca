use std::cell::RefCell;
use std::path::{Path, PathBuf};

use gtk4 as gtk;
use gtk4::prelude::*;

use super::error::SoundError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Clip {
    Flip,
    Win,
}

impl Clip {
    pub fn file_name(self) -> &'static str {
        match self {
            Clip::Flip => "flip.wav",
            Clip::Win => "win.wav",
        }
    }

    pub fn path(self, assets_dir: &Path) -> PathBuf {
        assets_dir.join("sounds").join(self.file_name())
    }
}

/// Fire-and-forget clip playback through GTK's media backend.
pub struct SoundPlayer {
    enabled: bool,
    // Streams stop when dropped, so live ones are held until they end.
    active: RefCell<Vec<gtk::MediaFile>>,
}

impl SoundPlayer {
    pub fn new(enabled: bool) -> Self {
        SoundPlayer {
            enabled,
            active: RefCell::new(Vec::new()),
        }
    }

    pub fn play(&self, path: &Path) -> Result<(), SoundError> {
        if !path.is_file() {
            return Err(SoundError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if !self.enabled {
            return Ok(());
        }

        self.active
            .borrow_mut()
            .retain(|media| !media.is_ended() && media.error().is_none());

        let media = gtk::MediaFile::for_filename(path);
        if let Some(err) = media.error() {
            return Err(SoundError::Unplayable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            });
        }

        let clip_path = path.to_path_buf();
        media.connect_error_notify(move |stream| {
            if let Some(err) = stream.error() {
                log::warn!(
                    "{}",
                    SoundError::Unplayable {
                        path: clip_path.clone(),
                        reason: err.to_string(),
                    }
                );
            }
        });
        media.play();
        self.active.borrow_mut().push(media);
        Ok(())
    }

    /// Plays `clip` from `assets_dir`, logging instead of failing.
    pub fn play_clip(&self, assets_dir: &Path, clip: Clip) {
        if let Err(err) = self.play(&clip.path(assets_dir)) {
            log::warn!("{err}");
        }
    }
}
