//! Background music for a card.
//!
//! [`AudioController`] owns at most one looping track per widget. The track
//! is opened lazily through an [`AudioBackend`]; starting playback is a
//! deferred request whose outcome ([`PlayOutcome`]) is collected by
//! [`AudioController::poll`]. A rejected start is logged and remembered but
//! never handed back to the caller as an error, so the user can simply try
//! the music toggle again.

mod scripted;

pub use scripted::ScriptedBackend;

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Result of a playback request, reported by the backend once known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// The host refused to start playback (no device, decode failure, policy).
    Rejected(String),
}

/// What to play.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub source: PathBuf,
    pub looping: bool,
    /// Linear gain in `[0.0, 1.0]`
    pub volume: f32,
}

/// A single opened audio resource.
pub trait AudioHandle {
    /// Ask the backend to start playback. Must not block.
    fn request_play(&mut self);

    /// Outcome of the last [`AudioHandle::request_play`], once available.
    fn poll_play(&mut self) -> Option<PlayOutcome>;

    fn pause(&mut self);

    /// True once enough of the track is decoded to play through.
    fn is_loaded(&self) -> bool;
}

/// Opens tracks into [`AudioHandle`]s.
pub trait AudioBackend {
    fn open(&self, track: &Track) -> Result<Box<dyn AudioHandle>>;
}

/// Backend for runs without an audio device.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAudio;

impl AudioBackend for NoAudio {
    fn open(&self, _track: &Track) -> Result<Box<dyn AudioHandle>> {
        Err(Error::AudioUnavailable("audio output disabled".to_string()))
    }
}

/// Play/pause state around one lazily created audio handle.
pub struct AudioController {
    backend: Box<dyn AudioBackend>,
    track: Option<Track>,
    handle: Option<Box<dyn AudioHandle>>,
    initialized: bool,
    is_playing: bool,
    is_loaded: bool,
    /// A play request is in flight
    pending_play: bool,
    /// Pause arrived while the play request was in flight
    pause_requested: bool,
    last_rejection: Option<String>,
}

impl AudioController {
    pub fn new(backend: Box<dyn AudioBackend>, track: Option<Track>) -> Self {
        Self {
            backend,
            track,
            handle: None,
            initialized: false,
            is_playing: false,
            is_loaded: false,
            pending_play: false,
            pause_requested: false,
            last_rejection: None,
        }
    }

    /// Open the track. Only the first call does anything, whether or not
    /// the backend managed to open it.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let Some(track) = &self.track else {
            tracing::debug!("No track configured, music disabled");
            return;
        };

        match self.backend.open(track) {
            Ok(handle) => {
                tracing::info!(source = %track.source.display(), "Audio track opened");
                self.handle = Some(handle);
            }
            Err(e) => {
                tracing::warn!(error = %e, source = %track.source.display(), "Could not open audio track");
            }
        }
    }

    /// Request playback. No-op without a handle or while already playing.
    pub fn play(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        self.pause_requested = false;
        if self.is_playing || self.pending_play {
            return;
        }

        self.pending_play = true;
        handle.request_play();
        self.poll();
    }

    /// Stop playback. No-op without a handle.
    pub fn pause(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if self.pending_play {
            self.pause_requested = true;
        }
        handle.pause();
        self.is_playing = false;
    }

    pub fn toggle(&mut self) {
        if self.is_playing || self.pending_play {
            self.pause();
        } else {
            self.play();
        }
    }

    /// One-shot autoplay attempt for the first user interaction.
    ///
    /// Returns true if a play request was issued.
    pub fn attempt_autoplay(&mut self) -> bool {
        self.poll();
        if self.is_playing || self.pending_play || !self.is_loaded {
            tracing::debug!(
                playing = self.is_playing,
                loaded = self.is_loaded,
                "Skipping autoplay"
            );
            return false;
        }
        self.play();
        true
    }

    /// Collect deferred backend signals: load completion and play outcomes.
    pub fn poll(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        if !self.is_loaded && handle.is_loaded() {
            self.is_loaded = true;
            tracing::debug!("Audio track ready to play through");
        }

        if !self.pending_play {
            return;
        }
        let Some(outcome) = handle.poll_play() else {
            return;
        };
        self.pending_play = false;

        match outcome {
            PlayOutcome::Started if self.pause_requested => {
                handle.pause();
                self.pause_requested = false;
                self.is_playing = false;
            }
            PlayOutcome::Started => {
                self.is_playing = true;
                self.last_rejection = None;
            }
            PlayOutcome::Rejected(reason) => {
                tracing::warn!(reason = %reason, "Audio playback prevented");
                self.is_playing = false;
                self.pause_requested = false;
                self.last_rejection = Some(reason);
            }
        }
    }

    /// Pause and drop the handle. The controller stays usable as a no-op.
    pub fn release(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.pause();
            tracing::debug!("Audio handle released");
        }
        self.is_playing = false;
        self.pending_play = false;
        self.pause_requested = false;
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_pending(&self) -> bool {
        self.pending_play
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn last_rejection(&self) -> Option<&str> {
        self.last_rejection.as_deref()
    }
}

impl Drop for AudioController {
    fn drop(&mut self) {
        self.release();
    }
}
