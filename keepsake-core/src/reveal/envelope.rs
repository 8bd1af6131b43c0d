use crate::error::{Error, Result};

/// Smallest album that can complete. With a single photo the first album
/// click already wraps back to it and completes.
pub const MIN_PHOTOS: usize = 1;

/// Envelope flow position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    #[default]
    Closed,
    LetterShown,
    /// Browsing the album, showing the photo at this index
    Album(usize),
    /// Every photo has been seen
    Complete,
}

/// What a call to [`Envelope::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStep {
    /// Envelope opened, letter visible. The caller starts the music.
    Opened,
    AlbumStarted,
    Photo(usize),
    /// The album wrapped around; fires exactly once.
    Completed,
    /// Already complete
    Ignored,
}

/// `Closed -> LetterShown -> Album(0..P) -> Complete`, one click at a time.
#[derive(Debug, Clone)]
pub struct Envelope {
    state: EnvelopeState,
    photo_count: usize,
}

impl Envelope {
    pub fn new(photo_count: usize) -> Result<Self> {
        if photo_count < MIN_PHOTOS {
            return Err(Error::NotEnoughPhotos {
                min: MIN_PHOTOS,
                found: photo_count,
            });
        }
        Ok(Self {
            state: EnvelopeState::Closed,
            photo_count,
        })
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn photo_count(&self) -> usize {
        self.photo_count
    }

    pub fn is_complete(&self) -> bool {
        self.state == EnvelopeState::Complete
    }

    /// Photo to display, if the album is on screen.
    pub fn current_photo(&self) -> Option<usize> {
        match self.state {
            EnvelopeState::Album(index) => Some(index),
            EnvelopeState::Complete => Some(0),
            EnvelopeState::Closed | EnvelopeState::LetterShown => None,
        }
    }

    pub fn advance(&mut self) -> EnvelopeStep {
        let (next, step) = match self.state {
            EnvelopeState::Closed => (EnvelopeState::LetterShown, EnvelopeStep::Opened),
            EnvelopeState::LetterShown => (EnvelopeState::Album(0), EnvelopeStep::AlbumStarted),
            EnvelopeState::Album(index) => {
                // Returning to the first photo means the whole album was seen.
                let next_index = (index + 1) % self.photo_count;
                if next_index == 0 {
                    (EnvelopeState::Complete, EnvelopeStep::Completed)
                } else {
                    (
                        EnvelopeState::Album(next_index),
                        EnvelopeStep::Photo(next_index),
                    )
                }
            }
            EnvelopeState::Complete => return EnvelopeStep::Ignored,
        };
        self.state = next;
        step
    }
}
