//! Forward-only reveal sequences: the gift box and the envelope/letter/album.

mod envelope;
mod gift;

pub use envelope::{Envelope, EnvelopeState, EnvelopeStep, MIN_PHOTOS};
pub use gift::{GiftReveal, GiftState};
