//! Error types for keepsake-core

use thiserror::Error;

/// Main error type for the keepsake-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Logging could not be set up
    #[error("logging error: {0}")]
    Logging(String),

    /// A navigator was asked to cycle over nothing
    #[error("screen sequence is empty")]
    EmptySequence,

    /// An album needs at least `min` photos to ever complete
    #[error("album needs at least {min} photo(s), found {found}")]
    NotEnoughPhotos { min: usize, found: usize },

    /// Audio output could not be opened
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),
}

/// Result type alias for keepsake-core
pub type Result<T> = std::result::Result<T, Error>;
