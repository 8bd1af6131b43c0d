//! # keepsake-core
//!
//! Core library for keepsake - animated greeting cards for the terminal.
//!
//! This library provides:
//! - State machines for screen navigation and the gift and envelope reveals
//! - An audio controller over a pluggable playback backend
//! - Decorative particle generation
//! - Pure view models the front end draws from
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Widgets
//!
//! Two cards compose the pieces above:
//! - [`GreetingPage`]: home, memories, message and gift screens with a music toggle
//! - [`LoveLetter`]: an envelope that opens into a letter and a photo album
//!
//! Both own their listeners and audio. Unmounting (or dropping) a card tears
//! everything down.
//!
//! ## Example
//!
//! ```rust,no_run
//! use keepsake_core::audio::{AudioController, NoAudio};
//! use keepsake_core::{Config, GreetingPage, InputEvent, Target};
//!
//! let config = Config::load().expect("failed to load config");
//! let audio = AudioController::new(Box::new(NoAudio), config.audio.track());
//! let mut page = GreetingPage::mount(config.page, audio, Box::new(rand::thread_rng()))
//!     .expect("failed to mount page");
//!
//! page.dispatch(InputEvent::click(Target::Background));
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use letter::LoveLetter;
pub use navigator::{Direction, Navigator};
pub use page::GreetingPage;
pub use types::*;

// Public modules
pub mod audio;
pub mod config;
pub mod error;
pub mod letter;
pub mod lifecycle;
pub mod logging;
pub mod navigator;
pub mod page;
pub mod particles;
pub mod reveal;
pub mod types;
pub mod view;
