//! Pure mapping from widget state to what is on screen.
//!
//! Nothing here owns state. The terminal front end draws whatever these
//! functions return, so the mapping is tested without a terminal.

use std::time::Duration;

use crate::config::{LetterConfig, PageConfig};
use crate::letter::LoveLetter;
use crate::page::GreetingPage;
use crate::reveal::{EnvelopeState, GiftState};
use crate::types::{Photo, Screen};

/// How long the outgoing view lingers before the new one starts entering.
pub const EXIT_DURATION: Duration = Duration::from_millis(250);
/// How long the incoming view takes to settle.
pub const ENTER_DURATION: Duration = Duration::from_millis(250);

/// Where a view change is in its exit/enter animation pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase<T> {
    /// The previous view is animating out; `progress` in `[0, 1)`
    Exiting { from: T, progress: f64 },
    /// The current view is animating in; `progress` in `[0, 1)`
    Entering { progress: f64 },
    Settled,
}

/// Records the last view change so the renderer can animate it.
///
/// The state change itself is immediate; this only affects drawing.
#[derive(Debug, Clone)]
pub struct Transition<T> {
    previous: Option<T>,
    changed_at: Duration,
}

impl<T: Copy> Transition<T> {
    pub fn new() -> Self {
        Self {
            previous: None,
            changed_at: Duration::ZERO,
        }
    }

    pub fn start(&mut self, from: T, now: Duration) {
        self.previous = Some(from);
        self.changed_at = now;
    }

    pub fn phase(&self, now: Duration) -> TransitionPhase<T> {
        let Some(from) = self.previous else {
            return TransitionPhase::Settled;
        };
        let age = now.saturating_sub(self.changed_at);
        if age < EXIT_DURATION {
            return TransitionPhase::Exiting {
                from,
                progress: age.as_secs_f64() / EXIT_DURATION.as_secs_f64(),
            };
        }
        let entering = age - EXIT_DURATION;
        if entering < ENTER_DURATION {
            return TransitionPhase::Entering {
                progress: entering.as_secs_f64() / ENTER_DURATION.as_secs_f64(),
            };
        }
        TransitionPhase::Settled
    }
}

impl<T: Copy> Default for Transition<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Content block of one greeting page screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenContent<'a> {
    Home {
        title: &'a str,
        subtitle: &'a str,
    },
    Memories {
        title: &'a str,
        photos: &'a [Photo],
    },
    Message {
        title: &'a str,
        body: &'a str,
    },
    Gift {
        title: &'a str,
        prompt: &'a str,
        button: &'a str,
    },
}

/// The gift modal, when shown.
#[derive(Debug, Clone, PartialEq)]
pub enum GiftModal<'a> {
    Wrapped {
        hint: &'a str,
    },
    Revealed {
        title: &'a str,
        text: &'a str,
        photo: &'a Photo,
        close: &'a str,
    },
}

/// Everything the front end needs to draw the greeting page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    /// Screen being drawn; the outgoing one while it exits
    pub screen: Screen,
    pub content: ScreenContent<'a>,
    pub phase: TransitionPhase<Screen>,
    pub modal: Option<GiftModal<'a>>,
    pub music_playing: bool,
    /// Zero-based position of the current screen
    pub position: usize,
    pub screen_count: usize,
}

/// Content for a screen label.
pub fn screen_content(screen: Screen, config: &PageConfig) -> ScreenContent<'_> {
    match screen {
        Screen::Home => ScreenContent::Home {
            title: &config.title,
            subtitle: &config.subtitle,
        },
        Screen::Memories => ScreenContent::Memories {
            title: &config.memories_title,
            photos: &config.memories,
        },
        Screen::Message => ScreenContent::Message {
            title: &config.message_title,
            body: &config.message,
        },
        Screen::Gift => ScreenContent::Gift {
            title: &config.gift_title,
            prompt: &config.gift_prompt,
            button: &config.gift_button,
        },
    }
}

/// Modal content for a gift state.
pub fn gift_modal(state: GiftState, config: &PageConfig) -> Option<GiftModal<'_>> {
    match state {
        GiftState::Idle => None,
        GiftState::Shown { opened: false } => Some(GiftModal::Wrapped {
            hint: &config.gift_unwrap_hint,
        }),
        GiftState::Shown { opened: true } => Some(GiftModal::Revealed {
            title: &config.gift_reveal_title,
            text: &config.gift_reveal_text,
            photo: &config.gift_photo,
            close: &config.close_button,
        }),
    }
}

pub fn page_view(page: &GreetingPage) -> PageView<'_> {
    let phase = page.transition_phase();
    // Exactly one screen at a time: the outgoing one until it has exited.
    let screen = match phase {
        TransitionPhase::Exiting { from, .. } => from,
        _ => page.current_screen(),
    };
    PageView {
        screen,
        content: screen_content(screen, page.config()),
        phase,
        modal: gift_modal(page.gift().state(), page.config()),
        music_playing: page.audio().is_playing(),
        position: page.navigator().current(),
        screen_count: page.navigator().screen_count(),
    }
}

/// Content of the envelope card.
#[derive(Debug, Clone, PartialEq)]
pub enum LetterContent<'a> {
    Envelope {
        hint: &'a str,
    },
    Letter {
        heading: &'a str,
        photo: &'a Photo,
        body: &'a str,
        hint: &'a str,
    },
    Album {
        title: &'a str,
        /// `None` only for an empty album, which a mounted letter never has
        photo: Option<&'a Photo>,
        index: usize,
        total: usize,
        hint: &'a str,
        /// Completion banner, once every photo has been seen
        banner: Option<&'a str>,
    },
}

/// Everything the front end needs to draw the envelope card.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterView<'a> {
    pub content: LetterContent<'a>,
    pub phase: TransitionPhase<EnvelopeState>,
    pub music_playing: bool,
    /// The envelope grows into a full card once opened
    pub expanded: bool,
}

/// Content for an envelope state.
pub fn letter_content(state: EnvelopeState, config: &LetterConfig) -> LetterContent<'_> {
    match state {
        EnvelopeState::Closed => LetterContent::Envelope {
            hint: &config.envelope_hint,
        },
        EnvelopeState::LetterShown => LetterContent::Letter {
            heading: &config.heading,
            photo: &config.letter_photo,
            body: &config.body,
            hint: &config.letter_hint,
        },
        EnvelopeState::Album(index) => album_content(config, index, false),
        // Completion shows the first photo again under the banner.
        EnvelopeState::Complete => album_content(config, 0, true),
    }
}

fn album_content(config: &LetterConfig, index: usize, complete: bool) -> LetterContent<'_> {
    LetterContent::Album {
        title: &config.album_title,
        photo: config.photos.get(index),
        index,
        total: config.photos.len(),
        hint: &config.album_hint,
        banner: complete.then_some(config.completion_text.as_str()),
    }
}

pub fn letter_view(letter: &LoveLetter) -> LetterView<'_> {
    let state = letter.envelope().state();
    let phase = letter.transition_phase();
    let shown = match phase {
        TransitionPhase::Exiting { from, .. } => from,
        _ => state,
    };
    LetterView {
        content: letter_content(shown, letter.config()),
        phase,
        music_playing: letter.audio().is_playing(),
        expanded: shown != EnvelopeState::Closed,
    }
}
