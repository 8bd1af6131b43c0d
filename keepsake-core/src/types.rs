//! Domain types shared by the widgets and the front end.

use serde::{Deserialize, Serialize};

/// One named, mutually exclusive view of the greeting page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Home,
    Memories,
    Message,
    Gift,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Memories => "memories",
            Screen::Message => "message",
            Screen::Gift => "gift",
        }
    }

    /// Default page order.
    pub fn all() -> Vec<Screen> {
        vec![Screen::Home, Screen::Memories, Screen::Message, Screen::Gift]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A static picture shown by a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    /// Path or URL of the image, as supplied by the card author
    pub source: String,
    /// Caption / alt text
    pub label: String,
}

impl Photo {
    pub fn new(source: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
        }
    }
}

/// What a pointer press landed on.
///
/// Only [`Target::Background`] is non-interactive; presses on every other
/// target are consumed by that control and never reach page navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Background,
    MusicToggle,
    /// "Open gift" button on the gift screen
    OpenGift,
    /// Dimmed area around the gift modal
    GiftBackdrop,
    /// The gift itself inside the modal
    GiftBox,
    /// Close button inside the modal
    CloseGift,
    /// The envelope / letter / album card
    Envelope,
}

impl Target {
    pub fn is_interactive(&self) -> bool {
        !matches!(self, Target::Background)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    /// Right button; the context-menu gesture
    Secondary,
}

/// Keys the cards react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Enter,
    Escape,
    Char(char),
}

/// A discrete input delivered to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pointer {
        button: PointerButton,
        target: Target,
    },
    Key(Key),
}

impl InputEvent {
    pub fn click(target: Target) -> Self {
        InputEvent::Pointer {
            button: PointerButton::Primary,
            target,
        }
    }

    pub fn context_click(target: Target) -> Self {
        InputEvent::Pointer {
            button: PointerButton::Secondary,
            target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_labels() {
        let labels: Vec<&str> = Screen::all().iter().map(|s| s.as_str()).collect();
        assert_eq!(labels, vec!["home", "memories", "message", "gift"]);
        assert_eq!(Screen::Gift.to_string(), "gift");
    }

    #[test]
    fn test_only_background_is_passive() {
        assert!(!Target::Background.is_interactive());
        for target in [
            Target::MusicToggle,
            Target::OpenGift,
            Target::GiftBackdrop,
            Target::GiftBox,
            Target::CloseGift,
            Target::Envelope,
        ] {
            assert!(target.is_interactive());
        }
    }
}
