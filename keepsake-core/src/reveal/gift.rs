/// Where the gift modal is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GiftState {
    /// No modal
    #[default]
    Idle,
    /// Modal visible; `opened` once the box has been clicked
    Shown { opened: bool },
}

/// Gift modal sequence: `Idle -> Shown(unopened) -> Shown(opened) -> Idle`.
#[derive(Debug, Clone, Default)]
pub struct GiftReveal {
    state: GiftState,
}

impl GiftReveal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GiftState {
        self.state
    }

    pub fn is_shown(&self) -> bool {
        matches!(self.state, GiftState::Shown { .. })
    }

    pub fn is_opened(&self) -> bool {
        matches!(self.state, GiftState::Shown { opened: true })
    }

    /// Show the wrapped gift. Only from `Idle`.
    pub fn open(&mut self) -> bool {
        if self.state != GiftState::Idle {
            return false;
        }
        self.state = GiftState::Shown { opened: false };
        true
    }

    /// Unwrap the shown gift.
    pub fn reveal(&mut self) -> bool {
        if self.state != (GiftState::Shown { opened: false }) {
            return false;
        }
        self.state = GiftState::Shown { opened: true };
        true
    }

    /// Dismiss the modal. Refused until the gift has been unwrapped.
    pub fn close(&mut self) -> bool {
        if !self.is_opened() {
            return false;
        }
        self.state = GiftState::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_sequence() {
        let mut gift = GiftReveal::new();
        assert!(gift.open());
        assert_eq!(gift.state(), GiftState::Shown { opened: false });
        assert!(gift.reveal());
        assert!(gift.is_opened());
        assert!(gift.close());
        assert_eq!(gift.state(), GiftState::Idle);
        assert!(!gift.is_shown());
    }

    #[test]
    fn test_close_before_reveal_is_noop() {
        let mut gift = GiftReveal::new();
        assert!(!gift.close());
        assert_eq!(gift.state(), GiftState::Idle);

        gift.open();
        assert!(!gift.close());
        assert_eq!(gift.state(), GiftState::Shown { opened: false });
    }

    #[test]
    fn test_transitions_only_move_forward() {
        let mut gift = GiftReveal::new();
        assert!(!gift.reveal());

        gift.open();
        assert!(!gift.open());
        gift.reveal();
        assert!(!gift.reveal());
        assert!(!gift.open());
        assert!(gift.is_opened());
    }
}
