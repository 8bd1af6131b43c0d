//! Listener registrations and timers owned by a mounted widget.
//!
//! A widget registers its listeners on mount and clears them on unmount.
//! Key and pointer paths check their registration first. Timers are plain
//! [`Interval`]s owned by whatever they drive and are stopped on unmount.

use std::time::Duration;

/// The listeners a widget can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Listener {
    /// One-shot autoplay on the first pointer press anywhere
    FirstInteraction,
    /// Arrow-key navigation, active for the whole widget
    GlobalKeys,
    /// Enter/ArrowRight and the music key on the focused container
    ContainerKeys,
}

/// The live listener registrations of one widget.
#[derive(Debug, Default)]
pub struct Subscriptions {
    entries: Vec<Listener>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.entries.push(listener);
        tracing::trace!(?listener, "Listener registered");
    }

    /// Remove every registration of `listener`. Returns how many were removed.
    pub fn unsubscribe_all(&mut self, listener: Listener) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| *entry != listener);
        before - self.entries.len()
    }

    pub fn is_subscribed(&self, listener: Listener) -> bool {
        self.entries.contains(&listener)
    }

    /// Drop every registration. Returns how many were live.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed-period timer driven by elapsed time from the event loop.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    elapsed: Duration,
}

impl Interval {
    /// `period` must be non-zero; zero is clamped to one millisecond.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            elapsed: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Advance by `dt`. Returns how many periods elapsed.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}
