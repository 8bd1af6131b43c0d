//! The envelope card: a closed envelope that opens into a letter, then a
//! photo album that ends on a completion banner.

use std::time::Duration;

use crate::audio::AudioController;
use crate::config::LetterConfig;
use crate::error::Result;
use crate::lifecycle::{Listener, Subscriptions};
use crate::particles::{ParticleField, ParticleKind, RandomSource};
use crate::reveal::{Envelope, EnvelopeState, EnvelopeStep};
use crate::types::{InputEvent, Key, PointerButton, Target};
use crate::view::{Transition, TransitionPhase};

/// A mounted envelope card.
///
/// Dropping the card unmounts it.
pub struct LoveLetter {
    config: LetterConfig,
    envelope: Envelope,
    audio: AudioController,
    particles: ParticleField,
    subscriptions: Subscriptions,
    transition: Transition<EnvelopeState>,
    clock: Duration,
    mounted: bool,
}

impl LoveLetter {
    /// Build the card, generate its particles, and register its listeners.
    pub fn mount(
        config: LetterConfig,
        mut audio: AudioController,
        random: Box<dyn RandomSource>,
    ) -> Result<Self> {
        let envelope = Envelope::new(config.photos.len())?;
        let particles = ParticleField::new(random)
            .with_set(ParticleKind::Petal, config.petal_count)
            .with_set(ParticleKind::Heart, config.heart_count)
            .refreshing(ParticleKind::Petal, config.petal_refresh());
        audio.initialize();

        let mut subscriptions = Subscriptions::new();
        subscriptions.subscribe(Listener::ContainerKeys);
        if config.autoplay {
            subscriptions.subscribe(Listener::FirstInteraction);
        }

        tracing::info!(
            photos = config.photos.len(),
            petals = config.petal_count,
            hearts = config.heart_count,
            "Love letter mounted"
        );

        Ok(Self {
            config,
            envelope,
            audio,
            particles,
            subscriptions,
            transition: Transition::new(),
            clock: Duration::ZERO,
            mounted: true,
        })
    }

    /// Route one input event. Returns true if a card control handled it.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        if !self.mounted {
            return false;
        }
        match event {
            InputEvent::Pointer { button, target } => {
                let handled = match (button, target) {
                    (PointerButton::Primary, Target::Envelope) => self.advance(),
                    (PointerButton::Primary, Target::MusicToggle) => {
                        self.audio.toggle();
                        true
                    }
                    _ => false,
                };
                if self.subscriptions.is_subscribed(Listener::FirstInteraction) {
                    self.subscriptions
                        .unsubscribe_all(Listener::FirstInteraction);
                    self.audio.attempt_autoplay();
                }
                handled
            }
            InputEvent::Key(Key::Enter | Key::ArrowRight)
                if self.subscriptions.is_subscribed(Listener::ContainerKeys) =>
            {
                self.advance()
            }
            InputEvent::Key(Key::Char('m'))
                if self.subscriptions.is_subscribed(Listener::ContainerKeys) =>
            {
                self.audio.toggle();
                true
            }
            InputEvent::Key(_) => false,
        }
    }

    /// One step through the envelope, letter, and album.
    pub fn advance(&mut self) -> bool {
        let from = self.envelope.state();
        let step = self.envelope.advance();
        match step {
            EnvelopeStep::Ignored => return false,
            EnvelopeStep::Opened => {
                tracing::debug!("Envelope opened");
                self.audio.play();
            }
            EnvelopeStep::Completed => {
                tracing::info!(photos = self.envelope.photo_count(), "Album complete");
            }
            EnvelopeStep::AlbumStarted | EnvelopeStep::Photo(_) => {}
        }
        self.transition.start(from, self.clock);
        true
    }

    /// Advance animation time, regenerate petals when due, and collect
    /// deferred audio signals.
    pub fn tick(&mut self, dt: Duration) {
        if !self.mounted {
            return;
        }
        self.clock += dt;
        self.particles.tick(dt);
        self.audio.poll();
    }

    /// Tear down listeners, stop the petal timer, release the audio.
    /// Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let removed = self.subscriptions.clear();
        self.particles.stop_refresh();
        self.audio.release();
        self.mounted = false;
        tracing::info!(listeners = removed, "Love letter unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn config(&self) -> &LetterConfig {
        &self.config
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn audio(&self) -> &AudioController {
        &self.audio
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn subscriptions(&self) -> &Subscriptions {
        &self.subscriptions
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn transition_phase(&self) -> TransitionPhase<EnvelopeState> {
        self.transition.phase(self.clock)
    }
}

impl Drop for LoveLetter {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PlayOutcome, ScriptedBackend, Track};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mount(config: LetterConfig, backend: &ScriptedBackend) -> LoveLetter {
        let audio = AudioController::new(
            Box::new(backend.clone()),
            Some(Track {
                source: "theme.mp3".into(),
                looping: true,
                volume: 0.5,
            }),
        );
        LoveLetter::mount(config, audio, Box::new(StdRng::seed_from_u64(2010))).unwrap()
    }

    fn letter() -> (LoveLetter, ScriptedBackend) {
        let backend = ScriptedBackend::new();
        (mount(LetterConfig::default(), &backend), backend)
    }

    #[test]
    fn test_empty_album_rejected() {
        let config = LetterConfig {
            photos: vec![],
            ..LetterConfig::default()
        };
        let audio = AudioController::new(Box::new(ScriptedBackend::new()), None);
        assert!(LoveLetter::mount(config, audio, Box::new(StdRng::seed_from_u64(0))).is_err());
    }

    #[test]
    fn test_opening_starts_music() {
        let (mut letter, backend) = letter();
        assert!(!letter.audio().is_playing());

        letter.dispatch(InputEvent::click(Target::Envelope));
        assert_eq!(letter.envelope().state(), EnvelopeState::LetterShown);
        assert!(letter.audio().is_playing());
        assert_eq!(backend.play_requests(), 1);

        // Later steps leave the music alone.
        letter.dispatch(InputEvent::click(Target::Envelope));
        assert_eq!(backend.play_requests(), 1);
    }

    #[test]
    fn test_rejected_music_does_not_block_letter() {
        let backend = ScriptedBackend::new();
        backend.push_outcome(PlayOutcome::Rejected("no device".into()));
        let mut letter = mount(LetterConfig::default(), &backend);

        assert!(letter.dispatch(InputEvent::Key(Key::Enter)));
        assert_eq!(letter.envelope().state(), EnvelopeState::LetterShown);
        assert!(!letter.audio().is_playing());
    }

    #[test]
    fn test_seven_steps_complete_five_photos() {
        let (mut letter, _) = letter();
        for _ in 0..6 {
            assert!(letter.dispatch(InputEvent::Key(Key::ArrowRight)));
            assert!(!letter.envelope().is_complete());
        }
        assert!(letter.dispatch(InputEvent::click(Target::Envelope)));
        assert!(letter.envelope().is_complete());

        assert!(!letter.dispatch(InputEvent::click(Target::Envelope)));
        assert!(!letter.dispatch(InputEvent::Key(Key::Enter)));
        assert_eq!(letter.envelope().state(), EnvelopeState::Complete);
    }

    #[test]
    fn test_other_targets_do_not_advance() {
        let (mut letter, _) = letter();
        letter.dispatch(InputEvent::click(Target::Background));
        letter.dispatch(InputEvent::context_click(Target::Envelope));
        letter.dispatch(InputEvent::click(Target::MusicToggle));
        letter.dispatch(InputEvent::Key(Key::ArrowLeft));
        assert_eq!(letter.envelope().state(), EnvelopeState::Closed);
    }

    #[test]
    fn test_music_toggle_after_opening() {
        let (mut letter, _) = letter();
        letter.dispatch(InputEvent::click(Target::Envelope));
        assert!(letter.audio().is_playing());
        letter.dispatch(InputEvent::click(Target::MusicToggle));
        assert!(!letter.audio().is_playing());
        letter.dispatch(InputEvent::Key(Key::Char('m')));
        assert!(letter.audio().is_playing());
    }

    #[test]
    fn test_petals_regenerate_every_twenty_seconds() {
        let (mut letter, _) = letter();
        let petals = |l: &LoveLetter| l.particles().set(ParticleKind::Petal).unwrap().clone();
        assert_eq!(petals(&letter).particles.len(), 30);
        assert_eq!(
            letter
                .particles()
                .set(ParticleKind::Heart)
                .unwrap()
                .particles
                .len(),
            20
        );

        for _ in 0..(19 * 60) {
            letter.tick(Duration::from_secs(1) / 60);
        }
        assert_eq!(petals(&letter).generation, 0);

        letter.tick(Duration::from_secs(2));
        let regenerated = petals(&letter);
        assert_eq!(regenerated.generation, 1);
        assert_eq!(regenerated.particles.len(), 30);
    }

    #[test]
    fn test_unmount_stops_timer_and_releases_audio() {
        let (mut letter, backend) = letter();
        letter.dispatch(InputEvent::click(Target::Envelope));
        assert!(backend.handle_alive());

        letter.unmount();
        assert!(!backend.handle_alive());
        assert!(letter.subscriptions().is_empty());
        assert!(!letter.particles().is_refreshing());

        letter.tick(Duration::from_secs(60));
        assert_eq!(
            letter.particles().set(ParticleKind::Petal).unwrap().generation,
            0
        );
        assert!(!letter.dispatch(InputEvent::click(Target::Envelope)));
        assert!(!letter.dispatch(InputEvent::Key(Key::Char('m'))));
        assert_eq!(letter.envelope().state(), EnvelopeState::LetterShown);
    }

    #[test]
    fn test_mount_registers_key_listener_and_petal_timer() {
        let (letter, _backend) = letter();
        assert_eq!(letter.subscriptions().len(), 1);
        assert!(letter.subscriptions().is_subscribed(Listener::ContainerKeys));
        assert!(!letter.subscriptions().is_subscribed(Listener::FirstInteraction));
        // The petal timer lives on the field, not in the listener set.
        assert!(letter.particles().is_refreshing());
    }

    #[test]
    fn test_autoplay_opt_in() {
        let backend = ScriptedBackend::new();
        let config = LetterConfig {
            autoplay: true,
            ..LetterConfig::default()
        };
        let mut letter = mount(config, &backend);
        letter.dispatch(InputEvent::click(Target::Background));
        assert!(letter.audio().is_playing());
        assert_eq!(letter.envelope().state(), EnvelopeState::Closed);
    }
}
