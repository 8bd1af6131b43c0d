//! The multi-section greeting page: screen navigation, background music,
//! and the gift modal.

use std::time::Duration;

use crate::audio::AudioController;
use crate::config::PageConfig;
use crate::error::Result;
use crate::lifecycle::{Listener, Subscriptions};
use crate::navigator::{Direction, Navigator};
use crate::particles::{ParticleField, ParticleKind, RandomSource};
use crate::reveal::GiftReveal;
use crate::types::{InputEvent, Key, PointerButton, Screen, Target};
use crate::view::{Transition, TransitionPhase};

/// A mounted greeting page.
///
/// Dropping the page unmounts it.
pub struct GreetingPage {
    config: PageConfig,
    navigator: Navigator,
    gift: GiftReveal,
    audio: AudioController,
    particles: ParticleField,
    subscriptions: Subscriptions,
    transition: Transition<Screen>,
    clock: Duration,
    mounted: bool,
}

impl GreetingPage {
    /// Build the page and register its listeners.
    pub fn mount(
        config: PageConfig,
        mut audio: AudioController,
        random: Box<dyn RandomSource>,
    ) -> Result<Self> {
        let navigator = Navigator::new(config.screens.len())?;
        let particles = ParticleField::new(random).with_set(ParticleKind::Star, config.star_count);
        audio.initialize();

        let mut subscriptions = Subscriptions::new();
        subscriptions.subscribe(Listener::GlobalKeys);
        if config.autoplay {
            subscriptions.subscribe(Listener::FirstInteraction);
        }

        tracing::info!(
            screens = config.screens.len(),
            autoplay = config.autoplay,
            "Greeting page mounted"
        );

        Ok(Self {
            config,
            navigator,
            gift: GiftReveal::new(),
            audio,
            particles,
            subscriptions,
            transition: Transition::new(),
            clock: Duration::ZERO,
            mounted: true,
        })
    }

    /// Route one input event. Returns true if a page control handled it.
    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        if !self.mounted {
            return false;
        }
        match event {
            InputEvent::Pointer { button, target } => {
                let handled = self.handle_pointer(button, target);
                // The document-level listener sees the press after the
                // target did, so a first press on the music toggle is not
                // undone by autoplay.
                if self.subscriptions.is_subscribed(Listener::FirstInteraction) {
                    self.subscriptions
                        .unsubscribe_all(Listener::FirstInteraction);
                    let attempted = self.audio.attempt_autoplay();
                    tracing::debug!(attempted, "First interaction listener fired");
                }
                handled
            }
            InputEvent::Key(key) => self.handle_key(key),
        }
    }

    fn handle_pointer(&mut self, button: PointerButton, target: Target) -> bool {
        if button == PointerButton::Secondary && target.is_interactive() {
            tracing::trace!(?target, "Secondary press swallowed");
            return false;
        }
        match (button, target) {
            (PointerButton::Primary, Target::MusicToggle) => {
                self.audio.toggle();
                true
            }
            (PointerButton::Primary, Target::OpenGift) => self.open_gift(),
            (PointerButton::Primary, Target::GiftBox) => self.gift.reveal(),
            (PointerButton::Primary, Target::CloseGift) => self.gift.close(),
            // The backdrop covers the page while the modal is up, so a
            // background press closes the gift instead of navigating.
            (PointerButton::Primary, Target::GiftBackdrop) => self.gift.close(),
            (_, Target::Background) if self.gift.is_shown() => match button {
                PointerButton::Primary => self.gift.close(),
                PointerButton::Secondary => false,
            },
            (PointerButton::Primary, Target::Background) => {
                self.navigate(Direction::Next);
                true
            }
            (PointerButton::Secondary, Target::Background) => {
                self.navigate(Direction::Prev);
                true
            }
            // Interactive children swallow everything else.
            _ => false,
        }
    }

    fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::ArrowRight | Key::ArrowLeft
                if self.subscriptions.is_subscribed(Listener::GlobalKeys) =>
            {
                let direction = if key == Key::ArrowRight {
                    Direction::Next
                } else {
                    Direction::Prev
                };
                self.navigate(direction);
                true
            }
            Key::Enter => {
                if self.gift.is_opened() {
                    self.gift.close()
                } else if self.gift.is_shown() {
                    self.gift.reveal()
                } else {
                    self.open_gift()
                }
            }
            Key::Escape => self.gift.close(),
            Key::Char('m') => {
                self.audio.toggle();
                true
            }
            Key::Char(c) if self.subscriptions.is_subscribed(Listener::GlobalKeys) => {
                match c.to_digit(10) {
                    Some(n) if n >= 1 => self.jump_to(n as usize - 1),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Open the gift modal; only the gift screen has the button.
    fn open_gift(&mut self) -> bool {
        if self.current_screen() != Screen::Gift {
            return false;
        }
        let opened = self.gift.open();
        if opened {
            tracing::debug!("Gift modal shown");
        }
        opened
    }

    fn navigate(&mut self, direction: Direction) {
        let from = self.current_screen();
        self.navigator.advance(direction);
        self.transition.start(from, self.clock);
        tracing::debug!(
            from = %from,
            to = %self.current_screen(),
            ?direction,
            "Screen changed"
        );
    }

    fn jump_to(&mut self, index: usize) -> bool {
        let from = self.current_screen();
        if index == self.navigator.current() || !self.navigator.jump_to(index) {
            return false;
        }
        self.transition.start(from, self.clock);
        true
    }

    /// Advance animation time and collect deferred audio signals.
    pub fn tick(&mut self, dt: Duration) {
        if !self.mounted {
            return;
        }
        self.clock += dt;
        self.particles.tick(dt);
        self.audio.poll();
    }

    /// Tear down listeners and release the audio resource. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let removed = self.subscriptions.clear();
        self.particles.stop_refresh();
        self.audio.release();
        self.mounted = false;
        tracing::info!(listeners = removed, "Greeting page unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn current_screen(&self) -> Screen {
        self.config.screens[self.navigator.current()]
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn gift(&self) -> &GiftReveal {
        &self.gift
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

    pub fn transition_phase(&self) -> TransitionPhase<Screen> {
        self.transition.phase(self.clock)
    }
}

impl Drop for GreetingPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{ScriptedBackend, Track};
    use crate::particles::SequenceSource;
    use crate::reveal::GiftState;

    fn mount(config: PageConfig, backend: &ScriptedBackend) -> GreetingPage {
        let audio = AudioController::new(
            Box::new(backend.clone()),
            Some(Track {
                source: "theme.mp3".into(),
                looping: true,
                volume: 0.5,
            }),
        );
        GreetingPage::mount(config, audio, Box::new(SequenceSource::new(vec![0.5]))).unwrap()
    }

    fn page() -> (GreetingPage, ScriptedBackend) {
        let backend = ScriptedBackend::new();
        (mount(PageConfig::default(), &backend), backend)
    }

    fn go_to_gift(page: &mut GreetingPage) {
        page.dispatch(InputEvent::Key(Key::ArrowLeft));
        assert_eq!(page.current_screen(), Screen::Gift);
    }

    #[test]
    fn test_mount_rejects_empty_screen_list() {
        let config = PageConfig {
            screens: vec![],
            ..PageConfig::default()
        };
        let audio = AudioController::new(Box::new(ScriptedBackend::new()), None);
        let result = GreetingPage::mount(config, audio, Box::new(SequenceSource::new(vec![])));
        assert!(result.is_err());
    }

    #[test]
    fn test_background_clicks_navigate() {
        let (mut page, _) = page();
        assert_eq!(page.current_screen(), Screen::Home);

        page.dispatch(InputEvent::click(Target::Background));
        assert_eq!(page.current_screen(), Screen::Memories);

        page.dispatch(InputEvent::context_click(Target::Background));
        page.dispatch(InputEvent::context_click(Target::Background));
        assert_eq!(page.current_screen(), Screen::Gift);
    }

    #[test]
    fn test_arrow_keys_navigate() {
        let (mut page, _) = page();
        page.dispatch(InputEvent::Key(Key::ArrowRight));
        page.dispatch(InputEvent::Key(Key::ArrowRight));
        assert_eq!(page.current_screen(), Screen::Message);
        page.dispatch(InputEvent::Key(Key::ArrowLeft));
        assert_eq!(page.current_screen(), Screen::Memories);
    }

    #[test]
    fn test_number_keys_jump() {
        let (mut page, _) = page();
        assert!(page.dispatch(InputEvent::Key(Key::Char('3'))));
        assert_eq!(page.current_screen(), Screen::Message);
        assert!(!page.dispatch(InputEvent::Key(Key::Char('9'))));
        assert!(!page.dispatch(InputEvent::Key(Key::Char('0'))));
        assert_eq!(page.current_screen(), Screen::Message);
    }

    #[test]
    fn test_interactive_targets_never_navigate() {
        let (mut page, _) = page();
        go_to_gift(&mut page);
        let index = page.navigator().current();

        for target in [
            Target::MusicToggle,
            Target::OpenGift,
            Target::GiftBox,
            Target::CloseGift,
            Target::GiftBackdrop,
            Target::Envelope,
        ] {
            page.dispatch(InputEvent::click(target));
            page.dispatch(InputEvent::context_click(target));
            assert_eq!(page.navigator().current(), index, "{target:?} moved the page");
        }
    }

    #[test]
    fn test_secondary_press_on_controls_is_swallowed() {
        let backend = ScriptedBackend::new();
        let config = PageConfig {
            autoplay: false,
            ..PageConfig::default()
        };
        let mut page = mount(config, &backend);
        go_to_gift(&mut page);

        assert!(!page.dispatch(InputEvent::context_click(Target::MusicToggle)));
        assert!(!page.audio().is_playing());
        assert!(!page.dispatch(InputEvent::context_click(Target::OpenGift)));
        assert_eq!(page.gift().state(), GiftState::Idle);
    }

    #[test]
    fn test_gift_flow() {
        let (mut page, _) = page();

        // The open button only exists on the gift screen.
        assert!(!page.dispatch(InputEvent::click(Target::OpenGift)));
        assert_eq!(page.gift().state(), GiftState::Idle);

        go_to_gift(&mut page);
        assert!(page.dispatch(InputEvent::click(Target::OpenGift)));
        assert_eq!(page.gift().state(), GiftState::Shown { opened: false });

        // Closing is refused until the gift is unwrapped.
        assert!(!page.dispatch(InputEvent::click(Target::CloseGift)));
        assert!(!page.dispatch(InputEvent::click(Target::Background)));
        assert_eq!(page.gift().state(), GiftState::Shown { opened: false });
        assert_eq!(page.current_screen(), Screen::Gift);

        assert!(page.dispatch(InputEvent::click(Target::GiftBox)));
        assert!(page.gift().is_opened());

        assert!(page.dispatch(InputEvent::click(Target::GiftBackdrop)));
        assert_eq!(page.gift().state(), GiftState::Idle);
        assert_eq!(page.current_screen(), Screen::Gift);
    }

    #[test]
    fn test_gift_keyboard_flow() {
        let (mut page, _) = page();
        go_to_gift(&mut page);

        assert!(!page.dispatch(InputEvent::Key(Key::Escape)));
        assert!(page.dispatch(InputEvent::Key(Key::Enter)));
        assert_eq!(page.gift().state(), GiftState::Shown { opened: false });
        assert!(!page.dispatch(InputEvent::Key(Key::Escape)));
        assert!(page.dispatch(InputEvent::Key(Key::Enter)));
        assert!(page.gift().is_opened());
        assert!(page.dispatch(InputEvent::Key(Key::Escape)));
        assert_eq!(page.gift().state(), GiftState::Idle);
    }

    #[test]
    fn test_first_click_autoplays_once() {
        let (mut page, backend) = page();
        assert!(page
            .subscriptions()
            .is_subscribed(Listener::FirstInteraction));

        page.dispatch(InputEvent::click(Target::Background));
        assert!(page.audio().is_playing());
        assert!(!page
            .subscriptions()
            .is_subscribed(Listener::FirstInteraction));

        page.dispatch(InputEvent::click(Target::MusicToggle));
        assert!(!page.audio().is_playing());
        page.dispatch(InputEvent::click(Target::Background));
        assert!(!page.audio().is_playing());
        assert_eq!(backend.play_requests(), 1);
    }

    #[test]
    fn test_first_click_on_music_toggle_is_not_undone() {
        let (mut page, backend) = page();
        page.dispatch(InputEvent::click(Target::MusicToggle));
        assert!(page.audio().is_playing());
        assert_eq!(backend.play_requests(), 1);
    }

    #[test]
    fn test_autoplay_listener_removed_even_when_not_loaded() {
        let backend = ScriptedBackend::new().unloaded();
        let mut page = mount(PageConfig::default(), &backend);

        page.dispatch(InputEvent::click(Target::Background));
        assert!(!page.audio().is_playing());
        assert!(!page
            .subscriptions()
            .is_subscribed(Listener::FirstInteraction));

        backend.set_loaded(true);
        page.tick(Duration::from_millis(16));
        page.dispatch(InputEvent::click(Target::Background));
        assert!(!page.audio().is_playing());
        assert_eq!(backend.play_requests(), 0);
    }

    #[test]
    fn test_autoplay_disabled_by_config() {
        let backend = ScriptedBackend::new();
        let config = PageConfig {
            autoplay: false,
            ..PageConfig::default()
        };
        let mut page = mount(config, &backend);
        page.dispatch(InputEvent::click(Target::Background));
        assert!(!page.audio().is_playing());
    }

    #[test]
    fn test_rejected_autoplay_is_swallowed() {
        let backend = ScriptedBackend::new();
        backend.push_outcome(crate::audio::PlayOutcome::Rejected("no device".into()));
        let mut page = mount(PageConfig::default(), &backend);

        assert!(page.dispatch(InputEvent::click(Target::Background)));
        assert_eq!(page.current_screen(), Screen::Memories);
        assert!(!page.audio().is_playing());
        assert_eq!(page.audio().last_rejection(), Some("no device"));
    }

    #[test]
    fn test_transition_tracks_screen_change() {
        let (mut page, _) = page();
        assert_eq!(page.transition_phase(), TransitionPhase::Settled);

        page.tick(Duration::from_secs(1));
        page.dispatch(InputEvent::Key(Key::ArrowRight));
        assert!(matches!(
            page.transition_phase(),
            TransitionPhase::Exiting {
                from: Screen::Home,
                ..
            }
        ));
        page.tick(Duration::from_secs(1));
        assert_eq!(page.transition_phase(), TransitionPhase::Settled);
    }

    #[test]
    fn test_stars_generated_on_mount() {
        let (page, _) = page();
        let stars = page.particles().set(ParticleKind::Star).unwrap();
        assert_eq!(stars.particles.len(), 100);
    }

    #[test]
    fn test_unmount_detaches_everything() {
        let (mut page, backend) = page();
        page.dispatch(InputEvent::click(Target::MusicToggle));
        assert!(backend.handle_alive());

        page.unmount();
        assert!(!page.is_mounted());
        assert!(page.subscriptions().is_empty());
        assert!(!backend.handle_alive());
        assert!(!page.audio().is_playing());

        let before = page.navigator().current();
        assert!(!page.dispatch(InputEvent::Key(Key::ArrowRight)));
        assert!(!page.dispatch(InputEvent::click(Target::Background)));
        page.tick(Duration::from_secs(5));
        assert_eq!(page.navigator().current(), before);
        assert_eq!(page.clock(), Duration::ZERO);

        page.unmount();
    }

    #[test]
    fn test_drop_releases_audio() {
        let (mut page, backend) = page();
        page.dispatch(InputEvent::click(Target::MusicToggle));
        drop(page);
        assert!(!backend.handle_alive());
    }
}
