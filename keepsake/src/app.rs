//! Application state for the TUI.

use std::time::Duration;

use clap::ValueEnum;
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use keepsake_core::audio::{AudioBackend, AudioController};
use keepsake_core::particles::RandomSource;
use keepsake_core::{Config, GreetingPage, InputEvent, Key, LoveLetter, PointerButton, Target};
use ratatui::layout::{Position, Rect};

/// Which card to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CardKind {
    /// Multi-section greeting page
    #[default]
    Page,
    /// Envelope, letter and photo album
    Letter,
}

/// The mounted card.
pub enum Card {
    Page(GreetingPage),
    Letter(LoveLetter),
}

impl Card {
    /// Mount the chosen card from the resolved configuration.
    pub fn mount(
        kind: CardKind,
        config: &Config,
        backend: Box<dyn AudioBackend>,
        random: Box<dyn RandomSource>,
    ) -> keepsake_core::Result<Self> {
        let audio = AudioController::new(backend, config.audio.track());
        Ok(match kind {
            CardKind::Page => Card::Page(GreetingPage::mount(config.page.clone(), audio, random)?),
            CardKind::Letter => {
                Card::Letter(LoveLetter::mount(config.letter.clone(), audio, random)?)
            }
        })
    }

    fn dispatch(&mut self, event: InputEvent) -> bool {
        match self {
            Card::Page(page) => page.dispatch(event),
            Card::Letter(letter) => letter.dispatch(event),
        }
    }

    fn tick(&mut self, dt: Duration) {
        match self {
            Card::Page(page) => page.tick(dt),
            Card::Letter(letter) => letter.tick(dt),
        }
    }

    fn unmount(&mut self) {
        match self {
            Card::Page(page) => page.unmount(),
            Card::Letter(letter) => letter.unmount(),
        }
    }
}

/// Main application state.
pub struct App {
    /// The card on screen
    pub card: Card,
    /// Clickable regions from the last frame, bottom-most first
    pub hit_regions: Vec<(Rect, Target)>,
    /// Animation frame counter (increments each tick)
    pub animation_frame: u64,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl App {
    pub fn new(card: Card) -> Self {
        Self {
            card,
            hit_regions: Vec::new(),
            animation_frame: 0,
            should_quit: false,
        }
    }

    /// Tick the animation state (call each frame).
    pub fn tick_animation(&mut self, dt: Duration) {
        self.animation_frame = self.animation_frame.wrapping_add(1);
        self.card.tick(dt);
    }

    /// Handle keyboard input.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let mapped = match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Left => Key::ArrowLeft,
            KeyCode::Right => Key::ArrowRight,
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Char(c) => Key::Char(c),
            _ => return,
        };
        self.card.dispatch(InputEvent::Key(mapped));
    }

    /// Handle mouse input. Only button presses reach the card.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let button = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerButton::Primary,
            MouseEventKind::Down(MouseButton::Right) => PointerButton::Secondary,
            _ => return,
        };
        let target = self.target_at(mouse.column, mouse.row);
        tracing::trace!(?button, ?target, col = mouse.column, row = mouse.row, "Pointer press");
        self.card.dispatch(InputEvent::Pointer { button, target });
    }

    /// The top-most region under a cell; anything else is background.
    pub fn target_at(&self, column: u16, row: u16) -> Target {
        let position = Position::new(column, row);
        self.hit_regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| *target)
            .unwrap_or(Target::Background)
    }

    /// Tear the card down before the terminal is restored.
    pub fn unmount(&mut self) {
        self.card.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use keepsake_core::audio::ScriptedBackend;
    use keepsake_core::particles::SequenceSource;
    use keepsake_core::reveal::EnvelopeState;
    use keepsake_core::Screen;

    fn mount_app(kind: CardKind) -> App {
        let card = Card::mount(
            kind,
            &Config::default(),
            Box::new(ScriptedBackend::new()),
            Box::new(SequenceSource::new(vec![0.25, 0.75])),
        )
        .unwrap();
        App::new(card)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(button: MouseButton, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn screen(app: &App) -> Screen {
        match &app.card {
            Card::Page(page) => page.current_screen(),
            Card::Letter(_) => panic!("expected the greeting page"),
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut app = mount_app(CardKind::Page);
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = mount_app(CardKind::Page);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut app = mount_app(CardKind::Page);
        app.handle_key(KeyEvent {
            code: KeyCode::Right,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(screen(&app), Screen::Home);
        app.handle_key(press(KeyCode::Right));
        assert_eq!(screen(&app), Screen::Memories);
    }

    #[test]
    fn test_hit_testing_prefers_top_region() {
        let mut app = mount_app(CardKind::Page);
        app.hit_regions = vec![
            (Rect::new(0, 0, 80, 24), Target::GiftBackdrop),
            (Rect::new(10, 5, 10, 3), Target::GiftBox),
        ];
        assert_eq!(app.target_at(12, 6), Target::GiftBox);
        assert_eq!(app.target_at(0, 0), Target::GiftBackdrop);

        app.hit_regions.clear();
        assert_eq!(app.target_at(12, 6), Target::Background);
    }

    #[test]
    fn test_mouse_buttons_navigate_page() {
        let mut app = mount_app(CardKind::Page);
        app.handle_mouse(click(MouseButton::Left, 3, 3));
        assert_eq!(screen(&app), Screen::Memories);
        app.handle_mouse(click(MouseButton::Right, 3, 3));
        app.handle_mouse(click(MouseButton::Right, 3, 3));
        assert_eq!(screen(&app), Screen::Gift);

        // Middle clicks and scrolling are not presses the card knows.
        app.handle_mouse(click(MouseButton::Middle, 3, 3));
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 3,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(screen(&app), Screen::Gift);
    }

    #[test]
    fn test_click_on_button_region_does_not_navigate() {
        let mut app = mount_app(CardKind::Page);
        app.hit_regions = vec![(Rect::new(70, 0, 10, 1), Target::MusicToggle)];
        app.handle_mouse(click(MouseButton::Left, 72, 0));
        assert_eq!(screen(&app), Screen::Home);
    }

    #[test]
    fn test_letter_keys_advance() {
        let mut app = mount_app(CardKind::Letter);
        app.handle_key(press(KeyCode::Enter));
        app.handle_key(press(KeyCode::Right));
        match &app.card {
            Card::Letter(letter) => {
                assert_eq!(letter.envelope().state(), EnvelopeState::Album(0))
            }
            Card::Page(_) => panic!("expected the letter"),
        }
    }

    #[test]
    fn test_unmount_stops_input() {
        let mut app = mount_app(CardKind::Page);
        app.unmount();
        app.handle_key(press(KeyCode::Right));
        app.tick_animation(Duration::from_secs(1));
        assert_eq!(screen(&app), Screen::Home);
        assert_eq!(app.animation_frame, 1);
    }
}
