//! keepsake - animated greeting cards for the terminal
//!
//! Shows either the multi-section greeting page or the envelope card, with
//! twinkling particles, optional background music, and mouse support.

mod app;
mod audio;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use keepsake_core::Config;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{App, Card, CardKind};

/// How long to wait for input before drawing the next frame.
const FRAME_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(name = "keepsake")]
#[command(about = "Animated greeting cards for the terminal")]
#[command(version)]
struct Args {
    /// Which card to show
    #[arg(short, long, value_enum, default_value_t = CardKind::Page)]
    card: CardKind,

    /// Config file to use instead of the XDG default
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never open an audio device
    #[arg(long)]
    no_audio: bool,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };

    if args.dump_config {
        print!(
            "{}",
            config
                .to_toml_string()
                .context("failed to render configuration")?
        );
        return Ok(());
    }

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        keepsake_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(card = ?args.card, no_audio = args.no_audio, "keepsake starting up");
    match config_source(args.config.as_deref(), Config::config_path()) {
        ConfigSource::File(path) => {
            tracing::info!(path = %path.display(), "Configuration loaded")
        }
        ConfigSource::Defaults(path) => {
            tracing::info!(path = %path.display(), "No config file found, using defaults")
        }
    }

    let card = Card::mount(
        args.card,
        &config,
        audio::backend(args.no_audio),
        Box::new(rand::thread_rng()),
    )
    .context("failed to mount card")?;
    let mut app = App::new(card);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Release listeners and audio before handing the terminal back
    app.unmount();

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("keepsake shutting down");

    result
}

/// Where the configuration came from. Resolved before logging starts and
/// logged afterwards.
#[derive(Debug, PartialEq)]
enum ConfigSource {
    File(PathBuf),
    Defaults(PathBuf),
}

fn config_source(explicit: Option<&Path>, default_path: PathBuf) -> ConfigSource {
    match explicit {
        Some(path) => ConfigSource::File(path.to_path_buf()),
        None if default_path.exists() => ConfigSource::File(default_path),
        None => ConfigSource::Defaults(default_path),
    }
}

/// Run the main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Advance animations and timers by the real elapsed time
        let now = Instant::now();
        app.tick_animation(now.duration_since(last_tick));
        last_tick = now;

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(FRAME_TIMEOUT)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
