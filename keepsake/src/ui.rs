//! UI rendering for the TUI.
//!
//! Drawing is a function of the view models in `keepsake_core::view`. Every
//! clickable control records its area so mouse presses can be mapped back
//! to a [`Target`]; regions registered later sit on top.

mod letter;
mod page;

use std::time::Duration;

use keepsake_core::particles::{Particle, ParticleKind, ParticleSet};
use keepsake_core::view::{self, TransitionPhase};
use keepsake_core::{Photo, Target};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Card};

// ========== Card Color Palette ==========

/// Gold for stars and highlights
const CARD_GOLD: Color = Color::Rgb(255, 215, 0);
/// Rose for headings and hearts
const CARD_ROSE: Color = Color::Rgb(255, 105, 180);
/// Blush pink for falling petals
const CARD_BLUSH: Color = Color::Rgb(255, 182, 193);
/// Lavender for borders
const CARD_LAVENDER: Color = Color::Rgb(186, 140, 255);
/// Deep red for the envelope seal
const CARD_CRIMSON: Color = Color::Rgb(220, 20, 60);
/// Soft white for body text
const CARD_WHITE: Color = Color::Rgb(250, 250, 250);
/// Dim gray for hints and inactive dots
const CARD_DIM: Color = Color::Rgb(128, 128, 128);
/// Parchment for the letter paper
const CARD_PAPER: Color = Color::Rgb(245, 222, 179);

/// Collects clickable regions while a frame is drawn.
#[derive(Debug, Default)]
struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    fn register(&mut self, area: Rect, target: Target) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }
}

/// Render the application UI.
pub fn render(frame: &mut Frame, app: &mut App) {
    let mut hits = HitMap::default();
    hits.register(frame.area(), Target::Background);

    match &app.card {
        Card::Page(card) => {
            let stars = card.particles().sets().collect::<Vec<_>>();
            render_particles(frame, &stars, card.particles().clock(), app.animation_frame);
            page::render_page(frame, &view::page_view(card), app.animation_frame, &mut hits);
        }
        Card::Letter(card) => {
            let sets = card.particles().sets().collect::<Vec<_>>();
            render_particles(frame, &sets, card.particles().clock(), app.animation_frame);
            letter::render_letter(frame, &view::letter_view(card), app.animation_frame, &mut hits);
        }
    }

    app.hit_regions = hits.regions;
}

/// Draw every particle that has started animating.
fn render_particles(frame: &mut Frame, sets: &[&ParticleSet], clock: Duration, animation_frame: u64) {
    let area = frame.area();
    for set in sets {
        let age = set.age(clock);
        for (i, particle) in set.particles.iter().enumerate() {
            let Some((x, y, glyph, color)) =
                particle_cell(set.kind, particle, age, area, i, animation_frame)
            else {
                continue;
            };
            let span = Span::styled(glyph.to_string(), Style::default().fg(color));
            frame.render_widget(Paragraph::new(span), Rect::new(x, y, 1, 1));
        }
    }
}

/// Where and how one particle is drawn this frame, if at all.
fn particle_cell(
    kind: ParticleKind,
    particle: &Particle,
    age: Duration,
    area: Rect,
    index: usize,
    animation_frame: u64,
) -> Option<(u16, u16, char, Color)> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let phase = particle.phase(age)?;
    let column = |percent: f64| {
        let offset = (percent / 100.0 * f64::from(area.width)) as u16;
        area.x + offset.min(area.width - 1)
    };
    let row = |percent: f64| {
        let offset = (percent.rem_euclid(100.0) / 100.0 * f64::from(area.height)) as u16;
        area.y + offset.min(area.height - 1)
    };

    match kind {
        ParticleKind::Star => {
            let glyphs = ['·', '•', '✦', '★'];
            let glyph = glyphs[(particle.size as usize).saturating_sub(1).min(glyphs.len() - 1)];
            // Twinkle: dim for the middle of each cycle.
            let color = if (0.4..0.6).contains(&phase) {
                CARD_DIM
            } else if index % 3 == 0 {
                CARD_GOLD
            } else {
                CARD_WHITE
            };
            Some((column(particle.left), row(particle.top), glyph, color))
        }
        ParticleKind::Petal => {
            // Falls from the top edge with a little sideways sway.
            let sway = if (animation_frame / 8 + index as u64) % 2 == 0 { 0.0 } else { 1.5 };
            Some((
                column(particle.left + sway),
                row(particle.top + phase * 99.0),
                '❀',
                CARD_BLUSH,
            ))
        }
        ParticleKind::Heart => {
            // Floats upward, wrapping at the top.
            Some((column(particle.left), row(particle.top - phase * 40.0), '♥', CARD_ROSE))
        }
    }
}

/// A rectangle of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Style for content that is animating in or out.
fn transition_style<T>(phase: &TransitionPhase<T>) -> Style {
    match phase {
        TransitionPhase::Exiting { progress, .. } if *progress > 0.5 => {
            Style::default().add_modifier(Modifier::DIM)
        }
        TransitionPhase::Entering { progress } if *progress < 0.5 => {
            Style::default().add_modifier(Modifier::DIM)
        }
        _ => Style::default(),
    }
}

/// Rows the content slides by while it enters.
fn entering_offset<T>(phase: &TransitionPhase<T>) -> u16 {
    match phase {
        TransitionPhase::Entering { progress } => ((1.0 - progress) * 2.0).round() as u16,
        _ => 0,
    }
}

/// A photo placeholder: the label in a small frame.
fn photo_lines(photo: &Photo) -> Vec<Line<'static>> {
    let label = format!(" {} ", photo.label);
    let width = label.chars().count();
    vec![
        Line::styled(format!("╭{}╮", "─".repeat(width)), Style::default().fg(CARD_LAVENDER)),
        Line::from(vec![
            Span::styled("│", Style::default().fg(CARD_LAVENDER)),
            Span::styled(label, Style::default().fg(CARD_WHITE).italic()),
            Span::styled("│", Style::default().fg(CARD_LAVENDER)),
        ]),
        Line::styled(format!("╰{}╯", "─".repeat(width)), Style::default().fg(CARD_LAVENDER)),
    ]
}

/// Render the music toggle in the top-right corner.
fn render_music_button(frame: &mut Frame, playing: bool, area: Rect, hits: &mut HitMap) {
    let (label, color) = if playing {
        (" ♫ Music on ", CARD_GOLD)
    } else {
        (" ♪ Music off ", CARD_DIM)
    };
    let width = (label.chars().count() as u16).min(area.width);
    let button = Rect::new(area.x + area.width - width, area.y, width, 1.min(area.height));
    frame.render_widget(
        Paragraph::new(Span::styled(label, Style::default().fg(color).bold())),
        button,
    );
    hits.register(button, Target::MusicToggle);
}

/// Render a footer of key hints.
fn render_key_hints(frame: &mut Frame, hints: &[(&str, &str)], mut spans: Vec<Span<'static>>, area: Rect) {
    for (key, action) in hints {
        spans.push(Span::styled(format!(" {key}"), Style::default().fg(CARD_GOLD)));
        spans.push(Span::styled(format!(" {action} "), Style::default().fg(CARD_DIM)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Common rounded card block.
fn card_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(Span::styled(format!(" {title} "), Style::default().fg(CARD_GOLD).bold()))
        .title_alignment(Alignment::Center)
}

/// Vertical split used by both cards: top bar, body, footer.
fn frame_layout(area: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(1), // Top bar
        Constraint::Min(5),    // Card
        Constraint::Length(1), // Footer
    ])
    .areas(area)
}
