use super::*;

use keepsake_core::view::{LetterContent, LetterView};

const ENVELOPE_WIDTH: u16 = 32;
const ENVELOPE_HEIGHT: u16 = 9;
const LETTER_WIDTH: u16 = 60;
const LETTER_HEIGHT: u16 = 22;

pub(super) fn render_letter(frame: &mut Frame, view: &LetterView, animation_frame: u64, hits: &mut HitMap) {
    let [top, body, footer] = frame_layout(frame.area());

    render_music_button(frame, view.music_playing, top, hits);
    match &view.content {
        LetterContent::Envelope { hint } => {
            render_envelope(frame, view, hint, animation_frame, body, hits)
        }
        content => render_paper(frame, view, content, body, hits),
    }
    render_key_hints(
        frame,
        &[("click/Enter/→", "next"), ("m", "music"), ("q", "quit")],
        Vec::new(),
        footer,
    );
}

/// The closed envelope with its hint underneath.
fn render_envelope(
    frame: &mut Frame,
    view: &LetterView,
    hint: &str,
    animation_frame: u64,
    area: Rect,
    hits: &mut HitMap,
) {
    let [envelope_row, hint_row] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(area);
    let envelope = centered(envelope_row, ENVELOPE_WIDTH, ENVELOPE_HEIGHT);

    let style = transition_style(&view.phase);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(CARD_PAPER))
        .style(style);
    let inner = block.inner(envelope);
    frame.render_widget(Clear, envelope);
    frame.render_widget(block, envelope);

    // The seal pulses until the envelope is opened.
    let seal = if (animation_frame / 6) % 2 == 0 { "♥" } else { "♡" };
    let flap = Style::default().fg(CARD_PAPER);
    let lines = vec![
        Line::styled("╲                          ╱", flap),
        Line::styled("  ╲                      ╱  ", flap),
        Line::styled("    ╲                  ╱    ", flap),
        Line::from(vec![
            Span::styled("      ╲──────  ", flap),
            Span::styled(seal, Style::default().fg(CARD_CRIMSON).bold()),
            Span::styled("  ──────╱      ", flap),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).style(style).alignment(Alignment::Center),
        inner,
    );
    hits.register(envelope, Target::Envelope);

    frame.render_widget(
        Paragraph::new(Line::styled(hint, Style::default().fg(CARD_DIM).italic()))
            .alignment(Alignment::Center),
        hint_row,
    );
}

/// The opened card: the letter, then the album pages.
fn render_paper(
    frame: &mut Frame,
    view: &LetterView,
    content: &LetterContent,
    area: Rect,
    hits: &mut HitMap,
) {
    let mut card = centered(area, LETTER_WIDTH, LETTER_HEIGHT);
    let offset = entering_offset(&view.phase).min(area.bottom().saturating_sub(card.bottom()));
    card.y += offset;

    let style = transition_style(&view.phase);
    let (title, lines) = match content {
        LetterContent::Letter {
            heading,
            photo,
            body,
            hint,
        } => {
            let mut lines = vec![
                Line::styled(*heading, Style::default().fg(CARD_ROSE).bold()),
                Line::raw(""),
            ];
            lines.extend(photo_lines(photo));
            lines.push(Line::raw(""));
            lines.push(Line::styled(*body, Style::default().fg(CARD_WHITE)));
            lines.push(Line::raw(""));
            lines.push(Line::styled(*hint, Style::default().fg(CARD_DIM).italic()));
            ("💌", lines)
        }
        LetterContent::Album {
            title,
            photo,
            index,
            total,
            hint,
            banner,
        } => {
            let mut lines = vec![Line::raw("")];
            if let Some(photo) = photo {
                lines.extend(photo_lines(photo));
            }
            lines.push(Line::styled(
                format!("{} / {}", index + 1, total),
                Style::default().fg(CARD_DIM),
            ));
            lines.push(Line::raw(""));
            match banner {
                Some(banner) => lines.push(Line::from(vec![
                    Span::styled("✨ ", Style::default().fg(CARD_GOLD)),
                    Span::styled(*banner, Style::default().fg(CARD_ROSE).bold()),
                    Span::styled(" ✨", Style::default().fg(CARD_GOLD)),
                ])),
                None => lines.push(Line::styled(*hint, Style::default().fg(CARD_DIM).italic())),
            }
            (*title, lines)
        }
        // The closed envelope is drawn by `render_envelope`.
        LetterContent::Envelope { .. } => return,
    };

    let block = card_block(title, CARD_PAPER).style(style);
    frame.render_widget(Clear, card);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        card,
    );
    hits.register(card, Target::Envelope);
}
