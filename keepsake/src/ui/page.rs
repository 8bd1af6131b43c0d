use super::*;

use keepsake_core::view::{GiftModal, PageView, ScreenContent};

/// Width of the main card, when the terminal allows.
const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 16;
const MODAL_WIDTH: u16 = 44;
const MODAL_HEIGHT: u16 = 14;
/// Photos per row on the memories screen
const PHOTOS_PER_ROW: usize = 3;

pub(super) fn render_page(frame: &mut Frame, view: &PageView, animation_frame: u64, hits: &mut HitMap) {
    let [top, body, footer] = frame_layout(frame.area());

    render_music_button(frame, view.music_playing, top, hits);
    render_screen(frame, view, body, hits);
    render_page_footer(frame, view, footer);

    if let Some(modal) = &view.modal {
        render_gift_modal(frame, modal, animation_frame, body, hits);
    }
}

/// Render the current screen's card.
fn render_screen(frame: &mut Frame, view: &PageView, area: Rect, hits: &mut HitMap) {
    let mut card = centered(area, CARD_WIDTH, CARD_HEIGHT);
    let offset = entering_offset(&view.phase).min(area.bottom().saturating_sub(card.bottom()));
    card.y += offset;

    let style = transition_style(&view.phase);
    let block = card_block(view.screen.as_str(), CARD_LAVENDER).style(style);
    let inner = block.inner(card);
    frame.render_widget(Clear, card);
    frame.render_widget(block, card);

    let lines = match &view.content {
        ScreenContent::Home { title, subtitle } => vec![
            Line::raw(""),
            Line::from(vec![
                Span::styled("★ ", Style::default().fg(CARD_GOLD)),
                Span::styled(*title, Style::default().fg(CARD_ROSE).bold()),
                Span::styled(" ★", Style::default().fg(CARD_GOLD)),
            ]),
            Line::raw(""),
            Line::styled(*subtitle, Style::default().fg(CARD_WHITE).italic()),
            Line::raw(""),
            Line::styled("♥ ♥ ♥", Style::default().fg(CARD_ROSE)),
        ],
        ScreenContent::Memories { title, photos } => {
            let mut lines = vec![
                Line::styled(*title, Style::default().fg(CARD_ROSE).bold()),
                Line::raw(""),
            ];
            for row in photos.chunks(PHOTOS_PER_ROW) {
                lines.extend(photo_row(row));
            }
            lines
        }
        ScreenContent::Message { title, body } => vec![
            Line::styled(*title, Style::default().fg(CARD_ROSE).bold()),
            Line::raw(""),
            Line::styled(*body, Style::default().fg(CARD_WHITE)),
        ],
        ScreenContent::Gift {
            title,
            prompt,
            button,
        } => {
            render_gift_button(frame, button, inner, hits);
            vec![
                Line::styled(*title, Style::default().fg(CARD_ROSE).bold()),
                Line::raw(""),
                Line::styled(*prompt, Style::default().fg(CARD_WHITE)),
            ]
        }
    };

    // Leave the bottom rows to the gift button.
    let text_area = match view.content {
        ScreenContent::Gift { .. } => Rect {
            height: inner.height.saturating_sub(3),
            ..inner
        },
        _ => inner,
    };
    let paragraph = Paragraph::new(lines)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, text_area);
}

/// Photo frames laid side by side.
fn photo_row(photos: &[Photo]) -> Vec<Line<'static>> {
    let framed: Vec<_> = photos.iter().map(photo_lines).collect();
    (0..3)
        .map(|i| {
            let mut spans = Vec::new();
            for (n, lines) in framed.iter().enumerate() {
                if n > 0 {
                    spans.push(Span::raw("  "));
                }
                if let Some(line) = lines.get(i) {
                    spans.extend(line.spans.iter().cloned());
                }
            }
            Line::from(spans)
        })
        .collect()
}

fn render_gift_button(frame: &mut Frame, label: &str, inner: Rect, hits: &mut HitMap) {
    if inner.height < 2 {
        return;
    }
    let text = format!("[ ❖ {label} ]");
    let width = (text.chars().count() as u16).min(inner.width);
    let button = Rect::new(
        inner.x + (inner.width - width) / 2,
        inner.y + inner.height - 2,
        width,
        1,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(Color::Black).bg(CARD_GOLD).bold(),
        )),
        button,
    );
    hits.register(button, Target::OpenGift);
}

/// Render the gift modal over the page body.
fn render_gift_modal(
    frame: &mut Frame,
    modal: &GiftModal,
    animation_frame: u64,
    area: Rect,
    hits: &mut HitMap,
) {
    // Backdrop hides the page and catches presses outside the modal.
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Rgb(25, 10, 35))),
        area,
    );
    hits.register(area, Target::GiftBackdrop);

    let modal_area = centered(area, MODAL_WIDTH, MODAL_HEIGHT);
    frame.render_widget(Clear, modal_area);

    match modal {
        GiftModal::Wrapped { hint } => {
            let block = card_block("🎁", CARD_ROSE);
            let inner = block.inner(modal_area);
            frame.render_widget(block, modal_area);

            // The bow bounces while the gift waits to be opened.
            let bow = if (animation_frame / 5) % 2 == 0 { "❀" } else { "✿" };
            let gift = Style::default().fg(CARD_CRIMSON);
            let lines = vec![
                Line::raw(""),
                Line::styled(bow, Style::default().fg(CARD_GOLD)),
                Line::styled("╔═════╦═════╗", gift),
                Line::styled("║     ║     ║", gift),
                Line::styled("╠═════╬═════╣", gift),
                Line::styled("║     ║     ║", gift),
                Line::styled("╚═════╩═════╝", gift),
                Line::raw(""),
                Line::styled(*hint, Style::default().fg(CARD_DIM).italic()),
            ];
            frame.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                inner,
            );
            hits.register(modal_area, Target::GiftBox);
        }
        GiftModal::Revealed {
            title,
            text,
            photo,
            close,
        } => {
            let block = card_block(title, CARD_ROSE);
            let inner = block.inner(modal_area);
            frame.render_widget(block, modal_area);
            // Presses on the open modal stay inside it.
            hits.register(modal_area, Target::GiftBox);

            let mut lines = vec![
                Line::raw(""),
                Line::styled(*text, Style::default().fg(CARD_WHITE)),
                Line::raw(""),
            ];
            lines.extend(photo_lines(photo));
            frame.render_widget(
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                inner,
            );

            if inner.height >= 2 {
                let label = format!("[ {close} ]");
                let width = (label.chars().count() as u16).min(inner.width);
                let button = Rect::new(
                    inner.x + (inner.width - width) / 2,
                    inner.y + inner.height - 1,
                    width,
                    1,
                );
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        label,
                        Style::default().fg(Color::Black).bg(CARD_ROSE).bold(),
                    )),
                    button,
                );
                hits.register(button, Target::CloseGift);
            }
        }
    }
}

/// Render the footer with screen position dots.
fn render_page_footer(frame: &mut Frame, view: &PageView, area: Rect) {
    // Build screen position dots (●○○○)
    let mut dots: Vec<Span> = vec![Span::raw(" ")];
    for i in 0..view.screen_count {
        if i == view.position {
            dots.push(Span::styled("●", Style::default().fg(CARD_ROSE)));
        } else {
            dots.push(Span::styled("○", Style::default().fg(CARD_DIM)));
        }
    }
    dots.push(Span::styled(" │", Style::default().fg(CARD_DIM)));

    let hints: &[(&str, &str)] = match view.modal {
        Some(GiftModal::Wrapped { .. }) => &[("Enter", "unwrap"), ("m", "music"), ("q", "quit")],
        Some(GiftModal::Revealed { .. }) => {
            &[("Enter/Esc", "close"), ("m", "music"), ("q", "quit")]
        }
        None => &[
            ("click/←/→", "screens"),
            ("1-9", "jump"),
            ("m", "music"),
            ("q", "quit"),
        ],
    };
    render_key_hints(frame, hints, dots, area);
}
