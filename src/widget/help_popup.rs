//! Key binding reference popup

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;
use crate::theme::current_theme;

const BINDINGS: &[(&str, &str)] = &[
    ("Tab", "Switch panel"),
    ("Enter", "Send question"),
    ("Ctrl+O", "Open document list"),
    ("Ctrl+U", "Upload a PDF"),
    ("Ctrl+L", "Clear chat"),
    ("Ctrl+T", "Toggle light/dark theme"),
    ("Ctrl+= / Ctrl+-", "Zoom in / out"),
    ("Ctrl+0", "Zoom to fit width"),
    ("\u{2190} / \u{2192}, PgUp / PgDn", "Previous / next page"),
    ("j / k, \u{2191} / \u{2193}", "Scroll"),
    ("g / G", "First / last page"),
    ("Esc", "Dismiss toast"),
    ("?", "This help"),
    ("q, Ctrl+C", "Quit"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let palette = current_theme();
    let popup = centered_rect(44, BINDINGS.len() as u16 + 2, area);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_focused))
        .style(Style::default().bg(palette.panel_bg))
        .title(Span::styled(" Keys ", Style::default().fg(palette.accent)));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(
                    format!(" {keys:<18}"),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled((*action).to_string(), Style::default().fg(palette.fg)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
