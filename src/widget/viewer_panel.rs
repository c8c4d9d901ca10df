//! Document pane: continuous page scroll with separators and zoom readout

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::theme::current_theme;
use crate::viewer::{LoadStatus, Row, Viewer};

pub fn render(frame: &mut Frame, area: Rect, viewer: &mut Viewer, is_focused: bool) {
    let palette = current_theme();
    let (fg, border) = palette.panel_colors(is_focused);

    let title = match &viewer.state.filename {
        Some(filename) => format!(" {filename} "),
        None => " Document ".to_string(),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.panel_bg))
        .title(Span::styled(title, Style::default().fg(fg)));

    if viewer.state.has_document() {
        let indicator = format!(
            " Page {}/{} \u{b7} {}% ",
            viewer.state.current_page,
            viewer.state.page_count,
            viewer.state.zoom.percent()
        );
        block = block.title_bottom(
            Line::from(Span::styled(indicator, Style::default().fg(palette.muted)))
                .right_aligned(),
        );
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match &viewer.state.status {
        LoadStatus::Empty => {
            render_placeholder(frame, inner, "No document selected", palette.muted);
            return;
        }
        LoadStatus::Loading(filename) => {
            let message = format!("Loading {filename}\u{2026}");
            render_placeholder(frame, inner, &message, palette.muted);
            return;
        }
        LoadStatus::Failed(message) => {
            let message = format!("Could not load document: {message}");
            render_placeholder(frame, inner, &message, palette.error);
            return;
        }
        LoadStatus::Loaded => {}
    }

    viewer.prepare(inner.width, inner.height as usize);

    let layout = viewer.layout();
    let visible = layout
        .rows
        .iter()
        .skip(viewer.scroll_row)
        .take(inner.height as usize);

    let mut lines = Vec::with_capacity(inner.height as usize);
    for row in visible {
        match row {
            Row::Separator { page } => lines.push(separator_line(*page, inner.width)),
            Row::Text { line, .. } => {
                lines.push(Line::from(Span::styled(
                    line.clone(),
                    Style::default().fg(palette.fg),
                )));
            }
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn separator_line(page: usize, width: u16) -> Line<'static> {
    let palette = current_theme();
    let label = format!(" Page {page} ");
    let remaining = (width as usize).saturating_sub(label.chars().count());
    let left = remaining / 2;
    let right = remaining - left;
    let text = format!("{}{label}{}", "\u{2500}".repeat(left), "\u{2500}".repeat(right));
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::DIM),
    ))
}

fn render_placeholder(frame: &mut Frame, inner: Rect, message: &str, color: ratatui::style::Color) {
    // Sit a third of the way down so the message reads as pane content,
    // not a title.
    let y = inner.y + inner.height / 3;
    let area = Rect::new(inner.x, y, inner.width, inner.height - inner.height / 3);
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(ratatui::widgets::Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
