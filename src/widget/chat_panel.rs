//! Chat pane: message history, typing indicator, and the input line

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::chat::{ChatInput, ChatLog, ChatMessage, Role};
use crate::theme::{Palette, current_theme};

const WELCOME: &str = "Upload a PDF or pick a document, then ask a question about it.";
const INPUT_HEIGHT: u16 = 3;

/// Everything the chat pane needs for one frame
pub struct ChatPanelView<'a> {
    pub log: &'a ChatLog,
    pub input: &'a ChatInput,
    pub active_document: Option<&'a str>,
    /// True while an answer is in flight; the input is read-only
    pub locked: bool,
    pub is_focused: bool,
    /// Frame counter driving the typing animation
    pub tick: u64,
    /// Rows scrolled up from the latest message
    pub scroll_from_bottom: usize,
}

pub fn render(frame: &mut Frame, area: Rect, view: &ChatPanelView) {
    let palette = current_theme();
    let (fg, border) = palette.panel_colors(view.is_focused);

    let title = match view.active_document {
        Some(doc) => format!(" Chat \u{b7} {doc} "),
        None => " Chat ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.panel_bg))
        .title(Span::styled(title, Style::default().fg(fg)));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height <= INPUT_HEIGHT {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(INPUT_HEIGHT)])
        .split(inner);

    render_messages(frame, chunks[0], view, palette);
    render_input(frame, chunks[1], view, palette);
}

fn render_messages(frame: &mut Frame, area: Rect, view: &ChatPanelView, palette: &Palette) {
    if view.log.shows_welcome() {
        let paragraph = Paragraph::new(WELCOME)
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        let y = area.y + area.height / 3;
        frame.render_widget(
            paragraph,
            Rect::new(area.x, y, area.width, area.height - area.height / 3),
        );
        return;
    }

    let wrap_width = (area.width as usize).saturating_sub(2).max(8);
    let mut lines: Vec<Line> = Vec::new();
    for message in view.log.messages() {
        push_message_lines(&mut lines, message, wrap_width, palette);
    }
    if view.log.is_typing() {
        lines.push(typing_line(view.tick, palette));
    }

    // Pin to the bottom, offset by any manual scroll
    let height = area.height as usize;
    let first = lines
        .len()
        .saturating_sub(height + view.scroll_from_bottom.min(lines.len().saturating_sub(height)));
    let visible: Vec<Line> = lines.into_iter().skip(first).take(height).collect();
    frame.render_widget(Paragraph::new(visible), area);
}

fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &ChatMessage,
    wrap_width: usize,
    palette: &Palette,
) {
    let (label, color) = role_style(message.role, palette);
    if !lines.is_empty() {
        lines.push(Line::default());
    }
    lines.push(Line::from(vec![
        Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            message.time_label(),
            Style::default().fg(palette.muted),
        ),
    ]));
    for src_line in message.text.lines() {
        if src_line.trim().is_empty() {
            lines.push(Line::default());
            continue;
        }
        for wrapped in textwrap::wrap(src_line, wrap_width) {
            lines.push(Line::from(Span::styled(
                format!("  {wrapped}"),
                Style::default().fg(color),
            )));
        }
    }
}

fn role_style(role: Role, palette: &Palette) -> (&'static str, Color) {
    match role {
        Role::User => ("You", palette.user_msg),
        Role::Assistant => ("Assistant", palette.assistant_msg),
        Role::System => ("\u{2139}", palette.system_msg),
        Role::Error => ("\u{2715}", palette.error),
    }
}

fn typing_line(tick: u64, palette: &Palette) -> Line<'static> {
    // One dot every ~4 ticks, cycling 1..=3
    let dots = ".".repeat((tick / 4 % 3 + 1) as usize);
    Line::from(Span::styled(
        format!("  Assistant is typing{dots}"),
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::ITALIC),
    ))
}

fn render_input(frame: &mut Frame, area: Rect, view: &ChatPanelView, palette: &Palette) {
    let (title, title_color) = if view.locked {
        (" Waiting for answer\u{2026} ", palette.muted)
    } else {
        (" Ask a question ", palette.accent)
    };

    let border = if view.is_focused && !view.locked {
        palette.border_focused
    } else {
        palette.border
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, Style::default().fg(title_color)));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    // Horizontal window that keeps the cursor visible
    let width = inner.width as usize;
    let cursor = view.input.cursor();
    let skip = cursor.saturating_sub(width.saturating_sub(1));
    let visible: String = view.input.text().chars().skip(skip).take(width).collect();

    let style = if view.locked {
        Style::default().fg(palette.muted)
    } else {
        Style::default().fg(palette.fg)
    };
    frame.render_widget(Paragraph::new(visible).style(style), inner);

    if view.is_focused && !view.locked {
        frame.set_cursor_position((inner.x + (cursor - skip) as u16, inner.y));
    }
}
