//! Toast rendering in the top-right corner

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Clear, Paragraph};

use crate::notification::{NotificationLevel, NotificationManager};
use crate::theme::current_theme;

const MAX_VISIBLE: usize = 4;
const MAX_WIDTH: u16 = 44;

pub fn render(frame: &mut Frame, area: Rect, notifications: &NotificationManager) {
    let palette = current_theme();

    for (idx, notification) in notifications.all().iter().take(MAX_VISIBLE).enumerate() {
        let text = format!(" {} ", notification.message);
        let width = (text.chars().count() as u16).min(MAX_WIDTH).min(area.width);
        let y = area.y + 1 + idx as u16;
        if y >= area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width - 1, y, width, 1);

        let bg = level_color(notification.level);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(text).style(
                Style::default()
                    .bg(bg)
                    .fg(palette.selection_fg)
                    .add_modifier(Modifier::BOLD),
            ),
            rect,
        );
    }
}

fn level_color(level: NotificationLevel) -> Color {
    let palette = current_theme();
    match level {
        NotificationLevel::Success => palette.success,
        NotificationLevel::Info => palette.accent,
        NotificationLevel::Warning => palette.warning,
        NotificationLevel::Error => palette.error,
    }
}
