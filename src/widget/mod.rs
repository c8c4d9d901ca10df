//! UI widgets for the two panels and their popups

pub mod chat_panel;
pub mod dialogs;
pub mod document_selector;
pub mod help_popup;
pub mod toast;
pub mod viewer_panel;

use ratatui::layout::Rect;

/// Rect of `width` x `height` centered inside `area`, clamped to fit
#[must_use]
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
