//! Toast notification overlay

use crate::app::App;
use crate::theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render toast notification
pub fn render(frame: &mut Frame, app: &App) {
    let Some(toast) = &app.toast else {
        return;
    };

    let area = frame.area();
    let width = (area.width / 3).clamp(30, 60).min(area.width);

    // Height follows the wrapped message
    let inner_width = width.saturating_sub(4) as usize;
    let text_len = toast.message.chars().count();
    #[allow(clippy::cast_possible_truncation)]
    let text_lines = if inner_width > 0 {
        text_len.div_ceil(inner_width).max(1) as u16
    } else {
        1
    };

    let height = (text_lines + 4).max(5).min(area.height);

    // Bottom center, above the footer
    let toast_area = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + area.height.saturating_sub(height + 2),
        width,
        height,
    };

    // Clear the background
    frame.render_widget(Clear, toast_area);

    let accent = if toast.message.starts_with("Error") || toast.message.contains("failed") {
        theme::ERROR
    } else {
        theme::ACCENT_SECONDARY
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(Span::styled(
            " INFO ",
            Style::default()
                .fg(Color::Black)
                .bg(accent)
                .add_modifier(Modifier::BOLD),
        ));

    let inner_area = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let vertical_chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(text_lines),
        Constraint::Fill(1),
    ])
    .split(inner_area);

    let paragraph = Paragraph::new(toast.message.as_str())
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, vertical_chunks[1]);
}
