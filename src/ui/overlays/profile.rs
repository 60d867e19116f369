//! Profile edit and avatar upload dialogs.

use super::{centered_rect, input_field};
use crate::app::ProfileField;
use crate::theme;
use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render_edit(frame: &mut Frame, focus: ProfileField, name: &str, email: &str) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_PRIMARY))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(" Edit Profile ")
        .title_bottom(Line::from(" [Tab] Field  [Enter] Save  [Esc] Cancel ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    lines.extend(input_field("Full Name", name, focus == ProfileField::Name));
    lines.push(Line::from(""));
    lines.extend(input_field("Email", email, focus == ProfileField::Email));

    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_avatar_path(frame: &mut Frame, path: &str) {
    let area = centered_rect(70, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_PRIMARY))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(" Change Photo ")
        .title_bottom(Line::from(" [Enter] Upload  [Esc] Cancel ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::from("")];
    lines.extend(input_field("Path to an image file:", path, true));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Example: ~/Pictures/me.png",
        Style::default().fg(theme::INACTIVE),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
