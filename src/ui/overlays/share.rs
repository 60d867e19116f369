//! Invite overlay listing the share targets.

use super::centered_rect;
use crate::constants::{APP_NAME, APP_URL};
use crate::share::ShareTarget;
use crate::theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// `selected` 0 is the plain link; the targets follow in order.
pub fn render(frame: &mut Frame, selected: usize) {
    let area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_SECONDARY))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(format!(" Share {APP_NAME} "))
        .title_bottom(Line::from(" [↑↓] Move  [Enter] Copy link  [Esc] Close ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let row = |index: usize, label: String| {
        let style = if index == selected {
            Style::default()
                .bg(theme::ROW_SELECTED_BG)
                .fg(theme::ROW_SELECTED_FG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_PRIMARY)
        };
        Line::from(Span::styled(format!(" {label:<40}"), style))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Invite friends to a faster, safer internet.",
            Style::default().fg(theme::INACTIVE),
        )),
        Line::from(""),
    ];
    lines.extend(
        ShareTarget::ALL
            .iter()
            .enumerate()
            .map(|(i, target)| row(i + 1, format!("↗ {}", target.name()))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Or copy the link manually",
        Style::default().fg(theme::INACTIVE),
    )));
    lines.push(row(0, format!("⧉ {APP_URL}")));

    frame.render_widget(Paragraph::new(lines), inner);
}
