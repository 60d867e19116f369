//! Popups drawn above the dashboard.

pub mod help;
pub mod payment;
pub mod profile;
pub mod share;
pub mod toast;
pub mod withdraw;

use crate::theme;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Create a centered rectangle
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Labelled single-line text input; the focused one shows a cursor.
pub(super) fn input_field<'a>(label: &'a str, value: &'a str, focused: bool) -> Vec<Line<'a>> {
    let label_style = if focused {
        Style::default()
            .fg(theme::ACCENT_SECONDARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::TEXT_SECONDARY)
    };

    let mut input = vec![
        Span::styled(" > ", Style::default().fg(theme::INACTIVE)),
        Span::styled(value, Style::default().fg(theme::TEXT_PRIMARY)),
    ];
    if focused {
        input.push(Span::styled(
            "█",
            Style::default()
                .fg(theme::ACCENT_SECONDARY)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }

    vec![Line::from(Span::styled(label, label_style)), Line::from(input)]
}
