//! Sponsored placement shown to free users on monetized pages.

use crate::theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::NORD_POLAR_NIGHT_4))
        .title(Span::styled(
            " Ads by TimorAds ",
            Style::default().fg(theme::INACTIVE),
        ))
        .title_bottom(Line::from(" [u] Remove ads with VIP ").right_aligned());

    let text = vec![
        Line::from(Span::styled(
            "Slow internet? Switch provider!",
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Get up to 1 Gbps at a special price, today only.",
            Style::default().fg(theme::TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "Open now",
            Style::default()
                .fg(theme::NORD_FROST_3)
                .add_modifier(Modifier::UNDERLINED),
        )),
    ];

    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        area,
    );
}
