//! Floating "live revenue" badge.
//!
//! Appears in the bottom-right corner of the workspace once a free user has
//! seen at least one ad impression.

use crate::app::App;
use crate::constants::AD_CPM;
use crate::theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const WIDTH: u16 = 30;
const HEIGHT: u16 = 4;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let stats = app.ad_stats();
    if !app.authenticated || app.user.is_vip || stats.impressions == 0 {
        return;
    }
    if area.width < WIDTH || area.height < HEIGHT {
        return;
    }

    let badge = Rect {
        x: area.x + area.width - WIDTH,
        y: area.y + area.height - HEIGHT,
        width: WIDTH,
        height: HEIGHT,
    };
    frame.render_widget(Clear, badge);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::SUCCESS))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(Span::styled(
            " LIVE REVENUE ",
            Style::default()
                .fg(theme::SUCCESS)
                .add_modifier(Modifier::BOLD),
        ));

    let text = vec![
        Line::from(Span::styled(
            format!("${:.4}", stats.revenue),
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("CPM ${AD_CPM:.2} • {} Imps", stats.impressions),
            Style::default().fg(theme::INACTIVE),
        )),
    ];

    frame.render_widget(Paragraph::new(text).block(block), badge);
}
