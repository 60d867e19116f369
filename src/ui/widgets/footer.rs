//! Footer widget with keybinding hints

use crate::access::View;
use crate::app::App;
use crate::connection::ConnectionStatus;
use crate::constants::APP_URL;
use crate::theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the footer for the current page
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![("1-4", "Pages"), ("Tab", "Next")];

    match app.visible_page() {
        Some(View::Dashboard) if !app.user.is_vip => hints.push(("u", "Go VIP")),
        Some(View::Internet) => {
            let power = match app.connection.status() {
                ConnectionStatus::Disconnected => "Connect",
                ConnectionStatus::Connected => "Disconnect",
                _ => "Wait",
            };
            hints.extend([
                ("Enter", power),
                ("↑↓", "Servers"),
                ("Space", "Select"),
                ("f", "Fastest"),
                ("b", "Mesh"),
            ]);
        }
        Some(View::Wallet) => hints.extend([("w", "Withdraw"), ("x", "Currency")]),
        Some(View::Profile) => {
            hints.extend([("e", "Edit"), ("a", "Photo")]);
            if crate::session::is_owner(&app.user) {
                hints.push(("r", "Switch Role"));
            }
        }
        _ => {}
    }

    hints.extend([("s", "Share"), ("?", "Help"), ("q", "Quit")]);

    render_hints(frame, area, &hints);
}

fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let mut spans = Vec::new();
    spans.push(Span::raw(" "));

    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("[", Style::default().fg(theme::NORD_POLAR_NIGHT_3)));
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(theme::ACCENT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("]", Style::default().fg(theme::NORD_POLAR_NIGHT_3)));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*action, Style::default().fg(theme::INACTIVE)));
    }

    let line = Line::from(spans);
    let area_width = area.width as usize;
    let line_width = line.width();

    frame.render_widget(Paragraph::new(line), area);

    // Subtle link at the end when there is room
    let link = format!("{} ", APP_URL.trim_start_matches("https://"));
    if area_width > line_width + link.len() + 2 {
        #[allow(clippy::cast_possible_truncation)]
        let link_area = Rect::new(
            area.x + area.width - link.len() as u16,
            area.y,
            link.len() as u16,
            1,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                link,
                Style::default().fg(theme::NORD_POLAR_NIGHT_3),
            )),
            link_area,
        );
    }
}
