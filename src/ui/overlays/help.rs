//! Help overlay

use super::centered_rect;
use crate::app::App;
use crate::constants::{APP_NAME, APP_URL};
use crate::session;
use crate::theme;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render help overlay
pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(80, 80, frame.area());

    // Clear the background
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_SECONDARY))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(format!(" {APP_NAME} Help "));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key_style = Style::default()
        .fg(theme::ACCENT_SECONDARY)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(theme::TEXT_PRIMARY);
    let header_style = Style::default()
        .fg(theme::WARNING)
        .add_modifier(Modifier::BOLD);
    let subtle_style = Style::default().fg(theme::INACTIVE);

    let entry = |key: &'static str, desc: &'static str| {
        [
            Span::styled(format!("{key:<10}"), key_style),
            Span::styled(format!("{desc:<26}"), desc_style),
        ]
    };
    let row = |pairs: &[(&'static str, &'static str)]| {
        let mut spans = vec![Span::raw("  ")];
        for (key, desc) in pairs {
            spans.extend(entry(*key, *desc));
        }
        Line::from(spans)
    };
    let header = |title: &'static str| Line::from(vec![Span::raw("  "), Span::styled(title, header_style)]);

    let mut lines = vec![
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                APP_NAME.to_uppercase(),
                Style::default()
                    .fg(theme::ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - Private internet, wallet and VIP "),
            Span::styled(format!("v{}", env!("CARGO_PKG_VERSION")), subtle_style),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("Invite link: ", subtle_style),
            Span::styled(
                APP_URL,
                Style::default()
                    .fg(theme::ACCENT_SECONDARY)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]),
        Line::from(""),
        header("GLOBAL CONTROLS"),
        row(&[("1-4", "Go to page"), ("Tab", "Next menu entry")]),
        row(&[("m", "Toggle menu drawer"), ("?", "Toggle help")]),
        row(&[("s", "Share app"), ("i", "Install app")]),
        row(&[("L", "Log out"), ("q", "Quit")]),
        row(&[("PgUp/PgDn", "Scroll event log"), ("Ctrl-C", "Quit anywhere")]),
        Line::from(""),
        header("PRIVATE INTERNET"),
        row(&[("c/Enter", "Connect / disconnect"), ("j/k", "Move in server list")]),
        row(&[("Space", "Select server"), ("f", "Fastest server")]),
        row(&[("b", "Bluetooth mesh"), ("u", "Upgrade to VIP")]),
        Line::from(""),
        header("PROFILE"),
        row(&[("e", "Edit name and email"), ("a", "Change photo")]),
    ];

    if session::is_owner(&app.user) {
        lines.push(row(&[("r", "Switch role (owner)")]));
    }
    if session::has_wallet_access(&app.user) {
        lines.push(Line::from(""));
        lines.push(header("FINANCE"));
        lines.push(row(&[("w", "Withdraw funds"), ("x", "Cycle currency")]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "                      Press any key to close",
        subtle_style,
    )));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}
