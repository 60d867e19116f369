//! Sign-in screen shown while no session is active.

use crate::app::App;
use crate::constants::{APP_NAME, APP_VERSION};
use crate::theme;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    let [area] = Layout::vertical([Constraint::Length(12)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Length(56)])
        .flex(Flex::Center)
        .areas(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_PRIMARY))
        .title(Span::styled(
            format!(" {APP_NAME} v{APP_VERSION} "),
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" [Enter] Sign in  [Esc] Quit ").centered());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Sign in",
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Secure access to the Timor network",
            Style::default().fg(theme::INACTIVE),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Email",
            Style::default().fg(theme::TEXT_SECONDARY),
        )),
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(theme::INACTIVE)),
            Span::styled(
                app.login_email.as_str(),
                Style::default().fg(theme::TEXT_PRIMARY),
            ),
            Span::styled(
                "█",
                Style::default()
                    .fg(theme::ACCENT_SECONDARY)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Any address works; staff accounts get their own role.",
            Style::default().fg(theme::INACTIVE),
        )),
    ];

    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center),
        area,
    );
}
