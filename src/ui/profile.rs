//! Profile page: identity card, owner controls and account details.

use crate::access::View;
use crate::app::App;
use crate::session::{self, Role};
use crate::theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::dashboard::tier_badge;

/// Details the profile form shows but does not store.
const PHONE: &str = "+60 14 300 2703";
const LOCATION: &str = "Malaysia";
const BIO: &str =
    "Founder & CEO of Timor App. Sole owner and operator of the global network infrastructure.";

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).split(area);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                View::Profile.title(),
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Manage your profile information and account security.",
                Style::default().fg(theme::INACTIVE),
            )),
        ]),
        chunks[0],
    );

    let cols = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);
    render_identity(frame, app, cols[0]);
    render_details(frame, app, cols[1]);
}

fn role_color(role: Role) -> Color {
    match role {
        Role::SuperAdmin => theme::ACCENT_PRIMARY,
        Role::Admin => theme::NORD_PURPLE,
        Role::VipMember => theme::VIP,
        Role::User => theme::NORD_FROST_3,
    }
}

fn render_identity(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Account ")
        .title_bottom(Line::from(" [a] Change Photo ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let user = &app.user;
    let avatar = if user.avatar.starts_with("data:") {
        "uploaded image".to_string()
    } else {
        crate::utils::truncate(&user.avatar, usize::from(inner.width.saturating_sub(2)))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "◉",
            Style::default()
                .fg(theme::TEXT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(avatar, Style::default().fg(theme::INACTIVE))),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                user.name.as_str(),
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            tier_badge(user.is_vip),
        ]),
        Line::from(Span::styled(
            format!(" {} ", user.role),
            Style::default()
                .bg(role_color(user.role))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Status   ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled("Active", Style::default().fg(theme::SUCCESS)),
        ]),
        Line::from(vec![
            Span::styled("Joined   ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled("Jan 2024", Style::default().fg(theme::TEXT_PRIMARY)),
        ]),
    ];

    // Owner controls are hidden from everyone else
    if session::is_owner(user) {
        let target = if user.role == Role::SuperAdmin {
            Role::User
        } else {
            Role::SuperAdmin
        };
        lines.extend([
            Line::from(""),
            Line::from(Span::styled(
                "OWNER CONTROLS",
                Style::default()
                    .fg(theme::INACTIVE)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("[r] Switch Mode ({target})"),
                Style::default().fg(theme::ACCENT_SECONDARY),
            )),
            Line::from(Span::styled(
                format!("Only visible to {}", user.email),
                Style::default().fg(theme::INACTIVE),
            )),
        ]);
    }

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        inner,
    );
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Personal Details ")
        .title_bottom(Line::from(" [e] Edit ").centered());

    let mut lines = Vec::new();
    let mut field = |label: &str, value: &str| {
        lines.push(Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(theme::TEXT_SECONDARY),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {value}"),
            Style::default().fg(theme::TEXT_PRIMARY),
        )));
        lines.push(Line::from(""));
    };

    field("Full Name", &app.user.name);
    field("Email", &app.user.email);
    field("Phone Number", PHONE);
    field("Location", LOCATION);
    field("Bio", BIO);
    field("Member ID", &app.user.id);

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
