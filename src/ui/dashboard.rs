use crate::access::{self, View};
use crate::app::App;
use crate::connection::ConnectionStatus;
use crate::constants::APP_VERSION;
use crate::session;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, Paragraph, Sparkline, Wrap},
    Frame,
};

use super::widgets;
use crate::theme;

/// Below this width the sidebar becomes a drawer toggled with `m`.
const SIDEBAR_MIN_WIDTH: u16 = 100;

/// Daily unique visitors, Monday first.
const TRAFFIC: [(&str, u64); 7] = [
    ("Mon", 4000),
    ("Tue", 3000),
    ("Wed", 2000),
    ("Thu", 2780),
    ("Fri", 1890),
    ("Sat", 2390),
    ("Sun", 3490),
];

/// Usage share per device class, in percent.
const DEVICES: [(&str, u64); 3] = [("Mobile", 65), ("Desktop", 25), ("Tablet", 10)];

/// Render the dashboard view
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // 1. Header (1 row)
    // 2. Main Content (Flexible)
    // 3. Command Footer (1 row)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, app, chunks[0]);
    widgets::footer::render(frame, app, chunks[2]);

    // Main Content: Left Sidebar (Menu) | Right Workspace
    let docked = area.width >= SIDEBAR_MIN_WIDTH;
    let workspace = if docked {
        let main_layout =
            Layout::horizontal([Constraint::Percentage(22), Constraint::Percentage(78)])
                .split(chunks[1]);
        render_sidebar(frame, app, main_layout[0]);
        main_layout[1]
    } else {
        chunks[1]
    };

    match app.visible_page() {
        Some(View::Dashboard) => render_home(frame, app, workspace),
        Some(View::Internet) => super::internet::render(frame, app, workspace),
        Some(View::Wallet) => super::wallet::render(frame, app, workspace),
        Some(View::Profile) => super::profile::render(frame, app, workspace),
        // Requested but not permitted: the pane stays empty
        None => frame.render_widget(Block::default(), workspace),
    }

    if !docked && app.sidebar_open {
        let drawer = Rect {
            width: (chunks[1].width * 2 / 5).max(28).min(chunks[1].width),
            ..chunks[1]
        };
        frame.render_widget(Clear, drawer);
        render_sidebar(frame, app, drawer);
    }

    widgets::revenue::render(frame, app, chunks[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.connection.status();
    let (status_text, color) = status_indicator(status);

    let separator = || Span::styled(" │ ", Style::default().fg(theme::NORD_POLAR_NIGHT_4));

    let mut spans = vec![
        Span::styled(
            format!(" TIMOR APP v{APP_VERSION} "),
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(&app.user.name, Style::default().fg(theme::TEXT_PRIMARY)),
        Span::styled(
            format!(" ({})", app.user.role),
            Style::default().fg(theme::TEXT_SECONDARY),
        ),
        Span::raw(" "),
        tier_badge(app.user.is_vip),
        separator(),
        Span::raw("VPN: "),
        Span::styled(
            status_text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];

    if session::has_wallet_access(&app.user) {
        spans.push(separator());
        spans.push(Span::raw("Balance: "));
        spans.push(Span::styled(
            app.currency.format(app.ledger.balance()),
            Style::default().fg(theme::SUCCESS),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Short status text and color for headers.
pub(super) fn status_indicator(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Disconnected => ("○ DISCONNECTED", theme::ERROR),
        ConnectionStatus::Connecting => ("◐ CONNECTING", theme::WARNING),
        ConnectionStatus::Authenticating => ("◑ AUTHENTICATING", theme::NORD_PURPLE),
        ConnectionStatus::Connected => ("● CONNECTED", theme::SUCCESS),
        ConnectionStatus::Disconnecting => ("◒ DISCONNECTING", theme::INACTIVE),
    }
}

pub(super) fn tier_badge(vip: bool) -> Span<'static> {
    if vip {
        Span::styled(
            " ♛ VIP ",
            Style::default()
                .bg(theme::VIP)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " FREE ",
            Style::default()
                .bg(theme::NORD_POLAR_NIGHT_3)
                .fg(theme::TEXT_SECONDARY)
                .add_modifier(Modifier::BOLD),
        )
    }
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(Span::styled(
            " TIMOR APP ",
            Style::default()
                .fg(theme::ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(7)]).split(inner);

    let fixed_keys = [View::Dashboard, View::Internet, View::Wallet, View::Profile];
    let items: Vec<Line> = access::menu(&app.user)
        .into_iter()
        .map(|view| {
            let key = fixed_keys
                .iter()
                .position(|v| *v == view)
                .map_or(0, |i| i + 1);
            let is_current = view == app.current_view;
            let style = if is_current {
                Style::default()
                    .bg(theme::ROW_SELECTED_BG)
                    .fg(theme::ROW_SELECTED_FG)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::INACTIVE)
            };
            Line::from(vec![
                Span::styled(
                    format!(" {key} "),
                    Style::default().fg(theme::NORD_POLAR_NIGHT_4),
                ),
                Span::styled(format!("{:<18}", view.title()), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(items), chunks[0]);

    let account = vec![
        Line::from(vec![
            Span::styled(
                crate::utils::truncate(&app.user.name, 16),
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            tier_badge(app.user.is_vip),
        ]),
        Line::from(Span::styled(
            crate::utils::truncate(&app.user.email, 26),
            Style::default().fg(theme::INACTIVE),
        )),
        Line::from(""),
        Line::from(Span::styled(" [i] Install App", Style::default().fg(theme::SUCCESS))),
        Line::from(Span::styled(
            " [s] Share App",
            Style::default().fg(theme::ACCENT_SECONDARY),
        )),
        Line::from(Span::styled(" [L] Logout", Style::default().fg(theme::ERROR))),
    ];

    frame.render_widget(Paragraph::new(account), chunks[1]);
}

fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let show_ads = !app.user.is_vip;
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(5),
        Constraint::Length(if show_ads { 5 } else { 0 }),
        Constraint::Min(8),
        Constraint::Percentage(35),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                View::Dashboard.title(),
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Today's activity and system performance.",
                Style::default().fg(theme::INACTIVE),
            )),
        ]),
        chunks[0],
    );

    let cards = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(chunks[1]);
    render_stat_card(frame, cards[0], "Total Users", "12,453", "+12.5% vs last week", theme::NORD_FROST_3);
    render_stat_card(frame, cards[1], "Revenue", "Rp 45.2M", "+8.2% vs last week", theme::SUCCESS);
    render_stat_card(frame, cards[2], "Activity", "1,204", "+3.1% vs last hour", theme::NORD_PURPLE);

    if show_ads {
        widgets::ad_banner::render(frame, chunks[2]);
    }

    let charts = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(chunks[3]);
    render_traffic(frame, charts[0]);
    render_devices(frame, charts[1]);

    render_activity_log(frame, app, chunks[4]);
}

fn render_stat_card(frame: &mut Frame, area: Rect, title: &str, value: &str, trend: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(format!(" {title} "));

    let text = vec![
        Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("▲ {trend}"),
            Style::default().fg(theme::SUCCESS),
        )),
    ];

    frame.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        area,
    );
}

fn render_traffic(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Traffic Analysis ")
        .title_bottom(Line::from(" Daily unique visitors ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);
    let data: Vec<u64> = TRAFFIC.iter().map(|(_, v)| *v).collect();
    frame.render_widget(
        Sparkline::default()
            .data(&data)
            .style(Style::default().fg(theme::ACCENT_PRIMARY)),
        chunks[0],
    );

    let labels: Vec<Span> = TRAFFIC
        .iter()
        .map(|(day, _)| Span::styled(format!("{day:<6}"), Style::default().fg(theme::INACTIVE)))
        .collect();
    frame.render_widget(Paragraph::new(Line::from(labels)), chunks[1]);
}

fn render_devices(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Devices ");

    let bars: Vec<Bar> = DEVICES
        .iter()
        .map(|(name, share)| {
            Bar::default()
                .label(Line::from(*name))
                .value(*share)
                .text_value(format!("{share}%"))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme::NORD_FROST_3))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(theme::NORD_FROST_3)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(chart, area);
}

pub(super) fn render_activity_log(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Event Log ")
        .title_bottom(Line::from(" [PgUp/PgDn] Scroll ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.logs.is_empty() {
        frame.render_widget(
            Paragraph::new("No activity yet").alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let logs: Vec<Line> = app
        .logs
        .iter()
        .map(|msg| {
            let (timestamp, content) = msg.split_once(' ').unwrap_or(("", msg.as_str()));

            let style = if content.starts_with("Error") || content.contains("failed") {
                Style::default().fg(theme::ERROR)
            } else if content.contains("Connected")
                || content.starts_with("SUCCESS")
                || content.contains("VIP active")
            {
                Style::default().fg(theme::SUCCESS)
            } else if content.starts_with("PAY") || content.starts_with("WALLET") {
                Style::default().fg(theme::VIP)
            } else if content.starts_with("VPN") || content.starts_with("MESH") {
                Style::default().fg(theme::ACCENT_SECONDARY)
            } else {
                Style::default().fg(theme::INACTIVE)
            };

            Line::from(vec![
                Span::styled(
                    format!("[{timestamp}] "),
                    Style::default().fg(theme::TEXT_SECONDARY),
                ),
                Span::styled(content, style),
            ])
        })
        .collect();

    #[allow(clippy::cast_possible_truncation)]
    let scroll_offset = if app.logs_auto_scroll {
        logs.len().saturating_sub(inner.height as usize) as u16
    } else {
        app.logs_scroll
    };

    frame.render_widget(
        Paragraph::new(logs)
            .wrap(Wrap { trim: true })
            .scroll((scroll_offset, 0)),
        inner,
    );
}

