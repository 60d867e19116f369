//! Private Internet page: power control, throughput, server list, map and mesh.

use crate::access::View;
use crate::app::App;
use crate::catalog::Tier;
use crate::connection::ConnectionStatus;
use crate::constants::{ENTERPRISE_PRICE_LABEL, MSG_NO_DATA, VIP_PRICE_LABEL};
use crate::mesh::MeshState;
use crate::theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Cell, Paragraph, Row, Table, TableState,
    },
    Frame,
};

use super::dashboard::{status_indicator, tier_badge};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let show_banner = !app.user.is_vip;
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(if show_banner { 4 } else { 0 }),
        Constraint::Percentage(45),
        Constraint::Min(0),
    ])
    .split(area);

    render_title(frame, app, chunks[0]);
    if show_banner {
        render_premium_banner(frame, chunks[1]);
    }

    let top = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[2]);
    render_power(frame, app, top[0]);
    render_throughput_chart(frame, app, top[1]);

    let bottom = Layout::horizontal([
        Constraint::Percentage(45),
        Constraint::Percentage(25),
        Constraint::Percentage(30),
    ])
    .split(chunks[3]);
    render_servers(frame, app, bottom[0]);
    render_map(frame, app, bottom[1]);
    render_mesh(frame, app, bottom[2]);
}

fn headline(status: ConnectionStatus) -> &'static str {
    match status {
        ConnectionStatus::Connected => "SECURE & ENCRYPTED",
        ConnectionStatus::Connecting => "CONNECTING...",
        ConnectionStatus::Authenticating => "VERIFYING KEYS...",
        ConnectionStatus::Disconnecting => "DISCONNECTING...",
        ConnectionStatus::Disconnected => "EXPOSED / VULNERABLE",
    }
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.connection.status();
    let (_, color) = status_indicator(status);

    let mut title = vec![Span::styled(
        View::Internet.title(),
        Style::default()
            .fg(theme::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD),
    )];
    if app.user.is_vip {
        title.push(Span::raw(" "));
        title.push(Span::styled(
            " ♛ VIP ACTIVE ",
            Style::default()
                .bg(theme::VIP)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let cols = Layout::horizontal([Constraint::Min(0), Constraint::Length(36)]).split(area);
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(title),
            Line::from(Span::styled(
                " High-speed connection with advanced encryption.",
                Style::default().fg(theme::INACTIVE),
            )),
        ]),
        cols[0],
    );
    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "NETWORK STATUS",
                Style::default().fg(theme::TEXT_SECONDARY),
            )),
            Line::from(Span::styled(
                headline(status),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Right),
        cols[1],
    );
}

fn render_premium_banner(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::VIP))
        .title(Span::styled(
            " ♛ Upgrade to Premium ",
            Style::default().fg(theme::VIP).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(" [u] Start free trial ").right_aligned());

    let text = vec![
        Line::from(Span::styled(
            "Unlimited speed, international servers (Singapore, Australia) and no ads, ever.",
            Style::default().fg(theme::TEXT_PRIMARY),
        )),
        Line::from(vec![
            Span::styled(
                format!(" Personal: {VIP_PRICE_LABEL} "),
                Style::default().bg(theme::NORD_POLAR_NIGHT_3),
            ),
            Span::raw("  "),
            Span::styled(
                format!(" Enterprise: {ENTERPRISE_PRICE_LABEL} "),
                Style::default().bg(theme::NORD_POLAR_NIGHT_3),
            ),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_power(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.connection.status();
    let (status_text, color) = status_indicator(status);
    let locked = app.connection.is_vip_locked(app.user.is_vip);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(" Connection ")
        .title_bottom(Line::from(" [Enter] Power  [f] Fastest ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let uptime = crate::utils::format_duration(std::time::Duration::from_secs(
        app.connection.elapsed_secs(),
    ));
    let uptime_color = if status == ConnectionStatus::Connected {
        theme::SUCCESS
    } else {
        theme::INACTIVE
    };

    let button = if locked {
        Span::styled(
            " 🔒 VIP REQUIRED · [u] Upgrade ",
            Style::default()
                .bg(theme::VIP)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        let label = if app.connection.has_pending_step() {
            " …  PLEASE WAIT "
        } else if status == ConnectionStatus::Connected {
            " ⏻  DISCONNECT "
        } else {
            " ⏻  CONNECT "
        };
        Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };

    let location = app.connection.active_server().map_or_else(
        || "Auto (optimal)".to_string(),
        |s| format!("{}, {}", s.city, s.country),
    );

    let text = vec![
        Line::from(Span::styled(
            "Connection Duration",
            Style::default().fg(theme::TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            uptime,
            Style::default().fg(uptime_color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(button),
        Line::from(""),
        Line::from(Span::styled(
            status_text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Server: ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(location, Style::default().fg(theme::TEXT_PRIMARY)),
        ]),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

fn render_throughput_chart(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Traffic Monitor ");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Layout: Stats (Top) | Chart (Bottom)
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).split(inner);

    let connected = app.connection.status() == ConnectionStatus::Connected;
    let throughput = app.connection.throughput();
    let latency = match app.connection.active_server() {
        Some(server) if connected => format!("{}ms", server.latency_ms()),
        _ => MSG_NO_DATA.to_string(),
    };
    let location = match app.connection.active_server() {
        Some(server) if connected => server.country,
        _ => MSG_NO_DATA,
    };

    let stats_line = Line::from(vec![
        Span::styled(" ▼ DOWN: ", Style::default().fg(theme::NORD_FROST_2)),
        Span::styled(
            format!("{:<9}", format!("{} Mbps", throughput.latest())),
            Style::default().fg(theme::TEXT_PRIMARY),
        ),
        Span::styled(" │ ", Style::default().fg(theme::NORD_POLAR_NIGHT_4)),
        Span::styled(" ⇌ PING: ", Style::default().fg(theme::TEXT_SECONDARY)),
        Span::styled(latency, Style::default().fg(theme::TEXT_PRIMARY)),
        Span::styled(" │ ", Style::default().fg(theme::NORD_POLAR_NIGHT_4)),
        Span::styled(" ⌖ LOCATION: ", Style::default().fg(theme::TEXT_SECONDARY)),
        Span::styled(location, Style::default().fg(theme::TEXT_PRIMARY)),
    ]);
    frame.render_widget(
        Paragraph::new(stats_line).alignment(Alignment::Center),
        chunks[0],
    );

    let points = throughput.points();
    let (x_min, x_max) = match (points.first(), points.last()) {
        (Some(first), Some(last)) if last.0 > first.0 => (first.0, last.0),
        _ => (0.0, 1.0),
    };
    // Peak detection for dynamic Y-axis scaling
    let peak = (f64::from(throughput.peak()) * 1.2).max(10.0);
    let line_color = if connected {
        theme::SUCCESS
    } else {
        theme::ACCENT_PRIMARY
    };

    let canvas = Canvas::default()
        .block(Block::default())
        .x_bounds([x_min, x_max])
        .y_bounds([0.0, peak])
        .paint(|ctx| {
            for pair in points.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color: line_color,
                });
            }

            // Peak Label
            ctx.print(
                x_min,
                peak,
                Span::styled(
                    format!("{peak:.0} Mbps"),
                    Style::default().fg(theme::NORD_POLAR_NIGHT_4),
                ),
            );
        });

    frame.render_widget(canvas, chunks[1]);
}

fn render_servers(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUSED))
        .title(" Server Locations ")
        .title_bottom(Line::from(" [↑↓] Move  [Space] Select ").centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active = app.connection.active_server_id();
    let rows: Vec<Row> = app
        .connection
        .catalog()
        .iter()
        .map(|server| {
            let is_active = active == Some(server.id);
            let tier_color = match server.tier {
                Tier::Optimal => theme::SUCCESS,
                Tier::Fast => theme::ACCENT_SECONDARY,
                Tier::Normal => theme::INACTIVE,
            };
            let locked = !server.is_entitled(app.user.is_vip);

            let style = if is_active {
                Style::default().fg(theme::SUCCESS)
            } else if locked {
                Style::default().fg(theme::INACTIVE)
            } else {
                Style::default().fg(theme::TEXT_PRIMARY)
            };

            Row::new(vec![
                Cell::from(if is_active { "●" } else { " " }),
                Cell::from(Span::styled(
                    server.code,
                    Style::default().fg(theme::ACCENT_SECONDARY),
                )),
                Cell::from(format!("{}, {}", server.city, server.country)),
                Cell::from(server.latency),
                Cell::from(Span::styled(
                    server.tier.to_string(),
                    Style::default().fg(tier_color),
                )),
                Cell::from(if server.vip_only {
                    if locked {
                        Span::styled("🔒 VIP", Style::default().fg(theme::VIP))
                    } else {
                        tier_badge(true)
                    }
                } else {
                    Span::raw("")
                }),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(12),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(7),
        ],
    )
    .row_highlight_style(
        Style::default()
            .bg(theme::ROW_SELECTED_BG)
            .fg(theme::ROW_SELECTED_FG)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default().with_selected(Some(app.server_cursor));
    frame.render_stateful_widget(table, inner, &mut state);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Asia-Pacific ");

    let active = app.connection.active_server_id();
    let connected = app.connection.status() == ConnectionStatus::Connected;

    let canvas = Canvas::default()
        .block(block)
        .x_bounds([0.0, 100.0])
        .y_bounds([0.0, 100.0])
        .paint(|ctx| {
            for server in app.connection.catalog() {
                let color = if active == Some(server.id) && connected {
                    theme::SUCCESS
                } else if active == Some(server.id) {
                    theme::WARNING
                } else if server.vip_only {
                    theme::VIP
                } else {
                    theme::ACCENT_PRIMARY
                };
                // Map rows count down from the top
                ctx.print(
                    f64::from(server.x),
                    100.0 - f64::from(server.y),
                    Span::styled(format!("● {}", server.city), Style::default().fg(color)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn render_mesh(frame: &mut Frame, app: &App, area: Rect) {
    let (border, hint) = match app.mesh.state() {
        MeshState::Idle => (theme::BORDER_DEFAULT, " [b] Enable "),
        MeshState::Scanning => (theme::NORD_FROST_3, " Scanning... "),
        MeshState::Active => (theme::SUCCESS, " [b] Disable "),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(" Bluetooth Mesh ")
        .title_bottom(Line::from(hint).centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match app.mesh.state() {
        MeshState::Idle => vec![
            Line::from(Span::styled(
                "Share a connection with nearby devices.",
                Style::default().fg(theme::TEXT_SECONDARY),
            )),
            Line::from(Span::styled("Mesh is off.", Style::default().fg(theme::INACTIVE))),
        ],
        MeshState::Scanning => vec![
            Line::from(Span::styled(
                "Searching for global Bluetooth nodes...",
                Style::default()
                    .fg(theme::NORD_FROST_3)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Scanning 2.4GHz frequency",
                Style::default().fg(theme::INACTIVE),
            )),
        ],
        MeshState::Active => {
            let mut lines = vec![Line::from(Span::styled(
                format!("{:<22}{:>7}", "Devices Found", "Signal"),
                Style::default().fg(theme::TEXT_SECONDARY),
            ))];
            for peer in app.mesh.peers() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:<22}", crate::utils::truncate(peer.name, 21)),
                        Style::default().fg(theme::TEXT_PRIMARY),
                    ),
                    Span::styled(
                        format!("{:>6}%", peer.signal),
                        Style::default().fg(theme::SUCCESS),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("  {}", peer.location),
                    Style::default().fg(theme::INACTIVE),
                )));
            }
            lines
        }
    };

    frame.render_widget(Paragraph::new(lines), inner);
}
