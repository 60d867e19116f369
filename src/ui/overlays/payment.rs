//! VIP upgrade overlay: method form, processing spinner and receipt.

use super::{centered_rect, input_field};
use crate::app::App;
use crate::constants::VIP_PRICE_LABEL;
use crate::flows::{FlowPhase, PaymentMethod};
use crate::theme;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn tab_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Visa => "VISA Card",
        PaymentMethod::Card => "Master / Other",
        PaymentMethod::Mobile => "E-Wallet",
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let phase = app.payment.phase();
    let hint = match phase {
        FlowPhase::Form => " [←→] Method  [Tab] Field  [Enter] Pay  [Esc] Cancel ",
        FlowPhase::Processing => " [Esc] Cancel ",
        FlowPhase::Success => " [Enter] Done ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::VIP))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(Span::styled(
            " ♛ Upgrade to VIP Premium ",
            Style::default().fg(theme::VIP).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(hint).centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match phase {
        FlowPhase::Form => form_lines(app),
        FlowPhase::Processing => vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "◌ Processing payment...",
                Style::default()
                    .fg(theme::WARNING)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("Charging {VIP_PRICE_LABEL} via {}", app.payment_form.method.receipt_label()),
                Style::default().fg(theme::INACTIVE),
            )),
        ],
        FlowPhase::Success => receipt_lines(app),
    };

    let alignment = if phase == FlowPhase::Form {
        Alignment::Left
    } else {
        Alignment::Center
    };
    frame.render_widget(Paragraph::new(lines).alignment(alignment), inner);
}

fn form_lines(app: &App) -> Vec<Line<'_>> {
    let form = &app.payment_form;

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                "Monthly VIP Plan  ",
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(VIP_PRICE_LABEL, Style::default().fg(theme::VIP)),
        ]),
        Line::from(Span::styled(
            "Global servers and no ads",
            Style::default().fg(theme::INACTIVE),
        )),
        Line::from(""),
    ];

    let tabs: Vec<Span> = PaymentMethod::ALL
        .iter()
        .flat_map(|method| {
            let style = if *method == form.method {
                Style::default()
                    .bg(theme::ACCENT_SECONDARY)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::INACTIVE)
            };
            [Span::styled(format!(" {} ", tab_label(*method)), style), Span::raw(" ")]
        })
        .collect();
    lines.push(Line::from(tabs));
    lines.push(Line::from(""));

    if form.method == PaymentMethod::Mobile {
        lines.push(Line::from(vec![
            Span::styled("Provider  ", Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(
                form.provider.label(),
                Style::default().fg(theme::TEXT_PRIMARY),
            ),
            Span::styled("  [F2] change", Style::default().fg(theme::INACTIVE)),
        ]));
    }

    for field in form.fields() {
        lines.extend(input_field(
            field.label(),
            form.value(*field),
            *field == form.focused(),
        ));
    }

    if form.method == PaymentMethod::Mobile {
        lines.push(Line::from(Span::styled(
            "A verification code will be sent to this number.",
            Style::default().fg(theme::INACTIVE),
        )));
    }

    lines
}

fn receipt_lines(app: &App) -> Vec<Line<'_>> {
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<16}"), Style::default().fg(theme::TEXT_SECONDARY)),
            Span::styled(value, Style::default().fg(theme::TEXT_PRIMARY)),
        ])
    };

    vec![
        Line::from(""),
        Line::from(Span::styled(
            "✔ Payment Successful!",
            Style::default()
                .fg(theme::SUCCESS)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Premium service is active.",
            Style::default().fg(theme::INACTIVE),
        )),
        Line::from(""),
        row("Plan", "VIP Premium Member".to_string()),
        row(
            "Payment method",
            app.payment_form.method.receipt_label().to_string(),
        ),
        row("Total paid", VIP_PRICE_LABEL.to_string()),
    ]
}
