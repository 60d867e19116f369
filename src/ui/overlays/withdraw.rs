//! Payout overlay.

use super::{centered_rect, input_field};
use crate::app::App;
use crate::flows::{FlowPhase, WithdrawField, WithdrawMethod};
use crate::theme;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let phase = app.withdraw.phase();
    let hint = match phase {
        FlowPhase::Form => " [←→] Method  [Tab] Field  [Enter] Confirm  [Esc] Cancel ",
        FlowPhase::Processing => " [Esc] Cancel ",
        FlowPhase::Success => " [Enter] Close ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT_SECONDARY))
        .style(Style::default().bg(theme::OVERLAY_BG))
        .title(" Withdraw Funds (Payout) ")
        .title_bottom(Line::from(hint).centered());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match phase {
        FlowPhase::Form => form_lines(app),
        FlowPhase::Processing => vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "◌ Processing...",
                Style::default()
                    .fg(theme::WARNING)
                    .add_modifier(Modifier::BOLD),
            )),
        ],
        FlowPhase::Success => vec![
            Line::from(""),
            Line::from(""),
            Line::from(Span::styled(
                "✔ Withdrawal Successful",
                Style::default()
                    .fg(theme::SUCCESS)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Funds are on their way to your Merchantrade / bank account.",
                Style::default().fg(theme::INACTIVE),
            )),
        ],
    };

    let alignment = if phase == FlowPhase::Form {
        Alignment::Left
    } else {
        Alignment::Center
    };
    frame.render_widget(Paragraph::new(lines).alignment(alignment), inner);
}

fn form_lines(app: &App) -> Vec<Line<'_>> {
    let form = &app.withdraw_form;
    let balance = app.ledger.balance();

    let mut lines = vec![
        Line::from(Span::styled(
            "AVAILABLE BALANCE",
            Style::default().fg(theme::INACTIVE),
        )),
        Line::from(Span::styled(
            crate::utils::format_usd(balance),
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let methods: Vec<Span> = [WithdrawMethod::Visa, WithdrawMethod::Bank]
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
            [Span::styled(format!(" {} ", method.label()), style), Span::raw(" ")]
        })
        .collect();
    lines.push(Line::from(methods));
    lines.push(Line::from(""));

    lines.extend(input_field(
        "Amount ($)",
        &form.amount,
        form.focus == WithdrawField::Amount,
    ));
    lines.extend(input_field(
        form.method.destination_label(),
        &form.destination,
        form.focus == WithdrawField::Destination,
    ));
    lines.push(Line::from(""));

    // Mirrors the disabled submit button
    let ready = form.validate(balance).is_ok();
    lines.push(Line::from(Span::styled(
        " Confirm Withdrawal → ",
        if ready {
            Style::default()
                .bg(theme::SUCCESS)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::NORD_POLAR_NIGHT_3)
                .fg(theme::INACTIVE)
        },
    )));

    lines
}
