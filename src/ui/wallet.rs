//! Finance page: balance in the chosen currency, payout account and history.

use crate::access::View;
use crate::app::App;
use crate::theme;
use crate::wallet::{Currency, TxKind, TxStatus};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table},
    Frame,
};

/// Monthly income and expense shown on the balance card, in USD.
const MONTH_INCOME: f64 = 1245.00;
const MONTH_EXPENSE: f64 = 320.00;

/// Balance trend, January to May; June is the live balance.
const TREND: [u64; 5] = [400, 300, 550, 450, 700];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(9),
        Constraint::Min(0),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                View::Wallet.title(),
                Style::default()
                    .fg(theme::TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Manage revenue, balance and withdrawals.",
                Style::default().fg(theme::INACTIVE),
            )),
        ]),
        chunks[0],
    );

    let top = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    render_balance(frame, app, top[0]);

    let side = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).split(top[1]);
    render_linked_account(frame, side[0]);
    render_trend(frame, app, side[1]);

    render_transactions(frame, app, chunks[2]);
}

fn render_balance(frame: &mut Frame, app: &App, area: Rect) {
    let currency = app.currency;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_FOCUSED))
        .title(" Total Balance ")
        .title(
            Line::from(format!(" {} ▾ [x] ", currency.code()))
                .right_aligned()
                .style(Style::default().fg(theme::ACCENT_SECONDARY)),
        )
        .title_bottom(Line::from(" [w] Withdraw ").centered());

    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled(
            currency.format(app.ledger.balance()),
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    text.push(Line::from(Span::styled(
        currency.name(),
        Style::default().fg(theme::TEXT_SECONDARY),
    )));
    if currency != Currency::Usd {
        text.push(Line::from(Span::styled(
            format!(
                "≈ {} · Rate: 1 USD = {}",
                Currency::Usd.format(app.ledger.balance()),
                currency.format(1.0)
            ),
            Style::default().fg(theme::INACTIVE),
        )));
    }
    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled("↙ Income (month) ", Style::default().fg(theme::TEXT_SECONDARY)),
        Span::styled(
            currency.format(MONTH_INCOME),
            Style::default().fg(theme::SUCCESS),
        ),
        Span::raw("    "),
        Span::styled("↗ Spending (month) ", Style::default().fg(theme::TEXT_SECONDARY)),
        Span::styled(
            currency.format(MONTH_EXPENSE),
            Style::default().fg(theme::ERROR),
        ),
    ]));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_linked_account(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Linked Account ");

    let text = vec![Line::from(vec![
        Span::styled("▭ ", Style::default().fg(theme::ACCENT_PRIMARY)),
        Span::styled(
            "Visa Merchantrade",
            Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
    ])];

    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_trend(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(format!(" Revenue Trend ({}) ", app.currency.code()));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let live = app.ledger.balance().max(0.0).round() as u64;
    let mut data = TREND.to_vec();
    data.push(live);

    frame.render_widget(
        Sparkline::default()
            .block(block)
            .data(&data)
            .style(Style::default().fg(theme::SUCCESS)),
        area,
    );
}

fn render_transactions(frame: &mut Frame, app: &App, area: Rect) {
    let currency = app.currency;
    let note = if currency == Currency::Usd {
        " Full record in USD ($) ".to_string()
    } else {
        format!(" Converted to {} (estimate) ", currency.code())
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::BORDER_DEFAULT))
        .title(" Transactions ")
        .title_bottom(Line::from(note).centered());

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Description"),
        Cell::from("Date"),
        Cell::from("Status"),
        Cell::from(format!("Amount ({})", currency.code())),
    ])
    .style(
        Style::default()
            .fg(theme::TEXT_SECONDARY)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = app
        .ledger
        .transactions()
        .iter()
        .map(|tx| {
            let (arrow, sign, color) = match tx.kind {
                TxKind::Credit => ("↙", "+", theme::SUCCESS),
                TxKind::Debit => ("↗", "-", theme::ERROR),
            };
            let (status, status_color) = match tx.status {
                TxStatus::Completed => ("completed", theme::SUCCESS),
                TxStatus::Pending => ("pending", theme::WARNING),
            };
            let description = match &tx.method {
                Some(method) => format!("{} · {method}", tx.description),
                None => tx.description.clone(),
            };

            Row::new(vec![
                Cell::from(Span::styled(
                    format!("#{}", tx.id),
                    Style::default().fg(theme::INACTIVE),
                )),
                Cell::from(Line::from(vec![
                    Span::styled(format!("{arrow} "), Style::default().fg(color)),
                    Span::styled(description, Style::default().fg(theme::TEXT_PRIMARY)),
                ])),
                Cell::from(tx.date.format("%Y-%m-%d").to_string()),
                Cell::from(Span::styled(status, Style::default().fg(status_color))),
                Cell::from(
                    Line::from(Span::styled(
                        format!("{sign}{}", currency.format(tx.amount)),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ))
                    .alignment(Alignment::Right),
                ),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(9),
            Constraint::Min(24),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}
