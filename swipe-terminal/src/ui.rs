use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line as TextLine, Span},
    widgets::{
        canvas::{Canvas, Line},
        Block, BorderType, Borders, Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};
use rust_decimal::Decimal;

use swipe_core::models::{format_millions, format_percent, format_price, format_usd, Token};
use swipe_core::wallet::QUICK_AMOUNTS;

use crate::app::{App, FormField, Palette, Tab, Theme, WalletMode};

const CARD_MAX_WIDTH: u16 = 44;
const CARD_HEIGHT: u16 = 14;
const LOG_LINES: u16 = 5;

/// Width of the swipe card for a terminal `width` columns wide.
pub fn card_width(width: u16) -> u16 {
    width.saturating_sub(4).clamp(10, CARD_MAX_WIDTH)
}

pub fn ui(f: &mut Frame, app: &App) {
    let palette = app.palette();
    let base_style = Style::default().bg(palette.bg).fg(palette.fg);

    let size = f.area();
    f.render_widget(Block::default().style(base_style), size);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(LOG_LINES + 2),
        ])
        .split(size);

    render_tabs(f, app, main_layout[0], &palette);
    match app.tab {
        Tab::Discover => render_discover(f, app, main_layout[1], &palette),
        Tab::Portfolio => render_portfolio(f, app, main_layout[1], &palette),
        Tab::Wallet => render_wallet(f, app, main_layout[1], &palette),
        Tab::Profile => render_profile(f, app, main_layout[1], &palette),
    }
    render_logs(f, app, main_layout[2], &palette);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let titles: Vec<String> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, t.title()))
        .collect();
    let balance = app.session.wallet().balance();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border))
                .title(format!(
                    "Swipe [{}] ${}",
                    app.session.network(),
                    balance.format_usdc()
                )),
        );
    f.render_widget(tabs, area);
}

fn render_discover(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(CARD_HEIGHT), Constraint::Length(2)])
        .split(area);

    let catalog = app.session.catalog();
    let deck = app.session.deck();

    let status = if catalog.is_loading() && catalog.is_empty() {
        Some("Loading tokens...".to_string())
    } else if let (Some(err), true) = (catalog.error(), catalog.is_empty()) {
        Some(format!("{}\n\nPress r to try again.", err))
    } else if app.session.is_exhausted() {
        Some("No more coins!\n\nPress r to refresh.".to_string())
    } else {
        None
    };

    let token = match status {
        Some(_) => None,
        None => app.session.current_token(),
    };
    match token {
        Some(token) => {
            let base = centered(chunks[0], card_width(chunks[0].width), CARD_HEIGHT);
            // Terminals can't rotate the card, so tilt becomes a vertical nudge.
            let lift = (deck.tilt_degrees() / 10.0).round() as i32;
            if let Some(card) = shifted(chunks[0], base, deck.offset(), lift) {
                render_card(f, token, deck.progress(), card, palette);
            }
        }
        None => {
            let message = status.unwrap_or_else(|| "No more coins!".to_string());
            f.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .border_type(BorderType::Rounded)
                            .border_style(Style::default().fg(palette.border)),
                    ),
                centered(chunks[0], card_width(chunks[0].width), CARD_HEIGHT),
            );
        }
    }

    let hint = TextLine::from(vec![
        Span::styled("← skip", Style::default().fg(palette.down)),
        Span::raw("   drag or use arrows   "),
        Span::styled(
            format!("buy ${} →", format_usd(deck.amount())),
            Style::default().fg(palette.up),
        ),
        Span::raw("   +/- amount  r refresh"),
    ]);
    f.render_widget(
        Paragraph::new(hint).alignment(Alignment::Center),
        chunks[1],
    );
}

fn render_card(f: &mut Frame, token: &Token, progress: f64, area: Rect, palette: &Palette) {
    let (title, border) = if progress > 0.1 {
        (" BUY ", palette.up)
    } else if progress < -0.1 {
        (" SKIP ", palette.down)
    } else {
        ("", palette.accent)
    };
    let border_style = if progress.abs() >= 1.0 {
        Style::default().fg(border).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(border)
    };

    let change_color = if token.is_price_up() {
        palette.up
    } else {
        palette.down
    };
    let arrow = if token.is_price_up() { "▲" } else { "▼" };

    let text = vec![
        TextLine::from(Span::styled(
            token.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            token.display_symbol(),
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(
            format!("${}", format_price(token.current_price)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            format!("{} {}", arrow, format_percent(token.price_change_24h)),
            Style::default().fg(change_color),
        )),
        TextLine::from(""),
        TextLine::from(vec![
            Span::raw("Market Cap  "),
            Span::styled(
                format!("${}", format_millions(token.market_cap)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(vec![
            Span::raw("24h Volume  "),
            Span::styled(
                format!("${}", format_millions(token.volume_24h)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style)
                .title(title)
                .title_alignment(Alignment::Center),
        ),
        area,
    );
}

fn render_portfolio(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let portfolio = app.session.portfolio();
    f.render_widget(
        Paragraph::new(TextLine::from(vec![
            Span::raw("Total Value "),
            Span::styled(
                format!("${}", format_usd(portfolio.total_value())),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("   {} holdings", portfolio.len())),
        ]))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.border)),
        ),
        chunks[0],
    );

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    render_holdings(f, app, body[0], palette);
    render_chart(f, app, body[1], palette);
}

fn render_holdings(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title("Holdings  b buy $5 more  x sell");

    let holdings = app.session.portfolio().holdings();
    if holdings.is_empty() {
        f.render_widget(
            Paragraph::new("No coins yet. Swipe right on Discover to buy.")
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
        return;
    }

    let rows: Vec<Row> = holdings
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let change = h.token.price_change_24h;
            let color = if change >= Decimal::ZERO {
                palette.up
            } else {
                palette.down
            };
            let style = if i == app.selected_holding {
                Style::default().fg(color).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(color)
            };
            Row::new(vec![
                h.token.display_symbol(),
                h.amount.round_dp(4).normalize().to_string(),
                format!("${}", format_usd(h.value())),
                format!(
                    "{}{}",
                    if change >= Decimal::ZERO { "+" } else { "-" },
                    format_percent(change)
                ),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ],
    )
    .header(
        Row::new(vec!["Coin", "Amount", "Value", "24h"]).style(Style::default().fg(Color::Yellow)),
    )
    .block(block);
    f.render_widget(table, area);
}

fn render_chart(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let series = &app.chart;
    let x_max = series.len().saturating_sub(1).max(1) as f64;
    let low = series.iter().copied().fold(f64::INFINITY, f64::min).min(100.0);
    let color = palette.accent;

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border))
                .title(format!("Performance {}  f change", app.time_frame)),
        )
        .x_bounds([0.0, x_max])
        .y_bounds([low - 1.0, 101.0])
        .paint(move |ctx| {
            for (i, pair) in series.windows(2).enumerate() {
                ctx.draw(&Line {
                    x1: i as f64,
                    y1: pair[0],
                    x2: (i + 1) as f64,
                    y2: pair[1],
                    color,
                });
            }
        });
    f.render_widget(canvas, chunks[0]);

    let labels = app.time_frame.labels();
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, labels.len() as u32); 5])
        .split(chunks[1]);
    for (label, cell) in labels.iter().zip(cells.iter()) {
        f.render_widget(
            Paragraph::new(*label)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray)),
            *cell,
        );
    }
}

fn render_wallet(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let wallet = app.session.wallet();
    let balance = wallet.balance();
    let summary = vec![
        TextLine::from(vec![
            Span::raw("Address "),
            Span::styled(
                wallet.public_key().unwrap_or("not connected").to_string(),
                Style::default().fg(palette.accent),
            ),
        ]),
        TextLine::from(""),
        TextLine::from(vec![
            Span::raw("USDC "),
            Span::styled(
                format!("${}", balance.format_usdc()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(vec![
            Span::raw("SOL  "),
            Span::styled(
                balance.format_sol(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
    ];
    f.render_widget(
        Paragraph::new(summary).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border))
                .title("Balance"),
        ),
        chunks[0],
    );

    let form = &app.form;
    let selected = Style::default()
        .bg(palette.accent)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    let (deposit_style, withdraw_style) = match form.mode {
        WalletMode::Deposit => (selected, Style::default()),
        WalletMode::Withdraw => (Style::default(), selected),
    };
    let quick = QUICK_AMOUNTS
        .iter()
        .map(|a| format!("${}", a))
        .collect::<Vec<_>>()
        .join("  ");
    let cursor = |field: FormField| if form.field == field { "▌" } else { "" };

    let mut text = vec![
        TextLine::from(vec![
            Span::styled(" d Deposit ", deposit_style),
            Span::raw("  "),
            Span::styled(" w Withdraw ", withdraw_style),
        ]),
        TextLine::from(""),
        TextLine::from(vec![
            Span::raw("Amount $"),
            Span::styled(
                format!("{}{}", form.amount, cursor(FormField::Amount)),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        TextLine::from(Span::styled(
            format!("Quick (↑/↓): {}", quick),
            Style::default().fg(Color::Gray),
        )),
    ];
    if form.mode == WalletMode::Withdraw {
        text.push(TextLine::from(""));
        text.push(TextLine::from(vec![
            Span::raw("To "),
            Span::styled(
                format!("{}{}", form.address, cursor(FormField::Address)),
                Style::default().fg(palette.accent),
            ),
        ]));
        text.push(TextLine::from(Span::styled(
            "a edit address, Esc done",
            Style::default().fg(Color::Gray),
        )));
    }
    text.push(TextLine::from(""));
    text.push(TextLine::from(Span::styled(
        "[ENTER TO CONFIRM]",
        Style::default().bg(palette.up).fg(Color::Black),
    )));
    text.push(TextLine::from(Span::styled(
        "r refresh balance",
        Style::default().fg(Color::Gray),
    )));

    f.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border))
                .title("Transfer"),
        ),
        chunks[1],
    );
}

fn render_profile(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let wallet = app.session.wallet();
    let status = match wallet.public_key() {
        Some(pk) => Span::styled(format!("Connected {}", pk), Style::default().fg(palette.up)),
        None => Span::styled("Not connected", Style::default().fg(palette.down)),
    };
    let text = vec![
        TextLine::from(status),
        TextLine::from(""),
        TextLine::from(format!("Network       {}", app.session.network())),
        TextLine::from(format!(
            "Token source  {}",
            app.session.catalog_source().name()
        )),
        TextLine::from(format!(
            "Theme         {}",
            match app.theme {
                Theme::Dark => "dark",
                Theme::Light => "light",
            }
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "c connect   o logout   t theme   q quit",
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(
        Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.border))
                .title("Profile"),
        ),
        area,
    );
}

fn render_logs(f: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let lines: Vec<TextLine> = app
        .logs
        .iter()
        .rev()
        .take(LOG_LINES as usize)
        .map(|l| TextLine::from(l.as_str()))
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(palette.border))
                .title("Log"),
        ),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// `base` moved `dx` columns and `dy` rows, clipped to `area`. `None` once
/// too little of the card is left to draw.
fn shifted(area: Rect, base: Rect, dx: f64, dy: i32) -> Option<Rect> {
    let x = i32::from(base.x) + dx.round() as i32;
    let left = x.max(i32::from(area.x));
    let right = (x + i32::from(base.width)).min(i32::from(area.right()));
    if right - left < 3 {
        return None;
    }
    let y = (i32::from(base.y) + dy).clamp(
        i32::from(area.y),
        i32::from(area.bottom()) - i32::from(base.height),
    );
    Some(Rect::new(
        left as u16,
        y.max(0) as u16,
        (right - left) as u16,
        base.height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_width() {
        assert_eq!(card_width(200), CARD_MAX_WIDTH);
        assert_eq!(card_width(30), 26);
        assert_eq!(card_width(5), 10);
    }

    #[test]
    fn test_shifted_card_is_clipped() {
        let area = Rect::new(0, 0, 80, 20);
        let base = centered(area, 40, 14);
        assert_eq!(base, Rect::new(20, 3, 40, 14));

        assert_eq!(shifted(area, base, 0.0, 0), Some(base));
        assert_eq!(shifted(area, base, 30.0, 1), Some(Rect::new(50, 4, 30, 14)));
        assert_eq!(shifted(area, base, -100.0, 0), None);
    }
}
