use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::style::Color;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

use swipe_core::catalog::FetchTicket;
use swipe_core::chart::{chart_series, TimeFrame};
use swipe_core::models::{format_usd, Token};
use swipe_core::swipe::{SwipeDirection, SwipeOutcome};
use swipe_core::wallet::QUICK_AMOUNTS;
use swipe_core::{Error, Session};

const MAX_LOGS: usize = 200;
const BUY_MORE_AMOUNT: Decimal = dec!(5);
const MAX_AMOUNT_DIGITS: usize = 9;

/// Results of spawned tasks, sent back to the UI loop.
pub enum AppEvent {
    TokensFetched(FetchTicket, swipe_core::Result<Vec<Token>>),
    SolBalance(swipe_core::Result<Decimal>),
}

/// Async work the UI loop should start on the app's behalf.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchTokens(FetchTicket),
    FetchSolBalance(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Discover,
    Portfolio,
    Wallet,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Discover, Tab::Portfolio, Tab::Wallet, Tab::Profile];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Discover => "Discover",
            Tab::Portfolio => "Portfolio",
            Tab::Wallet => "Wallet",
            Tab::Profile => "Profile",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
    pub accent: Color,
    pub up: Color,
    pub down: Color,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => Palette {
                bg: Color::White,
                fg: Color::Black,
                border: Color::Black,
                accent: Color::Magenta,
                up: Color::Green,
                down: Color::Red,
            },
            Theme::Dark => Palette {
                bg: Color::Rgb(20, 20, 25),
                fg: Color::White,
                border: Color::DarkGray,
                accent: Color::Rgb(168, 85, 247),
                up: Color::Green,
                down: Color::Red,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletMode {
    Deposit,
    Withdraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Amount,
    Address,
}

#[derive(Debug, Clone)]
pub struct WalletForm {
    pub mode: WalletMode,
    pub field: FormField,
    pub amount: String,
    pub address: String,
}

impl Default for WalletForm {
    fn default() -> Self {
        Self {
            mode: WalletMode::Deposit,
            field: FormField::Amount,
            amount: String::new(),
            address: String::new(),
        }
    }
}

impl WalletForm {
    fn push_amount_char(&mut self, c: char) {
        if c == '.' && self.amount.contains('.') {
            return;
        }
        match self.amount.split_once('.') {
            Some((_, decimals)) if decimals.len() >= 2 => return,
            None if c != '.' && self.amount.len() >= MAX_AMOUNT_DIGITS => return,
            _ => {}
        }
        self.amount.push(c);
    }

    fn cycle_quick_amount(&mut self, forward: bool) {
        let current = self
            .amount
            .parse::<u32>()
            .ok()
            .and_then(|a| QUICK_AMOUNTS.iter().position(|q| *q == a));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => QUICK_AMOUNTS.len() - 1,
            (Some(i), true) => (i + 1) % QUICK_AMOUNTS.len(),
            (Some(i), false) => (i + QUICK_AMOUNTS.len() - 1) % QUICK_AMOUNTS.len(),
        };
        self.amount = QUICK_AMOUNTS[next].to_string();
    }

    fn parsed_amount(&self) -> Option<Decimal> {
        Decimal::from_str(self.amount.trim())
            .ok()
            .filter(|a| *a > Decimal::ZERO)
    }
}

pub struct App {
    pub should_quit: bool,
    pub logs: Vec<String>,
    pub tab: Tab,
    pub theme: Theme,
    pub session: Session,
    pub form: WalletForm,
    pub selected_holding: usize,
    pub time_frame: TimeFrame,
    pub chart: Vec<f64>,
    /// Whether the SOL balance comes from RPC rather than the demo seed.
    pub live_sol_balance: bool,
    drag_origin: Option<(u16, u16)>,
}

impl App {
    pub fn new(session: Session, live_sol_balance: bool) -> Self {
        let time_frame = TimeFrame::default();
        Self {
            should_quit: false,
            logs: vec!["Welcome to Swipe".to_string()],
            tab: Tab::Discover,
            theme: Theme::Dark,
            session,
            form: WalletForm::default(),
            selected_holding: 0,
            time_frame,
            chart: chart_series(time_frame, &mut rand::thread_rng()),
            live_sol_balance,
            drag_origin: None,
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn add_log(&mut self, message: String) {
        debug!("{}", message);
        self.logs.push(message);
        if self.logs.len() > MAX_LOGS {
            let overflow = self.logs.len() - MAX_LOGS;
            self.logs.drain(..overflow);
        }
    }

    pub fn palette(&self) -> Palette {
        self.theme.palette()
    }

    /// Card width in terminal columns, which is what a drag is measured in.
    pub fn resize(&mut self, width: u16) {
        self.session.deck_mut().set_viewport_width(f64::from(width));
    }

    pub fn is_animating(&self) -> bool {
        self.session.deck().is_animating()
    }

    /// Startup: restore a stored wallet and kick off the first catalog fetch.
    pub fn start(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        match self.session.start() {
            Ok(true) => {
                let pk = self.session.wallet().public_key().unwrap_or_default().to_string();
                self.add_log(format!("Wallet restored: {}", pk));
                commands.extend(self.sol_balance_command());
            }
            Ok(false) => self.add_log("No wallet yet. Press c on Profile to connect.".to_string()),
            Err(e) => {
                warn!("wallet restore failed: {}", e);
                self.add_log(format!("Could not restore wallet: {}", e));
            }
        }
        commands.extend(self.refresh());
        commands
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(index) = self.session.tick(dt) {
            if index >= self.session.catalog().len() {
                self.add_log("No more coins! Press r to refresh.".to_string());
            }
        }
    }

    pub fn on_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TokensFetched(ticket, result) => {
                let failure = result.as_ref().err().map(|e| e.to_string());
                if !self.session.complete_fetch(ticket, result) {
                    return;
                }
                match failure {
                    Some(e) => self.add_log(format!("Failed to load tokens: {}", e)),
                    None => self.add_log(format!(
                        "Loaded {} tokens from {}.",
                        self.session.catalog().len(),
                        self.session.catalog_source().name()
                    )),
                }
            }
            AppEvent::SolBalance(Ok(sol)) => self.session.apply_sol_balance(sol),
            AppEvent::SolBalance(Err(e)) => {
                warn!("sol balance fetch failed: {}", e);
                self.add_log(format!("Could not fetch SOL balance: {}", e));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.tab == Tab::Wallet && self.form.field == FormField::Address {
            return self.handle_address_key(key);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                return None;
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                return None;
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
                return None;
            }
            KeyCode::Char(c @ '1'..='4') if self.tab != Tab::Wallet => {
                let index = c as usize - '1' as usize;
                self.tab = Tab::ALL[index];
                return None;
            }
            _ => {}
        }

        match self.tab {
            Tab::Discover => self.handle_discover_key(key),
            Tab::Portfolio => {
                self.handle_portfolio_key(key);
                None
            }
            Tab::Wallet => self.handle_wallet_key(key),
            Tab::Profile => self.handle_profile_key(key),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.tab != Tab::Discover {
            return;
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.session.begin_drag() {
                    self.drag_origin = Some((mouse.column, mouse.row));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = self.drag_origin {
                    let dx = f64::from(mouse.column) - f64::from(x);
                    let dy = f64::from(mouse.row) - f64::from(y);
                    self.session.drag_to(dx, dy);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.drag_origin.take().is_some() {
                    let result = self.session.release_swipe();
                    self.report_swipe(result);
                }
            }
            _ => {}
        }
    }

    fn handle_discover_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Right => {
                let result = self.session.swipe(SwipeDirection::Buy);
                self.report_swipe(result);
            }
            KeyCode::Left => {
                let result = self.session.swipe(SwipeDirection::Skip);
                self.report_swipe(result);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.session.deck_mut().adjust_amount(1),
            KeyCode::Char('-') => self.session.deck_mut().adjust_amount(-1),
            KeyCode::Char('r') => return self.refresh(),
            _ => {}
        }
        None
    }

    fn handle_portfolio_key(&mut self, key: KeyEvent) {
        let len = self.session.portfolio().len();
        match key.code {
            KeyCode::Up => self.selected_holding = self.selected_holding.saturating_sub(1),
            KeyCode::Down if len > 0 => {
                self.selected_holding = (self.selected_holding + 1).min(len - 1)
            }
            KeyCode::Char('f') => {
                self.time_frame = self.time_frame.next();
                self.chart = chart_series(self.time_frame, &mut rand::thread_rng());
            }
            KeyCode::Char('b') => {
                let Some(id) = self.selected_token_id() else {
                    return;
                };
                match self.session.buy_more(&id, BUY_MORE_AMOUNT) {
                    Ok(_) => self.add_log(format!(
                        "Bought ${} more of {}",
                        format_usd(BUY_MORE_AMOUNT),
                        id
                    )),
                    Err(e) => self.report_error("Buy failed", &e),
                }
            }
            KeyCode::Char('x') => {
                let Some(id) = self.selected_token_id() else {
                    return;
                };
                match self.session.remove(&id) {
                    Ok(credited) => {
                        self.add_log(format!("Sold {} for ${}", id, format_usd(credited)));
                        let len = self.session.portfolio().len();
                        self.selected_holding = self.selected_holding.min(len.saturating_sub(1));
                    }
                    Err(e) => self.report_error("Sell failed", &e),
                }
            }
            _ => {}
        }
    }

    fn handle_wallet_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('r') => return self.refresh_wallet(),
            KeyCode::Char('d') => self.form.mode = WalletMode::Deposit,
            KeyCode::Char('w') => self.form.mode = WalletMode::Withdraw,
            KeyCode::Char('a') if self.form.mode == WalletMode::Withdraw => {
                self.form.field = FormField::Address
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.form.push_amount_char(c),
            KeyCode::Backspace => {
                self.form.amount.pop();
            }
            KeyCode::Up => self.form.cycle_quick_amount(true),
            KeyCode::Down => self.form.cycle_quick_amount(false),
            KeyCode::Enter => self.submit_wallet_form(),
            _ => {}
        }
        None
    }

    fn refresh_wallet(&mut self) -> Option<Command> {
        match self.session.refresh_wallet() {
            Ok(()) => {
                self.add_log(format!(
                    "Wallet refreshed: ${}",
                    self.session.wallet().balance().format_usdc()
                ));
                self.sol_balance_command()
            }
            Err(e) => {
                self.report_error("Refresh failed", &e);
                None
            }
        }
    }

    fn handle_address_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => self.form.field = FormField::Amount,
            KeyCode::Enter => {
                self.form.field = FormField::Amount;
                self.submit_wallet_form();
            }
            KeyCode::Backspace => {
                self.form.address.pop();
            }
            KeyCode::Char(c) if c.is_ascii_alphanumeric() => self.form.address.push(c),
            _ => {}
        }
        None
    }

    fn handle_profile_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('c') => {
                if self.session.wallet().is_connected() {
                    self.add_log("Wallet already connected.".to_string());
                    return None;
                }
                match self.session.connect() {
                    Ok(pk) => {
                        self.selected_holding = 0;
                        self.add_log(format!("Wallet connected: {}", pk));
                        return self.sol_balance_command();
                    }
                    Err(e) => self.report_error("Connect failed", &e),
                }
            }
            KeyCode::Char('o') => match self.session.logout() {
                Ok(()) => {
                    self.selected_holding = 0;
                    self.form = WalletForm::default();
                    self.add_log("Logged out.".to_string());
                }
                Err(e) => self.report_error("Logout failed", &e),
            },
            _ => {}
        }
        None
    }

    fn submit_wallet_form(&mut self) {
        let Some(amount) = self.form.parsed_amount() else {
            self.add_log("Enter an amount greater than zero.".to_string());
            return;
        };
        let result = match self.form.mode {
            WalletMode::Deposit => self.session.deposit(amount),
            WalletMode::Withdraw => {
                let address = self.form.address.clone();
                self.session.withdraw(amount, &address)
            }
        };
        match (result, self.form.mode) {
            (Ok(()), WalletMode::Deposit) => {
                self.add_log(format!("Deposited ${}", format_usd(amount)));
                self.form.amount.clear();
            }
            (Ok(()), WalletMode::Withdraw) => {
                self.add_log(format!("Withdrew ${}", format_usd(amount)));
                self.form.amount.clear();
                self.form.address.clear();
            }
            (Err(e), _) => self.report_error("Wallet", &e),
        }
    }

    fn refresh(&mut self) -> Option<Command> {
        match self.session.begin_fetch() {
            Some(ticket) => {
                self.add_log("Loading tokens...".to_string());
                Some(Command::FetchTokens(ticket))
            }
            None => None,
        }
    }

    fn sol_balance_command(&self) -> Option<Command> {
        if !self.live_sol_balance {
            return None;
        }
        self.session
            .wallet()
            .public_key()
            .map(|pk| Command::FetchSolBalance(pk.to_string()))
    }

    fn selected_token_id(&self) -> Option<String> {
        self.session
            .portfolio()
            .holdings()
            .get(self.selected_holding)
            .map(|h| h.token.id.clone())
    }

    fn report_swipe(&mut self, result: swipe_core::Result<SwipeOutcome>) {
        match result {
            Ok(SwipeOutcome::Bought { token_id, amount }) => {
                self.add_log(format!("Bought {} {}", amount.round_dp(4), token_id))
            }
            Ok(SwipeOutcome::Skipped { token_id }) => self.add_log(format!("Skipped {}", token_id)),
            Ok(SwipeOutcome::Reset) | Ok(SwipeOutcome::Ignored) => {}
            Err(e) => self.report_error("Buy failed", &e),
        }
    }

    fn report_error(&mut self, context: &str, error: &Error) {
        warn!("{}: {}", context, error);
        let message = match error {
            Error::InsufficientFunds { .. } => format!(
                "{}: insufficient balance. Deposit funds in the Wallet tab.",
                context
            ),
            other => format!("{}: {}", context, other),
        };
        self.add_log(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::sync::Arc;
    use swipe_core::catalog::DemoTokenSource;
    use swipe_core::config::SessionConfig;
    use swipe_core::wallet::{KeyValueStore, MemoryStore, StoredIdentity};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row: 10,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> App {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let identity = Arc::new(StoredIdentity::new(store.clone()));
        let session = Session::with_source(
            SessionConfig::default(),
            identity,
            store,
            80.0,
            Arc::new(DemoTokenSource::new(Duration::ZERO)),
        );
        App::new(session, false)
    }

    fn loaded_app() -> App {
        let mut app = app();
        app.tab = Tab::Profile;
        app.handle_key(key(KeyCode::Char('c')));
        app.tab = Tab::Discover;

        let commands = app.start();
        let Some(Command::FetchTokens(ticket)) = commands.into_iter().last() else {
            panic!("expected a fetch command");
        };
        app.on_event(AppEvent::TokensFetched(ticket, Ok(DemoTokenSource::tokens())));
        app
    }

    #[test]
    fn test_tab_navigation() {
        let mut app = app();
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Portfolio);
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.tab, Tab::Profile);
        app.handle_key(key(KeyCode::Char('3')));
        assert_eq!(app.tab, Tab::Wallet);
        app.handle_key(key(KeyCode::Char('1')));
        assert_eq!(app.tab, Tab::Wallet);
        assert_eq!(app.form.amount, "1");
    }

    #[test]
    fn test_start_requests_fetch_once() {
        let mut app = app();
        let commands = app.start();
        assert!(matches!(commands.as_slice(), [Command::FetchTokens(_)]));
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), None);
    }

    #[test]
    fn test_mouse_drag_buys_current_card() {
        let mut app = loaded_app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40));
        assert_eq!(app.session.deck().offset(), 30.0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40));

        assert_eq!(app.session.portfolio().len(), 1);
        assert_eq!(app.session.wallet().balance().usdc(), dec!(5.00));
        app.tick(Duration::from_secs(1));
        assert_eq!(app.session.deck().index(), 1);
    }

    #[test]
    fn test_short_drag_resets() {
        let mut app = loaded_app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20));
        app.tick(Duration::from_secs(1));

        assert!(app.session.portfolio().is_empty());
        assert_eq!(app.session.deck().index(), 0);
    }

    #[test]
    fn test_insufficient_funds_is_logged() {
        let mut app = loaded_app();
        for _ in 0..20 {
            app.handle_key(key(KeyCode::Char('+')));
        }
        app.handle_key(key(KeyCode::Right));

        assert!(app.session.portfolio().is_empty());
        assert!(app.logs.last().unwrap().contains("insufficient balance"));
    }

    #[test]
    fn test_portfolio_buy_more_and_sell() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Right));
        app.tick(Duration::from_secs(1));

        app.tab = Tab::Portfolio;
        app.handle_key(key(KeyCode::Char('b')));
        assert_eq!(app.session.wallet().balance().usdc(), Decimal::ZERO);

        app.handle_key(key(KeyCode::Char('x')));
        assert!(app.session.portfolio().is_empty());
        assert_eq!(app.selected_holding, 0);
        assert!(app.session.wallet().balance().usdc().round_dp(8) == dec!(10));
    }

    #[test]
    fn test_wallet_form_deposit_and_withdraw() {
        let mut app = loaded_app();
        app.tab = Tab::Wallet;
        for c in "2.505".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.form.amount, "2.50");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.session.wallet().balance().usdc(), dec!(12.50));

        app.handle_key(key(KeyCode::Char('w')));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.form.amount, "5");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.session.wallet().balance().usdc(), dec!(12.50));

        app.handle_key(key(KeyCode::Char('a')));
        for c in "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.session.wallet().balance().usdc(), dec!(7.50));
        assert!(app.form.address.is_empty());
    }

    #[test]
    fn test_wallet_amount_caps_integer_digits() {
        let mut app = loaded_app();
        app.tab = Tab::Wallet;
        for _ in 0..30 {
            app.handle_key(key(KeyCode::Char('9')));
        }
        assert_eq!(app.form.amount, "999999999");
        for c in ".999".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.form.amount, "999999999.99");

        for _ in 0..20 {
            app.handle_key(key(KeyCode::Enter));
            for c in "999999999".chars() {
                app.handle_key(key(KeyCode::Char(c)));
            }
        }
        assert!(app.session.wallet().balance().usdc() > dec!(999999999));
    }

    #[test]
    fn test_wallet_refresh_reloads_balance() {
        let mut app = loaded_app();
        app.tab = Tab::Wallet;
        app.session.deposit(dec!(1)).unwrap();

        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), None);
        assert_eq!(app.session.wallet().balance().usdc(), dec!(11.00));
        assert!(app.logs.last().unwrap().starts_with("Wallet refreshed"));

        app.live_sol_balance = true;
        let pk = app.session.wallet().public_key().unwrap().to_string();
        assert_eq!(
            app.handle_key(key(KeyCode::Char('r'))),
            Some(Command::FetchSolBalance(pk))
        );
        assert!(app.form.amount.is_empty());
    }

    #[test]
    fn test_wallet_refresh_without_wallet_is_reported() {
        let mut app = app();
        app.tab = Tab::Wallet;
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), None);
        assert!(app.logs.last().unwrap().starts_with("Refresh failed"));
    }

    #[test]
    fn test_logout_clears_portfolio() {
        let mut app = loaded_app();
        app.handle_key(key(KeyCode::Right));
        app.tick(Duration::from_secs(1));

        app.tab = Tab::Profile;
        app.handle_key(key(KeyCode::Char('o')));
        assert!(!app.session.wallet().is_connected());
        assert!(app.session.portfolio().is_empty());
    }

    #[test]
    fn test_time_frame_cycles_chart() {
        let mut app = app();
        app.tab = Tab::Portfolio;
        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(app.time_frame, TimeFrame::OneWeek);
        assert_eq!(app.chart.len(), 7);
    }

    #[test]
    fn test_log_is_bounded() {
        let mut app = app();
        for i in 0..(MAX_LOGS + 10) {
            app.add_log(format!("line {}", i));
        }
        assert_eq!(app.logs.len(), MAX_LOGS);
        assert_eq!(app.logs.last().unwrap(), &format!("line {}", MAX_LOGS + 9));
    }
}
