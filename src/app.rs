//! Core application state and logic.
//!
//! This module contains the main [`App`] struct. It owns the session, the
//! wallet ledger, ad counters, the connection machine and every overlay flow,
//! and it is the only place any of them is mutated. Wall-clock time enters
//! through [`App::on_tick`]; everything below it runs on virtual time via
//! [`App::advance`], which is what the tests drive.

use crate::access::{self, View};
use crate::catalog;
use crate::connection::{ConnectionEvent, ConnectionMachine, ConnectionStatus, ToggleOutcome};
use crate::constants::{
    MSG_BACKEND_INIT, MSG_INSTALL, MSG_READY, MSG_VIP_REQUIRED, TOAST_DURATION, WALLET_ACCRUAL,
};
use crate::flows::{FlowEvent, FlowPhase, PaymentForm, TimedFlow, WithdrawForm};
use crate::mesh::{Mesh, MeshState};
use crate::monetization::{AdStats, AdTracker};
use crate::session::{self, ProfileUpdate, User};
use crate::share::{self, ShareTarget};
use crate::store::KvStore;
use crate::wallet::{Currency, Ledger};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

/// Maximum number of lines kept in the event log.
const MAX_LOGS: usize = 1000;

/// Profile fields editable from the profile page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProfileField {
    #[default]
    Name,
    Email,
}

/// Current input mode determining keyboard behavior.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal navigation mode.
    #[default]
    Normal,
    /// VIP payment overlay.
    Payment,
    /// Payout overlay.
    Withdraw,
    /// Invite overlay with the highlighted row. Row 0 is "copy link".
    Share { selected: usize },
    /// Profile edit dialog.
    EditProfile {
        focus: ProfileField,
        name: String,
        email: String,
    },
    /// Avatar file path prompt.
    AvatarPath { path: String },
}

/// Toast notification for temporary messages.
#[derive(Clone, Debug)]
pub struct Toast {
    /// Message to display.
    pub message: String,
    /// When the toast should disappear.
    pub expires: Instant,
}

/// Main application state container.
#[allow(clippy::struct_excessive_bools)]
pub struct App {
    /// Flag indicating the application should exit.
    pub should_quit: bool,

    // === Session ===
    /// Signed in; persisted through the store.
    pub authenticated: bool,
    /// Current viewer profile.
    pub user: User,
    /// Page requested from the menu.
    pub current_view: View,
    /// Menu drawer shown on narrow terminals.
    pub sidebar_open: bool,
    /// Email typed on the login screen.
    pub login_email: String,

    // === Money ===
    /// Wallet balance and transaction history.
    pub ledger: Ledger,
    /// Display currency for the wallet.
    pub currency: Currency,
    /// Ad impression timer and counters.
    ads: AdTracker,

    // === Private Internet ===
    /// Simulated VPN connection.
    pub connection: ConnectionMachine,
    /// Highlighted row of the server list.
    pub server_cursor: usize,
    /// Bluetooth mesh panel state.
    pub mesh: Mesh,

    // === Overlays ===
    /// VIP payment progress.
    pub payment: TimedFlow,
    /// Card or e-wallet details being entered.
    pub payment_form: PaymentForm,
    /// Withdrawal progress.
    pub withdraw: TimedFlow,
    /// Amount and destination being entered.
    pub withdraw_form: WithdrawForm,
    /// Active overlay, if any.
    pub input_mode: InputMode,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Active toast notification.
    pub toast: Option<Toast>,

    // === Event Log ===
    /// Timestamped event log lines.
    pub logs: Vec<String>,
    /// Scroll offset of the event log.
    pub logs_scroll: u16,
    /// Follow new log lines.
    pub logs_auto_scroll: bool,

    /// Last known terminal size (cols, rows).
    pub terminal_size: (u16, u16),

    /// Persisted auth flag.
    store: KvStore,
    /// Randomness for transaction ids.
    rng: StdRng,
    /// Wall clock of the previous tick, for elapsed time.
    last_tick: Instant,
}

impl App {
    /// Create a new App backed by `store`.
    pub fn new(store: KvStore) -> Self {
        Self::with_rng(
            store,
            ConnectionMachine::new(catalog::default_catalog()),
            StdRng::from_entropy(),
        )
    }

    fn with_rng(store: KvStore, connection: ConnectionMachine, rng: StdRng) -> Self {
        let authenticated = store.load_authenticated();
        let mut app = Self {
            should_quit: false,

            authenticated,
            user: User::default(),
            current_view: View::default(),
            sidebar_open: false,
            login_email: String::new(),

            ledger: Ledger::default(),
            currency: Currency::default(),
            ads: AdTracker::new(),

            connection,
            server_cursor: 0,
            mesh: Mesh::new(),

            payment: TimedFlow::payment(),
            payment_form: PaymentForm::default(),
            withdraw: TimedFlow::withdrawal(),
            withdraw_form: WithdrawForm::default(),
            input_mode: InputMode::Normal,
            show_help: false,
            toast: None,

            logs: Vec::new(),
            logs_scroll: 0,
            logs_auto_scroll: true,

            terminal_size: (80, 24),

            store,
            rng,
            last_tick: Instant::now(),
        };

        app.add_log(&format!(
            "INIT: {} v{} starting...",
            crate::constants::APP_NAME,
            crate::constants::APP_VERSION
        ));
        app.add_log(MSG_BACKEND_INIT);
        app.add_log(MSG_READY);
        app.sync_ads();
        app
    }

    pub fn ad_stats(&self) -> AdStats {
        self.ads.stats()
    }

    /// What the main pane shows; `None` renders nothing (or the login screen).
    pub fn visible_page(&self) -> Option<View> {
        access::visible_page(self.current_view, self.authenticated, &self.user)
    }

    // === Session ===

    /// Signs in as whoever owns `email` and lands on the dashboard.
    pub fn login(&mut self, email: &str) {
        self.user = session::login(email);
        self.authenticated = true;
        self.login_email.clear();
        self.go_to(View::Dashboard);
        self.persist_auth();
        tracing::info!(email, role = %self.user.role, vip = self.user.is_vip, "login");
        self.add_log(&format!(
            "AUTH: Signed in as {} ({})",
            self.user.name, self.user.role
        ));
    }

    /// Signs out. The wallet is process-wide and is left alone.
    pub fn logout(&mut self) {
        self.authenticated = false;
        self.sidebar_open = false;
        self.ads.reset();
        self.close_overlays();
        self.leave_internet();
        self.persist_auth();
        self.sync_ads();
        tracing::info!("logout");
        self.add_log("AUTH: Signed out");
    }

    /// Navigates to `view`. Wallet for a non-admin is allowed but shows nothing.
    pub fn request_view(&mut self, view: View) {
        if !self.authenticated {
            return;
        }
        self.go_to(view);
        self.sidebar_open = false;
    }

    fn go_to(&mut self, view: View) {
        if self.current_view == View::Internet && view != View::Internet {
            self.leave_internet();
        }
        self.current_view = view;
        self.sync_ads();
    }

    /// The connection and mesh only live while the Internet page is shown.
    fn leave_internet(&mut self) {
        if self.connection.status() != ConnectionStatus::Disconnected {
            self.add_log("VPN: Session closed with the Internet page");
        }
        self.connection.reset();
        self.mesh.reset();
        self.server_cursor = 0;
    }

    /// Owner-only switch between Super Admin and User.
    pub fn toggle_role(&mut self) -> bool {
        if !session::is_owner(&self.user) {
            return false;
        }
        self.user.toggle_role();
        if !session::has_wallet_access(&self.user) && self.current_view == View::Wallet {
            self.go_to(View::Dashboard);
        }
        self.add_log(&format!("ROLE: Switched to {}", self.user.role));
        true
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) {
        self.user.apply(update);
        self.show_toast("Profile updated".to_string());
    }

    /// Loads an image from `path` into the avatar.
    pub fn set_avatar_from_path(&mut self, path: &str) {
        match session::read_avatar(&crate::utils::expand_tilde(path)) {
            Ok(avatar) => {
                self.user.apply(ProfileUpdate {
                    avatar: Some(avatar),
                    ..ProfileUpdate::default()
                });
                self.show_toast("Profile photo updated".to_string());
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "avatar upload failed");
                self.show_toast(format!("Error: {e}"));
            }
        }
    }

    fn persist_auth(&mut self) {
        if let Err(e) = self.store.save_authenticated(self.authenticated) {
            tracing::warn!(error = %e, "failed to persist auth flag");
        }
    }

    fn sync_ads(&mut self) {
        self.ads
            .sync(self.current_view, self.authenticated, self.user.is_vip);
    }

    // === Upgrade ===

    /// Opens the payment overlay, unless the viewer already has VIP.
    pub fn open_upgrade(&mut self) {
        if self.user.is_vip {
            self.show_toast("You already have VIP".to_string());
            return;
        }
        self.payment_form = PaymentForm::default();
        self.input_mode = InputMode::Payment;
    }

    pub fn submit_payment(&mut self) {
        if let Err(e) = self.payment_form.validate() {
            self.show_toast(format!("Payment: {e}"));
            return;
        }
        if self.payment.submit() {
            self.add_log(&format!(
                "PAY: Processing {} via {}",
                crate::constants::VIP_PRICE_LABEL,
                self.payment_form.method.receipt_label()
            ));
        }
    }

    fn complete_upgrade(&mut self) {
        self.user.upgrade_to_vip();
        let today = crate::utils::today();
        let tx = self
            .ledger
            .credit_upgrade(&self.user.name, today, &mut self.rng);
        let line = format!("PAY: {} recorded, VIP active", tx.id);
        tracing::info!(tx = %tx.id, "vip upgrade");
        self.sync_ads();
        if self.input_mode == InputMode::Payment {
            self.input_mode = InputMode::Normal;
        }
        self.add_log(&line);
        self.show_toast("Welcome to VIP!".to_string());
    }

    // === Wallet ===

    pub fn open_withdraw(&mut self) {
        if !session::has_wallet_access(&self.user) {
            return;
        }
        self.withdraw_form.clear();
        self.input_mode = InputMode::Withdraw;
    }

    pub fn submit_withdraw(&mut self) {
        match self.withdraw_form.validate(self.ledger.balance()) {
            Ok(amount) => {
                if self.withdraw.submit() {
                    self.add_log(&format!(
                        "WALLET: Payout of {} requested",
                        crate::utils::format_usd(amount)
                    ));
                }
            }
            Err(e) => self.show_toast(format!("Withdraw: {e}")),
        }
    }

    fn commit_withdraw(&mut self) {
        let Ok(amount) = self.withdraw_form.validate(self.ledger.balance()) else {
            return;
        };
        let today = crate::utils::today();
        match self.ledger.withdraw(
            amount,
            &self.withdraw_form.destination,
            today,
            &mut self.rng,
        ) {
            Ok(tx) => {
                let line = format!(
                    "WALLET: {} sent {} ({})",
                    tx.id,
                    crate::utils::format_usd(tx.amount),
                    tx.method.as_deref().unwrap_or_default()
                );
                tracing::info!(tx = %tx.id, amount, "withdrawal committed");
                self.add_log(&line);
            }
            Err(e) => self.show_toast(format!("Withdraw: {e}")),
        }
    }

    pub fn cycle_currency(&mut self) {
        self.currency = self.currency.next();
    }

    // === Private Internet ===

    /// Power control.
    pub fn toggle_power(&mut self) {
        match self.connection.toggle(self.user.is_vip) {
            ToggleOutcome::Connecting => {
                let target = self
                    .connection
                    .active_server()
                    .map_or_else(|| "best server".to_string(), |s| s.city.to_string());
                self.add_log(&format!("VPN: Connecting to {target}..."));
            }
            ToggleOutcome::Disconnecting => self.add_log("VPN: Disconnecting..."),
            ToggleOutcome::UpgradeRequired => {
                self.show_toast(MSG_VIP_REQUIRED.to_string());
                self.open_upgrade();
            }
            ToggleOutcome::Busy => {
                self.show_toast(format!("Please wait, {}", self.connection.status().label()));
            }
        }
    }

    /// Selects the highlighted server.
    pub fn select_highlighted(&mut self) {
        let Some(id) = self.connection.catalog().get(self.server_cursor).map(|s| s.id) else {
            return;
        };
        match self.connection.select_server(id) {
            Ok(true) => {
                if let Some(server) = self.connection.active_server() {
                    let line = format!("VPN: Selected {} ({})", server.city, server.country);
                    self.add_log(&line);
                }
            }
            Ok(false) => {}
            Err(e) => self.show_toast(e.to_string()),
        }
    }

    pub fn connect_fastest(&mut self) {
        match self.connection.connect_fastest(self.user.is_vip) {
            Some(id) => {
                if let Some(pos) = self.connection.catalog().iter().position(|s| s.id == id) {
                    self.server_cursor = pos;
                }
                self.add_log(&format!("VPN: Fastest server is #{id}"));
            }
            None => self.show_toast("No server available on your plan".to_string()),
        }
    }

    pub fn toggle_mesh(&mut self) {
        match self.mesh.toggle() {
            MeshState::Scanning => self.add_log("MESH: Scanning for nearby devices..."),
            MeshState::Idle => self.add_log("MESH: Disabled"),
            MeshState::Active => {}
        }
    }

    fn server_next(&mut self) {
        let len = self.connection.catalog().len();
        if len > 0 {
            self.server_cursor = (self.server_cursor + 1) % len;
        }
    }

    fn server_previous(&mut self) {
        let len = self.connection.catalog().len();
        if len > 0 {
            self.server_cursor = (self.server_cursor + len - 1) % len;
        }
    }

    // === Share ===

    pub fn copy_link(&mut self, text: &str) {
        match share::copy_to_clipboard(&mut std::io::stdout(), text) {
            Ok(()) => self.show_toast("Link copied".to_string()),
            Err(e) => self.show_toast(format!("Copy failed: {e}")),
        }
    }

    fn share_selected(&mut self, selected: usize) {
        let link = match selected.checked_sub(1).and_then(|i| ShareTarget::ALL.get(i)) {
            None => Ok(crate::constants::APP_URL.to_string()),
            Some(target) => target.link().map(String::from),
        };
        match link {
            Ok(link) => self.copy_link(&link),
            Err(e) => self.show_toast(format!("Error: {e}")),
        }
    }

    // === Time ===

    /// Feeds `elapsed` virtual time to every timed component.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.ads.advance(elapsed) {
            // Counter and balance move in the same step
            self.ledger.accrue(WALLET_ACCRUAL);
        }

        for event in self.connection.advance(elapsed) {
            match event {
                ConnectionEvent::StatusChanged { to, .. } => {
                    self.add_log(&format!("VPN: {}", to.label()));
                }
                ConnectionEvent::ServerAutoSelected(id) => {
                    if let Some(pos) = self.connection.catalog().iter().position(|s| s.id == id) {
                        self.server_cursor = pos;
                    }
                    self.add_log(&format!("VPN: Auto-selected optimal server #{id}"));
                }
            }
        }

        if self.mesh.advance(elapsed) {
            self.add_log(&format!("MESH: {} peers connected", self.mesh.peers().len()));
        }

        for event in self.payment.advance(elapsed) {
            self.on_payment_event(event);
        }
        for event in self.withdraw.advance(elapsed) {
            self.on_withdraw_event(event);
        }
    }

    fn on_payment_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::Processed => self.add_log("PAY: Payment approved"),
            FlowEvent::Finished => self.complete_upgrade(),
        }
    }

    fn on_withdraw_event(&mut self, event: FlowEvent) {
        match event {
            FlowEvent::Processed => self.commit_withdraw(),
            FlowEvent::Finished => {
                self.withdraw_form.clear();
                if self.input_mode == InputMode::Withdraw {
                    self.input_mode = InputMode::Normal;
                }
            }
        }
    }

    /// Called on each tick.
    pub fn on_tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.advance(elapsed);

        // Expire toast
        if let Some(ref toast) = self.toast {
            if now > toast.expires {
                self.toast = None;
            }
        }
    }

    /// Called when terminal is resized
    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
    }

    // === Overlays ===

    fn close_overlays(&mut self) {
        if let Some(event) = self.payment.close() {
            self.on_payment_event(event);
        }
        if let Some(event) = self.withdraw.close() {
            self.on_withdraw_event(event);
        }
        self.input_mode = InputMode::Normal;
        self.show_help = false;
    }

    fn close_payment(&mut self) {
        if let Some(event) = self.payment.close() {
            self.on_payment_event(event);
        }
        self.input_mode = InputMode::Normal;
    }

    fn close_withdraw(&mut self) {
        if let Some(event) = self.withdraw.close() {
            self.on_withdraw_event(event);
        }
        self.input_mode = InputMode::Normal;
    }

    // === Logging ===

    /// Show a toast notification and log it
    pub fn show_toast(&mut self, message: String) {
        self.add_log(&message);
        self.toast = Some(Toast {
            message,
            expires: Instant::now() + TOAST_DURATION,
        });
    }

    /// Add a message to the persistent log
    pub fn add_log(&mut self, message: &str) {
        tracing::debug!(target: "timor::log", "{message}");
        let timestamp = crate::utils::format_local_time();
        self.logs.push(format!("{timestamp} {message}"));

        if self.logs.len() > MAX_LOGS {
            self.logs.remove(0);
        }

        if self.logs_auto_scroll {
            #[allow(clippy::cast_possible_truncation)]
            let scroll = self.logs.len().saturating_sub(1) as u16;
            self.logs_scroll = scroll;
        }
    }

    // === Keyboard ===

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if !self.authenticated {
            self.handle_login_keys(key);
            return;
        }

        // Global: Handle Help Toggle
        if self.show_help {
            self.show_help = false;
            return;
        }

        let input_mode = self.input_mode.clone();
        match input_mode {
            InputMode::Normal => self.handle_normal_keys(key),
            InputMode::Payment => self.handle_payment_keys(key),
            InputMode::Withdraw => self.handle_withdraw_keys(key),
            InputMode::Share { selected } => self.handle_share_keys(key, selected),
            InputMode::EditProfile { focus, name, email } => {
                self.handle_edit_profile_keys(key, focus, name, email);
            }
            InputMode::AvatarPath { mut path } => {
                edit_text(key, &mut path);
                match key.code {
                    KeyCode::Esc => self.input_mode = InputMode::Normal,
                    KeyCode::Enter => {
                        self.input_mode = InputMode::Normal;
                        self.set_avatar_from_path(path.trim());
                    }
                    _ => self.input_mode = InputMode::AvatarPath { path },
                }
            }
        }
    }

    fn handle_login_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                let email = self.login_email.trim().to_string();
                self.login(&email);
            }
            KeyCode::Esc => self.should_quit = true,
            _ => edit_text(key, &mut self.login_email),
        }
    }

    fn handle_normal_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,

            // Navigation
            KeyCode::Char('1') => self.request_view(View::Dashboard),
            KeyCode::Char('2') => self.request_view(View::Internet),
            KeyCode::Char('3') => self.request_view(View::Wallet),
            KeyCode::Char('4') => self.request_view(View::Profile),
            KeyCode::Tab => self.cycle_view(true),
            KeyCode::BackTab => self.cycle_view(false),
            KeyCode::Char('m') => self.sidebar_open = !self.sidebar_open,

            // Sidebar actions
            KeyCode::Char('s') => self.input_mode = InputMode::Share { selected: 0 },
            KeyCode::Char('i') => self.show_toast(MSG_INSTALL.to_string()),
            KeyCode::Char('L') => self.logout(),

            // Event log
            KeyCode::PageUp => {
                self.logs_auto_scroll = false;
                self.logs_scroll = self.logs_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                self.logs_scroll = self.logs_scroll.saturating_add(5);
                #[allow(clippy::cast_possible_truncation)]
                let max_scroll = self.logs.len().saturating_sub(1) as u16;
                if self.logs_scroll >= max_scroll {
                    self.logs_scroll = max_scroll;
                    self.logs_auto_scroll = true;
                }
            }

            _ => self.handle_page_keys(key),
        }
    }

    fn cycle_view(&mut self, forward: bool) {
        let menu = access::menu(&self.user);
        let Some(pos) = menu.iter().position(|v| *v == self.current_view) else {
            self.request_view(View::Dashboard);
            return;
        };
        let len = menu.len();
        let next = if forward {
            (pos + 1) % len
        } else {
            (pos + len - 1) % len
        };
        self.request_view(menu[next]);
    }

    fn handle_page_keys(&mut self, key: KeyEvent) {
        match self.visible_page() {
            Some(View::Dashboard) => {
                if key.code == KeyCode::Char('u') {
                    self.open_upgrade();
                }
            }
            Some(View::Internet) => match key.code {
                KeyCode::Char('c') | KeyCode::Enter => self.toggle_power(),
                KeyCode::Up | KeyCode::Char('k') => self.server_previous(),
                KeyCode::Down | KeyCode::Char('j') => self.server_next(),
                KeyCode::Char(' ') => self.select_highlighted(),
                KeyCode::Char('f') => self.connect_fastest(),
                KeyCode::Char('b') => self.toggle_mesh(),
                KeyCode::Char('u') => self.open_upgrade(),
                _ => {}
            },
            Some(View::Wallet) => match key.code {
                KeyCode::Char('w') => self.open_withdraw(),
                KeyCode::Char('x') => self.cycle_currency(),
                _ => {}
            },
            Some(View::Profile) => match key.code {
                KeyCode::Char('e') => {
                    self.input_mode = InputMode::EditProfile {
                        focus: ProfileField::Name,
                        name: self.user.name.clone(),
                        email: self.user.email.clone(),
                    };
                }
                KeyCode::Char('a') => {
                    self.input_mode = InputMode::AvatarPath {
                        path: String::new(),
                    };
                }
                KeyCode::Char('r') => {
                    if !self.toggle_role() {
                        self.show_toast("Only the owner can switch roles".to_string());
                    }
                }
                KeyCode::Char('u') => self.open_upgrade(),
                _ => {}
            },
            None => {}
        }
    }

    fn handle_payment_keys(&mut self, key: KeyEvent) {
        match self.payment.phase() {
            FlowPhase::Form => match key.code {
                KeyCode::Esc => self.close_payment(),
                KeyCode::Enter => self.submit_payment(),
                KeyCode::Tab | KeyCode::Down => self.payment_form.focus_next(),
                KeyCode::Left | KeyCode::Right => self.payment_form.cycle_method(),
                KeyCode::F(2) => self.payment_form.provider = self.payment_form.provider.next(),
                _ => edit_text(key, self.payment_form.focused_value_mut()),
            },
            FlowPhase::Processing => {
                if key.code == KeyCode::Esc {
                    self.close_payment();
                    self.add_log("PAY: Payment cancelled");
                }
            }
            FlowPhase::Success => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.close_payment();
                }
            }
        }
    }

    fn handle_withdraw_keys(&mut self, key: KeyEvent) {
        match self.withdraw.phase() {
            FlowPhase::Form => match key.code {
                KeyCode::Esc => self.close_withdraw(),
                KeyCode::Enter => self.submit_withdraw(),
                KeyCode::Tab | KeyCode::Down | KeyCode::Up => self.withdraw_form.focus_next(),
                KeyCode::Left | KeyCode::Right => {
                    self.withdraw_form.method = self.withdraw_form.method.toggle();
                }
                _ => edit_text(key, self.withdraw_form.focused_value_mut()),
            },
            FlowPhase::Processing => {
                if key.code == KeyCode::Esc {
                    self.close_withdraw();
                    self.add_log("WALLET: Payout cancelled");
                }
            }
            FlowPhase::Success => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                    self.close_withdraw();
                }
            }
        }
    }

    fn handle_share_keys(&mut self, key: KeyEvent, selected: usize) {
        let rows = ShareTarget::ALL.len() + 1;
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') => self.input_mode = InputMode::Normal,
            KeyCode::Up | KeyCode::Char('k') => {
                self.input_mode = InputMode::Share {
                    selected: (selected + rows - 1) % rows,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.input_mode = InputMode::Share {
                    selected: (selected + 1) % rows,
                };
            }
            KeyCode::Enter | KeyCode::Char('y') => self.share_selected(selected),
            _ => {}
        }
    }

    fn handle_edit_profile_keys(
        &mut self,
        key: KeyEvent,
        focus: ProfileField,
        mut name: String,
        mut email: String,
    ) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                return;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.update_profile(ProfileUpdate {
                    name: Some(name),
                    email: Some(email),
                    avatar: None,
                });
                return;
            }
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                let focus = match focus {
                    ProfileField::Name => ProfileField::Email,
                    ProfileField::Email => ProfileField::Name,
                };
                self.input_mode = InputMode::EditProfile { focus, name, email };
                return;
            }
            _ => match focus {
                ProfileField::Name => edit_text(key, &mut name),
                ProfileField::Email => edit_text(key, &mut email),
            },
        }
        self.input_mode = InputMode::EditProfile { focus, name, email };
    }
}

/// Applies a typing key to a text field.
fn edit_text(key: KeyEvent, buffer: &mut String) {
    match key.code {
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) => buffer.push(c),
        _ => {}
    }
}

#[cfg(test)]
impl App {
    /// In-memory store and seeded randomness.
    pub fn for_tests() -> Self {
        Self::with_rng(
            KvStore::in_memory(),
            ConnectionMachine::with_seed(catalog::default_catalog(), 7),
            StdRng::seed_from_u64(7),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{ADMIN_EMAIL, AUTH_KEY, OWNER_EMAIL};
    use crate::session::Role;
    use crate::wallet::TxKind;
    use pretty_assertions::assert_eq;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn fill_card(app: &mut App) {
        app.payment_form.card_number = "4000 0000 0000 0000".to_string();
        app.payment_form.expiry = "12/30".to_string();
        app.payment_form.cvc = "123".to_string();
    }

    #[test]
    fn test_fresh_app_starts_as_owner() {
        let app = App::for_tests();
        assert!(app.authenticated);
        assert_eq!(app.user, User::default());
        assert_eq!(app.visible_page(), Some(View::Dashboard));
        assert!((app.ledger.balance() - 450.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_startup_honours_stored_logout() {
        let mut store = KvStore::in_memory();
        store.set(AUTH_KEY, "false").unwrap();
        let app = App::with_rng(
            store,
            ConnectionMachine::with_seed(catalog::default_catalog(), 1),
            StdRng::seed_from_u64(1),
        );
        assert!(!app.authenticated);
        assert_eq!(app.visible_page(), None);
    }

    #[test]
    fn test_login_from_keyboard() {
        let mut app = App::for_tests();
        app.logout();
        type_text(&mut app, ADMIN_EMAIL);
        press(&mut app, KeyCode::Enter);

        assert!(app.authenticated);
        assert_eq!(app.user.role, Role::Admin);
        assert_eq!(app.user.name, "Admin Staff");
        assert!(app.user.is_vip);
        assert_eq!(app.current_view, View::Dashboard);
        assert!(app.login_email.is_empty());
    }

    #[test]
    fn test_admin_wallet_renders_nothing() {
        let mut app = App::for_tests();
        app.login(ADMIN_EMAIL);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Wallet);
        assert_eq!(app.visible_page(), None);

        // Wallet keys do nothing without the page
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_logout_resets_counters_and_keeps_wallet() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.advance(ms(500));
        assert_eq!(app.ad_stats().impressions, 1);
        let balance = app.ledger.balance();

        app.logout();
        assert!(!app.authenticated);
        assert_eq!(app.ad_stats(), AdStats::default());
        assert!((app.ledger.balance() - balance).abs() < f64::EPSILON);
        assert_eq!(app.store.get(AUTH_KEY), Some("false"));
    }

    #[test]
    fn test_accrual_credits_counter_and_wallet_together() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.advance(ms(499));
        assert_eq!(app.ad_stats().impressions, 0);
        assert!((app.ledger.balance() - 450.0).abs() < f64::EPSILON);

        app.advance(ms(1));
        assert_eq!(app.ad_stats().impressions, 1);
        assert!((app.ledger.balance() - 450.0025).abs() < 1e-9);
        assert_eq!(app.ledger.transactions().len(), 2);
    }

    #[test]
    fn test_vip_never_accrues() {
        let mut app = App::for_tests();
        for view in [View::Dashboard, View::Internet, View::Dashboard] {
            app.request_view(view);
            app.advance(ms(1000));
        }
        assert_eq!(app.ad_stats().impressions, 0);
    }

    #[test]
    fn test_upgrade_flow_end_to_end() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.request_view(View::Profile);

        press(&mut app, KeyCode::Char('u'));
        assert_eq!(app.input_mode, InputMode::Payment);
        fill_card(&mut app);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.payment.phase(), FlowPhase::Processing);

        app.advance(ms(2000));
        assert_eq!(app.payment.phase(), FlowPhase::Success);
        assert!(!app.user.is_vip);

        app.advance(ms(5000));
        assert!(app.user.is_vip);
        assert_eq!(app.user.role, Role::VipMember);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!((app.ledger.balance() - 455.0).abs() < 1e-9);
        let tx = &app.ledger.transactions()[0];
        assert_eq!(tx.kind, TxKind::Credit);
        assert!((tx.amount - 5.0).abs() < f64::EPSILON);
        assert_eq!(tx.description, "Upgrade VIP - New User");
        assert_eq!(app.ledger.transactions().len(), 3);
    }

    #[test]
    fn test_closing_receipt_upgrades_once() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.request_view(View::Profile);
        app.open_upgrade();
        fill_card(&mut app);
        app.submit_payment();
        app.advance(ms(2000));

        press(&mut app, KeyCode::Esc);
        assert!(app.user.is_vip);
        app.advance(ms(10_000));
        assert_eq!(app.ledger.transactions().len(), 3);
    }

    #[test]
    fn test_cancelled_payment_changes_nothing() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.request_view(View::Profile);
        app.open_upgrade();
        fill_card(&mut app);
        app.submit_payment();
        app.advance(ms(1000));
        press(&mut app, KeyCode::Esc);
        app.advance(ms(10_000));
        assert!(!app.user.is_vip);
        assert_eq!(app.ledger.transactions().len(), 2);
    }

    #[test]
    fn test_incomplete_payment_form_does_not_submit() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.open_upgrade();
        app.submit_payment();
        assert_eq!(app.payment.phase(), FlowPhase::Form);
        assert!(app.toast.is_some());
    }

    #[test]
    fn test_withdraw_scenario() {
        let mut app = App::for_tests();
        app.request_view(View::Wallet);
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.input_mode, InputMode::Withdraw);

        type_text(&mut app, "100");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "MY-123456789012");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.withdraw.phase(), FlowPhase::Processing);

        app.advance(ms(1500));
        assert!((app.ledger.balance() - 350.0).abs() < f64::EPSILON);
        let tx = &app.ledger.transactions()[0];
        assert_eq!(tx.kind, TxKind::Debit);
        assert!((tx.amount - 100.0).abs() < f64::EPSILON);
        assert_eq!(tx.method.as_deref(), Some("Visa Merchantrade"));

        app.advance(ms(2000));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.withdraw_form, WithdrawForm::default());
    }

    #[test]
    fn test_rejected_withdrawals_never_touch_ledger() {
        let mut app = App::for_tests();
        app.request_view(View::Wallet);
        for amount in ["0", "-5", "450.01", "lots"] {
            app.open_withdraw();
            app.withdraw_form.amount = amount.to_string();
            app.withdraw_form.destination = "BCA 1234".to_string();
            app.submit_withdraw();
            app.advance(ms(5000));
            assert_eq!(app.withdraw.phase(), FlowPhase::Form);
        }
        assert!((app.ledger.balance() - 450.0).abs() < f64::EPSILON);
        assert_eq!(app.ledger.transactions().len(), 2);
    }

    #[test]
    fn test_toggle_role_redirects_away_from_wallet() {
        let mut app = App::for_tests();
        app.request_view(View::Wallet);
        assert!(app.toggle_role());
        assert_eq!(app.user.role, Role::User);
        assert_eq!(app.current_view, View::Dashboard);

        assert!(app.toggle_role());
        assert_eq!(app.user.role, Role::SuperAdmin);
    }

    #[test]
    fn test_only_owner_toggles_role() {
        let mut app = App::for_tests();
        app.login(ADMIN_EMAIL);
        assert!(!app.toggle_role());
        assert_eq!(app.user.role, Role::Admin);

        app.login(OWNER_EMAIL);
        assert!(app.toggle_role());
    }

    #[test]
    fn test_vip_gate_opens_payment() {
        let mut app = App::for_tests();
        app.login("free@example.com");
        app.request_view(View::Internet);
        app.server_cursor = 1;
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.connection.active_server_id(), Some(2));

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.connection.status(), ConnectionStatus::Disconnected);
        assert!(!app.connection.has_pending_step());
        assert_eq!(app.input_mode, InputMode::Payment);
    }

    #[test]
    fn test_connection_runs_and_resets_when_leaving_page() {
        let mut app = App::for_tests();
        app.request_view(View::Internet);
        press(&mut app, KeyCode::Enter);
        app.advance(ms(3500));
        assert_eq!(app.connection.status(), ConnectionStatus::Connected);
        assert_eq!(app.connection.active_server_id(), Some(1));

        app.request_view(View::Profile);
        assert_eq!(app.connection.status(), ConnectionStatus::Disconnected);
        assert_eq!(app.connection.active_server_id(), None);
        app.advance(ms(10_000));
        assert_eq!(app.connection.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_fastest_during_connect_moves_cursor_without_toast() {
        let mut app = App::for_tests();
        app.request_view(View::Internet);
        app.server_cursor = 3;
        app.select_highlighted();
        app.toggle_power();
        assert_eq!(app.connection.status(), ConnectionStatus::Connecting);

        press(&mut app, KeyCode::Char('f'));
        assert!(app.toast.is_none());
        assert_eq!(app.server_cursor, 0);
        assert_eq!(app.connection.active_server_id(), Some(1));
        assert_eq!(app.connection.status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn test_tab_follows_menu() {
        let mut app = App::for_tests();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Wallet);

        app.login(ADMIN_EMAIL);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Profile);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.current_view, View::Internet);
    }

    #[test]
    fn test_edit_profile_dialog() {
        let mut app = App::for_tests();
        app.request_view(View::Profile);
        press(&mut app, KeyCode::Char('e'));
        for _ in 0.."Kirenius Kollo".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "Kiren");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.user.name, "Kiren");
        assert_eq!(app.user.email, OWNER_EMAIL);
    }

    #[test]
    fn test_avatar_from_missing_file_keeps_avatar() {
        let mut app = App::for_tests();
        let before = app.user.avatar.clone();
        app.set_avatar_from_path("/no/such/file.png");
        assert_eq!(app.user.avatar, before);
        assert!(app.toast.as_ref().is_some_and(|t| t.message.starts_with("Error")));
    }

    #[test]
    fn test_mesh_scan_through_app() {
        let mut app = App::for_tests();
        app.request_view(View::Internet);
        press(&mut app, KeyCode::Char('b'));
        app.advance(ms(3000));
        assert_eq!(app.mesh.peers().len(), 4);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::for_tests();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = App::for_tests();
        app.logout();
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_log_is_capped() {
        let mut app = App::for_tests();
        for i in 0..(MAX_LOGS + 10) {
            app.add_log(&format!("line {i}"));
        }
        assert_eq!(app.logs.len(), MAX_LOGS);
    }
}
