//! Application-wide constants and configuration values.
//!
//! This module defines all static configuration values used throughout Timor,
//! including simulated delays, pricing, the privileged accounts and UI messages.

use std::time::Duration;

// === Application Metadata ===

/// Application name used in logging and directories.
pub const APP_NAME: &str = "Timor App";
/// Current application version from Cargo.toml.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Public landing page used by every share target.
pub const APP_URL: &str = "https://timorapp.com/join";

// === Timing Configuration ===

/// UI refresh rate in milliseconds.
pub const DEFAULT_TICK_RATE: u64 = 100;
/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

/// `connecting` -> `authenticating`.
pub const CONNECTING_DELAY: Duration = Duration::from_millis(1500);
/// `authenticating` -> `connected`.
pub const AUTHENTICATING_DELAY: Duration = Duration::from_millis(2000);
/// `disconnecting` -> `disconnected`.
pub const DISCONNECTING_DELAY: Duration = Duration::from_millis(1500);
/// Throughput sampler and uptime counter period.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);
/// Number of samples kept in the throughput window.
pub const THROUGHPUT_WINDOW: usize = 20;

/// Delay before an ad impression is accrued on a monetized view.
pub const AD_IMPRESSION_DELAY: Duration = Duration::from_millis(500);

/// Simulated payment gateway round-trip.
pub const PAYMENT_PROCESSING: Duration = Duration::from_secs(2);
/// How long the payment receipt stays visible before the upgrade is applied.
pub const PAYMENT_RECEIPT: Duration = Duration::from_secs(5);
/// Simulated payout round-trip.
pub const WITHDRAW_PROCESSING: Duration = Duration::from_millis(1500);
/// How long the payout confirmation stays visible.
pub const WITHDRAW_RECEIPT: Duration = Duration::from_secs(2);

/// Bluetooth mesh discovery time.
pub const MESH_SCAN_DELAY: Duration = Duration::from_secs(3);

// === Accounts ===

/// The single account allowed to switch roles.
pub const OWNER_EMAIL: &str = "kirenius.kollo@timorapp.com";
/// Staff account that logs in as Admin with VIP.
pub const ADMIN_EMAIL: &str = "admin@timor.tl";
/// Default avatar for every fresh session.
pub const DEFAULT_AVATAR: &str = "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?ixlib=rb-1.2.1&auto=format&fit=crop&w=256&q=80";

// === Monetization ===

/// Price of the monthly VIP plan in USD.
pub const VIP_PRICE: f64 = 5.00;
/// Label shown on the payment overlay.
pub const VIP_PRICE_LABEL: &str = "$5.00/mo";
/// Enterprise plan label, display only.
pub const ENTERPRISE_PRICE_LABEL: &str = "$49.99/mo";
/// Revenue per thousand ad impressions in USD.
pub const AD_CPM: f64 = 2.50;
/// Wallet credit applied per accrued impression.
pub const WALLET_ACCRUAL: f64 = 0.0025;
/// Opening wallet balance in USD.
pub const OPENING_BALANCE: f64 = 450.00;

// === Persistence ===

/// Name of the configuration directory under ~/.config/
pub const CONFIG_DIR_NAME: &str = "timor";
/// File holding the key/value store.
pub const STORE_FILE_NAME: &str = "storage.json";
/// Key of the persisted authentication flag.
pub const AUTH_KEY: &str = "timor_auth";

// === UI Messages ===

/// Backend initialization message.
pub const MSG_BACKEND_INIT: &str = "IO: Simulated services online";
/// Ready state message.
pub const MSG_READY: &str = "SUCCESS: System active. Press [?] for help.";
/// Shown when the power control hits a VIP-only node.
pub const MSG_VIP_REQUIRED: &str = "VIP required for this server";
/// Placeholder for the home screen install action.
pub const MSG_INSTALL: &str = "Install to home screen is a simulated feature";
/// No data available placeholder.
pub const MSG_NO_DATA: &str = "---";
