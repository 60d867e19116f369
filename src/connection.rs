//! Simulated VPN connection state machine.
//!
//! ```text
//! disconnected --toggle--> connecting --1.5s--> authenticating --2s--> connected
//!      ^                                                                  |
//!      +----------------1.5s---------- disconnecting <-------toggle-------+
//! ```
//!
//! Transitions are timers owned by the machine. Entering any state cancels the
//! pending step timer, so a step queued for a superseded state can never fire.
//! A one-second sampler feeds the throughput window and the uptime counter; it
//! restarts on every status change.

use crate::catalog::{self, ServerId, ServerNode};
use crate::constants::{
    AUTHENTICATING_DELAY, CONNECTING_DELAY, DISCONNECTING_DELAY, SAMPLE_INTERVAL,
};
use crate::error::{Result, TimorError};
use crate::scheduler::{Scheduler, TimerId};
use crate::telemetry::{self, ThroughputWindow};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

/// Connection lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Authenticating,
    Connected,
    Disconnecting,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Authenticating => "authenticating",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnecting => "disconnecting",
        }
    }

    /// States the user may change the server in.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            ConnectionStatus::Disconnected | ConnectionStatus::Connected
        )
    }
}

/// Result of pressing the power control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Connecting,
    Disconnecting,
    /// Active node is VIP-only and the viewer is not VIP. Nothing changed.
    UpgradeRequired,
    /// A transition is already running. Nothing changed.
    Busy,
}

/// Notifications produced while timers drain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    StatusChanged {
        from: ConnectionStatus,
        to: ConnectionStatus,
    },
    ServerAutoSelected(ServerId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConnTimer {
    /// Leave the transitional state the machine was in when scheduled.
    Step,
    Sample,
}

pub struct ConnectionMachine {
    status: ConnectionStatus,
    catalog: Vec<ServerNode>,
    active_server: Option<ServerId>,
    elapsed_secs: u64,
    throughput: ThroughputWindow,
    timers: Scheduler<ConnTimer>,
    step: Option<TimerId>,
    sampler: Option<TimerId>,
    rng: StdRng,
}

impl ConnectionMachine {
    pub fn new(catalog: Vec<ServerNode>) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Deterministic machine for tests.
    pub fn with_seed(catalog: Vec<ServerNode>, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Vec<ServerNode>, rng: StdRng) -> Self {
        let mut machine = Self {
            status: ConnectionStatus::Disconnected,
            catalog,
            active_server: None,
            elapsed_secs: 0,
            throughput: ThroughputWindow::default(),
            timers: Scheduler::new(),
            step: None,
            sampler: None,
            rng,
        };
        machine.restart_sampler();
        machine
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn catalog(&self) -> &[ServerNode] {
        &self.catalog
    }

    pub fn active_server_id(&self) -> Option<ServerId> {
        self.active_server
    }

    pub fn active_server(&self) -> Option<&ServerNode> {
        let id = self.active_server?;
        self.catalog.iter().find(|s| s.id == id)
    }

    /// Seconds spent in `connected` since the last disconnect.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn throughput(&self) -> &ThroughputWindow {
        &self.throughput
    }

    /// `true` while a transition timer is queued.
    pub fn has_pending_step(&self) -> bool {
        self.step.is_some_and(|id| self.timers.is_pending(id))
    }

    /// Active node is VIP-only and `vip` is not.
    pub fn is_vip_locked(&self, vip: bool) -> bool {
        self.active_server().is_some_and(|s| !s.is_entitled(vip))
    }

    /// Power control.
    pub fn toggle(&mut self, vip: bool) -> ToggleOutcome {
        match self.status {
            ConnectionStatus::Disconnected => {
                if self.is_vip_locked(vip) {
                    tracing::info!(server = ?self.active_server, "connection refused: VIP only");
                    return ToggleOutcome::UpgradeRequired;
                }
                self.enter(ConnectionStatus::Connecting);
                ToggleOutcome::Connecting
            }
            ConnectionStatus::Connected => {
                self.enter(ConnectionStatus::Disconnecting);
                ToggleOutcome::Disconnecting
            }
            ConnectionStatus::Connecting
            | ConnectionStatus::Authenticating
            | ConnectionStatus::Disconnecting => ToggleOutcome::Busy,
        }
    }

    /// Picks a node. VIP-only nodes may be selected for preview.
    ///
    /// Returns `Ok(false)` when `id` was already active.
    pub fn select_server(&mut self, id: ServerId) -> Result<bool> {
        if !self.status.is_settled() {
            return Err(TimorError::ServerLocked {
                status: self.status.label(),
            });
        }
        if !self.catalog.iter().any(|s| s.id == id) {
            return Err(TimorError::UnknownServer { id });
        }
        if self.active_server == Some(id) {
            return Ok(false);
        }
        self.active_server = Some(id);
        Ok(true)
    }

    /// Selects the lowest-latency node `vip` may use and connects through it
    /// when currently disconnected.
    ///
    /// The selection applies in every state; only the connect waits for
    /// `Disconnected`. `None` means no node is available to `vip`.
    pub fn connect_fastest(&mut self, vip: bool) -> Option<ServerId> {
        let id = catalog::fastest(&self.catalog, vip)?.id;
        self.active_server = Some(id);
        if self.status == ConnectionStatus::Disconnected {
            self.toggle(vip);
        }
        Some(id)
    }

    /// Drains every timer due within `elapsed`, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<ConnectionEvent> {
        let until = self.timers.now() + elapsed;
        let mut events = Vec::new();
        while let Some(timer) = self.timers.pop_due(until) {
            match timer {
                ConnTimer::Step => {
                    self.step = None;
                    self.on_step(&mut events);
                }
                ConnTimer::Sample => self.on_sample(),
            }
        }
        self.timers.settle(until);
        events
    }

    /// Back to a fresh disconnected machine. Called when the page goes away.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.step = None;
        self.status = ConnectionStatus::Disconnected;
        self.active_server = None;
        self.elapsed_secs = 0;
        self.throughput = ThroughputWindow::default();
        self.restart_sampler();
    }

    fn enter(&mut self, next: ConnectionStatus) {
        if let Some(id) = self.step.take() {
            self.timers.cancel(id);
        }
        tracing::debug!(from = self.status.label(), to = next.label(), "connection status");
        self.status = next;

        let delay = match next {
            ConnectionStatus::Connecting => Some(CONNECTING_DELAY),
            ConnectionStatus::Authenticating => Some(AUTHENTICATING_DELAY),
            ConnectionStatus::Disconnecting => Some(DISCONNECTING_DELAY),
            ConnectionStatus::Connected | ConnectionStatus::Disconnected => None,
        };
        if let Some(delay) = delay {
            self.step = Some(self.timers.schedule(delay, ConnTimer::Step));
        }
        self.restart_sampler();
    }

    fn on_step(&mut self, events: &mut Vec<ConnectionEvent>) {
        let from = self.status;
        let to = match from {
            ConnectionStatus::Connecting => ConnectionStatus::Authenticating,
            ConnectionStatus::Authenticating => ConnectionStatus::Connected,
            ConnectionStatus::Disconnecting => ConnectionStatus::Disconnected,
            // Step timers are cancelled on every entry, so a settled state never sees one
            ConnectionStatus::Connected | ConnectionStatus::Disconnected => return,
        };
        self.enter(to);
        events.push(ConnectionEvent::StatusChanged { from, to });

        match to {
            ConnectionStatus::Connected if self.active_server.is_none() => {
                if let Some(id) = catalog::first_optimal(&self.catalog).map(|s| s.id) {
                    self.active_server = Some(id);
                    events.push(ConnectionEvent::ServerAutoSelected(id));
                }
            }
            ConnectionStatus::Disconnected => self.elapsed_secs = 0,
            _ => {}
        }
    }

    fn on_sample(&mut self) {
        let connected = self.status == ConnectionStatus::Connected;
        self.throughput
            .push(telemetry::sample(connected, &mut self.rng));
        if connected {
            self.elapsed_secs += 1;
        }
        self.sampler = Some(self.timers.schedule(SAMPLE_INTERVAL, ConnTimer::Sample));
    }

    fn restart_sampler(&mut self) {
        if let Some(id) = self.sampler.take() {
            self.timers.cancel(id);
        }
        self.sampler = Some(self.timers.schedule(SAMPLE_INTERVAL, ConnTimer::Sample));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;
    use crate::telemetry::{CONNECTED_RANGE, IDLE_RANGE};

    fn machine() -> ConnectionMachine {
        ConnectionMachine::with_seed(default_catalog(), 1)
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn statuses(events: &[ConnectionEvent]) -> Vec<ConnectionStatus> {
        events
            .iter()
            .filter_map(|e| match e {
                ConnectionEvent::StatusChanged { to, .. } => Some(*to),
                ConnectionEvent::ServerAutoSelected(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_bare_toggle_walks_to_connected_and_picks_optimal() {
        let mut m = machine();
        assert_eq!(m.toggle(false), ToggleOutcome::Connecting);
        assert_eq!(m.status(), ConnectionStatus::Connecting);

        assert!(m.advance(ms(1499)).iter().all(|e| !matches!(e, ConnectionEvent::StatusChanged { .. })));
        let events = m.advance(ms(1));
        assert_eq!(statuses(&events), vec![ConnectionStatus::Authenticating]);

        let events = m.advance(ms(2000));
        assert_eq!(statuses(&events), vec![ConnectionStatus::Connected]);
        assert!(events.contains(&ConnectionEvent::ServerAutoSelected(1)));
        assert_eq!(m.active_server().map(|s| s.city), Some("Dili"));
    }

    #[test]
    fn test_single_large_advance_visits_every_state() {
        let mut m = machine();
        m.toggle(false);
        let events = m.advance(ms(10_000));
        assert_eq!(
            statuses(&events),
            vec![ConnectionStatus::Authenticating, ConnectionStatus::Connected]
        );
    }

    #[test]
    fn test_disconnect_resets_elapsed() {
        let mut m = machine();
        m.toggle(false);
        m.advance(ms(3500));
        m.advance(ms(120_000));
        assert!(m.elapsed_secs() >= 119);

        assert_eq!(m.toggle(false), ToggleOutcome::Disconnecting);
        let events = m.advance(ms(1500));
        assert_eq!(statuses(&events), vec![ConnectionStatus::Disconnected]);
        assert_eq!(m.elapsed_secs(), 0);
    }

    #[test]
    fn test_elapsed_counts_seconds_while_connected() {
        let mut m = machine();
        m.toggle(false);
        m.advance(ms(3500));
        assert_eq!(m.elapsed_secs(), 0);
        m.advance(ms(5000));
        assert_eq!(m.elapsed_secs(), 5);
    }

    #[test]
    fn test_vip_locked_server_refuses_without_timer() {
        let mut m = machine();
        m.select_server(2).unwrap();
        assert_eq!(m.toggle(false), ToggleOutcome::UpgradeRequired);
        assert_eq!(m.status(), ConnectionStatus::Disconnected);
        assert!(!m.has_pending_step());
        assert!(statuses(&m.advance(ms(10_000))).is_empty());
    }

    #[test]
    fn test_vip_may_use_vip_server() {
        let mut m = machine();
        m.select_server(2).unwrap();
        assert_eq!(m.toggle(true), ToggleOutcome::Connecting);
        m.advance(ms(3500));
        assert_eq!(m.status(), ConnectionStatus::Connected);
        assert_eq!(m.active_server_id(), Some(2));
    }

    #[test]
    fn test_toggle_during_transition_is_busy() {
        let mut m = machine();
        m.toggle(false);
        m.advance(ms(1000));
        assert_eq!(m.toggle(false), ToggleOutcome::Busy);
        // The pending step keeps its due time
        let events = m.advance(ms(500));
        assert_eq!(statuses(&events), vec![ConnectionStatus::Authenticating]);
    }

    #[test]
    fn test_reset_cancels_in_flight_transition() {
        let mut m = machine();
        m.toggle(false);
        m.advance(ms(1000));
        m.reset();
        assert_eq!(m.status(), ConnectionStatus::Disconnected);

        // Reconnect; the stale 1.5s step from the first attempt must not fire early
        m.toggle(false);
        let events = m.advance(ms(600));
        assert!(statuses(&events).is_empty());
        assert_eq!(m.status(), ConnectionStatus::Connecting);
        let events = m.advance(ms(900));
        assert_eq!(statuses(&events), vec![ConnectionStatus::Authenticating]);
    }

    #[test]
    fn test_select_server_rejected_during_transition() {
        let mut m = machine();
        m.toggle(false);
        assert!(matches!(
            m.select_server(4),
            Err(TimorError::ServerLocked { .. })
        ));
        assert_eq!(m.active_server_id(), None);
    }

    #[test]
    fn test_select_server_idempotent() {
        let mut m = machine();
        assert!(m.select_server(4).unwrap());
        assert!(!m.select_server(4).unwrap());
        assert_eq!(m.active_server_id(), Some(4));
        assert_eq!(m.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_select_unknown_server() {
        let mut m = machine();
        assert!(matches!(
            m.select_server(99),
            Err(TimorError::UnknownServer { id: 99 })
        ));
    }

    #[test]
    fn test_select_while_connected_keeps_connection() {
        let mut m = machine();
        m.toggle(false);
        m.advance(ms(3500));
        assert!(m.select_server(4).unwrap());
        assert_eq!(m.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn test_explicit_selection_is_not_overridden() {
        let mut m = machine();
        m.select_server(4).unwrap();
        m.toggle(false);
        let events = m.advance(ms(3500));
        assert!(!events
            .iter()
            .any(|e| matches!(e, ConnectionEvent::ServerAutoSelected(_))));
        assert_eq!(m.active_server_id(), Some(4));
    }

    #[test]
    fn test_connect_fastest_free_user() {
        let mut m = machine();
        assert_eq!(m.connect_fastest(false), Some(1));
        assert_eq!(m.status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn test_connect_fastest_while_connected_only_selects() {
        let mut m = machine();
        m.select_server(4).unwrap();
        m.toggle(false);
        m.advance(ms(3500));
        assert_eq!(m.connect_fastest(true), Some(1));
        assert_eq!(m.status(), ConnectionStatus::Connected);
        assert_eq!(m.active_server_id(), Some(1));
    }

    #[test]
    fn test_connect_fastest_mid_transition_selects_without_restarting() {
        let mut m = machine();
        m.select_server(4).unwrap();
        assert_eq!(m.toggle(true), ToggleOutcome::Connecting);
        m.advance(ms(500));

        assert_eq!(m.connect_fastest(true), Some(1));
        assert_eq!(m.active_server_id(), Some(1));
        assert_eq!(m.status(), ConnectionStatus::Connecting);
        assert!(m.has_pending_step());

        // The first 1.5s step still fires once, on time
        let events = m.advance(ms(1000));
        assert_eq!(statuses(&events), vec![ConnectionStatus::Authenticating]);
        let events = m.advance(ms(2000));
        assert_eq!(statuses(&events), vec![ConnectionStatus::Connected]);
        assert_eq!(m.active_server_id(), Some(1));
    }

    #[test]
    fn test_connect_fastest_while_disconnecting_does_not_reconnect() {
        let mut m = machine();
        m.toggle(false);
        m.advance(ms(3500));
        m.toggle(false);
        assert_eq!(m.status(), ConnectionStatus::Disconnecting);

        assert_eq!(m.connect_fastest(false), Some(1));
        m.advance(ms(1500));
        assert_eq!(m.status(), ConnectionStatus::Disconnected);
        assert!(!m.has_pending_step());
    }

    #[test]
    fn test_vip_locked_can_still_disconnect() {
        let mut m = machine();
        m.toggle(false);
        m.advance(ms(3500));
        m.select_server(2).unwrap();
        assert!(m.is_vip_locked(false));
        assert_eq!(m.toggle(false), ToggleOutcome::Disconnecting);
    }

    #[test]
    fn test_samples_follow_status() {
        let mut m = machine();
        m.advance(ms(5000));
        assert!(IDLE_RANGE.contains(&m.throughput().latest()));

        m.toggle(false);
        m.advance(ms(3500));
        m.advance(ms(1000));
        assert!(CONNECTED_RANGE.contains(&m.throughput().latest()));
        assert_eq!(m.throughput().len(), crate::constants::THROUGHPUT_WINDOW);
    }
}
