//! Simulated Bluetooth mesh discovery shown beside the tunnel controls.

use crate::constants::MESH_SCAN_DELAY;
use crate::scheduler::Scheduler;
use std::time::Duration;

/// A device found by the scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshPeer {
    pub name: &'static str,
    pub location: &'static str,
    /// Signal strength in percent.
    pub signal: u8,
}

/// Devices every scan discovers.
pub const PEERS: [MeshPeer; 4] = [
    MeshPeer {
        name: "iPhone 15 Pro Max",
        location: "Tokyo",
        signal: 95,
    },
    MeshPeer {
        name: "Samsung S24 Ultra",
        location: "London",
        signal: 82,
    },
    MeshPeer {
        name: "MacBook Air M3",
        location: "New York",
        signal: 78,
    },
    MeshPeer {
        name: "Timor Mesh Node #88",
        location: "Dili",
        signal: 100,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MeshState {
    #[default]
    Idle,
    Scanning,
    Active,
}

#[derive(Debug, Default)]
pub struct Mesh {
    state: MeshState,
    peers: Vec<MeshPeer>,
    timers: Scheduler<()>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MeshState {
        self.state
    }

    pub fn peers(&self) -> &[MeshPeer] {
        &self.peers
    }

    /// Starts a scan from idle, or tears down an active mesh. Ignored mid-scan.
    pub fn toggle(&mut self) -> MeshState {
        match self.state {
            MeshState::Idle => {
                self.state = MeshState::Scanning;
                self.timers.schedule(MESH_SCAN_DELAY, ());
            }
            MeshState::Active => {
                self.state = MeshState::Idle;
                self.peers.clear();
            }
            MeshState::Scanning => {}
        }
        self.state
    }

    /// Returns `true` when a scan completed during `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let until = self.timers.now() + elapsed;
        let mut found = false;
        while self.timers.pop_due(until).is_some() {
            self.state = MeshState::Active;
            self.peers = PEERS.to_vec();
            found = true;
        }
        self.timers.settle(until);
        found
    }

    /// Drops any scan in flight and forgets peers.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.state = MeshState::Idle;
        self.peers.clear();
    }
}
