//! Static server catalog.

use serde::Serialize;

/// Identifier of a catalog entry.
pub type ServerId = u32;

/// Quality tier advertised for a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Tier {
    Optimal,
    Fast,
    Normal,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Optimal => write!(f, "Optimal"),
            Tier::Fast => write!(f, "Fast"),
            Tier::Normal => write!(f, "Normal"),
        }
    }
}

/// A VPN exit node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServerNode {
    pub id: ServerId,
    pub country: &'static str,
    pub code: &'static str,
    pub city: &'static str,
    /// Display latency with unit suffix, e.g. `12ms`.
    pub latency: &'static str,
    pub tier: Tier,
    /// Map position in percent of the map width/height.
    pub x: u8,
    pub y: u8,
    pub vip_only: bool,
}

impl ServerNode {
    /// Numeric latency parsed from the display string. Unparseable values sort last.
    pub fn latency_ms(&self) -> u32 {
        self.latency
            .trim_end_matches("ms")
            .trim()
            .parse()
            .unwrap_or(u32::MAX)
    }

    /// `true` when `vip` is allowed to connect through this node.
    pub fn is_entitled(&self, vip: bool) -> bool {
        vip || !self.vip_only
    }
}

/// The four nodes offered by the service.
pub fn default_catalog() -> Vec<ServerNode> {
    vec![
        ServerNode {
            id: 1,
            country: "Timor-Leste",
            code: "TL",
            city: "Dili",
            latency: "12ms",
            tier: Tier::Optimal,
            x: 82,
            y: 68,
            vip_only: false,
        },
        ServerNode {
            id: 2,
            country: "Singapore",
            code: "SG",
            city: "Jurong",
            latency: "45ms",
            tier: Tier::Fast,
            x: 76,
            y: 58,
            vip_only: true,
        },
        ServerNode {
            id: 3,
            country: "Australia",
            code: "AU",
            city: "Darwin",
            latency: "58ms",
            tier: Tier::Fast,
            x: 84,
            y: 75,
            vip_only: true,
        },
        ServerNode {
            id: 4,
            country: "Indonesia",
            code: "ID",
            city: "Jakarta",
            latency: "62ms",
            tier: Tier::Normal,
            x: 78,
            y: 64,
            vip_only: false,
        },
    ]
}

/// Lowest-latency node `vip` is entitled to.
pub fn fastest(catalog: &[ServerNode], vip: bool) -> Option<&ServerNode> {
    catalog
        .iter()
        .filter(|s| s.is_entitled(vip))
        .min_by_key(|s| s.latency_ms())
}

/// First node advertised as Optimal.
pub fn first_optimal(catalog: &[ServerNode]) -> Option<&ServerNode> {
    catalog.iter().find(|s| s.tier == Tier::Optimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: ServerId, latency: &'static str, vip_only: bool) -> ServerNode {
        ServerNode {
            id,
            latency,
            vip_only,
            ..default_catalog()[0].clone()
        }
    }

    #[test]
    fn test_latency_parsing() {
        assert_eq!(node(1, "12ms", false).latency_ms(), 12);
        assert_eq!(node(1, "n/a", false).latency_ms(), u32::MAX);
    }

    #[test]
    fn test_fastest_respects_entitlement() {
        let catalog = vec![node(1, "40ms", false), node(2, "5ms", true)];
        assert_eq!(fastest(&catalog, false).map(|s| s.id), Some(1));
        assert_eq!(fastest(&catalog, true).map(|s| s.id), Some(2));
    }

    #[test]
    fn test_fastest_none_when_nothing_entitled() {
        let catalog = vec![node(2, "5ms", true)];
        assert!(fastest(&catalog, false).is_none());
    }

    #[test]
    fn test_default_catalog_optimal_is_dili() {
        let catalog = default_catalog();
        assert_eq!(first_optimal(&catalog).map(|s| s.city), Some("Dili"));
    }
}
