//! Simulated network telemetry.
//!
//! There is no real tunnel, so throughput is synthesized: a connected session
//! reports a busy link, anything else reports idle noise. Samples land in a
//! fixed-length sliding window that drives the throughput chart.

use crate::constants::THROUGHPUT_WINDOW;
use rand::Rng;
use std::collections::VecDeque;
use std::ops::RangeInclusive;

/// Throughput range while connected, in Mbps.
pub const CONNECTED_RANGE: RangeInclusive<u32> = 80..=150;
/// Idle noise range, in Mbps.
pub const IDLE_RANGE: RangeInclusive<u32> = 0..=5;

/// Draws one throughput sample.
pub fn sample(connected: bool, rng: &mut impl Rng) -> u32 {
    if connected {
        rng.gen_range(CONNECTED_RANGE)
    } else {
        rng.gen_range(IDLE_RANGE)
    }
}

/// Rolling window of the most recent throughput samples.
///
/// The length never changes: every push drops the oldest sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThroughputWindow {
    samples: VecDeque<u32>,
    /// Sequence number of the newest sample, used as the chart's x axis.
    seq: u64,
}

impl Default for ThroughputWindow {
    fn default() -> Self {
        Self::new(THROUGHPUT_WINDOW)
    }
}

impl ThroughputWindow {
    /// Creates a window of `len` zero samples.
    pub fn new(len: usize) -> Self {
        Self {
            samples: std::iter::repeat(0).take(len.max(1)).collect(),
            seq: 0,
        }
    }

    pub fn push(&mut self, mbps: u32) {
        self.samples.pop_front();
        self.samples.push_back(mbps);
        self.seq += 1;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn latest(&self) -> u32 {
        self.samples.back().copied().unwrap_or(0)
    }

    pub fn peak(&self) -> u32 {
        self.samples.iter().copied().max().unwrap_or(0)
    }

    pub fn samples(&self) -> impl Iterator<Item = u32> + '_ {
        self.samples.iter().copied()
    }

    /// Chart points as `(x, mbps)`, oldest first.
    #[allow(clippy::cast_precision_loss)]
    pub fn points(&self) -> Vec<(f64, f64)> {
        let first = self.seq as f64 - (self.samples.len() as f64 - 1.0);
        self.samples
            .iter()
            .enumerate()
            .map(|(i, v)| (first + i as f64, f64::from(*v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_window_starts_zeroed() {
        let window = ThroughputWindow::default();
        assert_eq!(window.len(), THROUGHPUT_WINDOW);
        assert!(window.samples().all(|s| s == 0));
    }

    #[test]
    fn test_push_drops_oldest() {
        let mut window = ThroughputWindow::new(3);
        for v in [1, 2, 3, 4] {
            window.push(v);
        }
        assert_eq!(window.samples().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(window.latest(), 4);
        assert_eq!(window.peak(), 4);
    }

    #[test]
    fn test_window_length_is_fixed() {
        let mut window = ThroughputWindow::default();
        for v in 0..500 {
            window.push(v);
        }
        assert_eq!(window.len(), THROUGHPUT_WINDOW);
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(CONNECTED_RANGE.contains(&sample(true, &mut rng)));
            assert!(IDLE_RANGE.contains(&sample(false, &mut rng)));
        }
    }

    #[test]
    fn test_points_follow_sequence() {
        let mut window = ThroughputWindow::new(2);
        window.push(10);
        window.push(20);
        assert_eq!(window.points(), vec![(1.0, 10.0), (2.0, 20.0)]);
    }
}
