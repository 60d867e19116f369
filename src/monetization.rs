//! Ad impression accrual for free users.
//!
//! The tracker watches the (view, authenticated, vip) triple. Each time the
//! triple changes it cancels whatever was pending and, when the new state is
//! monetized, arms exactly one impression timer. It is a one-shot per state
//! entry, not a repeating interval.

use crate::access::View;
use crate::constants::{AD_CPM, AD_IMPRESSION_DELAY};
use crate::scheduler::{Scheduler, TimerId};
use std::time::Duration;

/// Counters shown in the live revenue badge. Zeroed at logout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AdStats {
    pub impressions: u64,
    /// Accumulated revenue in USD.
    pub revenue: f64,
}

/// Revenue credited per impression.
pub fn revenue_per_impression() -> f64 {
    AD_CPM / 1000.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Watch {
    view: View,
    authenticated: bool,
    vip: bool,
}

impl Watch {
    fn is_monetized(self) -> bool {
        self.authenticated && !self.vip && self.view.is_monetized()
    }
}

#[derive(Debug, Default)]
pub struct AdTracker {
    stats: AdStats,
    watching: Option<Watch>,
    timers: Scheduler<()>,
    armed: Option<TimerId>,
}

impl AdTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> AdStats {
        self.stats
    }

    /// `true` while an impression is waiting to be recorded.
    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.armed.is_some_and(|id| self.timers.is_pending(id))
    }

    /// Re-arms on any change of the watched triple. Unchanged input is a no-op.
    pub fn sync(&mut self, view: View, authenticated: bool, vip: bool) {
        let next = Watch {
            view,
            authenticated,
            vip,
        };
        if self.watching == Some(next) {
            return;
        }
        self.watching = Some(next);

        if let Some(id) = self.armed.take() {
            self.timers.cancel(id);
        }
        if next.is_monetized() {
            self.armed = Some(self.timers.schedule(AD_IMPRESSION_DELAY, ()));
        }
    }

    /// Advances the clock. Returns `true` when an impression was recorded.
    ///
    /// The caller credits the wallet in the same step, so the counter and the
    /// balance never diverge observably.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let until = self.timers.now() + elapsed;
        let mut fired = false;
        while self.timers.pop_due(until).is_some() {
            self.armed = None;
            self.stats.impressions += 1;
            self.stats.revenue += revenue_per_impression();
            fired = true;
            tracing::debug!(
                impressions = self.stats.impressions,
                revenue = self.stats.revenue,
                "ad impression recorded"
            );
        }
        self.timers.settle(until);
        fired
    }

    /// Zeroes the counters. The watched triple is kept.
    pub fn reset(&mut self) {
        self.stats = AdStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_accrues_once_after_delay() {
        let mut ads = AdTracker::new();
        ads.sync(View::Dashboard, true, false);

        assert!(!ads.advance(ms(499)));
        assert!(ads.advance(ms(1)));
        assert_eq!(ads.stats().impressions, 1);
        assert!((ads.stats().revenue - 0.0025).abs() < 1e-12);

        // One-shot: nothing more while sitting on the same view
        assert!(!ads.advance(ms(60_000)));
        assert_eq!(ads.stats().impressions, 1);
    }

    #[test]
    fn test_never_accrues_for_vip() {
        let mut ads = AdTracker::new();
        ads.sync(View::Internet, true, true);
        assert!(!ads.is_armed());
        assert!(!ads.advance(ms(10_000)));
        assert_eq!(ads.stats(), AdStats::default());
    }

    #[test]
    fn test_view_change_cancels_pending_accrual() {
        let mut ads = AdTracker::new();
        ads.sync(View::Dashboard, true, false);
        ads.advance(ms(300));
        ads.sync(View::Profile, true, false);
        assert!(!ads.advance(ms(1000)));
        assert_eq!(ads.stats().impressions, 0);
    }

    #[test]
    fn test_upgrade_cancels_pending_accrual() {
        let mut ads = AdTracker::new();
        ads.sync(View::Internet, true, false);
        ads.sync(View::Internet, true, true);
        assert!(!ads.advance(ms(1000)));
    }

    #[test]
    fn test_resync_same_state_does_not_rearm() {
        let mut ads = AdTracker::new();
        ads.sync(View::Dashboard, true, false);
        ads.advance(ms(500));
        ads.sync(View::Dashboard, true, false);
        assert!(!ads.is_armed());
        assert!(!ads.advance(ms(1000)));
        assert_eq!(ads.stats().impressions, 1);
    }

    #[test]
    fn test_each_state_entry_accrues_once() {
        let mut ads = AdTracker::new();
        for view in [View::Dashboard, View::Internet, View::Dashboard] {
            ads.sync(view, true, false);
            ads.advance(ms(500));
        }
        assert_eq!(ads.stats().impressions, 3);
    }

    #[test]
    fn test_unauthenticated_does_not_accrue() {
        let mut ads = AdTracker::new();
        ads.sync(View::Dashboard, false, false);
        assert!(!ads.advance(ms(1000)));
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let mut ads = AdTracker::new();
        ads.sync(View::Dashboard, true, false);
        ads.advance(ms(500));
        ads.reset();
        assert_eq!(ads.stats(), AdStats::default());
    }
}
