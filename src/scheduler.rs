//! Virtual-clock timer queue.
//!
//! Every simulated service in Timor is a chain of fixed delays. Instead of
//! spawning sleeping threads, each state machine owns a [`Scheduler`] and feeds
//! it elapsed wall time from the UI tick. Timers become plain values that are
//! popped in due order, and cancelling one is just removing it from the queue.

use std::time::Duration;

/// Handle to a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    id: TimerId,
    due: Duration,
    payload: T,
}

/// A queue of pending timers measured against a virtual clock.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler with its clock at zero.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still waiting to fire.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `payload` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Entry {
            id,
            due: self.now + delay,
            payload,
        });
        id
    }

    /// Removes a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|entry| entry.id != id);
        self.pending.len() != before
    }

    /// Returns `true` while the timer is still queued.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|entry| entry.id == id)
    }

    /// Drops every pending timer without touching the clock.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Pops the earliest timer due at or before `until`.
    ///
    /// The clock moves to the popped timer's due time, so anything the caller
    /// schedules while handling it is measured from the right instant. Ties
    /// fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<T> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.id))
            .map(|(index, _)| index)?;

        let entry = self.pending.swap_remove(index);
        self.now = self.now.max(entry.due);
        Some(entry.payload)
    }

    /// Moves the clock forward to `until` once all due timers are drained.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_pop_due_respects_deadline() {
        let mut timers = Scheduler::new();
        timers.schedule(ms(500), "late");

        assert_eq!(timers.pop_due(ms(499)), None);
        assert_eq!(timers.pop_due(ms(500)), Some("late"));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_pop_due_orders_by_time_then_insertion() {
        let mut timers = Scheduler::new();
        timers.schedule(ms(300), "c");
        timers.schedule(ms(100), "a");
        timers.schedule(ms(100), "b");

        let fired: Vec<_> = std::iter::from_fn(|| timers.pop_due(ms(1000))).collect();
        assert_eq!(fired, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clock_follows_popped_timer() {
        let mut timers = Scheduler::new();
        timers.schedule(ms(1500), 1);
        assert_eq!(timers.pop_due(ms(5000)), Some(1));
        assert_eq!(timers.now(), ms(1500));

        // Scheduled from inside the drain, still inside the window
        timers.schedule(ms(2000), 2);
        assert_eq!(timers.pop_due(ms(5000)), Some(2));
        assert_eq!(timers.now(), ms(3500));

        timers.settle(ms(5000));
        assert_eq!(timers.now(), ms(5000));
    }

    #[test]
    fn test_cancel_removes_timer() {
        let mut timers = Scheduler::new();
        let id = timers.schedule(ms(100), ());
        assert!(timers.is_pending(id));
        assert!(timers.cancel(id));
        assert!(!timers.is_pending(id));
        assert!(!timers.cancel(id));
        assert_eq!(timers.pop_due(ms(1000)), None);
    }

    #[test]
    fn test_settle_never_rewinds() {
        let mut timers: Scheduler<()> = Scheduler::new();
        timers.settle(ms(800));
        timers.settle(ms(200));
        assert_eq!(timers.now(), ms(800));
    }
}
