//! Deferred tasks driven by the host's clock.
//!
//! The engine never sleeps or spawns timers. Hosts schedule tasks with a
//! delay, then call [`Scheduler::advance_to`] from their event loop and run
//! whatever comes back.

use std::time::Duration;

/// How long to wait after moving the cursor from a pointer press before
/// asking for editor focus. Focusing immediately races the host's own
/// pointer handling.
pub const FOCUS_SETTLE_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct Scheduled<T> {
    due: Duration,
    seq: u64,
    task: T,
}

/// A queue of tasks due at a point on a monotonic clock that starts at zero.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_seq: u64,
    queue: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `task` once `delay` has passed.
    pub fn schedule(&mut self, delay: Duration, task: T) {
        self.queue.push(Scheduled {
            due: self.now + delay,
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    /// Run `task` after [`FOCUS_SETTLE_DELAY`].
    pub fn after_settle(&mut self, task: T) {
        self.schedule(FOCUS_SETTLE_DELAY, task);
    }

    /// Move the clock forward and return every task now due, earliest
    /// first. Tasks due at the same time come out in scheduling order.
    /// The clock never moves backwards.
    pub fn advance_to(&mut self, now: Duration) -> Vec<T> {
        self.now = self.now.max(now);

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.queue)
            .into_iter()
            .partition(|scheduled| scheduled.due <= self.now);
        self.queue = pending;

        due.sort_by_key(|scheduled| (scheduled.due, scheduled.seq));
        due.into_iter().map(|scheduled| scheduled.task).collect()
    }

    pub fn advance_by(&mut self, by: Duration) -> Vec<T> {
        self.advance_to(self.now + by)
    }

    /// When the earliest pending task is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.iter().map(|scheduled| scheduled.due).min()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn focus_waits_for_settle_delay() {
        let mut scheduler = Scheduler::new();
        scheduler.after_settle("focus");

        assert!(scheduler.advance_by(Duration::from_millis(49)).is_empty());
        assert_eq!(scheduler.advance_by(Duration::from_millis(1)), vec!["focus"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn tasks_run_in_due_then_schedule_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(20), 'c');
        scheduler.schedule(Duration::from_millis(10), 'a');
        scheduler.schedule(Duration::from_millis(10), 'b');
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(10)));

        assert_eq!(
            scheduler.advance_to(Duration::from_millis(30)),
            vec!['a', 'b', 'c']
        );
        assert_eq!(scheduler.next_due(), None);
    }

    #[test]
    fn clock_never_goes_backwards() {
        let mut scheduler: Scheduler<()> = Scheduler::new();
        scheduler.advance_to(Duration::from_millis(100));
        scheduler.advance_to(Duration::from_millis(10));
        assert_eq!(scheduler.now(), Duration::from_millis(100));
    }
}
