use std::time::{Duration, Instant};

/// Handle to a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Scheduled<E> {
    id: TimerId,
    deadline: Instant,
    event: E,
}

/// Deadline queue for fire-and-forget UI timers.
///
/// Nothing runs in the background: the owner calls [`Timers::take_due`]
/// with the current time and handles whatever has expired.
#[derive(Debug)]
pub struct Timers<E> {
    next_id: u64,
    pending: Vec<Scheduled<E>>,
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, event: E) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let deadline = now + delay;
        // Keep the queue ordered by deadline, ties in scheduling order.
        let index = self.pending.partition_point(|s| s.deadline <= deadline);
        self.pending.insert(
            index,
            Scheduled {
                id,
                deadline,
                event,
            },
        );
        id
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|s| s.deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every event whose deadline is at or before `now`,
    /// earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<E> {
        let due = self.pending.partition_point(|s| s.deadline <= now);
        self.pending.drain(..due).map(|s| s.event).collect()
    }
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_deadline_order() {
        let start = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(start, Duration::from_millis(300), "c");
        timers.schedule(start, Duration::from_millis(100), "a");
        timers.schedule(start, Duration::from_millis(200), "b");

        assert_eq!(timers.next_deadline(), Some(start + Duration::from_millis(100)));
        assert!(timers.take_due(start + Duration::from_millis(50)).is_empty());
        assert_eq!(timers.take_due(start + Duration::from_millis(200)), vec!["a", "b"]);
        assert_eq!(timers.take_due(start + Duration::from_secs(1)), vec!["c"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_equal_deadlines_keep_schedule_order() {
        let start = Instant::now();
        let mut timers = Timers::new();
        timers.schedule(start, Duration::from_millis(100), 1);
        timers.schedule(start, Duration::from_millis(100), 2);
        assert_eq!(timers.take_due(start + Duration::from_millis(100)), vec![1, 2]);
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut timers = Timers::new();
        let a = timers.schedule(start, Duration::from_millis(100), "a");
        timers.schedule(start, Duration::from_millis(100), "b");

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert_eq!(timers.take_due(start + Duration::from_secs(1)), vec!["b"]);

        timers.schedule(start, Duration::from_millis(1), "c");
        timers.cancel_all();
        assert!(timers.take_due(start + Duration::from_secs(1)).is_empty());
        assert_eq!(timers.next_deadline(), None);
    }
}
