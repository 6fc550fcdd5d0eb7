use std::sync::atomic::{AtomicU64, Ordering};

/// LamportClock orders events across nodes with a single scalar timestamp.
///
/// Every operation is one atomic read-modify-write, so concurrent handlers
/// never observe a torn update and the value never decreases.
#[derive(Debug, Default)]
pub struct LamportClock {
    value: AtomicU64,
}

impl LamportClock {
    /// Create a new clock starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at a given value
    pub fn starting_at(value: u64) -> Self {
        Self {
            value: AtomicU64::new(value),
        }
    }

    /// Something happened at this node. Returns the new value.
    pub fn local_event(&self) -> u64 {
        self.advance(|current| current.saturating_add(1))
    }

    /// Stamp an outbound message: increment and return the new value
    pub fn prepare_send(&self) -> u64 {
        self.advance(|current| current.saturating_add(1))
    }

    /// Merge a remote timestamp: `value = max(value, remote) + 1`.
    /// Returns the new value.
    pub fn receive_message(&self, remote_timestamp: u64) -> u64 {
        self.advance(|current| current.max(remote_timestamp).saturating_add(1))
    }

    // Writes saturate at u64::MAX so the value never wraps backwards
    fn advance(&self, step: impl Fn(u64) -> u64) -> u64 {
        // The closure always returns Some, so both arms carry the previous value
        let previous = match self
            .value
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(step(current))
            }) {
            Ok(previous) | Err(previous) => previous,
        };
        step(previous)
    }

    /// Current value, without mutation
    pub fn snapshot(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_clock_starts_at_zero() {
        let clock = LamportClock::new();
        assert_eq!(clock.snapshot(), 0);
    }

    #[test]
    fn test_local_event_increments_by_one() {
        let clock = LamportClock::starting_at(41);
        assert_eq!(clock.local_event(), 42);
        assert_eq!(clock.snapshot(), 42);
    }

    #[test]
    fn test_prepare_send_returns_post_increment_value() {
        let clock = LamportClock::new();
        assert_eq!(clock.prepare_send(), 1);
        assert_eq!(clock.prepare_send(), 2);
        assert_eq!(clock.snapshot(), 2);
    }

    #[test]
    fn test_receive_takes_maximum_plus_one() {
        let clock = LamportClock::starting_at(5);
        assert_eq!(clock.receive_message(10), 11);
        assert_eq!(clock.snapshot(), 11);

        // Older remote timestamps still advance the clock
        assert_eq!(clock.receive_message(3), 12);
    }

    #[test]
    fn test_send_then_receive_between_nodes() {
        let sender = LamportClock::new();
        let receiver = LamportClock::new();

        let stamp = sender.prepare_send();
        assert_eq!(stamp, 1);

        receiver.receive_message(stamp);
        assert_eq!(receiver.snapshot(), 2);
    }

    #[test]
    fn test_receive_saturates_at_max() {
        let clock = LamportClock::new();
        assert_eq!(clock.receive_message(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_increments_do_not_wrap_at_max() {
        let clock = LamportClock::starting_at(u64::MAX);
        assert_eq!(clock.local_event(), u64::MAX);
        assert_eq!(clock.snapshot(), u64::MAX);
        assert!(clock.prepare_send() >= u64::MAX);
        assert_eq!(clock.snapshot(), u64::MAX);
    }

    #[test]
    fn test_concurrent_local_events_are_not_lost() {
        let clock = Arc::new(LamportClock::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = clock.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        clock.local_event();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(clock.snapshot(), 8000);
    }
}
