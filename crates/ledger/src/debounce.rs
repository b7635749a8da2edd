use std::time::{Duration, Instant};

/// Default quiet period before a debounced load-more fires.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Trailing-edge debouncer.
///
/// Every [`trigger`](Self::trigger) (re)schedules a single deadline `delay`
/// after the call; [`poll`](Self::poll) reports `true` exactly once when the
/// deadline has passed. Time is passed in by the caller so the event loop
/// decides the clock and tests can step it.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules the action, cancelling any pending deadline.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drops the pending deadline, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` once the quiet period elapsed, then disarms.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.trigger(start);
        assert!(!debouncer.poll(start + Duration::from_millis(499)));
        assert!(debouncer.poll(start + Duration::from_millis(500)));
        assert!(!debouncer.poll(start + Duration::from_millis(900)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn retrigger_postpones_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.trigger(start);
        debouncer.trigger(start + Duration::from_millis(300));
        debouncer.trigger(start + Duration::from_millis(600));

        assert!(!debouncer.poll(start + Duration::from_millis(1000)));
        assert!(debouncer.poll(start + Duration::from_millis(1100)));
    }

    #[test]
    fn cancel_disarms() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();

        debouncer.trigger(start);
        debouncer.cancel();

        assert!(!debouncer.poll(start + Duration::from_secs(5)));
    }
}
