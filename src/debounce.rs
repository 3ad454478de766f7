use std::time::{Duration, Instant};

/// About one frame at 60 Hz
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(16);

/// A cancellable single-slot scheduled value.
///
/// At most one value is pending at a time; scheduling a new one replaces it
/// and restarts the window.  Time never advances on its own: callers pass
/// the current instant in, so the same sequence of calls always produces the
/// same result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Debounce<T> {
    window: Duration,
    pending: Option<Pending<T>>,
    fired: Option<T>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct Pending<T> {
    value: T,
    due: Instant,
}

impl<T: Copy + PartialEq> Debounce<T> {
    pub fn new(window: Duration) -> Self {
        Debounce {
            window,
            pending: None,
            fired: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// The most recently scheduled value, pending or not
    pub fn latest(&self) -> Option<T> {
        self.pending.map(|p| p.value).or(self.fired)
    }

    /// The last value that made it through the window
    pub fn fired(&self) -> Option<T> {
        self.fired
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Schedule `value` to fire one window after `now`, replacing anything
    /// pending.  Returns `false` without touching the timer if `value` is
    /// already the latest scheduled value.
    pub fn schedule(&mut self, value: T, now: Instant) -> bool {
        if self.latest() == Some(value) {
            return false;
        }
        let due = now.checked_add(self.window).unwrap_or(now);
        self.pending = Some(Pending { value, due });
        true
    }

    /// Fire the pending value if its window has elapsed by `now`
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let pending = self.pending.filter(|p| p.due <= now)?;
        self.pending = None;
        self.fired = Some(pending.value);
        Some(pending.value)
    }

    /// Drop any pending value and forget what has fired
    pub fn reset(&mut self) {
        self.pending = None;
        self.fired = None;
    }
}

impl<T: Copy + PartialEq> Default for Debounce<T> {
    fn default() -> Self {
        Debounce::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_after_window() {
        let t0 = Instant::now();
        let mut d = Debounce::new(ms(16));
        assert!(d.schedule(1, t0));
        assert_eq!(d.deadline(), Some(t0 + ms(16)));
        assert_eq!(d.poll(t0 + ms(15)), None);
        assert_eq!(d.poll(t0 + ms(16)), Some(1));
        assert_eq!(d.poll(t0 + ms(40)), None);
        assert_eq!(d.fired(), Some(1));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_burst_collapses_to_last() {
        let t0 = Instant::now();
        let mut d = Debounce::new(ms(16));
        d.schedule(1, t0);
        d.schedule(2, t0 + ms(5));
        d.schedule(3, t0 + ms(10));
        assert_eq!(d.poll(t0 + ms(20)), None);
        assert_eq!(d.poll(t0 + ms(26)), Some(3));
        assert_eq!(d.poll(t0 + ms(100)), None);
    }

    #[test]
    fn test_same_value_does_not_restart() {
        let t0 = Instant::now();
        let mut d = Debounce::new(ms(16));
        assert!(d.schedule(7, t0));
        assert!(!d.schedule(7, t0 + ms(10)));
        assert_eq!(d.poll(t0 + ms(16)), Some(7));
        assert!(!d.schedule(7, t0 + ms(30)));
        assert!(d.schedule(8, t0 + ms(30)));
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut d = Debounce::new(ms(16));
        d.schedule(1, t0);
        d.reset();
        assert_eq!(d.poll(t0 + ms(100)), None);
        assert_eq!(d.latest(), None);
        assert!(d.schedule(1, t0));
    }
}
