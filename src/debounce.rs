//! Quiet-period coalescing for the search box.

use std::time::{Duration, Instant};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Holds the latest typed value until no new input arrives for `quiet`.
///
/// The event loop calls [`Debouncer::poll`] on every tick; only a value that
/// survived a full quiet period is handed back for committing.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Record a new value and restart the quiet period.
    pub fn push(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((value.into(), now + self.quiet));
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_ref().map(|(value, _)| value.as_str())
    }

    /// Returns the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Skip the remaining quiet period.
    pub fn commit_now(&mut self) -> Option<String> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_commits_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));

        debouncer.push("rust", start);
        assert_eq!(debouncer.poll(start + ms(499)), None);
        assert_eq!(debouncer.poll(start + ms(500)).as_deref(), Some("rust"));
        assert_eq!(debouncer.poll(start + ms(900)), None);
    }

    #[test]
    fn test_keystrokes_restart_the_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(500));

        debouncer.push("r", start);
        debouncer.push("ru", start + ms(300));
        debouncer.push("rus", start + ms(600));
        assert_eq!(debouncer.poll(start + ms(900)), None);
        assert_eq!(debouncer.pending(), Some("rus"));
        assert_eq!(debouncer.poll(start + ms(1100)).as_deref(), Some("rus"));
    }

    #[test]
    fn test_commit_now_and_cancel() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();

        debouncer.push("climate", start);
        assert_eq!(debouncer.commit_now().as_deref(), Some("climate"));
        assert_eq!(debouncer.commit_now(), None);

        debouncer.push("sports", start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + ms(1000)), None);
    }
}
