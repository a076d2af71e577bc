/// Quiet period used when the configuration does not name one
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1000;

/// Pure debouncer for autosave: only handles timing.
///
/// Each change restarts the quiet period, so a burst of edits produces a
/// single save of the final state. Times are milliseconds on any monotonic
/// or wall clock, as long as the caller is consistent.
#[derive(Debug, Clone)]
pub struct AutosaveDebouncer {
    delay_ms: u64,
    last_change: Option<u64>,
}

impl Default for AutosaveDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY_MS)
    }
}

impl AutosaveDebouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            last_change: None,
        }
    }

    /// Note a document change at `now`, restarting the timer
    pub fn touch(&mut self, now: u64) {
        self.last_change = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.last_change.is_some()
    }

    pub fn is_ready(&self, now: u64) -> bool {
        let Some(last_change) = self.last_change else {
            return false;
        };
        now.saturating_sub(last_change) >= self.delay_ms
    }

    /// Consume the pending change if the quiet period has elapsed
    pub fn take_if_ready(&mut self, now: u64) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.last_change = None;
        true
    }

    /// Drop any pending change without saving
    pub fn cancel(&mut self) {
        self.last_change = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_of_changes_fires_once_after_the_last_one() {
        let mut debouncer = AutosaveDebouncer::new(500);
        debouncer.touch(0);
        debouncer.touch(300);
        debouncer.touch(600);

        assert!(!debouncer.take_if_ready(900));
        assert!(debouncer.take_if_ready(1100));
        assert!(!debouncer.take_if_ready(5000));
    }

    #[test]
    fn nothing_pending_is_never_ready() {
        let mut debouncer = AutosaveDebouncer::default();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.take_if_ready(u64::MAX));
        debouncer.touch(10);
        debouncer.cancel();
        assert!(!debouncer.is_ready(u64::MAX));
    }
}
