//! Fixed-interval tick scheduling
//!
//! Hosts call `advance` with the current wall-clock time and run the returned
//! number of ticks, one after another, on the same thread. Ticks never
//! overlap, so the per-tick step order always holds.

use crate::consts::MAX_CATCHUP_TICKS;

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    interval_ms: u64,
    max_catchup: u32,
    /// Time of the last tick boundary handed out
    last_ms: Option<u64>,
}

impl FixedTimestep {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            max_catchup: MAX_CATCHUP_TICKS,
            last_ms: None,
        }
    }

    pub fn with_max_catchup(mut self, max_catchup: u32) -> Self {
        self.max_catchup = max_catchup.max(1);
        self
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Ticks due at `now_ms`.
    ///
    /// The first call only anchors the clock. If the host fell further behind
    /// than `max_catchup` ticks, the backlog is dropped to avoid a spiral of
    /// death.
    pub fn advance(&mut self, now_ms: u64) -> u32 {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return 0;
        };
        let due = now_ms.saturating_sub(last) / self.interval_ms;
        if due == 0 {
            return 0;
        }
        if due > u64::from(self.max_catchup) {
            log::warn!(
                "Tick backlog of {} dropped to {}",
                due,
                self.max_catchup
            );
            self.last_ms = Some(now_ms);
            return self.max_catchup;
        }
        self.last_ms = Some(last + due * self.interval_ms);
        due as u32
    }

    /// Forget the anchor, e.g. after the host was suspended
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_anchors() {
        let mut step = FixedTimestep::new(20);
        assert_eq!(step.advance(1_000), 0);
        assert_eq!(step.advance(1_019), 0);
        assert_eq!(step.advance(1_020), 1);
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut step = FixedTimestep::new(20);
        step.advance(0);
        assert_eq!(step.advance(30), 1);
        // 10ms left over from the previous call
        assert_eq!(step.advance(40), 1);
        assert_eq!(step.advance(59), 0);
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut step = FixedTimestep::new(20).with_max_catchup(4);
        step.advance(0);
        assert_eq!(step.advance(10_000), 4);
        assert_eq!(step.advance(10_020), 1);
    }

    #[test]
    fn test_reset_reanchors() {
        let mut step = FixedTimestep::new(20);
        step.advance(0);
        step.reset();
        assert_eq!(step.advance(5_000), 0);
        assert_eq!(step.advance(5_020), 1);
    }
}
