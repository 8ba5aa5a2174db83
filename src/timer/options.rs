use std::time::Duration;

/// Default interval between ticks.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(500);

/// Shortest accepted tick period; tokio intervals reject a zero period.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// Construction options for a timer.
///
/// ```
/// use std::time::Duration;
/// use tickstore::TimerOptions;
///
/// let options = TimerOptions::new()
///     .initial_count(3)
///     .tick_period(Duration::from_millis(250));
/// assert_eq!(options.initial_count, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerOptions {
    /// Count the timer starts from.
    pub initial_count: u64,
    /// Best-effort interval between ticks.
    pub tick_period: Duration,
}

impl TimerOptions {
    /// Same as [`TimerOptions::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a new timer starts from.
    pub fn initial_count(mut self, count: u64) -> Self {
        self.initial_count = count;
        self
    }

    /// Periods below [`MIN_TICK_PERIOD`] are clamped up to it.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period.max(MIN_TICK_PERIOD);
        self
    }
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            initial_count: 0,
            tick_period: DEFAULT_TICK_PERIOD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = TimerOptions::default();
        assert_eq!(options.initial_count, 0);
        assert_eq!(options.tick_period, Duration::from_millis(500));
    }

    #[test]
    fn zero_period_is_clamped() {
        let options = TimerOptions::new().tick_period(Duration::ZERO);
        assert_eq!(options.tick_period, MIN_TICK_PERIOD);
    }
}
