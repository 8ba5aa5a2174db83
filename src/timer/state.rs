use serde::Serialize;

/// Observable state of one timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterState {
    /// Ticks elapsed since creation or the last reset.
    pub count: u64,
    /// Whether a tick driver is currently active.
    pub is_running: bool,
}

impl CounterState {
    /// Stopped state at `count`.
    pub fn new(count: u64) -> Self {
        Self {
            count,
            is_running: false,
        }
    }
}

/// View of a [`CounterState`] used to render a timer widget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedState {
    pub double_count: u64,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_reset: bool,
}

impl From<&CounterState> for DerivedState {
    fn from(state: &CounterState) -> Self {
        Self {
            double_count: state.count.saturating_mul(2),
            can_start: !state.is_running,
            can_stop: state.is_running,
            can_reset: state.count > 0 || state.is_running,
        }
    }
}

impl From<CounterState> for DerivedState {
    fn from(state: CounterState) -> Self {
        Self::from(&state)
    }
}
