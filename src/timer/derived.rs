use super::counter::TimerStore;
use super::state::{CounterState, DerivedState};
use crate::store::{Store, Subscription};

/// Read-only view of a [`TimerStore`].
///
/// Bound to exactly one timer. The view is recomputed as part of every
/// publication of the timer, so it is never stale when read.
#[derive(Clone, Debug)]
pub struct DerivedTimerStore {
    state: Store<DerivedState>,
}

impl DerivedTimerStore {
    /// Bind a view to `timer`, computed from its current state.
    pub fn new(timer: &TimerStore) -> Self {
        Self {
            state: timer
                .store()
                .derive(|state: &CounterState| DerivedState::from(state)),
        }
    }

    /// The view for the timer's latest state.
    pub fn get(&self) -> DerivedState {
        self.state.get()
    }

    /// Observe every recomputed [`DerivedState`].
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&DerivedState) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }
}
