//! Timer counters and their derived views.
//!
//! - [`TimerStore`] - a counter with `start`/`stop`/`reset`/`destroy`
//! - [`DerivedTimerStore`] - `double_count` and button affordances, kept in
//!   step with one timer
//! - [`WidgetCollection`] - the ordered list of timers on screen

mod counter;
mod derived;
mod options;
mod state;
mod widgets;

pub use counter::TimerStore;
pub use derived::DerivedTimerStore;
pub use options::{TimerOptions, DEFAULT_TICK_PERIOD, MIN_TICK_PERIOD};
pub use state::{CounterState, DerivedState};
pub use widgets::{create_timer_pair, TimerPair, WidgetCollection};
