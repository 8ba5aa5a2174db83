//! # Tickstore
//!
//! Reactive timer counters for UI widgets.
//!
//! Each on-screen timer is a [`TimerPair`]:
//!
//! - [`TimerStore`] - owns `count` and `is_running` plus the periodic tick
//!   driver, and exposes `start`, `stop`, `reset` and `destroy`
//! - [`DerivedTimerStore`] - `double_count`, `can_start`, `can_stop` and
//!   `can_reset`, recomputed synchronously on every timer change
//!
//! Both are built on [`Store`], a small publish/subscribe container that
//! notifies subscribers in order, immediately after each write. Rendering is
//! left to the host; it holds a [`WidgetCollection`] and reads published
//! state from the stores.
//!
//! Timers tick on the current tokio runtime.
//!
//! ```
//! use tickstore::{TimerOptions, WidgetCollection};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tickstore::Result<()> {
//! let mut widgets = WidgetCollection::new(TimerOptions::default());
//! let timer = widgets.push();
//! timer.counter.start()?;
//! assert!(timer.derived.get().can_stop);
//!
//! widgets.remove_last();
//! assert!(widgets.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod provider;
pub mod store;
pub mod timer;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use store::{Store, Subscription};
pub use timer::{
    create_timer_pair, CounterState, DerivedState, DerivedTimerStore, TimerOptions, TimerPair,
    TimerStore, WidgetCollection,
};
