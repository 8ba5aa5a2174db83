//! Scoped lookup of timer stores.
//!
//! Passing a [`TimerPair`](crate::TimerPair) explicitly is the normal way to
//! hand stores to rendering code. For presentation layers that render a tree
//! and want each subtree to find "its" timer, [`provide_pair`] binds a pair
//! to the current thread for the duration of a closure and
//! [`use_timer_store`] / [`use_derived_store`] retrieve it.

mod context;

pub use context::{
    provide, provide_pair, use_context, use_derived_store, use_timer_pair, use_timer_store,
};
