//! Publish/subscribe state containers.
//!
//! A [`Store`] owns a value and notifies subscribers synchronously after each
//! write. Stores can be derived from other stores, which is how the timer's
//! read-only view stays in step with its counter.

mod store;
mod subscription;

pub use store::Store;
pub use subscription::Subscription;
