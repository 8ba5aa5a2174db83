use std::sync::Weak;

/// Something a [`Subscription`] can detach itself from.
pub(crate) trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: usize);
}

/// RAII guard for a store subscriber.
///
/// The subscriber stays registered for as long as the guard is alive.
/// Dropping it removes the subscriber; use [`Subscription::detach`] to keep
/// it registered for the lifetime of the store instead.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    id: usize,
    registry: Weak<dyn Unsubscribe>,
}

impl Subscription {
    pub(crate) fn new(id: usize, registry: Weak<dyn Unsubscribe>) -> Self {
        Self { id, registry }
    }

    /// Remove the subscriber now.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Leave the subscriber registered until the store itself goes away.
    pub fn detach(mut self) {
        self.registry = Weak::<NeverRegistry>::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("live", &(self.registry.strong_count() > 0))
            .finish()
    }
}

// Uninhabited; only used to build an empty `Weak<dyn Unsubscribe>`.
enum NeverRegistry {}

impl Unsubscribe for NeverRegistry {
    fn unsubscribe(&self, _id: usize) {
        match *self {}
    }
}
