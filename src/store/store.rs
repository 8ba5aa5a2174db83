use super::subscription::{Subscription, Unsubscribe};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::sync::{Arc, Weak};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Subscribers in registration order.
struct Subscribers<T> {
    next_id: usize,
    entries: Vec<(usize, Subscriber<T>)>,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// State shared by every clone of a store.
struct Shared<T> {
    state: RwLock<T>,
    subscribers: RwLock<Subscribers<T>>,
    // Held across write + notify so publications never interleave.
    // Reentrant so subscribers may write to the store they observe.
    publish: ReentrantMutex<()>,
}

impl<T: Clone> Shared<T> {
    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let _publish = self.publish.lock();
        {
            let mut state = self.state.write();
            f(&mut *state);
        }
        self.notify();
    }

    /// Notify all subscribers of a state change. Caller holds `publish`.
    fn notify(&self) {
        let snapshot = self.state.read().clone();
        let subscribers: Vec<Subscriber<T>> = self
            .subscribers
            .read()
            .entries
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();

        for subscriber in subscribers {
            subscriber(&snapshot);
        }
    }
}

impl<T: Send + Sync + 'static> Unsubscribe for Shared<T> {
    fn unsubscribe(&self, id: usize) {
        self.subscribers
            .write()
            .entries
            .retain(|(entry_id, _)| *entry_id != id);
    }
}

/// A thread-safe store holding one piece of state.
///
/// Every write publishes the new state to all subscribers, synchronously
/// and in the order they subscribed. Writes from different threads are
/// serialized together with their notification, so the last publication
/// always carries the current state. Subscribers receive a snapshot and are
/// free to read or write the store (or unsubscribe) while being notified.
///
/// # Examples
///
/// ```
/// use tickstore::Store;
///
/// let store = Store::new(1);
/// let doubled = store.derive(|n| n * 2);
///
/// store.set(21);
/// assert_eq!(doubled.get(), 42);
/// ```
pub struct Store<T> {
    shared: Arc<Shared<T>>,
    // Upstream subscriptions of a derived store. Only store handles own
    // this, so dropping the last handle detaches from the source.
    dependencies: Arc<Mutex<Vec<Subscription>>>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: RwLock::new(initial),
                subscribers: RwLock::new(Subscribers::new()),
                publish: ReentrantMutex::new(()),
            }),
            dependencies: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> T {
        self.shared.state.read().clone()
    }

    /// Update the state using a function.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        self.shared.update(f);
    }

    /// Set a new state value.
    pub fn set(&self, new_state: T) {
        self.shared.update(|state| *state = new_state);
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.shared.state.read();
        f(&*state)
    }

    /// Run `f` while holding the publish lock.
    ///
    /// Writes from other threads wait until `f` returns; writes made by `f`
    /// itself go through as usual.
    pub(crate) fn transaction<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _publish = self.shared.publish.lock();
        f()
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every write until the returned guard is
    /// dropped. It is not called with the current state on subscription.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut subscribers = self.shared.subscribers.write();
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.entries.push((id, Arc::new(callback)));
            id
        };

        let registry: Arc<dyn Unsubscribe> = self.shared.clone();
        Subscription::new(id, Arc::downgrade(&registry))
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.read().entries.len()
    }

    /// Create a store whose state is `f` applied to this store's state.
    ///
    /// The derived store is recomputed eagerly on every write to `self`,
    /// before any subscriber registered after it is notified. Dropping every
    /// handle to the derived store unsubscribes it from `self`.
    pub fn derive<U, F>(&self, f: F) -> Store<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        // Hold the source still so no write slips in between the initial
        // computation and the subscription.
        self.transaction(|| {
            let derived = Store::new(self.read(&f));
            let target: Weak<Shared<U>> = Arc::downgrade(&derived.shared);

            let guard = self.subscribe(move |state| {
                if let Some(target) = target.upgrade() {
                    let value = f(state);
                    target.update(|current| *current = value);
                }
            });

            derived.dependencies.lock().push(guard);
            derived
        })
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            dependencies: Arc::clone(&self.dependencies),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.shared.state.read())
            .field("subscribers", &self.shared.subscribers.read().entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::CounterState;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn set_replaces_counter_state() {
        let store = Store::new(CounterState::new(3));
        assert_eq!(store.get().count, 3);

        store.set(CounterState {
            count: 8,
            is_running: true,
        });
        assert!(store.read(|state| state.is_running));
        assert_eq!(store.get().count, 8);
    }

    #[test]
    fn update_publishes_the_written_state() {
        let store = Store::new(CounterState::default());
        let published = Arc::new(Mutex::new(Vec::new()));

        let _subscription = store.subscribe({
            let published = published.clone();
            move |state: &CounterState| published.lock().push(state.count)
        });

        store.update(|state| state.count += 1);
        store.update(|state| state.count += 1);
        assert_eq!(*published.lock(), vec![1, 2]);
    }

    #[test]
    fn subscribe_does_not_replay_current_state() {
        let store = Store::new(CounterState::new(5));
        let calls = Arc::new(AtomicUsize::new(0));

        let _subscription = store.subscribe({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.update(|state| state.is_running = true);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let store = Store::new(0);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let subscription = store.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        store.set(1);
        assert_eq!(store.subscriber_count(), 1);

        subscription.unsubscribe();
        store.set(2);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn detached_subscription_outlives_guard() {
        let store = Store::new(0);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        store
            .subscribe(move |_| {
                calls_clone.fetch_add(1, Ordering::SeqCst);
            })
            .detach();

        store.set(1);
        store.set(2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn subscribers_run_in_subscription_order() {
        let store = Store::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let guards: Vec<_> = (0..3)
            .map(|i| {
                let order = order.clone();
                store.subscribe(move |_| order.lock().push(i))
            })
            .collect();

        store.set(1);
        assert_eq!(*order.lock(), vec![0, 1, 2]);
        drop(guards);
    }

    #[test]
    fn subscriber_can_read_store_while_notified() {
        let store = Store::new(0);
        let seen = Arc::new(AtomicUsize::new(0));

        let _subscription = store.subscribe({
            let store = store.clone();
            let seen = seen.clone();
            move |_| seen.store(store.get(), Ordering::SeqCst)
        });

        store.set(7);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn subscriber_can_write_store_while_notified() {
        let store = Store::new(0usize);

        let _subscription = store.subscribe({
            let store = store.clone();
            move |value| {
                if *value % 2 == 1 {
                    store.set(value + 1);
                }
            }
        });

        store.set(3);
        assert_eq!(store.get(), 4);
    }

    #[test]
    fn derived_store_tracks_source() {
        let store = Store::new(CounterState::new(2));
        let doubled = store.derive(|state| state.count * 2);

        assert_eq!(doubled.get(), 4);

        store.update(|state| state.count = 10);
        assert_eq!(doubled.get(), 20);
    }

    #[test]
    fn derived_store_is_current_for_later_subscribers() {
        let store = Store::new(1);
        let doubled = store.derive(|n| n * 2);
        let observed = Arc::new(AtomicUsize::new(0));

        let _subscription = store.subscribe({
            let doubled = doubled.clone();
            let observed = observed.clone();
            move |_| observed.store(doubled.get(), Ordering::SeqCst)
        });

        store.set(5);
        assert_eq!(observed.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn dropped_derived_store_unsubscribes_from_source() {
        let store = Store::new(1);
        let _kept = store.derive(|n| n + 1);
        let before = store.subscriber_count();

        for _ in 0..100 {
            drop(store.derive(|n| n * 2));
        }
        assert_eq!(store.subscriber_count(), before);

        let doubled = store.derive(|n| n * 2);
        let copy = doubled.clone();
        drop(doubled);
        assert_eq!(store.subscriber_count(), before + 1);

        store.set(4);
        assert_eq!(copy.get(), 8);

        drop(copy);
        assert_eq!(store.subscriber_count(), before);
    }

    #[test]
    fn derived_store_consistent_after_concurrent_writes() {
        let store = Store::new(CounterState::default());
        let doubled = store.derive(|state| state.count * 2);

        let writers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..1_000 {
                        store.update(|state| state.count += 1);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        assert_eq!(store.get().count, 4_000);
        assert_eq!(doubled.get(), 8_000);
    }
}
