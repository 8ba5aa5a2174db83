use super::counter::TimerStore;
use super::derived::DerivedTimerStore;
use super::options::TimerOptions;
use tracing::debug;

/// A timer and the view bound to it, held together for one widget.
#[derive(Clone, Debug)]
pub struct TimerPair {
    pub counter: TimerStore,
    pub derived: DerivedTimerStore,
}

impl TimerPair {
    /// Release the timer's driver. The pair must not be mutated afterwards.
    pub fn destroy(&self) {
        self.counter.destroy();
    }
}

/// Create a timer and bind a derived view to it.
///
/// ```
/// use tickstore::{create_timer_pair, TimerOptions};
///
/// let pair = create_timer_pair(TimerOptions::new().initial_count(2));
/// assert_eq!(pair.derived.get().double_count, 4);
/// ```
pub fn create_timer_pair(options: TimerOptions) -> TimerPair {
    let counter = TimerStore::new(options);
    let derived = DerivedTimerStore::new(&counter);
    TimerPair { counter, derived }
}

/// Ordered timers shown on screen, one [`TimerPair`] per entry.
///
/// Entries never share a driver. Removing an entry destroys it first, so no
/// tick outlives the widget it belonged to.
#[derive(Debug, Default)]
pub struct WidgetCollection {
    options: TimerOptions,
    entries: Vec<TimerPair>,
}

impl WidgetCollection {
    /// Empty collection whose new entries use `options`.
    pub fn new(options: TimerOptions) -> Self {
        Self {
            options,
            entries: Vec::new(),
        }
    }

    /// Collection pre-populated with `len` default entries.
    pub fn with_len(options: TimerOptions, len: usize) -> Self {
        let mut collection = Self::new(options);
        for _ in 0..len {
            collection.push();
        }
        collection
    }

    /// Append a fresh timer and return it.
    pub fn push(&mut self) -> &TimerPair {
        let pair = create_timer_pair(self.options);
        debug!(timer = pair.counter.id(), index = self.entries.len(), "widget added");
        self.entries.push(pair);
        &self.entries[self.entries.len() - 1]
    }

    /// Destroy and remove the last timer. Returns `None` when empty.
    pub fn remove_last(&mut self) -> Option<TimerPair> {
        let pair = self.entries.pop()?;
        pair.destroy();
        debug!(timer = pair.counter.id(), remaining = self.entries.len(), "widget removed");
        Some(pair)
    }

    /// Destroy and remove every timer.
    pub fn clear(&mut self) {
        while self.remove_last().is_some() {}
    }

    /// Timer at `index`, counting from the first added.
    pub fn get(&self, index: usize) -> Option<&TimerPair> {
        self.entries.get(index)
    }

    /// Timers in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimerPair> {
        self.entries.iter()
    }

    /// Number of timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no timers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options applied to newly added timers.
    pub fn options(&self) -> TimerOptions {
        self.options
    }
}

impl<'a> IntoIterator for &'a WidgetCollection {
    type Item = &'a TimerPair;
    type IntoIter = std::slice::Iter<'a, TimerPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
