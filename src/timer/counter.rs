use super::options::{TimerOptions, MIN_TICK_PERIOD};
use super::state::CounterState;
use crate::error::{Error, Result};
use crate::store::{Store, Subscription};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

static NEXT_TIMER_ID: AtomicUsize = AtomicUsize::new(0);

/// Handle to the periodic task that advances a timer.
///
/// Dropping the driver aborts the task, so a timer whose handles have all
/// gone away stops ticking even if nobody called `destroy`.
#[derive(Default)]
struct TickDriver {
    task: Option<JoinHandle<()>>,
    // Bumped on every cancel. A tick task only counts while the epoch it
    // was started with is still current.
    epoch: Arc<AtomicU64>,
    destroyed: bool,
}

impl TickDriver {
    fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Abort the task if there is one. Returns whether a task was aborted.
    fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                self.epoch.fetch_add(1, Ordering::AcqRel);
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// One timer: a counter advanced by a periodic tick while running.
///
/// Clones share the same counter and driver. All mutations publish the new
/// [`CounterState`] to subscribers before returning.
///
/// Each operation runs under the counter store's publish lock, so a tick
/// never lands after `stop`, `reset` or `destroy` has returned, even on a
/// multi-thread runtime.
///
/// # Examples
///
/// ```
/// use tickstore::{TimerOptions, TimerStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> tickstore::Result<()> {
/// let timer = TimerStore::new(TimerOptions::new().initial_count(3));
/// timer.start()?;
/// assert!(timer.is_running());
///
/// timer.reset();
/// assert_eq!(timer.count(), 0);
/// assert!(!timer.is_running());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TimerStore {
    id: usize,
    state: Store<CounterState>,
    driver: Arc<Mutex<TickDriver>>,
    tick_period: Duration,
}

impl TimerStore {
    /// Create a stopped timer from `options`.
    pub fn new(options: TimerOptions) -> Self {
        let id = NEXT_TIMER_ID.fetch_add(1, Ordering::Relaxed);
        debug!(timer = id, initial_count = options.initial_count, "timer created");

        Self {
            id,
            state: Store::new(CounterState::new(options.initial_count)),
            driver: Arc::new(Mutex::new(TickDriver::default())),
            tick_period: options.tick_period.max(MIN_TICK_PERIOD),
        }
    }

    /// Process-unique identifier, used in log output.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> CounterState {
        self.state.get()
    }

    /// Ticks counted so far.
    pub fn count(&self) -> u64 {
        self.state.read(|state| state.count)
    }

    /// Whether the timer is ticking.
    pub fn is_running(&self) -> bool {
        self.state.read(|state| state.is_running)
    }

    /// Whether `destroy` has been called.
    pub fn is_destroyed(&self) -> bool {
        self.driver.lock().destroyed
    }

    /// Whether a tick task is currently scheduled.
    pub fn has_active_driver(&self) -> bool {
        self.driver.lock().is_active()
    }

    /// Interval between ticks.
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Observe every published [`CounterState`].
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CounterState) + Send + Sync + 'static,
    {
        self.state.subscribe(callback)
    }

    pub(crate) fn store(&self) -> &Store<CounterState> {
        &self.state
    }

    /// Begin ticking. Does nothing if the timer is already running.
    ///
    /// Fails only when called outside a tokio runtime.
    pub fn start(&self) -> Result<()> {
        self.state.transaction(|| {
            let mut driver = self.driver.lock();
            if driver.destroyed {
                warn!(timer = self.id, "start ignored on a destroyed timer");
                return Ok(());
            }
            if driver.is_active() {
                trace!(timer = self.id, "start ignored, already running");
                return Ok(());
            }

            let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
            let ticker = Ticker {
                timer: self.id,
                state: self.state.clone(),
                epoch: Arc::clone(&driver.epoch),
                started_at: driver.epoch.load(Ordering::Acquire),
            };
            driver.task = Some(runtime.spawn(ticker.run(self.tick_period)));
            drop(driver);

            debug!(timer = self.id, count = self.count(), "start");
            self.state.update(|state| state.is_running = true);
            Ok(())
        })
    }

    /// Stop ticking, keeping the current count.
    pub fn stop(&self) {
        self.state.transaction(|| {
            if self.release_driver("stop") {
                self.state.update(|state| state.is_running = false);
            }
        });
    }

    /// Stop ticking and zero the count.
    pub fn reset(&self) {
        self.state.transaction(|| {
            if self.release_driver("reset") {
                self.state.update(|state| {
                    state.count = 0;
                    state.is_running = false;
                });
            }
        });
    }

    /// Release the tick driver for good.
    ///
    /// Later calls to `start`, `stop` or `reset` are ignored. Calling
    /// `destroy` again is harmless.
    pub fn destroy(&self) {
        self.state.transaction(|| {
            let was_running = {
                let mut driver = self.driver.lock();
                if driver.destroyed {
                    trace!(timer = self.id, "already destroyed");
                    return;
                }
                driver.destroyed = true;
                driver.cancel()
            };

            debug!(timer = self.id, was_running, "destroy");
            if was_running {
                self.state.update(|state| state.is_running = false);
            }
        });
    }

    /// Cancel the driver for `op`. Returns false if the timer was destroyed.
    fn release_driver(&self, op: &'static str) -> bool {
        let mut driver = self.driver.lock();
        if driver.destroyed {
            warn!(timer = self.id, op, "ignored on a destroyed timer");
            return false;
        }
        let cancelled = driver.cancel();
        drop(driver);

        debug!(timer = self.id, op, cancelled, count = self.count());
        true
    }
}

impl std::fmt::Debug for TimerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStore")
            .field("id", &self.id)
            .field("state", &self.get())
            .field("tick_period", &self.tick_period)
            .finish()
    }
}

/// The body of a tick task.
struct Ticker {
    timer: usize,
    state: Store<CounterState>,
    epoch: Arc<AtomicU64>,
    started_at: u64,
}

impl Ticker {
    async fn run(self, period: Duration) {
        // First tick one full period after start; late ticks are not made up.
        let mut ticks = time::interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;
            if !self.tick() {
                trace!(timer = self.timer, "stale tick dropped");
                return;
            }
        }
    }

    /// Count one tick unless the driver was cancelled in the meantime.
    fn tick(&self) -> bool {
        self.state.transaction(|| {
            if self.epoch.load(Ordering::Acquire) != self.started_at {
                return false;
            }
            self.state
                .update(|state| state.count = state.count.saturating_add(1));
            trace!(timer = self.timer, count = self.state.read(|state| state.count), "tick");
            true
        })
    }
}
