use crate::error::{Error, Result};
use crate::timer::{DerivedTimerStore, TimerPair, TimerStore};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

/// Values provided by one `provide` call.
type Frame = HashMap<TypeId, Box<dyn Any>>;

// Thread-local stack of provider frames, innermost last.
thread_local! {
    static PROVIDER_STACK: RefCell<Vec<Frame>> = RefCell::new(vec![]);
}

/// Run `f` with `frame` pushed onto the provider stack.
///
/// The frame is popped again even if `f` panics.
fn with_frame<F, R>(frame: Frame, f: F) -> R
where
    F: FnOnce() -> R,
{
    PROVIDER_STACK.with(|stack| {
        stack.borrow_mut().push(frame);
    });

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    PROVIDER_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}

/// Make `value` available to [`use_context`] for the duration of `f`.
///
/// Scopes nest; the innermost value of a given type wins.
///
/// # Examples
///
/// ```
/// use tickstore::provider::{provide, use_context};
///
/// provide(7u32, || {
///     assert_eq!(use_context::<u32>(), Ok(7));
/// });
/// assert!(use_context::<u32>().is_err());
/// ```
pub fn provide<T, F, R>(value: T, f: F) -> R
where
    T: Clone + 'static,
    F: FnOnce() -> R,
{
    let mut frame = Frame::new();
    frame.insert(TypeId::of::<T>(), Box::new(value));
    with_frame(frame, f)
}

/// Provide a timer, its derived view, and the pair itself to `f`.
pub fn provide_pair<F, R>(pair: TimerPair, f: F) -> R
where
    F: FnOnce() -> R,
{
    let mut frame = Frame::new();
    frame.insert(TypeId::of::<TimerStore>(), Box::new(pair.counter.clone()));
    frame.insert(
        TypeId::of::<DerivedTimerStore>(),
        Box::new(pair.derived.clone()),
    );
    frame.insert(TypeId::of::<TimerPair>(), Box::new(pair));
    with_frame(frame, f)
}

/// Look up the innermost provided value of type `T`.
///
/// Fails with [`Error::MissingProvider`] outside of any matching scope.
pub fn use_context<T>() -> Result<T>
where
    T: Clone + 'static,
{
    PROVIDER_STACK.with(|stack| {
        stack
            .borrow()
            .iter()
            .rev()
            .find_map(|frame| frame.get(&TypeId::of::<T>())?.downcast_ref::<T>().cloned())
            .ok_or(Error::MissingProvider {
                type_name: std::any::type_name::<T>(),
            })
    })
}

/// The timer provided to the current scope.
pub fn use_timer_store() -> Result<TimerStore> {
    use_context::<TimerStore>()
}

/// The derived view provided to the current scope.
pub fn use_derived_store() -> Result<DerivedTimerStore> {
    use_context::<DerivedTimerStore>()
}

/// The timer pair provided to the current scope.
pub fn use_timer_pair() -> Result<TimerPair> {
    use_context::<TimerPair>()
}
