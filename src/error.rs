use thiserror::Error;

/// Errors surfaced by tickstore.
///
/// Store operations themselves are total; the only failures are wiring
/// mistakes made by the code hosting the stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A store was looked up outside of any [`provide`](crate::provider::provide) scope.
    #[error("no provider for {type_name}")]
    MissingProvider { type_name: &'static str },

    /// `start` was called on a thread that is not inside a tokio runtime.
    #[error("no tokio runtime available to drive the timer")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, Error>;
