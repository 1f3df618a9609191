use std::fmt::{Debug, Formatter};
use thiserror::Error;

/// Returned by `push`/`emplace` once the queue has been closed.
///
/// Carries the rejected item back to the caller, which decides whether to
/// log it, drop it or send it elsewhere. The queue itself is unaffected.
#[derive(Error, PartialEq, Eq)]
#[error("queue is closed")]
pub struct ClosedError<T>(pub T);

impl<T> ClosedError<T> {
    /// Take back the item that was refused
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Hand-written so the error stays printable for any `T`
impl<T> Debug for ClosedError<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosedError").finish_non_exhaustive()
    }
}

/// Errors from configuration loading and stats export.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed JSON config, or a stats snapshot that failed to serialize.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Reading a config file or appending a stats file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid queue configuration: {0}")]
    InvalidConfig(String),
}
