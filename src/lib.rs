pub mod core;

pub use crate::core::{
    config::QueueConfig,
    error::{ClosedError, Error},
    queue::{ConcurrentQueue, Popped, SafeQueue},
    stats::{QueueStats, append_stats},
};
