use crate::core::error::Error;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Point-in-time counters of a queue, all read under one lock acquisition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub name: String,
    pub pushed: u64,  // successful insertions
    pub popped: u64,  // successful removals
    pub rejected: u64, // insertions refused after close
    pub len: usize,
    pub closed: bool,
}

/// Append snapshots to `path`, one JSON object per line
pub fn append_stats(stats: &[QueueStats], path: impl AsRef<Path>) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;

    for entry in stats {
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?;
    }
    Ok(())
}
