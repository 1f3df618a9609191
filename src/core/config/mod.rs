use crate::core::error::Error;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Construction settings for a `ConcurrentQueue`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Label attached to every tracing event the queue emits
    pub name: String,
    /// Slots reserved up front. A hint only, the queue still grows past it.
    pub initial_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            name: "queue".to_string(),
            initial_capacity: 0,
        }
    }
}

impl QueueConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, Error> {
        let config: QueueConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject settings the queue cannot sensibly run with
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfig("name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = QueueConfig::from_json_str(r#"{ "name": "jobs" }"#).unwrap();
        assert_eq!(config.name, "jobs");
        assert_eq!(config.initial_capacity, 0);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = QueueConfig::from_json_str(r#"{ "name": "  " }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = QueueConfig::from_json_str("{ name: ").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
