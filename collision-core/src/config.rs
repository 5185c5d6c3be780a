//! Table configuration
//!
//! A table is fully described by its capacity and strategy. Changing either
//! means building a new table.

use crate::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capacity used when none is given
pub const DEFAULT_CAPACITY: usize = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub capacity: usize,
    pub strategy: Strategy,
}

impl TableConfig {
    pub fn new(capacity: usize, strategy: Strategy) -> Self {
        TableConfig { capacity, strategy }
    }

    /// Check the configuration describes a usable table
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            capacity: DEFAULT_CAPACITY,
            strategy: Strategy::Chaining,
        }
    }
}

/// Error type for misconfigured tables
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCapacity,
    UnknownStrategy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => write!(f, "capacity must be positive"),
            ConfigError::UnknownStrategy(tag) => write!(f, "Unknown strategy: {}", tag),
        }
    }
}

impl std::error::Error for ConfigError {}
