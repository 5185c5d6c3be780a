//! Operation results
//!
//! Failures are ordinary values. Every insert, search and delete returns an
//! [`OperationResult`] carrying the probe trace whether or not it succeeded.

use crate::strategy::Strategy;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Search,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Insert => write!(f, "insert"),
            OperationKind::Search => write!(f, "search"),
            OperationKind::Delete => write!(f, "delete"),
        }
    }
}

/// Why an operation did not succeed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableError {
    /// Insert of a key that is already live
    DuplicateKey,
    /// Open-addressing insert ran out of probes
    TableFull,
    /// Search or delete target is absent
    NotFound,
    /// Negative keys are rejected before hashing
    NegativeKey,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::DuplicateKey => write!(f, "key already exists"),
            TableError::TableFull => write!(f, "table full"),
            TableError::NotFound => write!(f, "not found"),
            TableError::NegativeKey => write!(f, "negative keys are not supported"),
        }
    }
}

impl std::error::Error for TableError {}

/// Outcome of a single insert, search or delete
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OperationResult {
    pub key: i64,
    pub strategy: Strategy,
    pub operation: OperationKind,

    /// Indices examined, in probe order
    pub probed_indices: Vec<usize>,

    pub success: bool,

    /// Set exactly when `success` is false
    pub error: Option<TableError>,

    pub message: String,
}

impl OperationResult {
    pub(crate) fn succeeded(
        key: i64,
        strategy: Strategy,
        operation: OperationKind,
        probed_indices: Vec<usize>,
    ) -> Self {
        let index = probed_indices.last().copied().unwrap_or_default();
        let probes = probed_indices.len();
        let message = match operation {
            OperationKind::Insert if strategy.is_open_addressing() => {
                format!("inserted key {} at index {} (probes: {})", key, index, probes)
            }
            OperationKind::Insert => format!("inserted key {} at index {}", key, index),
            OperationKind::Search if strategy.is_open_addressing() => {
                format!("found key {} at index {} (probes: {})", key, index, probes)
            }
            OperationKind::Search => format!("found key {} at index {}", key, index),
            OperationKind::Delete => format!("deleted key {}", key),
        };

        OperationResult {
            key,
            strategy,
            operation,
            probed_indices,
            success: true,
            error: None,
            message,
        }
    }

    pub(crate) fn failed(
        key: i64,
        strategy: Strategy,
        operation: OperationKind,
        probed_indices: Vec<usize>,
        error: TableError,
    ) -> Self {
        let message = match error {
            TableError::DuplicateKey => format!("key {} already exists", key),
            TableError::TableFull => "table full".to_string(),
            TableError::NotFound => format!("key {} not found", key),
            TableError::NegativeKey => format!("key {} rejected: {}", key, error),
        };

        OperationResult {
            key,
            strategy,
            operation,
            probed_indices,
            success: false,
            error: Some(error),
            message,
        }
    }

    pub fn probe_count(&self) -> usize {
        self.probed_indices.len()
    }

    /// Index the key was placed at or found at
    pub fn final_index(&self) -> Option<usize> {
        if self.success {
            self.probed_indices.last().copied()
        } else {
            None
        }
    }

    /// View as a `Result`, for callers that prefer `?`
    pub fn outcome(&self) -> Result<usize, TableError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.final_index().unwrap_or_default()),
        }
    }
}
