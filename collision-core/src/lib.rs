//! Collision Table - fixed-capacity integer hash table with traceable probing
//!
//! Core library providing:
//! - Separate chaining, linear probing, quadratic probing and double hashing
//! - Probe traces for every insert, search and delete
//! - Tombstone deletion for open addressing
//! - Running statistics and serializable snapshots for visualizers

pub mod config;
pub mod result;
pub mod slot;
pub mod stats;
pub mod strategy;
pub mod table;

pub use config::{ConfigError, TableConfig};
pub use result::{OperationKind, OperationResult, TableError};
pub use slot::{SlotState, SlotView};
pub use stats::TableStats;
pub use strategy::Strategy;
pub use table::{CollisionTable, TableSnapshot};

#[cfg(test)]
mod tests;
