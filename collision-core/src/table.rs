//! Fixed-capacity collision table
//!
//! Provides:
//! - Four interchangeable collision-resolution strategies over integer keys
//! - Per-operation probe traces
//! - Running statistics (load factor, average probes, collisions, chain length)
//! - Read-only slot views and serializable snapshots for visualizers

use crate::config::{ConfigError, TableConfig};
use crate::result::{OperationKind, OperationResult, TableError};
use crate::slot::{Slot, SlotState, SlotView};
use crate::stats::TableStats;
use crate::strategy::{h1, Strategy};
use serde::Serialize;

/// Slot storage, one layout per family of strategies
#[derive(Clone, Debug)]
enum Storage {
    /// One ordered bucket per index
    Chained(Vec<Vec<i64>>),
    /// One tri-state slot per index
    Open(Vec<Slot>),
}

impl Storage {
    fn empty(config: &TableConfig) -> Self {
        if config.strategy.is_open_addressing() {
            Storage::Open(vec![Slot::Empty; config.capacity])
        } else {
            Storage::Chained(vec![Vec::new(); config.capacity])
        }
    }
}

/// Hash table with a fixed capacity and a fixed collision strategy
#[derive(Clone, Debug)]
pub struct CollisionTable {
    config: TableConfig,
    storage: Storage,
    stats: TableStats,
}

/// Owned picture of a table, for handing to a renderer
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub config: TableConfig,
    pub stats: TableStats,
    pub load_factor: f64,
    pub average_probes: f64,
    pub max_chain_length: usize,
    pub slots: Vec<SlotState>,
}

/// Keys are hashed as unsigned values; negative keys never reach `h1`
#[inline(always)]
fn hashable(key: i64) -> Option<u64> {
    u64::try_from(key).ok()
}

impl CollisionTable {
    /// Create a new table
    ///
    /// # Arguments
    /// * `capacity` - Number of slots, must be positive
    /// * `strategy` - Collision-resolution strategy
    ///
    /// # Panics
    /// If `capacity` is zero. Use [`CollisionTable::try_new`] to get an error instead.
    pub fn new(capacity: usize, strategy: Strategy) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Self::build(TableConfig::new(capacity, strategy))
    }

    pub fn try_new(capacity: usize, strategy: Strategy) -> Result<Self, ConfigError> {
        Self::from_config(TableConfig::new(capacity, strategy))
    }

    pub fn from_config(config: TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: TableConfig) -> Self {
        CollisionTable {
            storage: Storage::empty(&config),
            config,
            stats: TableStats::default(),
        }
    }

    /// Insert a key
    ///
    /// Chaining appends to the home bucket and never reports a full table.
    /// Open addressing walks the probe sequence, reusing the first tombstone
    /// it passed once it is sure the key is not live further along.
    pub fn insert(&mut self, key: i64) -> OperationResult {
        let strategy = self.config.strategy;
        let capacity = self.config.capacity;
        let Some(hashed) = hashable(key) else {
            return self.reject(key, OperationKind::Insert);
        };

        let result = match &mut self.storage {
            Storage::Chained(buckets) => {
                let index = h1(hashed, capacity);
                let bucket = &mut buckets[index];
                tracing::trace!(key, index, chain_len = bucket.len(), "probe");

                if bucket.contains(&key) {
                    OperationResult::failed(
                        key,
                        strategy,
                        OperationKind::Insert,
                        vec![index],
                        TableError::DuplicateKey,
                    )
                } else {
                    let collided = !bucket.is_empty();
                    bucket.push(key);
                    self.stats.record_insert(1, collided);
                    OperationResult::succeeded(key, strategy, OperationKind::Insert, vec![index])
                }
            }
            Storage::Open(slots) => {
                let mut trace = Vec::new();
                // 1-based probe position of the first tombstone passed
                let mut reusable: Option<usize> = None;
                let mut placement: Option<usize> = None;
                let mut duplicate = false;

                for index in strategy.probe_sequence(hashed, capacity) {
                    trace.push(index);
                    tracing::trace!(key, index, slot = ?slots[index], "probe");

                    match slots[index] {
                        Slot::Occupied(existing) if existing == key => {
                            duplicate = true;
                            break;
                        }
                        Slot::Occupied(_) => {}
                        Slot::Tombstone(_) => {
                            reusable.get_or_insert(trace.len());
                        }
                        Slot::Empty => {
                            placement = Some(reusable.unwrap_or(trace.len()));
                            break;
                        }
                    }
                }

                if duplicate {
                    OperationResult::failed(
                        key,
                        strategy,
                        OperationKind::Insert,
                        trace,
                        TableError::DuplicateKey,
                    )
                } else if let Some(probes) = placement.or(reusable) {
                    trace.truncate(probes);
                    let index = trace[probes - 1];
                    slots[index] = Slot::Occupied(key);
                    self.stats.record_insert(probes, probes > 1);
                    OperationResult::succeeded(key, strategy, OperationKind::Insert, trace)
                } else {
                    OperationResult::failed(
                        key,
                        strategy,
                        OperationKind::Insert,
                        trace,
                        TableError::TableFull,
                    )
                }
            }
        };

        self.log(&result);
        result
    }

    /// Look a key up without touching the aggregate statistics
    pub fn search(&self, key: i64) -> OperationResult {
        let strategy = self.config.strategy;
        let Some(hashed) = hashable(key) else {
            return self.reject(key, OperationKind::Search);
        };

        let (trace, found) = match &self.storage {
            Storage::Chained(buckets) => {
                let index = h1(hashed, self.config.capacity);
                (vec![index], buckets[index].contains(&key))
            }
            Storage::Open(slots) => locate(slots, strategy, hashed, key),
        };

        let result = if found {
            OperationResult::succeeded(key, strategy, OperationKind::Search, trace)
        } else {
            OperationResult::failed(key, strategy, OperationKind::Search, trace, TableError::NotFound)
        };

        self.log(&result);
        result
    }

    /// Remove a key
    ///
    /// Chaining removes the key from its bucket. Open addressing turns the
    /// slot into a tombstone so later probe sequences still pass through it.
    pub fn delete(&mut self, key: i64) -> OperationResult {
        let strategy = self.config.strategy;
        let capacity = self.config.capacity;
        let Some(hashed) = hashable(key) else {
            return self.reject(key, OperationKind::Delete);
        };

        let (trace, removed) = match &mut self.storage {
            Storage::Chained(buckets) => {
                let index = h1(hashed, capacity);
                let bucket = &mut buckets[index];
                let removed = match bucket.iter().position(|&k| k == key) {
                    Some(position) => {
                        bucket.remove(position);
                        true
                    }
                    None => false,
                };
                (vec![index], removed)
            }
            Storage::Open(slots) => {
                let (trace, found) = locate(slots, strategy, hashed, key);
                if found {
                    if let Some(&index) = trace.last() {
                        slots[index] = Slot::Tombstone(key);
                    }
                }
                (trace, found)
            }
        };

        let result = if removed {
            self.stats.record_delete();
            OperationResult::succeeded(key, strategy, OperationKind::Delete, trace)
        } else {
            OperationResult::failed(key, strategy, OperationKind::Delete, trace, TableError::NotFound)
        };

        self.log(&result);
        result
    }

    /// Empty every slot and zero the statistics, keeping capacity and strategy
    pub fn reset(&mut self) {
        self.storage = Storage::empty(&self.config);
        self.stats = TableStats::default();
        tracing::info!(capacity = self.config.capacity, strategy = %self.config.strategy, "table reset");
    }

    /// Replace this table with a fresh one built from `config`
    ///
    /// Existing keys are discarded, not migrated. On error the table is left
    /// untouched.
    pub fn reconfigure(&mut self, config: TableConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self = Self::build(config);
        tracing::info!(capacity = config.capacity, strategy = %config.strategy, "table reconfigured");
        Ok(())
    }

    fn reject(&self, key: i64, operation: OperationKind) -> OperationResult {
        tracing::warn!(key, %operation, "rejected negative key");
        OperationResult::failed(
            key,
            self.config.strategy,
            operation,
            Vec::new(),
            TableError::NegativeKey,
        )
    }

    fn log(&self, result: &OperationResult) {
        tracing::debug!(
            key = result.key,
            operation = %result.operation,
            strategy = %result.strategy,
            probes = result.probe_count(),
            success = result.success,
            "{}",
            result.message
        );
    }

    // === Accessors ===

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn strategy(&self) -> Strategy {
        self.config.strategy
    }

    /// Raw counters
    pub fn stats(&self) -> TableStats {
        self.stats
    }

    /// Number of live keys
    pub fn len(&self) -> usize {
        self.stats.total_keys
    }

    pub fn is_empty(&self) -> bool {
        self.stats.total_keys == 0
    }

    pub fn load_factor(&self) -> f64 {
        self.stats.load_factor(self.config.capacity)
    }

    pub fn average_probes(&self) -> f64 {
        self.stats.average_probes()
    }

    /// Longest bucket; always 0 for open addressing
    pub fn max_chain_length(&self) -> usize {
        match &self.storage {
            Storage::Chained(buckets) => buckets.iter().map(Vec::len).max().unwrap_or(0),
            Storage::Open(_) => 0,
        }
    }

    /// Home slot `h1(key)`, or `None` for a negative key
    pub fn home_index(&self, key: i64) -> Option<usize> {
        hashable(key).map(|hashed| h1(hashed, self.config.capacity))
    }

    /// Membership test that produces no trace and no log output
    pub fn contains(&self, key: i64) -> bool {
        let Some(hashed) = hashable(key) else {
            return false;
        };
        match &self.storage {
            Storage::Chained(buckets) => buckets[h1(hashed, self.config.capacity)].contains(&key),
            Storage::Open(slots) => locate(slots, self.config.strategy, hashed, key).1,
        }
    }

    /// View of one index
    pub fn slot(&self, index: usize) -> Option<SlotView<'_>> {
        match &self.storage {
            Storage::Chained(buckets) => buckets.get(index).map(|b| SlotView::Bucket(b)),
            Storage::Open(slots) => slots.get(index).map(SlotView::from),
        }
    }

    /// Views of every index, in order
    pub fn slots(&self) -> impl Iterator<Item = SlotView<'_>> + '_ {
        let (buckets, open): (&[Vec<i64>], &[Slot]) = match &self.storage {
            Storage::Chained(buckets) => (buckets.as_slice(), &[][..]),
            Storage::Open(slots) => (&[][..], slots.as_slice()),
        };
        buckets
            .iter()
            .map(|b| SlotView::Bucket(b))
            .chain(open.iter().map(SlotView::from))
    }

    pub fn snapshot(&self) -> TableSnapshot {
        let capacity = self.config.capacity;
        let home = |key: i64| hashable(key).map_or(0, |hashed| h1(hashed, capacity));

        TableSnapshot {
            config: self.config,
            stats: self.stats,
            load_factor: self.load_factor(),
            average_probes: self.average_probes(),
            max_chain_length: self.max_chain_length(),
            slots: self.slots().map(|view| SlotState::from_view(view, &home)).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.snapshot())
    }
}

impl Default for CollisionTable {
    fn default() -> Self {
        Self::build(TableConfig::default())
    }
}

/// Walk an open-addressing probe sequence looking for a live `key`
///
/// Stops at the first empty slot. Tombstones and other keys are passed over.
/// Returns the trace and whether the last traced index holds the key.
fn locate(slots: &[Slot], strategy: Strategy, hashed: u64, key: i64) -> (Vec<usize>, bool) {
    let mut trace = Vec::new();

    for index in strategy.probe_sequence(hashed, slots.len()) {
        trace.push(index);
        match slots[index] {
            Slot::Empty => return (trace, false),
            Slot::Occupied(existing) if existing == key => return (trace, true),
            _ => {}
        }
    }

    (trace, false)
}
