//! Slot states
//!
//! Open-addressing slots are tri-state. A tombstone keeps the key it last
//! held so the table can still be displayed, but lookups treat it as absent
//! and keep probing past it.

use serde::Serialize;

/// One open-addressing slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Empty,
    Occupied(i64),
    Tombstone(i64),
}

impl Slot {
    /// Slot can accept a new key
    #[inline(always)]
    pub fn is_insertable(&self) -> bool {
        matches!(self, Slot::Empty | Slot::Tombstone(_))
    }

    /// Live key held by this slot, if any
    #[inline(always)]
    pub fn live_key(&self) -> Option<i64> {
        match self {
            Slot::Occupied(key) => Some(*key),
            _ => None,
        }
    }
}

/// Read-only view of one table index, for either storage layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotView<'a> {
    /// Chaining bucket, keys in insertion order
    Bucket(&'a [i64]),
    Empty,
    Occupied(i64),
    Tombstone(i64),
}

impl<'a> From<&'a Slot> for SlotView<'a> {
    fn from(slot: &'a Slot) -> Self {
        match *slot {
            Slot::Empty => SlotView::Empty,
            Slot::Occupied(key) => SlotView::Occupied(key),
            Slot::Tombstone(key) => SlotView::Tombstone(key),
        }
    }
}

impl SlotView<'_> {
    /// Number of live keys at this index
    pub fn live_len(&self) -> usize {
        match self {
            SlotView::Bucket(keys) => keys.len(),
            SlotView::Occupied(_) => 1,
            SlotView::Empty | SlotView::Tombstone(_) => 0,
        }
    }
}

/// Owned slot state for snapshots
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotState {
    Bucket { keys: Vec<i64> },
    Empty,
    Occupied { key: i64, home: usize },
    Tombstone { key: i64 },
}

impl SlotState {
    /// Build from a view; `home` maps a stored key to its `h1` index
    pub fn from_view(view: SlotView<'_>, home: impl Fn(i64) -> usize) -> Self {
        match view {
            SlotView::Bucket(keys) => SlotState::Bucket { keys: keys.to_vec() },
            SlotView::Empty => SlotState::Empty,
            SlotView::Occupied(key) => SlotState::Occupied { key, home: home(key) },
            SlotView::Tombstone(key) => SlotState::Tombstone { key },
        }
    }
}
