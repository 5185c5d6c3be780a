//! Collision-resolution strategies and their probe sequences
//!
//! Every strategy starts from the same home slot `h1(key) = key mod capacity`
//! and differs only in the offset added on the i-th attempt:
//! - Chaining: no offset, a single bucket is examined
//! - Linear probing: `i`
//! - Quadratic probing: `i * i`
//! - Double hashing: `i * h2(key)` with `h2(key) = 7 - (key mod 7)`

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Modulus of the secondary hash used as the double-hashing step
pub const SECONDARY_MODULUS: u64 = 7;

/// Collision-resolution strategy, fixed for the lifetime of a table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Chaining,
    #[serde(rename = "linear_probing")]
    Linear,
    #[serde(rename = "quadratic_probing")]
    Quadratic,
    DoubleHashing,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Chaining,
        Strategy::Linear,
        Strategy::Quadratic,
        Strategy::DoubleHashing,
    ];

    /// Short machine tag, also the serde representation
    pub fn tag(self) -> &'static str {
        match self {
            Strategy::Chaining => "chaining",
            Strategy::Linear => "linear_probing",
            Strategy::Quadratic => "quadratic_probing",
            Strategy::DoubleHashing => "double_hashing",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Strategy::Chaining => "Separate Chaining",
            Strategy::Linear => "Linear Probing",
            Strategy::Quadratic => "Quadratic Probing",
            Strategy::DoubleHashing => "Double Hashing",
        }
    }

    /// True for the three strategies that store keys directly in slots
    pub fn is_open_addressing(self) -> bool {
        !matches!(self, Strategy::Chaining)
    }

    /// Index examined on the given 0-based attempt
    ///
    /// Chaining always answers the home slot. Arithmetic is widened so that
    /// `attempt * attempt` and `attempt * step` cannot overflow for any
    /// capacity representable as `usize`.
    #[inline(always)]
    pub fn probe_index(self, key: u64, attempt: usize, capacity: usize) -> usize {
        let cap = capacity as u128;
        let home = h1(key, capacity) as u128;
        let i = attempt as u128 % cap;

        let offset = match self {
            Strategy::Chaining => 0,
            Strategy::Linear => i,
            Strategy::Quadratic => (i * i) % cap,
            Strategy::DoubleHashing => (i * h2(key) as u128) % cap,
        };

        ((home + offset) % cap) as usize
    }

    /// Iterator over the indices this strategy would examine for `key`
    ///
    /// Open addressing yields exactly `capacity` indices; chaining yields one.
    pub fn probe_sequence(self, key: u64, capacity: usize) -> impl Iterator<Item = usize> {
        let attempts = if self.is_open_addressing() { capacity } else { 1 };
        (0..attempts).map(move |attempt| self.probe_index(key, attempt, capacity))
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.tag() == s)
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

/// Primary hash: home slot of a key
#[inline(always)]
pub fn h1(key: u64, capacity: usize) -> usize {
    (key % capacity as u64) as usize
}

/// Secondary hash: double-hashing step, always in `1..=7`
#[inline(always)]
pub fn h2(key: u64) -> u64 {
    SECONDARY_MODULUS - (key % SECONDARY_MODULUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_functions() {
        assert_eq!(h1(11, 11), 0);
        assert_eq!(h1(25, 11), 3);
        assert_eq!(h2(14), 7);
        assert_eq!(h2(15), 6);
        for key in 0..200u64 {
            assert!((1..=7).contains(&h2(key)));
        }
    }

    #[test]
    fn test_linear_sequence_wraps() {
        let seq: Vec<usize> = Strategy::Linear.probe_sequence(9, 11).take(4).collect();
        assert_eq!(seq, vec![9, 10, 0, 1]);
    }

    #[test]
    fn test_quadratic_sequence() {
        let seq: Vec<usize> = Strategy::Quadratic.probe_sequence(0, 11).take(5).collect();
        assert_eq!(seq, vec![0, 1, 4, 9, 5]);
    }

    #[test]
    fn test_double_hashing_sequence() {
        // h1(22) = 0, h2(22) = 7 - 1 = 6
        let seq: Vec<usize> = Strategy::DoubleHashing.probe_sequence(22, 11).take(4).collect();
        assert_eq!(seq, vec![0, 6, 1, 7]);
    }

    #[test]
    fn test_chaining_probes_home_only() {
        let seq: Vec<usize> = Strategy::Chaining.probe_sequence(23, 11).collect();
        assert_eq!(seq, vec![1]);
    }

    #[test]
    fn test_sequence_length_is_capacity() {
        for strategy in Strategy::ALL.into_iter().filter(|s| s.is_open_addressing()) {
            assert_eq!(strategy.probe_sequence(5, 13).count(), 13);
        }
    }

    #[test]
    fn test_large_capacity_does_not_overflow() {
        let cap = usize::MAX / 2;
        let idx = Strategy::Quadratic.probe_index(3, cap - 1, cap);
        assert!(idx < cap);
    }

    #[test]
    fn test_parse_tags() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.tag().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!(
            "cuckoo".parse::<Strategy>(),
            Err(ConfigError::UnknownStrategy("cuckoo".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_tags() {
        let json = serde_json::to_string(&Strategy::Quadratic).unwrap();
        assert_eq!(json, "\"quadratic_probing\"");
        let back: Strategy = serde_json::from_str("\"double_hashing\"").unwrap();
        assert_eq!(back, Strategy::DoubleHashing);
    }
}
