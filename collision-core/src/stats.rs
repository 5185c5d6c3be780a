//! Running statistics

use serde::Serialize;

/// Aggregate counters maintained by the table
///
/// Only successful inserts touch `total_probes`, `collisions` and
/// `operations`. Searches and failed inserts leave them unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Live key count
    pub total_keys: usize,

    /// Probes summed over every successful insert
    pub total_probes: usize,

    /// Successful inserts whose first probed slot was already in use
    pub collisions: usize,

    /// Successful inserts, denominator of the average
    pub operations: usize,
}

impl TableStats {
    /// Account for a successful insert that took `probes` probes (1-based)
    pub(crate) fn record_insert(&mut self, probes: usize, collided: bool) {
        self.total_keys += 1;
        self.total_probes += probes;
        self.operations += 1;
        if collided {
            self.collisions += 1;
        }
    }

    pub(crate) fn record_delete(&mut self) {
        self.total_keys -= 1;
    }

    /// Live keys per slot; may exceed 1.0 under chaining
    pub fn load_factor(&self, capacity: usize) -> f64 {
        self.total_keys as f64 / capacity as f64
    }

    pub fn average_probes(&self) -> f64 {
        if self.operations > 0 {
            self.total_probes as f64 / self.operations as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = TableStats::default();
        assert_eq!(stats.average_probes(), 0.0);
        assert_eq!(stats.load_factor(11), 0.0);
    }

    #[test]
    fn test_record_insert() {
        let mut stats = TableStats::default();
        stats.record_insert(1, false);
        stats.record_insert(3, true);

        assert_eq!(stats.total_keys, 2);
        assert_eq!(stats.total_probes, 4);
        assert_eq!(stats.collisions, 1);
        assert_eq!(stats.operations, 2);
        assert_eq!(stats.average_probes(), 2.0);
        assert!((stats.load_factor(4) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_delete_only_touches_key_count() {
        let mut stats = TableStats::default();
        stats.record_insert(2, true);
        stats.record_delete();

        assert_eq!(stats.total_keys, 0);
        assert_eq!(stats.total_probes, 2);
        assert_eq!(stats.operations, 1);
    }
}
