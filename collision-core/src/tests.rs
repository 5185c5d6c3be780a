//! Integration tests for collision-core

use crate::{CollisionTable, SlotView};
use std::collections::HashSet;

/// Live keys as seen through the public slot views
fn live_keys(table: &CollisionTable) -> Vec<i64> {
    let mut keys = Vec::new();
    for view in table.slots() {
        match view {
            SlotView::Bucket(bucket) => keys.extend_from_slice(bucket),
            SlotView::Occupied(key) => keys.push(key),
            SlotView::Empty | SlotView::Tombstone(_) => {}
        }
    }
    keys
}

fn check_invariants(table: &CollisionTable, model: &HashSet<i64>) {
    let stats = table.stats();
    let keys = live_keys(table);
    let unique: HashSet<i64> = keys.iter().copied().collect();

    assert_eq!(keys.len(), unique.len(), "a key is live in more than one place");
    assert_eq!(&unique, model);
    assert_eq!(stats.total_keys, model.len());
    assert!(stats.total_probes >= stats.operations);
    assert!(stats.collisions <= stats.operations);

    let expected_load = model.len() as f64 / table.capacity() as f64;
    assert!((table.load_factor() - expected_load).abs() < 1e-12);
    if table.strategy().is_open_addressing() {
        assert!(table.load_factor() <= 1.0);
        assert_eq!(table.max_chain_length(), 0);
    }
}

#[cfg(test)]
mod integration_tests {
    use super::{check_invariants, live_keys};
    use crate::{CollisionTable, OperationKind, SlotView, Strategy, TableError};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    #[test]
    fn test_basic_workflow() {
        for strategy in Strategy::ALL {
            let mut table = CollisionTable::new(23, strategy);

            for key in 0..15 {
                assert!(table.insert(key * 3).success, "{strategy}: insert {}", key * 3);
            }
            assert_eq!(table.len(), 15);
            assert!(table.load_factor() < 1.0);
            assert!(table.average_probes() >= 1.0);

            for key in 0..15 {
                assert!(table.search(key * 3).success);
                assert!(table.delete(key * 3).success);
            }
            assert_eq!(table.len(), 0);
            assert!(live_keys(&table).is_empty());
        }
    }

    #[test]
    fn test_search_reports_insert_index() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for strategy in Strategy::ALL {
            let mut table = CollisionTable::new(31, strategy);
            for _ in 0..20 {
                let key = rng.gen_range(0..500);
                let inserted = table.insert(key);
                if !inserted.success {
                    continue;
                }

                let found = table.search(key);
                assert!(found.success);
                assert_eq!(found.final_index(), inserted.final_index());
                assert_eq!(found.operation, OperationKind::Search);
            }
        }
    }

    #[test]
    fn test_random_workload_keeps_invariants() {
        for (seed, strategy) in Strategy::ALL.into_iter().enumerate() {
            let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
            let mut table = CollisionTable::new(17, strategy);
            let mut model = HashSet::new();

            for _ in 0..2000 {
                let key = rng.gen_range(0..40);

                match rng.gen_range(0..3) {
                    0 => {
                        let before = table.stats();
                        let r = table.insert(key);
                        if model.contains(&key) {
                            assert_eq!(r.error, Some(TableError::DuplicateKey));
                        } else if r.success {
                            model.insert(key);
                            let index = r.final_index().unwrap();
                            assert_eq!(table.slot(index).map(|v| v.live_len() > 0), Some(true));
                            assert_eq!(table.stats().operations, before.operations + 1);
                            assert_eq!(table.stats().total_probes, before.total_probes + r.probe_count());
                        } else {
                            assert!(strategy.is_open_addressing());
                            assert_eq!(r.error, Some(TableError::TableFull));
                            assert_eq!(r.probe_count(), table.capacity());
                        }
                        if !r.success {
                            assert_eq!(table.stats(), before);
                        }
                    }
                    1 => {
                        let before = table.stats();
                        let r = table.search(key);
                        assert_eq!(r.success, model.contains(&key));
                        assert!(r.probe_count() >= 1);
                        assert_eq!(table.stats(), before);
                    }
                    _ => {
                        let r = table.delete(key);
                        assert_eq!(r.success, model.remove(&key));
                        if r.success && strategy.is_open_addressing() {
                            let index = r.final_index().unwrap();
                            assert_eq!(table.slot(index), Some(SlotView::Tombstone(key)));
                        }
                    }
                }

                check_invariants(&table, &model);
            }
        }
    }

    #[test]
    fn test_delete_all_after_inserts() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for strategy in Strategy::ALL {
            let mut table = CollisionTable::new(29, strategy);
            let mut inserted = Vec::new();
            while inserted.len() < 20 {
                let key = rng.gen_range(0..1000);
                if table.insert(key).success {
                    inserted.push(key);
                }
            }
            for key in &inserted {
                assert!(table.delete(*key).success);
            }
            assert_eq!(table.stats().total_keys, 0);
            check_invariants(&table, &HashSet::new());
        }
    }

    #[test]
    fn test_tombstones_are_insertable() {
        let mut table = CollisionTable::new(11, Strategy::DoubleHashing);
        assert!(table.insert(5).success);
        assert!(table.delete(5).success);

        // 16 shares home slot 5
        let r = table.insert(16);
        assert!(r.success);
        assert_eq!(r.probed_indices, vec![5]);
        assert_eq!(table.slot(5), Some(SlotView::Occupied(16)));
    }

    #[test]
    fn test_snapshot_matches_accessors() {
        let mut table = CollisionTable::new(11, Strategy::Chaining);
        for key in [11, 22, 5, 16, 27] {
            table.insert(key);
        }

        let snapshot = table.snapshot();
        assert_eq!(snapshot.stats, table.stats());
        assert_eq!(snapshot.max_chain_length, 3);
        assert_eq!(snapshot.load_factor, table.load_factor());
        assert_eq!(snapshot.average_probes, 1.0);
        assert_eq!(snapshot.slots.len(), 11);
    }
}
