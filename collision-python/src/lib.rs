use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use collision_core::{
    CollisionTable, OperationResult, SlotView, Strategy, TableConfig, TableStats,
};

fn parse_strategy(tag: &str) -> PyResult<Strategy> {
    tag.parse::<Strategy>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Result of one insert, search or delete
#[pyclass(name = "OperationResult")]
#[derive(Clone, Debug)]
pub struct PyOperationResult {
    #[pyo3(get)]
    pub key: i64,
    /// Strategy tag, e.g. "linear_probing"
    #[pyo3(get)]
    pub strategy: String,
    #[pyo3(get)]
    pub operation: String,
    /// Probed slot indices in order
    #[pyo3(get)]
    pub probes: Vec<usize>,
    #[pyo3(get)]
    pub success: bool,
    /// "duplicate_key", "table_full", "not_found", "negative_key" or None
    #[pyo3(get)]
    pub error: Option<String>,
    #[pyo3(get)]
    pub message: String,
}

impl From<OperationResult> for PyOperationResult {
    fn from(result: OperationResult) -> Self {
        PyOperationResult {
            key: result.key,
            strategy: result.strategy.tag().to_string(),
            operation: result.operation.to_string(),
            error: result.error.map(|e| error_tag(&e)),
            probes: result.probed_indices,
            success: result.success,
            message: result.message,
        }
    }
}

fn error_tag(error: &collision_core::TableError) -> String {
    serde_json::to_value(error)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| error.to_string())
}

#[pymethods]
impl PyOperationResult {
    /// Index the key ended up at, None on failure
    #[getter]
    fn final_index(&self) -> Option<usize> {
        if self.success {
            self.probes.last().copied()
        } else {
            None
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "OperationResult(op={}, key={}, probes={:?}, success={})",
            self.operation, self.key, self.probes, self.success
        )
    }
}

/// Raw statistics counters
#[pyclass(name = "TableStats")]
#[derive(Clone, Debug)]
pub struct PyTableStats {
    #[pyo3(get)]
    pub total_keys: usize,
    #[pyo3(get)]
    pub total_probes: usize,
    #[pyo3(get)]
    pub collisions: usize,
    #[pyo3(get)]
    pub operations: usize,
}

impl From<TableStats> for PyTableStats {
    fn from(stats: TableStats) -> Self {
        PyTableStats {
            total_keys: stats.total_keys,
            total_probes: stats.total_probes,
            collisions: stats.collisions,
            operations: stats.operations,
        }
    }
}

#[pymethods]
impl PyTableStats {
    fn __repr__(&self) -> String {
        format!(
            "TableStats(keys={}, probes={}, collisions={}, operations={})",
            self.total_keys, self.total_probes, self.collisions, self.operations
        )
    }
}

/// Collision table driven from Python
///
/// ```python
/// from collision_table_rs import CollisionTable
///
/// table = CollisionTable(11, "linear_probing")
/// table.insert(11)
/// result = table.insert(22)
/// result.probes        # [0, 1]
/// table.load_factor()  # 0.18...
/// ```
#[pyclass(name = "CollisionTable")]
pub struct PyCollisionTable {
    table: CollisionTable,
}

#[pymethods]
impl PyCollisionTable {
    #[new]
    #[pyo3(signature = (capacity=11, strategy="chaining"))]
    fn new(capacity: usize, strategy: &str) -> PyResult<Self> {
        let strategy = parse_strategy(strategy)?;
        let table = CollisionTable::try_new(capacity, strategy)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyCollisionTable { table })
    }

    fn insert(&mut self, key: i64) -> PyOperationResult {
        self.table.insert(key).into()
    }

    fn search(&self, key: i64) -> PyOperationResult {
        self.table.search(key).into()
    }

    fn delete(&mut self, key: i64) -> PyOperationResult {
        self.table.delete(key).into()
    }

    fn reset(&mut self) {
        self.table.reset();
    }

    /// Rebuild with a new capacity and/or strategy; keys are discarded
    #[pyo3(signature = (capacity=None, strategy=None))]
    fn reconfigure(&mut self, capacity: Option<usize>, strategy: Option<&str>) -> PyResult<()> {
        let current = self.table.config();
        let strategy = match strategy {
            Some(tag) => parse_strategy(tag)?,
            None => current.strategy,
        };
        let config = TableConfig::new(capacity.unwrap_or(current.capacity), strategy);
        self.table
            .reconfigure(config)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    fn average_probes(&self) -> f64 {
        self.table.average_probes()
    }

    fn max_chain_length(&self) -> usize {
        self.table.max_chain_length()
    }

    fn stats(&self) -> PyTableStats {
        self.table.stats().into()
    }

    fn home_index(&self, key: i64) -> Option<usize> {
        self.table.home_index(key)
    }

    /// Keys at one index: the bucket for chaining, or `(state, key)` otherwise
    fn slot(&self, index: usize) -> PyResult<(String, Vec<i64>)> {
        let view = self
            .table
            .slot(index)
            .ok_or_else(|| PyIndexError::new_err(format!("slot {} out of range", index)))?;

        Ok(match view {
            SlotView::Bucket(keys) => ("bucket".to_string(), keys.to_vec()),
            SlotView::Empty => ("empty".to_string(), Vec::new()),
            SlotView::Occupied(key) => ("occupied".to_string(), vec![key]),
            SlotView::Tombstone(key) => ("tombstone".to_string(), vec![key]),
        })
    }

    /// Whole table state as a JSON string
    fn snapshot_json(&self) -> PyResult<String> {
        let value = self
            .table
            .to_json()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(value.to_string())
    }

    #[getter]
    fn capacity(&self) -> usize {
        self.table.capacity()
    }

    #[getter]
    fn strategy(&self) -> &'static str {
        self.table.strategy().tag()
    }

    fn __len__(&self) -> usize {
        self.table.len()
    }

    fn __contains__(&self, key: i64) -> bool {
        self.table.contains(key)
    }

    fn __repr__(&self) -> String {
        format!(
            "CollisionTable(capacity={}, strategy={}, keys={}, load={:.2})",
            self.table.capacity(),
            self.table.strategy(),
            self.table.len(),
            self.table.load_factor()
        )
    }
}

/// Strategy tags accepted by `CollisionTable`
#[pyfunction]
fn strategies() -> Vec<(&'static str, &'static str)> {
    Strategy::ALL
        .into_iter()
        .map(|s| (s.tag(), s.display_name()))
        .collect()
}

#[pymodule]
fn collision_table_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCollisionTable>()?;
    m.add_class::<PyOperationResult>()?;
    m.add_class::<PyTableStats>()?;
    m.add_function(wrap_pyfunction!(strategies, m)?)?;
    Ok(())
}
