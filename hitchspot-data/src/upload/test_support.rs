//! Test utilities for uploads.
//!
//! [`RecordingStore`] keeps every inserted batch in memory so tests can
//! check what [`upload_batch`](super::upload_batch) would have sent.

use std::cell::RefCell;

use serde_json::Value;

use super::{TableStore, UploadError};

/// In-memory `TableStore` recording each insert.
///
/// # Example
///
/// ```
/// use hitchspot_data::upload::TableStore;
/// use hitchspot_data::upload::test_support::RecordingStore;
/// use serde_json::json;
///
/// let store = RecordingStore::default();
/// store.insert("spots", &[json!({"id": 1})])?;
/// assert_eq!(store.rows("spots"), vec![json!({"id": 1})]);
/// # Ok::<(), hitchspot_data::upload::UploadError>(())
/// ```
#[derive(Debug, Default)]
pub struct RecordingStore {
    batches: RefCell<Vec<(String, Vec<Value>)>>,
    fail_on: Option<(String, usize)>,
}

impl RecordingStore {
    /// Store rejecting the `batch`-th insert (one-based) into `table`.
    #[must_use]
    pub fn failing_on(table: impl Into<String>, batch: usize) -> Self {
        Self {
            batches: RefCell::default(),
            fail_on: Some((table.into(), batch)),
        }
    }

    /// Batch sizes sent to `table`, in order.
    #[must_use]
    pub fn batch_sizes(&self, table: &str) -> Vec<usize> {
        self.batches
            .borrow()
            .iter()
            .filter(|(name, _)| name == table)
            .map(|(_, rows)| rows.len())
            .collect()
    }

    /// Every row inserted into `table`, in order.
    #[must_use]
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.batches
            .borrow()
            .iter()
            .filter(|(name, _)| name == table)
            .flat_map(|(_, rows)| rows.iter().cloned())
            .collect()
    }

    /// Tables in the order their batches arrived.
    #[must_use]
    pub fn table_order(&self) -> Vec<String> {
        self.batches
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl TableStore for RecordingStore {
    fn insert(&self, table: &str, rows: &[Value]) -> Result<(), UploadError> {
        let attempt = self.batch_sizes(table).len().saturating_add(1);
        if let Some((failing, batch)) = &self.fail_on
            && failing == table
            && *batch == attempt
        {
            return Err(UploadError::Rejected {
                table: table.to_owned(),
                status: 500,
                body: "stub failure".to_owned(),
            });
        }
        self.batches
            .borrow_mut()
            .push((table.to_owned(), rows.to_vec()));
        Ok(())
    }
}
