// In: src/batch_pipeline/batch.rs

//! Defines `Batch`, the transport value describing one bounded chunk of the
//! source and its columnar payload.
//!
//! A `Batch` has no behavior beyond being a value. Steps that filter or
//! reshape rows must return a *new* `Batch` preserving `batch_id` and
//! `start_row` — those denote position in the source, not post-filter content
//! — while `end_row` is recomputed from the surviving row count. Identity for
//! all bookkeeping purposes is `batch_id` alone.

use std::fmt;

use arrow::record_batch::RecordBatch;

/// One bounded chunk of a larger data source.
///
/// Invariants: `end_row >= start_row - 1` (an empty batch is legal), and
/// `end_row - start_row + 1 == size()`. `Batch::new` upholds both by deriving
/// `end_row` from the payload.
#[derive(Debug, Clone)]
pub struct Batch {
    /// Monotonically increasing position of this chunk in the source.
    pub batch_id: u64,
    /// Inclusive lower bound in the source's global row ordering.
    pub start_row: i64,
    /// Inclusive upper bound; shrinks when a step removes rows.
    pub end_row: i64,
    /// The columnar payload.
    pub data: RecordBatch,
}

impl Batch {
    /// Builds a batch, deriving `end_row` from the payload's row count.
    /// This is the only constructor; it makes the size/bounds invariant
    /// impossible to violate at creation time.
    pub fn new(batch_id: u64, start_row: i64, data: RecordBatch) -> Self {
        let end_row = start_row + data.num_rows() as i64 - 1;
        Self {
            batch_id,
            start_row,
            end_row,
            data,
        }
    }

    /// Number of rows currently in this batch.
    pub fn size(&self) -> usize {
        self.data.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.num_rows() == 0
    }
}

impl fmt::Display for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Batch(id={}, rows={}-{}, size={})",
            self.batch_id,
            self.start_row,
            self.end_row,
            self.size()
        )
    }
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn record_batch(values: Vec<i64>) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new("a", DataType::Int64, false)]));
        RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(values))]).unwrap()
    }

    #[test]
    fn test_batch_derives_end_row_from_payload() {
        let batch = Batch::new(0, 0, record_batch(vec![1, 2, 3]));
        assert_eq!(batch.batch_id, 0);
        assert_eq!(batch.start_row, 0);
        assert_eq!(batch.end_row, 2);
        assert_eq!(batch.size(), 3);
    }

    #[test]
    fn test_empty_batch_permits_end_row_below_start_row() {
        let batch = Batch::new(7, 70, record_batch(vec![]));
        assert!(batch.is_empty());
        assert_eq!(batch.end_row, 69); // start_row - 1
    }

    #[test]
    fn test_batch_display() {
        let batch = Batch::new(1, 10, record_batch(vec![4, 5]));
        let rendered = batch.to_string();
        assert!(rendered.contains("id=1"));
        assert!(rendered.contains("rows=10-11"));
        assert!(rendered.contains("size=2"));
    }
}
