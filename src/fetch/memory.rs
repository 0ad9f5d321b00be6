// In: src/fetch/memory.rs

//! A `BatchFetcher` over a table that is already in memory.

use arrow::record_batch::RecordBatch;

use crate::batch_pipeline::batch::Batch;
use crate::batch_pipeline::traits::BatchFetcher;
use crate::error::TidelineError;

/// Serves batches by slicing an in-memory `RecordBatch`.
///
/// Slicing is zero-copy and purely positional, so the same `batch_id` always
/// yields the same rows — the determinism the fetch contract requires. In
/// real deployments the fetcher would page through a SQL result set or an
/// object store instead.
pub struct MemoryFetcher {
    data: RecordBatch,
}

impl MemoryFetcher {
    pub fn new(data: RecordBatch) -> Self {
        Self { data }
    }
}

impl BatchFetcher for MemoryFetcher {
    fn fetch(&mut self, batch_id: u64, batch_size: usize) -> Result<Option<Batch>, TidelineError> {
        let total = self.data.num_rows();
        let start = match (batch_id as usize).checked_mul(batch_size) {
            Some(start) if start < total => start,
            _ => return Ok(None),
        };
        let length = batch_size.min(total - start);
        let slice = self.data.slice(start, length);
        Ok(Some(Batch::new(batch_id, start as i64, slice)))
    }
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{AsArray, Int64Array};
    use arrow::datatypes::{DataType, Field, Int64Type, Schema};
    use std::sync::Arc;

    fn table(n: i64) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from((0..n).collect::<Vec<_>>()))],
        )
        .unwrap()
    }

    #[test]
    fn test_batches_are_positional_slices() {
        let mut fetcher = MemoryFetcher::new(table(25));

        let batch = fetcher.fetch(1, 10).unwrap().unwrap();
        assert_eq!(batch.batch_id, 1);
        assert_eq!(batch.start_row, 10);
        assert_eq!(batch.end_row, 19);
        let ids = batch.data.column(0).as_primitive::<Int64Type>();
        assert_eq!(ids.value(0), 10);
        assert_eq!(ids.value(9), 19);
    }

    #[test]
    fn test_final_batch_is_short() {
        let mut fetcher = MemoryFetcher::new(table(25));
        let batch = fetcher.fetch(2, 10).unwrap().unwrap();
        assert_eq!(batch.size(), 5);
        assert_eq!(batch.end_row, 24);
    }

    #[test]
    fn test_exhaustion_past_the_end() {
        let mut fetcher = MemoryFetcher::new(table(25));
        assert!(fetcher.fetch(3, 10).unwrap().is_none());
        // Repeated calls stay exhausted (and deterministic).
        assert!(fetcher.fetch(3, 10).unwrap().is_none());
    }
}
