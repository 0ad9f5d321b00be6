// In: src/steps/drop_nulls.rs

//! A step that removes every row containing a null in any column.

use arrow::array::BooleanArray;
use arrow::compute::{and, filter_record_batch, is_not_null};

use crate::batch_pipeline::batch::Batch;
use crate::batch_pipeline::traits::BatchStep;
use crate::error::TidelineError;

/// Drops rows containing null values from each batch.
pub struct DropNullsStep {
    name: String,
}

impl DropNullsStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl BatchStep for DropNullsStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, batch: Batch) -> Result<Batch, TidelineError> {
        // Common fast path: nothing to drop.
        if batch.data.columns().iter().all(|c| c.null_count() == 0) {
            return Ok(batch);
        }

        // A row survives only if every column is valid at its index.
        let mut keep = BooleanArray::from(vec![true; batch.size()]);
        for column in batch.data.columns() {
            if column.null_count() == 0 {
                continue;
            }
            keep = and(&keep, &is_not_null(column.as_ref())?)?;
        }

        let cleaned = filter_record_batch(&batch.data, &keep)?;
        Ok(Batch::new(batch.batch_id, batch.start_row, cleaned))
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
