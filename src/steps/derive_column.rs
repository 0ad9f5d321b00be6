// In: src/steps/derive_column.rs

//! A step that appends a derived numeric column (`target = source * multiplier`).

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::compute::kernels::numeric::mul;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::batch_pipeline::batch::Batch;
use crate::batch_pipeline::traits::BatchStep;
use crate::error::TidelineError;

/// Adds a new column computed from an existing numeric column. The derived
/// column keeps the source column's type (Int64 stays Int64, Float64 stays
/// Float64); anything else is rejected rather than silently coerced.
pub struct DeriveColumnStep {
    name: String,
    source_col: String,
    multiplier: i64,
    target_col: String,
}

impl DeriveColumnStep {
    pub fn new(
        name: impl Into<String>,
        source_col: impl Into<String>,
        multiplier: i64,
        target_col: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_col: source_col.into(),
            multiplier,
            target_col: target_col.into(),
        }
    }
}

impl BatchStep for DeriveColumnStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, batch: Batch) -> Result<Batch, TidelineError> {
        let source = batch
            .data
            .column_by_name(&self.source_col)
            .ok_or_else(|| TidelineError::ColumnNotFound(self.source_col.clone()))?;

        let derived: ArrayRef = match source.data_type() {
            DataType::Int64 => mul(source, &Int64Array::new_scalar(self.multiplier))?,
            DataType::Float64 => {
                mul(source, &Float64Array::new_scalar(self.multiplier as f64))?
            }
            other => {
                return Err(TidelineError::UnsupportedType(format!(
                    "DeriveColumnStep requires an Int64 or Float64 source, but '{}' is {:?}",
                    self.source_col, other
                )))
            }
        };

        let mut fields: Vec<_> = batch.data.schema().fields().iter().cloned().collect();
        fields.push(Arc::new(Field::new(
            &self.target_col,
            derived.data_type().clone(),
            true,
        )));
        let mut columns = batch.data.columns().to_vec();
        columns.push(derived);

        let data = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        Ok(Batch::new(batch.batch_id, batch.start_row, data))
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
