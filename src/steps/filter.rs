// In: src/steps/filter.rs

//! A step that keeps only rows where a numeric column exceeds a threshold.

use arrow::array::Float64Array;
use arrow::compute::kernels::cmp::gt;
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::DataType;

use crate::batch_pipeline::batch::Batch;
use crate::batch_pipeline::traits::BatchStep;
use crate::error::TidelineError;

/// Filters rows based on a column threshold for each batch: a row survives if
/// `column > threshold`. Null cells never satisfy the comparison, so nulls in
/// the filter column are dropped alongside failing rows.
pub struct ThresholdFilterStep {
    name: String,
    column: String,
    threshold: f64,
}

impl ThresholdFilterStep {
    pub fn new(name: impl Into<String>, column: impl Into<String>, threshold: f64) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            threshold,
        }
    }
}

impl BatchStep for ThresholdFilterStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&self, batch: Batch) -> Result<Batch, TidelineError> {
        let source = batch
            .data
            .column_by_name(&self.column)
            .ok_or_else(|| TidelineError::ColumnNotFound(self.column.clone()))?;
        if !source.data_type().is_numeric() {
            return Err(TidelineError::UnsupportedType(format!(
                "ThresholdFilterStep requires a numeric column, but '{}' is {:?}",
                self.column,
                source.data_type()
            )));
        }

        // Compare in f64 space so one threshold works across integer widths.
        let as_f64 = cast(source.as_ref(), &DataType::Float64)?;
        let keep = gt(&as_f64, &Float64Array::new_scalar(self.threshold))?;
        let kept = filter_record_batch(&batch.data, &keep)?;

        Ok(Batch::new(batch.batch_id, batch.start_row, kept))
    }
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{AsArray, Int64Array};
    use arrow::datatypes::{Field, Int64Type, Schema};
    use arrow::record_batch::RecordBatch;
    use std::sync::Arc;

    fn batch(values: Vec<Option<i64>>) -> Batch {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "feature1",
            DataType::Int64,
            true,
        )]));
        let data =
            RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(values))]).unwrap();
        Batch::new(1, 10, data)
    }

    #[test]
    fn test_rows_at_or_below_threshold_are_dropped() {
        let step = ThresholdFilterStep::new("filter_data", "feature1", 10.0);
        let result = step
            .process(batch(vec![Some(3), Some(10), Some(11), Some(42)]))
            .unwrap();

        let kept = result
            .data
            .column_by_name("feature1")
            .unwrap()
            .as_primitive::<Int64Type>();
        assert_eq!(kept.values().to_vec(), vec![11, 42]);
        assert_eq!(result.batch_id, 1);
        assert_eq!(result.start_row, 10);
        assert_eq!(result.end_row, 11);
    }

    #[test]
    fn test_nulls_in_filter_column_are_dropped() {
        let step = ThresholdFilterStep::new("filter_data", "feature1", 0.0);
        let result = step.process(batch(vec![Some(5), None, Some(7)])).unwrap();
        assert_eq!(result.size(), 2);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let step = ThresholdFilterStep::new("filter_data", "nope", 1.0);
        assert!(matches!(
            step.process(batch(vec![Some(1)])),
            Err(TidelineError::ColumnNotFound(_))
        ));
    }
}
