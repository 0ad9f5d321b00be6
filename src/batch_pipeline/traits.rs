// In: src/batch_pipeline/traits.rs

//! Defines the behavioral traits at the pipeline's two seams: the steps that
//! transform batches, and the fetcher that supplies them.
//!
//! Both contracts exist because the run loop recovers from failure by
//! recomputation: after a crash the in-flight batch is re-fetched and re-run
//! through *every* step from scratch, never resumed mid-stage. Anything that
//! is not repeatable breaks resume.

use crate::batch_pipeline::batch::Batch;
use crate::error::TidelineError;

/// A transformation stage in the pipeline.
///
/// **CONTRACT:** `process` must be safe to invoke repeatedly on the same
/// input — idempotent/pure with respect to externally visible state. Failure
/// is signaled by returning an error; the orchestrator treats this as fatal
/// for the current batch attempt. There is no partial-success state for a
/// batch.
pub trait BatchStep {
    /// The step's unique name within a pipeline. Checkpoint artifact paths are
    /// derived from it, which is why the orchestrator rejects duplicates at
    /// composition time.
    fn name(&self) -> &str;

    /// Transforms one batch into another. Implementations that drop or
    /// reshape rows must preserve `batch_id`/`start_row` (use `Batch::new`,
    /// which recomputes `end_row` from the surviving rows).
    fn process(&self, batch: Batch) -> Result<Batch, TidelineError>;
}

/// The external supplier of batches by id.
///
/// **CONTRACT:** `fetch` must be deterministic for a given `batch_id` within
/// and across runs, since retries depend on recomputing the identical batch
/// content. `Ok(None)` is the exhaustion sentinel that ends a run; an error
/// halts the loop in a frontier-consistent state (never mid-batch), which is
/// also how cooperative cancellation is expressed.
pub trait BatchFetcher {
    fn fetch(&mut self, batch_id: u64, batch_size: usize) -> Result<Option<Batch>, TidelineError>;
}

/// The original system exposed the fetcher as a plain callable; a closure of
/// the right shape is accepted anywhere a fetcher is.
impl<F> BatchFetcher for F
where
    F: FnMut(u64, usize) -> Result<Option<Batch>, TidelineError>,
{
    fn fetch(&mut self, batch_id: u64, batch_size: usize) -> Result<Option<Batch>, TidelineError> {
        self(batch_id, batch_size)
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
