// In: src/batch_pipeline/orchestrator.rs

//! The top-level orchestrator for the batch pipeline.
//!
//! `Pipeline::run` drives one loop: ask the fetcher for the next batch, run it
//! through every step in declared order, persist each step's output as a
//! checkpoint artifact, and only then advance and save the frontier. Per run
//! the control flow is a small state machine: fetch and step execution
//! alternate until either the fetcher signals exhaustion (terminal success) or
//! a step/fetch fails (the error propagates without advancing the frontier).
//!
//! Batch `N+1` is never fetched before batch `N`'s frontier advancement has
//! been durably persisted. This strict ordering is what makes resume safe:
//! the persisted watermark always reflects a fully-committed prefix of
//! batches. Execution is single-threaded and synchronous throughout; a
//! `Pipeline` instance owns its checkpoint directory exclusively, and running
//! two instances against the same directory concurrently is caller error.

use std::collections::HashSet;

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;

use crate::batch_pipeline::artifact::CheckpointStore;
use crate::batch_pipeline::batch::Batch;
use crate::batch_pipeline::frontier::Frontier;
use crate::batch_pipeline::traits::{BatchFetcher, BatchStep};
use crate::config::TidelineConfig;
use crate::error::TidelineError;

//==================================================================================
// 1. Pipeline
//==================================================================================

/// Orchestrates fetch → transform → checkpoint → advance over a sequence of
/// uniquely-named steps.
pub struct Pipeline {
    steps: Vec<Box<dyn BatchStep>>,
    /// Cached for `Frontier::advance`; computed once at construction.
    step_names: Vec<String>,
    fetcher: Box<dyn BatchFetcher>,
    config: TidelineConfig,
    store: CheckpointStore,
    frontier: Frontier,
}

impl Pipeline {
    /// Composes a pipeline, rejecting invalid configurations before any I/O
    /// occurs: a zero batch size, an empty step list, duplicate step names
    /// (two steps would collide on the same artifact path), and names that
    /// cannot serve as an artifact file stem.
    pub fn new(
        steps: Vec<Box<dyn BatchStep>>,
        fetcher: Box<dyn BatchFetcher>,
        config: TidelineConfig,
    ) -> Result<Self, TidelineError> {
        config.validate()?;
        if steps.is_empty() {
            return Err(TidelineError::Configuration(
                "a pipeline requires at least one step".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for step in &steps {
            let name = step.name();
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(TidelineError::Configuration(format!(
                    "step name '{}' cannot be used as an artifact file stem",
                    name
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(TidelineError::Configuration(format!(
                    "duplicate step name '{}' in the pipeline",
                    name
                )));
            }
        }
        let step_names: Vec<String> = steps.iter().map(|s| s.name().to_string()).collect();

        // First I/O: create the checkpoint directory.
        let store = CheckpointStore::new(&config.checkpoint_dir, config.artifact_compression)?;

        Ok(Self {
            steps,
            step_names,
            fetcher,
            config,
            store,
            frontier: Frontier::new(),
        })
    }

    /// Runs the pipeline until the fetcher signals exhaustion.
    ///
    /// With `resume == true` the frontier is loaded from the checkpoint
    /// directory and processing restarts at `next_batch_id()`. With
    /// `resume == false` processing restarts at batch 0 with a fresh
    /// in-memory frontier; prior artifacts and the persisted record are left
    /// in place (and overwritten as reprocessing proceeds) — only
    /// `reset_frontier` deletes state.
    ///
    /// There is no automatic retry: a fetch or step error aborts the run
    /// immediately, the frontier stays at the last committed batch, and the
    /// caller decides whether to call `run(true)` again after fixing the
    /// cause.
    pub fn run(&mut self, resume: bool) -> Result<(), TidelineError> {
        self.frontier = if resume {
            Frontier::load(&self.store.frontier_path())?
        } else {
            Frontier::new()
        };

        let mut batch_id = self.frontier.next_batch_id();
        if resume && batch_id > 0 {
            log::info!("resuming: {}, next batch {}", self.frontier, batch_id);
        } else {
            log::info!("starting batch pipeline at batch {}", batch_id);
        }

        let mut batches_this_run = 0u64;
        loop {
            log::debug!(
                "fetching batch {} (batch_size={})",
                batch_id,
                self.config.batch_size
            );
            let fetched = self
                .fetcher
                .fetch(batch_id, self.config.batch_size)
                .map_err(|e| TidelineError::Fetch {
                    batch_id,
                    source: Box::new(e),
                })?;

            let Some(batch) = fetched else {
                log::info!(
                    "source exhausted: {} batch(es) committed this run, {}",
                    batches_this_run,
                    self.frontier
                );
                break;
            };
            check_fetched(&batch, batch_id).map_err(|e| TidelineError::Fetch {
                batch_id,
                source: Box::new(e),
            })?;
            log::debug!("fetched {}", batch);

            let mut current = batch;
            for step in &self.steps {
                current = step.process(current).map_err(|e| TidelineError::Step {
                    step: step.name().to_string(),
                    batch_id,
                    source: Box::new(e),
                })?;
                // A failed artifact write is charged to the step as well:
                // the step's output for this batch is not durable, so the
                // batch must not commit.
                self.store
                    .write_artifact(step.name(), &current)
                    .map_err(|e| TidelineError::Step {
                        step: step.name().to_string(),
                        batch_id,
                        source: Box::new(e),
                    })?;
                log::debug!(
                    "step '{}' completed batch {} ({} rows)",
                    step.name(),
                    batch_id,
                    current.size()
                );
            }

            // Every step's artifact is on disk; the batch is now committable.
            let rows_committed = current.size() as u64;
            self.frontier
                .advance(batch_id, current.end_row, rows_committed, &self.step_names);
            self.frontier.save(&self.store.frontier_path())?;
            log_metric!(
                "event" = "batch_committed",
                "batch_id" = &batch_id,
                "rows" = &rows_committed
            );
            log::info!("batch {} committed: {}", batch_id, self.frontier);

            batches_this_run += 1;
            batch_id += 1;
        }
        Ok(())
    }

    /// A read-only snapshot of the current frontier.
    pub fn get_frontier(&self) -> Frontier {
        self.frontier.clone()
    }

    /// Deletes all checkpoint artifacts and the persisted frontier record and
    /// resets the in-memory state, forcing full reprocessing on the next
    /// `run`. This is the only operation that deletes checkpoint state, and
    /// the designated operator action after a `FrontierCorruption` error.
    pub fn reset_frontier(&mut self) -> Result<(), TidelineError> {
        self.store.remove_all()?;
        self.frontier = Frontier::new();
        log::info!("frontier reset, all checkpoints cleared");
        Ok(())
    }

    /// Concatenates the last step's checkpoint artifacts for batch ids
    /// `0..=last_completed_batch_id` — a contiguous range, since the frontier
    /// only ever advances one id at a time — into a single combined
    /// `RecordBatch`, in batch-id order.
    pub fn collect_results(&self) -> Result<RecordBatch, TidelineError> {
        let last_id = self
            .frontier
            .last_completed_batch_id
            .ok_or(TidelineError::IncompleteFrontier)?;
        let last_step = self.steps.last().ok_or_else(|| {
            TidelineError::InternalError("pipeline has no steps".to_string())
        })?;

        let mut parts = Vec::with_capacity(last_id as usize + 1);
        for id in 0..=last_id {
            parts.push(self.store.read_artifact(last_step.name(), id)?);
        }
        let schema = parts[0].schema();
        Ok(concat_batches(&schema, &parts)?)
    }
}

//==================================================================================
// 2. Fetch-Contract Validation
//==================================================================================

/// Rejects batches that violate the fetch contract before they enter the step
/// sequence. A fetcher bug surfaced here is far cheaper than the same bug
/// surfaced as a mis-keyed artifact or a wrong watermark.
fn check_fetched(batch: &Batch, requested_id: u64) -> Result<(), TidelineError> {
    if batch.batch_id != requested_id {
        return Err(TidelineError::MalformedBatch(format!(
            "requested batch {} but the fetcher returned batch {}",
            requested_id, batch.batch_id
        )));
    }
    if batch.start_row < 0 {
        return Err(TidelineError::MalformedBatch(format!(
            "batch {} has negative start_row {}",
            batch.batch_id, batch.start_row
        )));
    }
    if batch.end_row != batch.start_row + batch.size() as i64 - 1 {
        return Err(TidelineError::MalformedBatch(format!(
            "batch {} bounds {}-{} do not match its {} rows",
            batch.batch_id, batch.start_row, batch.end_row,
            batch.size()
        )));
    }
    Ok(())
}
