// In: src/batch_pipeline/artifact.rs

//! The on-disk checkpoint store: one Arrow IPC file per (step name, batch id).
//!
//! This module is the single source of truth for artifact paths and for
//! serialization. Each artifact serves two purposes: crash-recovery evidence
//! that a step finished a batch, and raw material for reassembling final
//! results. The columnar IPC format keeps per-batch rewrites cheap and makes
//! `collect_results` a fast multi-file concatenation.

use std::fs;
use std::path::{Path, PathBuf};

use arrow::compute::concat_batches;
use arrow::ipc::reader::FileReader;
use arrow::ipc::writer::{FileWriter, IpcWriteOptions};
use arrow::ipc::CompressionType;
use arrow::record_batch::RecordBatch;

use crate::batch_pipeline::batch::Batch;
use crate::config::ArtifactCompression;
use crate::error::TidelineError;

/// File name of the frontier record inside the checkpoint directory.
const FRONTIER_FILE: &str = "frontier.json";
/// Extension shared by every checkpoint artifact.
const ARTIFACT_EXT: &str = "arrow";

/// Owns the checkpoint directory layout. Constructed once per `Pipeline`,
/// which assumes exclusive ownership of the directory.
#[derive(Debug)]
pub(crate) struct CheckpointStore {
    dir: PathBuf,
    compression: ArtifactCompression,
}

impl CheckpointStore {
    pub(crate) fn new(
        dir: &Path,
        compression: ArtifactCompression,
    ) -> Result<Self, TidelineError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            compression,
        })
    }

    /// Path of the persisted frontier record.
    pub(crate) fn frontier_path(&self) -> PathBuf {
        self.dir.join(FRONTIER_FILE)
    }

    /// Deterministic artifact path for a (step name, batch id) pair. The
    /// double underscore keeps step name and batch id visually separable;
    /// uniqueness is guaranteed by the orchestrator's duplicate-name check.
    pub(crate) fn artifact_path(&self, step_name: &str, batch_id: u64) -> PathBuf {
        self.dir
            .join(format!("{}__batch_{}.{}", step_name, batch_id, ARTIFACT_EXT))
    }

    /// Persists one step's output for one batch, overwriting any stale
    /// artifact left behind by a previously failed attempt. The file is
    /// fsynced before returning: the frontier may only advance over artifacts
    /// that are actually on disk.
    pub(crate) fn write_artifact(
        &self,
        step_name: &str,
        batch: &Batch,
    ) -> Result<(), TidelineError> {
        let options = match self.compression {
            ArtifactCompression::None => IpcWriteOptions::default(),
            ArtifactCompression::Zstd => {
                IpcWriteOptions::default().try_with_compression(Some(CompressionType::ZSTD))?
            }
        };

        let path = self.artifact_path(step_name, batch.batch_id);
        let file = fs::File::create(&path)?;
        let schema = batch.data.schema();
        let mut writer = FileWriter::try_new_with_options(file, schema.as_ref(), options)?;
        writer.write(&batch.data)?;
        writer.finish()?;
        writer.into_inner()?.sync_all()?;

        log::debug!(
            "artifact written: {} ({} rows)",
            path.display(),
            batch.size()
        );
        Ok(())
    }

    /// Reads one step's artifact for one batch back into memory.
    ///
    /// A missing artifact inside the committed range means the checkpoint
    /// directory no longer matches the frontier, which is the same class of
    /// unrecoverable state damage as a corrupt frontier record.
    pub(crate) fn read_artifact(
        &self,
        step_name: &str,
        batch_id: u64,
    ) -> Result<RecordBatch, TidelineError> {
        let path = self.artifact_path(step_name, batch_id);
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TidelineError::FrontierCorruption(format!(
                    "checkpoint artifact missing for committed batch: {}",
                    path.display()
                )))
            }
            Err(e) => return Err(TidelineError::Io(e)),
        };

        let reader = FileReader::try_new(file, None)?;
        let schema = reader.schema();
        let mut batches = Vec::new();
        for batch in reader {
            batches.push(batch?);
        }
        Ok(concat_batches(&schema, &batches)?)
    }

    /// Deletes every checkpoint artifact plus the frontier record (and any
    /// orphaned temporary from an interrupted save). Used by `reset_frontier`.
    pub(crate) fn remove_all(&self) -> Result<(), TidelineError> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_artifact = path
                .extension()
                .map_or(false, |ext| ext == ARTIFACT_EXT);
            let is_frontier = path
                .file_name()
                .map_or(false, |name| name == FRONTIER_FILE || name == "frontier.json.tmp");
            if is_artifact || is_frontier {
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
