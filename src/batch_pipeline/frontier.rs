// In: src/batch_pipeline/frontier.rs

//! The durable progress watermark for a batch pipeline.
//!
//! The `Frontier` records the most recently fully-committed batch and the
//! aggregate counters, and owns its own JSON persistence. The only writer is
//! the orchestrator's advance path, invoked exactly once per fully-committed
//! batch; `save` uses a write-to-temporary-then-atomic-rename pattern so a
//! crash mid-write can never leave a partially written, unreadable frontier.
//! A half-written frontier would make resume impossible or could silently
//! regress progress, which is why corruption is fatal rather than repaired.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TidelineError;

/// The persisted frontier record.
///
/// `step_states` maps each step name to the last batch id that step completed.
/// Under the commit protocol every entry is always equal to
/// `last_completed_batch_id`; the map is retained (rather than collapsed to a
/// scalar) so that steps could later commit independently, and so `load` has a
/// cheap integrity check on the record it reads back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Frontier {
    /// `None` until the first batch commits.
    pub last_completed_batch_id: Option<u64>,
    /// Inclusive end row of the last committed batch; -1 before any commit
    /// (and for an empty first batch).
    pub last_completed_row: i64,
    /// Sum of the sizes of every committed batch.
    pub total_rows_processed: u64,
    /// Step name -> last batch id completed by that step. BTreeMap keeps the
    /// serialized record deterministic.
    pub step_states: BTreeMap<String, u64>,
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

impl Frontier {
    /// A frontier with no committed work. `last_completed_row` starts at -1 so
    /// the first committed batch's `end_row` (0-based) slots in naturally.
    pub fn new() -> Self {
        Self {
            last_completed_batch_id: None,
            last_completed_row: -1,
            total_rows_processed: 0,
            step_states: BTreeMap::new(),
        }
    }

    /// Advances the watermark after every step has durably persisted its
    /// checkpoint artifact for `batch_id`. This is the single mutation point
    /// for frontier state.
    pub fn advance(
        &mut self,
        batch_id: u64,
        end_row: i64,
        rows_committed: u64,
        step_names: &[String],
    ) {
        self.last_completed_batch_id = Some(batch_id);
        self.last_completed_row = end_row;
        self.total_rows_processed += rows_committed;
        for name in step_names {
            self.step_states.insert(name.clone(), batch_id);
        }
    }

    /// The resume entry point: the id of the next batch to fetch.
    pub fn next_batch_id(&self) -> u64 {
        self.last_completed_batch_id.map_or(0, |id| id + 1)
    }

    /// Reads persisted state from `path`.
    ///
    /// A missing file is the bootstrap case and yields a fresh empty frontier.
    /// Content that is present but unparsable, ill-typed, or inconsistent with
    /// the commit protocol yields `FrontierCorruption`.
    pub fn load(path: &Path) -> Result<Self, TidelineError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(TidelineError::Io(e)),
        };

        let frontier: Frontier = serde_json::from_str(&raw).map_err(|e| {
            TidelineError::FrontierCorruption(format!(
                "unparsable frontier record at {}: {}",
                path.display(),
                e
            ))
        })?;
        frontier.check_integrity(path)?;
        Ok(frontier)
    }

    /// Serializes the current state and writes it durably: the record is
    /// written to a sibling temporary file, flushed to disk, then renamed over
    /// `path` so readers only ever observe a complete record.
    pub fn save(&self, path: &Path) -> Result<(), TidelineError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(serde_json::to_string_pretty(self)?.as_bytes())?;
            // Flush before the rename so the swap never publishes a partial file.
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        log::debug!("frontier saved: {}", self);
        Ok(())
    }

    /// Schema checks beyond what serde typing gives us: the lockstep invariant
    /// between `step_states` and `last_completed_batch_id`, and counter sanity
    /// for the never-committed case.
    fn check_integrity(&self, path: &Path) -> Result<(), TidelineError> {
        let corrupt = |detail: String| {
            Err(TidelineError::FrontierCorruption(format!(
                "{} at {}",
                detail,
                path.display()
            )))
        };

        if self.last_completed_row < -1 {
            return corrupt(format!(
                "last_completed_row {} is below -1",
                self.last_completed_row
            ));
        }
        match self.last_completed_batch_id {
            Some(last) => {
                for (step, &batch_id) in &self.step_states {
                    if batch_id != last {
                        return corrupt(format!(
                            "step '{}' is at batch {} but the frontier is at batch {}",
                            step, batch_id, last
                        ));
                    }
                }
            }
            None => {
                if !self.step_states.is_empty()
                    || self.total_rows_processed != 0
                    || self.last_completed_row != -1
                {
                    return corrupt(
                        "frontier has no committed batch but carries progress state".to_string(),
                    );
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Frontier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_completed_batch_id {
            Some(id) => write!(
                f,
                "Frontier(batch_id={}, row={}, processed={})",
                id, self.last_completed_row, self.total_rows_processed
            ),
            None => write!(f, "Frontier(empty)"),
        }
    }
}

//==================================================================================
// Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn step_names(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_frontier_starts_at_batch_zero() {
        let frontier = Frontier::new();
        assert_eq!(frontier.last_completed_batch_id, None);
        assert_eq!(frontier.last_completed_row, -1);
        assert_eq!(frontier.total_rows_processed, 0);
        assert_eq!(frontier.next_batch_id(), 0);
    }

    #[test]
    fn test_advance_moves_watermark_and_step_states_in_lockstep() {
        let mut frontier = Frontier::new();
        let names = step_names(&["drop_nulls", "filter"]);

        frontier.advance(0, 49, 50, &names);
        assert_eq!(frontier.last_completed_batch_id, Some(0));
        assert_eq!(frontier.last_completed_row, 49);
        assert_eq!(frontier.total_rows_processed, 50);

        frontier.advance(1, 97, 48, &names);
        assert_eq!(frontier.last_completed_batch_id, Some(1));
        assert_eq!(frontier.total_rows_processed, 98);
        assert_eq!(frontier.next_batch_id(), 2);
        assert!(frontier.step_states.values().all(|&id| id == 1));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontier.json");

        let mut frontier = Frontier::new();
        frontier.advance(2, 99, 100, &step_names(&["step1"]));
        frontier.save(&path).unwrap();

        let loaded = Frontier::load(&path).unwrap();
        assert_eq!(loaded, frontier);
        assert_eq!(loaded.step_states["step1"], 2);
    }

    #[test]
    fn test_save_leaves_no_temporary_residue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontier.json");
        Frontier::new().save(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_load_missing_file_bootstraps_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Frontier::load(&dir.path().join("frontier.json")).unwrap();
        assert_eq!(loaded, Frontier::new());
    }

    #[test]
    fn test_load_rejects_unparsable_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontier.json");
        fs::write(&path, "{ this is not json").unwrap();

        assert!(matches!(
            Frontier::load(&path),
            Err(TidelineError::FrontierCorruption(_))
        ));
    }

    #[test]
    fn test_load_rejects_ill_typed_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontier.json");
        fs::write(
            &path,
            r#"{ "last_completed_batch_id": "two", "last_completed_row": 0,
                "total_rows_processed": 0, "step_states": {} }"#,
        )
        .unwrap();

        assert!(matches!(
            Frontier::load(&path),
            Err(TidelineError::FrontierCorruption(_))
        ));
    }

    #[test]
    fn test_load_rejects_step_state_out_of_lockstep() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontier.json");
        fs::write(
            &path,
            r#"{ "last_completed_batch_id": 3, "last_completed_row": 39,
                "total_rows_processed": 40, "step_states": { "step1": 2 } }"#,
        )
        .unwrap();

        assert!(matches!(
            Frontier::load(&path),
            Err(TidelineError::FrontierCorruption(_))
        ));
    }

    #[test]
    fn test_load_rejects_progress_without_committed_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frontier.json");
        fs::write(
            &path,
            r#"{ "last_completed_batch_id": null, "last_completed_row": -1,
                "total_rows_processed": 10, "step_states": {} }"#,
        )
        .unwrap();

        assert!(matches!(
            Frontier::load(&path),
            Err(TidelineError::FrontierCorruption(_))
        ));
    }
}
