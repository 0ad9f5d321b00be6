// In: src/config.rs

//! The single source of truth for all tideline pipeline configuration.
//!
//! This module defines the unified `TidelineConfig` struct, which is designed to
//! be created once at the application boundary (e.g. from a user's YAML/JSON
//! file or constructed in code) and handed to the `Pipeline` at construction.
//!
//! Centralizing all settings here keeps the orchestrator free of ad-hoc
//! parameters and gives every knob a serde-backed default.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::TidelineError;

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// Defines how checkpoint artifacts are compressed on disk.
///
/// Artifacts are Arrow IPC files either way; this only selects the IPC buffer
/// codec. `Zstd` is the default: artifacts are written once per (step, batch)
/// and re-read only by `collect_results`, so the write-side cost is paid rarely.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCompression {
    /// Uncompressed IPC buffers. Fastest to write, largest on disk.
    None,

    /// **Default:** Zstandard-compressed IPC buffers.
    #[default]
    Zstd,
}

//==================================================================================
// II. The Unified TidelineConfig
//==================================================================================

/// The single, unified configuration for a batch pipeline.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct TidelineConfig {
    /// **The number of rows requested per batch.** The fetcher receives this
    /// value verbatim on every `fetch` call; the final batch of a source is
    /// usually shorter.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Directory holding the frontier record and all checkpoint artifacts.
    /// A `Pipeline` instance assumes exclusive ownership of this directory.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,

    /// Compression applied to checkpoint artifacts.
    #[serde(default)]
    pub artifact_compression: ArtifactCompression,
}

impl TidelineConfig {
    /// Convenience constructor for the common case: everything defaulted
    /// except the checkpoint directory.
    pub fn with_checkpoint_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            checkpoint_dir: dir.into(),
            ..Self::default()
        }
    }

    /// Validates settings that would otherwise fail deep inside the run loop.
    /// Called by `Pipeline::new` before any I/O occurs.
    pub fn validate(&self) -> Result<(), TidelineError> {
        if self.batch_size == 0 {
            return Err(TidelineError::Configuration(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// Default implementation to make constructing the config easier.
impl Default for TidelineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            checkpoint_dir: default_checkpoint_dir(),
            artifact_compression: ArtifactCompression::default(),
        }
    }
}

/// Helper for `serde` to provide a default for `batch_size`.
fn default_batch_size() -> usize {
    50_000
}

/// Helper for `serde` to provide a default for `checkpoint_dir`.
fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("./batch_checkpoints")
}

//==================================================================================
// Unit Tests
//==================================================================================
