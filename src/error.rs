// In: src/error.rs

//! This module defines the single, unified error type for the entire tideline library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TidelineError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// Raised at pipeline construction, before any I/O occurs.
    #[error("Invalid pipeline configuration: {0}")]
    Configuration(String),

    /// The fetcher failed, or handed back a batch that violates the fetch
    /// contract. Aborts the current run; the frontier stays where it was.
    #[error("Fetching batch {batch_id} failed: {source}")]
    Fetch {
        batch_id: u64,
        #[source]
        source: Box<TidelineError>,
    },

    /// Detail carried inside `Fetch` when the fetcher returned a batch that
    /// does not match the requested id or whose row bounds are inconsistent.
    #[error("Fetcher returned a malformed batch: {0}")]
    MalformedBatch(String),

    /// A step failed while processing (or persisting its output for) a batch.
    /// The failing batch id and step name tell the operator exactly which
    /// boundary a subsequent resume will restart from.
    #[error("Step '{step}' failed on batch {batch_id}: {source}")]
    Step {
        step: String,
        batch_id: u64,
        #[source]
        source: Box<TidelineError>,
    },

    /// The persisted frontier exists but is unreadable or fails schema checks.
    /// Always fatal: requires `reset_frontier()` or manual repair, never
    /// auto-repaired.
    #[error("Frontier state is corrupt: {0}")]
    FrontierCorruption(String),

    /// `collect_results` was called before any batch ever committed.
    #[error("No batch has completed yet; there are no results to collect")]
    IncompleteFrontier,

    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    #[error("Column '{0}' not found in batch schema")]
    ColumnNotFound(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem (e.g. file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically during config parsing.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}
