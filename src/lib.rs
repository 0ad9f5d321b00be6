//! This file is the root of the `tideline` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`batch_pipeline`,
//!     `steps`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the small public API surface that callers compose a
//!     pipeline from.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod batch_pipeline;
pub mod config;
pub mod error;
pub mod fetch;
pub mod steps;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use batch_pipeline::{Batch, BatchFetcher, BatchStep, Frontier, Pipeline};
pub use config::{ArtifactCompression, TidelineConfig};
pub use error::TidelineError;
