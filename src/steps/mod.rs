//! Concrete `BatchStep` implementations.
//!
//! These are the built-in transformations; anything with a name and a
//! contract-abiding `process` can join a pipeline, and domain-specific steps
//! are expected to live in the caller's crate. Each built-in is a thin,
//! deterministic wrapper over an Arrow compute kernel, which is what makes the
//! re-run-from-scratch recovery model safe to apply to them.

//==================================================================================
// 1. Module Declarations
//==================================================================================

mod derive_column;
mod drop_nulls;
mod filter;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use self::derive_column::DeriveColumnStep;
pub use self::drop_nulls::DropNullsStep;
pub use self::filter::ThresholdFilterStep;
