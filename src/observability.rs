//! This module provides observability hooks for the pipeline run loop.
//!
//! A restartable system needs visibility into its commit decisions. This module
//! provides structured logging hooks to make the orchestrator's progress
//! transparent and debuggable. The `log_metric!` macro is the primary tool; the
//! `init_logging` helper wires the `log` facade to `env_logger` for binaries,
//! benches, and tests that want human-readable output.

/// Logs a structured key-value metric string to stdout, only in debug builds.
///
/// # Example
/// ```
/// use tideline::log_metric;
/// let batch_id = 4u64;
/// log_metric!("event"="batch_committed", "batch_id"=&batch_id);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            // Collect each pair as a JSON string fragment
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+

            let output = format!("TIDELINE_METRIC: {{ {} }}", parts.join(", "));
            println!("{}", output);
        }
    };
}

/// Installs an `env_logger` backend for the `log` facade.
///
/// `verbose` lowers the default filter to `debug`; either way `RUST_LOG`
/// still wins if set. Safe to call more than once: subsequent calls are no-ops.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    builder.parse_default_env();
    let _ = builder.try_init();
}
