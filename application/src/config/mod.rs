//! Application-level configuration.
//!
//! - [`ExecutionParams`]: dispatch control (concurrency limit, call timeout)

pub mod execution_params;

pub use execution_params::ExecutionParams;
