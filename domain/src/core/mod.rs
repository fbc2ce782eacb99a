//! Core domain concepts shared across all subdomains.
//!
//! - [`target::ModelTarget`]: a provider + model pairing selected for a run
//! - [`timing::Timing`]: start/end/duration of a run phase
//! - [`string`]: truncation and filename sanitization helpers

pub mod string;
pub mod target;
pub mod timing;
