//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod api_keys;
pub mod context_loader;
pub mod file_system;
pub mod llm_gateway;
pub mod progress;
