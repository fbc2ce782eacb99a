//! Query subdomain - per-target status ledger, responses and run results.

pub mod response;
pub mod run;
pub mod status;
