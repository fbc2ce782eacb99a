//! Output subdomain - in-memory file artifacts and the write ledger.

pub mod artifact;
pub mod write;
