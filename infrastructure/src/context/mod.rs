//! Context loading infrastructure
//!
//! - [`LocalContextLoader`] - Reads `--context` files from the local file system
//!
//! [`ContextLoaderPort`]: prism_application::ContextLoaderPort

mod loader;

pub use loader::LocalContextLoader;
