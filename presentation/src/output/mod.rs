//! Output processing and formatting
//!
//! Everything here is pure: responses in, strings and artifacts out.

pub mod console;
pub mod error;
pub mod filename;
pub mod markdown;
pub mod processor;
pub mod summary;

mod style;

pub use style::Palette;
