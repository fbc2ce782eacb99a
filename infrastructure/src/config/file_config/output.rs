//! Output configuration from TOML (`[output]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Base directory for run directories (default: current directory)
    pub directory: Option<PathBuf>,
    /// Write a `## Metadata` section into each response file
    pub include_metadata: bool,
    /// Prefix grouped responses' filenames with the group name
    pub group_prefix: bool,
    /// Render the console report as a table
    pub use_table: bool,
    /// Enable colored terminal output
    pub color: bool,
    /// Abort the write phase on the first failed file
    pub throw_on_error: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            include_metadata: true,
            group_prefix: true,
            use_table: false,
            color: true,
            throw_on_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;

    #[test]
    fn test_output_deserialize() {
        let toml_str = r#"
[output]
directory = "responses"
include_metadata = false
use_table = true
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.output.directory.as_deref(),
            Some(std::path::Path::new("responses"))
        );
        assert!(!config.output.include_metadata);
        assert!(config.output.use_table);
        // Untouched fields keep their defaults
        assert!(config.output.color);
        assert!(config.output.group_prefix);
    }
}
