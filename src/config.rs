// ABOUTME: Parses optional TOML filter configuration files
// ABOUTME: Supplies include/exclude/exclude-data lists merged with CLI flags

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Filter lists loaded from a TOML file. Every field is optional; entries
/// are appended to the corresponding command-line lists.
///
/// ```toml
/// include = ["users", "orders"]
/// exclude = ["sessions"]
/// exclude-data = ["audit_log"]
/// ```
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(rename = "exclude-data", default)]
    pub exclude_data: Vec<String>,
}

pub fn load_filter_config(path: &Path) -> Result<FilterConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read filter config at {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("Failed to parse TOML filter config at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_all_three_lists() {
        let file = write_config(
            r#"
include = ["users", "orders"]
exclude = ["sessions"]
exclude-data = ["audit_log"]
"#,
        );
        let config = load_filter_config(file.path()).unwrap();
        assert_eq!(config.include, vec!["users", "orders"]);
        assert_eq!(config.exclude, vec!["sessions"]);
        assert_eq!(config.exclude_data, vec!["audit_log"]);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let file = write_config("include = [\"users\"]\n");
        let config = load_filter_config(file.path()).unwrap();
        assert_eq!(config.include, vec!["users"]);
        assert!(config.exclude.is_empty());
        assert!(config.exclude_data.is_empty());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let file = write_config("tables = [\"users\"]\n");
        let err = load_filter_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse TOML filter config"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = load_filter_config(Path::new("/nonexistent/filters.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read filter config"));
    }
}
