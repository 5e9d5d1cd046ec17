//! Loading the collection to page through.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Load items from `path`.
///
/// A file holding a JSON array yields one item per element (strings as-is,
/// anything else as compact JSON). Any other file yields one item per line.
pub fn load_items(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let items = parse_items(&contents);
    debug!("Loaded {} items from {}", items.len(), path.display());
    Ok(items)
}

pub fn parse_items(contents: &str) -> Vec<String> {
    match serde_json::from_str::<Value>(contents) {
        Ok(Value::Array(values)) => values.into_iter().map(render_value).collect(),
        _ => contents.lines().map(str::to_string).collect(),
    }
}

fn render_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_json_array() {
        let items = parse_items(r#"["a", 1, {"k": true}]"#);
        assert_eq!(items, vec!["a", "1", r#"{"k":true}"#]);
    }

    #[test]
    fn test_parse_lines() {
        let items = parse_items("one\ntwo\nthree\n");
        assert_eq!(items, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_json_object_treated_as_text() {
        let items = parse_items("{\"a\": 1}");
        assert_eq!(items, vec!["{\"a\": 1}"]);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_items(&temp_dir.path().join("missing.txt")).is_err());
    }
}
