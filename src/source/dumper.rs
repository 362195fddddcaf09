//! Writes raw records to disk so they can be replayed later.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Writes each record to `<directory>/<id>.json` as pretty printed JSON.
#[derive(Debug, Clone)]
pub struct SpondDumper {
    directory: PathBuf,
    written: usize,
}

impl SpondDumper {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            written: 0,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Write one record. A failed write is logged and the record skipped.
    pub fn dump(&mut self, spond: &Value) {
        let Some(id) = spond.get("id").and_then(Value::as_str) else {
            tracing::warn!("Not writing spond without an id");
            return;
        };

        let path = self.directory.join(format!("{}.json", id));
        let result = serde_json::to_string_pretty(spond)
            .map_err(std::io::Error::from)
            .and_then(|body| std::fs::write(&path, body));

        match result {
            Ok(()) => {
                self.written += 1;
                tracing::debug!(file = %path.display(), "Wrote spond");
            }
            Err(e) => tracing::error!(spond_id = id, error = %e, "Error writing spond"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_dump_writes_pretty_json_by_id() {
        let temp_dir = TempDir::new().unwrap();
        let mut dumper = SpondDumper::new(temp_dir.path());
        let spond = json!({"id": "ABC", "heading": "League"});

        dumper.dump(&spond);

        let text = std::fs::read_to_string(temp_dir.path().join("ABC.json")).unwrap();
        assert!(text.contains("\n  \"heading\""));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, spond);
        assert_eq!(dumper.written(), 1);
    }

    #[test]
    fn test_failed_write_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let mut dumper = SpondDumper::new(temp_dir.path().join("missing"));

        dumper.dump(&json!({"id": "ABC"}));
        dumper.dump(&json!({"heading": "no id"}));

        assert_eq!(dumper.written(), 0);
    }
}
