//! Replays raw records previously dumped to a directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;

use crate::errors::AppError;

/// Restartable iterator over the JSON files of a directory, oldest file first.
///
/// A clone taken before iterating replays the same files again.
///
/// Files are ordered by creation time; filesystems without a birth time fall back to
/// the modification time. Ties keep no particular order.
#[derive(Debug, Clone)]
pub struct DirectoryReplay {
    files: Vec<PathBuf>,
    position: usize,
}

impl DirectoryReplay {
    /// List and sort the directory's regular files. Nothing is read yet.
    pub fn open(dir: &Path) -> Result<Self, AppError> {
        let mut candidates: Vec<(PathBuf, SystemTime)> = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let created = metadata.created().or_else(|_| metadata.modified())?;
            candidates.push((entry.path(), created));
        }

        candidates.sort_by(|(_, a), (_, b)| a.cmp(b));

        tracing::info!(
            directory = %dir.display(),
            files = candidates.len(),
            "Replaying sponds from directory"
        );

        Ok(Self {
            files: candidates.into_iter().map(|(path, _)| path).collect(),
            position: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn read(path: &Path) -> Result<Value, AppError> {
        let text = fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| AppError::Json(format!("Failed to parse {}: {}", path.display(), e)))
    }
}

impl Iterator for DirectoryReplay {
    type Item = Result<Value, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        let path = self.files.get(self.position)?;
        self.position += 1;
        tracing::debug!(file = %path.display(), "Reading spond");
        Some(Self::read(path))
    }
}
