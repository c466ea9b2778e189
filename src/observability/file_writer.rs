//! Size-rotated JSON-lines file writer.
//!
//! Appends one line per write. Before a write that would find the file over
//! its size limit, the file is renamed to a timestamped backup and a fresh
//! file is started; backups beyond the retention count are removed, oldest
//! first.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

/// When to rotate and how many backups to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Size in bytes above which the file is rotated before the next write.
    pub max_bytes: u64,
    /// Number of rotated backups retained.
    pub backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            backups: 3,
        }
    }
}

/// Thread-safe rotating line writer.
///
/// The file is opened lazily on the first write. Backups are named
/// `<stem>.<UTC timestamp>-<seq>.<ext>`, so lexical order is age order.
pub struct FileWriter {
    path: PathBuf,
    policy: RotationPolicy,
    file: Mutex<Option<File>>,
    rotations: AtomicU32,
}

impl FileWriter {
    /// Creates a writer for `path`. Nothing is opened yet.
    pub const fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            path,
            policy,
            file: Mutex::new(None),
            rotations: AtomicU32::new(0),
        }
    }

    /// Appends `line` plus a newline, rotating first if needed.
    ///
    /// # Errors
    ///
    /// Fails if rotating, opening, writing, or flushing the file fails.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        if self.needs_rotation() {
            *file = None;
            self.rotate()?;
        }

        if file.is_none() {
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?,
            );
        }
        let Some(handle) = file.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "trace file unavailable"));
        };

        writeln!(handle, "{line}")?;
        handle.flush()
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|meta| meta.len() > self.policy.max_bytes)
    }

    fn rotate(&self) -> io::Result<()> {
        let seq = self.rotations.fetch_add(1, Ordering::Relaxed);
        let stamp = format!("{}-{seq:04}", Utc::now().format("%Y%m%dT%H%M%S%.6f"));
        let backup = self.backup_path(&stamp);
        fs::rename(&self.path, &backup)?;
        self.prune_backups()
    }

    fn backup_path(&self, stamp: &str) -> PathBuf {
        let stem = self.stem();
        let name = match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{stem}.{stamp}.{ext}"),
            None => format!("{stem}.{stamp}"),
        };
        self.path.with_file_name(name)
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string()
    }

    fn prune_backups(&self) -> io::Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let prefix = format!("{}.", self.stem());
        let current = self.path.file_name();

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.file_name() != current)
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();

        backups.sort();
        let excess = backups.len().saturating_sub(self.policy.backups);
        for old in backups.into_iter().take(excess) {
            if let Err(e) = fs::remove_file(&old) {
                tracing::debug!(path = ?old, error = %e, "failed to remove old trace backup");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let writer = FileWriter::new(path.clone(), RotationPolicy::default());

        writer.write_line("{\"a\":1}").unwrap();
        writer.write_line("{\"b\":2}").unwrap();

        assert_eq!(fs::read_to_string(path).unwrap(), "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn rotates_and_keeps_bounded_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let writer = FileWriter::new(
            path.clone(),
            RotationPolicy {
                max_bytes: 4,
                backups: 2,
            },
        );

        for i in 0..6 {
            writer.write_line(&format!("line-{i}")).unwrap();
        }

        let names = files_in(dir.path());
        assert_eq!(names.len(), 3, "current file plus two backups: {names:?}");
        assert!(names.contains(&"spans.jsonl".to_string()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "line-5\n");
        assert!(names
            .iter()
            .filter(|n| n.as_str() != "spans.jsonl")
            .all(|n| n.starts_with("spans.") && n.ends_with(".jsonl")));
    }
}
