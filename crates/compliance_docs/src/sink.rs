use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Characters that cannot appear in a file name on at least one platform.
const RESERVED_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Delivers a finished export artifact: the "save as file" step.
pub trait FileSink: Send + Sync {
    /// Persist `bytes` under `filename`. Returns the on-disk location when
    /// the sink writes to the filesystem.
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<Option<PathBuf>>;
}

/// Make `base` safe to use as a file name stem.
///
/// Reserved and control characters become `_`, surrounding whitespace and
/// dots are trimmed. An empty result yields `fallback`.
pub fn sanitize_filename(base: &str, fallback: &str) -> String {
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

// ---------------------------------------------------------------------------
// DirectorySink
// ---------------------------------------------------------------------------

/// Writes exports into a directory, the way a browser drops downloads.
///
/// Each file is written to a temporary sibling first and renamed into place,
/// so a failed export never leaves a partial file behind. An existing file of
/// the same name is replaced.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirectorySink {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<Option<PathBuf>> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;

        let target = self.dir.join(filename);
        let mut tmp = tempfile::Builder::new()
            .prefix(".chub-export-")
            .tempfile_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(bytes)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        tmp.flush()?;
        tmp.persist(&target)
            .with_context(|| format!("Failed to move export into place: {}", target.display()))?;

        debug!(
            "Saved {} ({} bytes, {mime}) to {}",
            filename,
            bytes.len(),
            self.dir.display()
        );
        Ok(Some(target))
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// A file handed to a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Keeps saved files in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<SavedFile>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<SavedFile> {
        self.files.lock().clone()
    }

    pub fn last(&self) -> Option<SavedFile> {
        self.files.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

impl FileSink for MemorySink {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<Option<PathBuf>> {
        self.files.lock().push(SavedFile {
            filename: filename.to_string(),
            mime: mime.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(None)
    }
}

impl<S: FileSink + ?Sized> FileSink for &S {
    fn save(&self, bytes: &[u8], filename: &str, mime: &str) -> Result<Option<PathBuf>> {
        (**self).save(bytes, filename, mime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_display_names() {
        assert_eq!(sanitize_filename("SEBI Rules", "export"), "SEBI Rules");
        assert_eq!(sanitize_filename("Fees Collected", "export"), "Fees Collected");
    }

    #[test]
    fn test_sanitize_replaces_separators_and_reserved() {
        assert_eq!(sanitize_filename("../etc/passwd", "export"), "_etc_passwd");
        assert_eq!(sanitize_filename("a:b*c?", "export"), "a_b_c_");
        assert_eq!(sanitize_filename("line\nbreak", "export"), "line_break");
    }

    #[test]
    fn test_sanitize_empty_uses_fallback() {
        assert_eq!(sanitize_filename("", "export"), "export");
        assert_eq!(sanitize_filename("  ..  ", "export"), "export");
    }

    #[test]
    fn test_directory_sink_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("downloads"));
        let path = sink
            .save(b"a,b\n1,2\n", "x.csv", "text/csv;charset=utf-8")
            .unwrap()
            .unwrap();
        assert_eq!(path, tmp.path().join("downloads").join("x.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn test_directory_sink_replaces_existing_and_leaves_no_temp() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        sink.save(b"old", "x.csv", "text/csv").unwrap();
        sink.save(b"new", "x.csv", "text/csv").unwrap();
        assert_eq!(std::fs::read(tmp.path().join("x.csv")).unwrap(), b"new");

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_memory_sink_records_saves() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        let location = sink.save(b"%PDF", "r.pdf", "application/pdf").unwrap();
        assert!(location.is_none());
        assert_eq!(sink.len(), 1);
        let saved = sink.last().unwrap();
        assert_eq!(saved.filename, "r.pdf");
        assert_eq!(saved.mime, "application/pdf");
        assert_eq!(saved.bytes, b"%PDF");
    }
}
