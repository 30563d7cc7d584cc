//! Destinations for exported artifacts.
//!
//! A sink performs the "download" side effect of an export. Sinks either
//! deliver a complete artifact or fail; no partially written artifact may
//! remain observable after a failure.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::Result;

use super::Payload;

/// A named, fully encoded export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name including extension
    pub filename: String,

    /// Encoded content
    pub payload: Payload,
}

/// Trait for artifact destinations.
pub trait Sink: Send + Sync {
    /// Deliver an artifact.
    fn deliver(&self, artifact: &Artifact) -> Result<()>;
}

/// Sink that discards artifacts. Used when only the payload is wanted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn deliver(&self, _artifact: &Artifact) -> Result<()> {
        Ok(())
    }
}

/// Sink that keeps artifacts in memory.
///
/// Clones share the same storage, so a clone can be handed to an exporter
/// and inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Arc<Mutex<Vec<Artifact>>>,
}

impl MemorySink {
    /// Create an empty memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of delivered artifacts, in delivery order.
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Find a delivered artifact by file name.
    pub fn get(&self, filename: &str) -> Option<Artifact> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|a| a.filename == filename)
            .cloned()
    }

    /// Number of delivered artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Check if nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for MemorySink {
    fn deliver(&self, artifact: &Artifact) -> Result<()> {
        self.artifacts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(artifact.clone());
        Ok(())
    }
}

/// Sink that writes artifacts into a directory.
///
/// Content is written to a hidden `.part` file first and renamed into
/// place once complete; the partial file is removed if any step fails.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Create a sink writing into `dir`. The directory is created on first
    /// delivery if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of an artifact with the given file name.
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

impl Sink for FileSink {
    fn deliver(&self, artifact: &Artifact) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(&artifact.filename);
        let partial = self.dir.join(format!(".{}.part", artifact.filename));

        let guard = PartialFile::new(&partial);
        fs::write(&partial, &artifact.payload.bytes)?;
        fs::rename(&partial, &target)?;
        guard.disarm();

        log::debug!(
            "Wrote {} ({} bytes)",
            target.display(),
            artifact.payload.len()
        );
        Ok(())
    }
}

/// Removes a partially written file unless disarmed.
struct PartialFile<'a> {
    path: &'a Path,
    armed: bool,
}

impl<'a> PartialFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if self.armed && self.path.exists() {
            if let Err(e) = fs::remove_file(self.path) {
                log::warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}
