//! File-backed run source reading a JSON run dump.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::TextRun;

use super::{into_stream, RunSource, RunStream};

/// [`RunSource`] that reads a JSON array of runs from disk on every read.
///
/// The file is the hand-off point with an external decoder. It is re-read on
/// each call rather than cached, so every scan sees its own snapshot.
#[derive(Debug, Clone)]
pub struct JsonRunSource {
    path: PathBuf,
    name: String,
}

impl JsonRunSource {
    /// Create a source for the given file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }

    /// Path of the run dump.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> Error {
        Error::DocumentUnavailable(format!("{}: {}", self.name, reason))
    }
}

impl RunSource for JsonRunSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_runs(&self) -> Result<RunStream> {
        let data = fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;
        let runs: Vec<TextRun> = serde_json::from_str(&data).map_err(|e| self.unavailable(e))?;
        log::debug!("Read {} runs from {}", runs.len(), self.name);
        Ok(into_stream(runs))
    }
}
