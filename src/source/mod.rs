//! Run stream provider abstraction.
//!
//! Decoding a binary document into styled runs happens outside this crate.
//! A [`RunSource`] hands out ordered, immutable snapshots of those runs;
//! every reader iterates its own snapshot, so scans never share a cursor.

mod builder;
mod json;

pub use builder::RunStreamBuilder;
pub use json::JsonRunSource;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::TextRun;

/// An ordered, read-only snapshot of a document's runs.
pub type RunStream = Arc<[TextRun]>;

/// Abstract interface for run stream providers.
///
/// Implementations must return the same runs, in the same order, on every
/// read of an unmodified document.
pub trait RunSource: Send + Sync {
    /// Short name used in log lines and errors.
    fn name(&self) -> &str;

    /// Read the document's runs, ordered by [`TextRun::order`].
    ///
    /// Failures are reported as [`Error::DocumentUnavailable`].
    fn read_runs(&self) -> Result<RunStream>;
}

/// Put runs into document order.
///
/// The sort is stable, so providers that leave `order` at zero keep their
/// emission order.
pub(crate) fn into_stream(mut runs: Vec<TextRun>) -> RunStream {
    runs.sort_by_key(|r| r.order);
    runs.into()
}

/// In-memory [`RunSource`] over an already decoded run stream.
#[derive(Debug, Clone)]
pub struct MemoryRunSource {
    name: String,
    runs: RunStream,
}

impl MemoryRunSource {
    /// Create a source from runs. Runs are sorted by their ordering key.
    pub fn new(name: impl Into<String>, runs: Vec<TextRun>) -> Self {
        Self {
            name: name.into(),
            runs: into_stream(runs),
        }
    }

    /// Parse a JSON array of runs.
    pub fn from_json(name: impl Into<String>, json: &str) -> Result<Self> {
        let name = name.into();
        let runs: Vec<TextRun> = serde_json::from_str(json)
            .map_err(|e| Error::DocumentUnavailable(format!("{}: {}", name, e)))?;
        Ok(Self::new(name, runs))
    }

    /// Number of runs held.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Check if the source holds no runs.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

impl RunSource for MemoryRunSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_runs(&self) -> Result<RunStream> {
        Ok(Arc::clone(&self.runs))
    }
}
