//! Loaded documents and their cached heading indices.
//!
//! A [`DocumentIndex`] pairs a run source with the heading index built from
//! it at load time. The index is immutable and shared through an `Arc`, so
//! any number of readers can ask for suggestions without locking. Sections
//! are extracted on demand from a fresh snapshot and never cached.
//!
//! # Example
//!
//! ```
//! use docsect::index::DocumentCatalog;
//! use docsect::source::RunStreamBuilder;
//! use docsect::StructureOptions;
//! use std::sync::Arc;
//!
//! let source = RunStreamBuilder::new()
//!     .line("Movement", 30.0, "Arial-Bold")
//!     .line("Walk slowly.", 11.0, "Times")
//!     .into_source("rules");
//!
//! let catalog = DocumentCatalog::new(StructureOptions::default());
//! catalog.load("rules", Arc::new(source)).unwrap();
//!
//! let doc = catalog.get("rules").unwrap();
//! assert_eq!(doc.suggestions("move", 25), vec!["Movement"]);
//! assert_eq!(doc.section("Movement").unwrap().body, "Walk slowly.");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{HeadingIndex, Section};
use crate::source::RunSource;
use crate::structure::{HeadingIndexBuilder, SectionExtractor, StructureOptions};

/// A document handle with its heading index cached.
pub struct DocumentIndex {
    id: String,
    source: Arc<dyn RunSource>,
    options: StructureOptions,
    headings: Arc<HeadingIndex>,
    extractor: SectionExtractor,
    loaded_at: DateTime<Utc>,
}

impl DocumentIndex {
    /// Load a document, surfacing provider failures.
    pub fn try_load(
        id: impl Into<String>,
        source: Arc<dyn RunSource>,
        options: StructureOptions,
    ) -> Result<Self> {
        let id = id.into();
        let headings = HeadingIndexBuilder::new(&options).try_build_from(source.as_ref())?;
        log::debug!("Loaded {} with {} headings", id, headings.len());

        Ok(Self {
            extractor: SectionExtractor::new(&options),
            id,
            source,
            options,
            headings: Arc::new(headings),
            loaded_at: Utc::now(),
        })
    }

    /// Load a document. An unavailable document is logged and gets an empty
    /// heading index.
    pub fn load(
        id: impl Into<String>,
        source: Arc<dyn RunSource>,
        options: StructureOptions,
    ) -> Self {
        let id = id.into();
        let headings = HeadingIndexBuilder::new(&options).build_from(source.as_ref());
        Self {
            extractor: SectionExtractor::new(&options),
            id,
            source,
            options,
            headings: Arc::new(headings),
            loaded_at: Utc::now(),
        }
    }

    /// Document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Options the index was built with.
    pub fn options(&self) -> &StructureOptions {
        &self.options
    }

    /// Underlying run source.
    pub fn source(&self) -> &Arc<dyn RunSource> {
        &self.source
    }

    /// When the heading index was built.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Heading index.
    pub fn headings(&self) -> &HeadingIndex {
        &self.headings
    }

    /// Shared handle to the heading index.
    pub fn shared_headings(&self) -> Arc<HeadingIndex> {
        Arc::clone(&self.headings)
    }

    /// Sorted titles containing `query`, case-insensitively, at most `limit`.
    pub fn suggestions(&self, query: &str, limit: usize) -> Vec<String> {
        self.headings
            .matching(query, limit)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Extract a section. Provider failures are logged and read as not found.
    pub fn section(&self, title: &str) -> Option<Section> {
        self.extractor.extract_from(self.source.as_ref(), title)
    }

    /// Extract a section, surfacing provider failures.
    pub fn try_section(&self, title: &str) -> Result<Option<Section>> {
        self.extractor.try_extract_from(self.source.as_ref(), title)
    }

    /// Extract a section with different font parameters than the index.
    pub fn section_with(&self, title: &str, options: &StructureOptions) -> Option<Section> {
        SectionExtractor::new(options).extract_from(self.source.as_ref(), title)
    }
}

impl std::fmt::Debug for DocumentIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndex")
            .field("id", &self.id)
            .field("source", &self.source.name())
            .field("headings", &self.headings.len())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

/// Catalog of loaded documents keyed by identifier.
pub struct DocumentCatalog {
    options: StructureOptions,
    documents: RwLock<HashMap<String, Arc<DocumentIndex>>>,
}

impl DocumentCatalog {
    /// Create an empty catalog. Documents are loaded with `options`.
    pub fn new(options: StructureOptions) -> Self {
        Self {
            options,
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Options used for loading.
    pub fn options(&self) -> &StructureOptions {
        &self.options
    }

    /// Register an already loaded document, replacing any previous one.
    pub fn insert(&self, document: DocumentIndex) -> Result<Arc<DocumentIndex>> {
        let document = Arc::new(document);
        self.documents
            .write()
            .map_err(|_| poisoned())?
            .insert(document.id().to_string(), Arc::clone(&document));
        Ok(document)
    }

    /// Load a document and register it.
    pub fn load(&self, id: &str, source: Arc<dyn RunSource>) -> Result<Arc<DocumentIndex>> {
        let document = DocumentIndex::try_load(id, source, self.options.clone())?;
        self.insert(document)
    }

    /// Load several documents in parallel.
    ///
    /// Results come back in input order; failed loads are not registered.
    pub fn load_all(
        &self,
        sources: Vec<(String, Arc<dyn RunSource>)>,
    ) -> Vec<Result<Arc<DocumentIndex>>> {
        let loaded: Vec<Result<DocumentIndex>> = sources
            .into_par_iter()
            .map(|(id, source)| DocumentIndex::try_load(id, source, self.options.clone()))
            .collect();

        loaded
            .into_iter()
            .map(|result| match result {
                Ok(document) => self.insert(document),
                Err(e) => {
                    log::error!("Failed to load document: {}", e);
                    Err(e)
                }
            })
            .collect()
    }

    /// Look up a loaded document.
    pub fn get(&self, id: &str) -> Result<Arc<DocumentIndex>> {
        self.documents
            .read()
            .map_err(|_| poisoned())?
            .get(id)
            .cloned()
            .ok_or_else(|| Error::DocumentNotLoaded(id.to_string()))
    }

    /// Identifiers of loaded documents, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = match self.documents.read() {
            Ok(documents) => documents.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        ids.sort();
        ids
    }

    /// Unload a document. Returns `false` if it was not loaded.
    pub fn remove(&self, id: &str) -> bool {
        match self.documents.write() {
            Ok(mut documents) => documents.remove(id).is_some(),
            Err(_) => false,
        }
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.documents.read().map(|d| d.len()).unwrap_or_default()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DocumentCatalog {
    fn default() -> Self {
        Self::new(StructureOptions::default())
    }
}

fn poisoned() -> Error {
    Error::Other("document catalog lock poisoned".to_string())
}
