//! # docsect
//!
//! Section lookup over styled document text.
//!
//! This library takes the flat stream of styled text runs a document decoder
//! produces, infers a heading index from font size and family, reassembles
//! the body of any named section, and splits that text into fixed-size pages
//! with stateful navigation.
//!
//! ## Quick Start
//!
//! ```
//! use docsect::source::RunStreamBuilder;
//! use docsect::{build_headings, extract_section, paginate};
//!
//! let runs = RunStreamBuilder::new()
//!     .line("Movement", 30.0, "Arial-BoldMT")
//!     .spans(&[("\u{2022}", 11.0, "Symbol"), ("Fly", 11.0, "Times")])
//!     .line("Charge", 30.0, "Arial-BoldMT")
//!     .line("Run at the enemy.", 11.0, "Times")
//!     .build();
//!
//! let headings = build_headings(&runs, 30, 14, "Arial");
//! assert_eq!(headings.sorted_titles(), vec!["Charge", "Movement"]);
//!
//! let section = extract_section(&runs, "Movement", 30, 14, "Arial").unwrap();
//! assert_eq!(section.body, "- Fly");
//!
//! let pages = paginate(&section.body, 1000)?;
//! assert_eq!(pages.len(), 1);
//! # Ok::<(), docsect::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Heading inference**: two size classes, optional start/glossary markers
//! - **Section reassembly**: bullet and subheading normalization
//! - **Glossary fallback**: titles missing at body size are retried at glossary size
//! - **Pagination sessions**: bounded cursors, optionally persisted
//! - **Parallel loading**: Uses Rayon to index several documents at once

pub mod error;
pub mod index;
pub mod model;
pub mod paginate;
pub mod source;
pub mod structure;

// Re-export commonly used types
pub use error::{Error, Result};
pub use index::{DocumentCatalog, DocumentIndex};
pub use model::{
    Heading, HeadingIndex, Section, SectionKind, SizeClass, TextLine, TextRun, SUGGESTION_LIMIT,
};
pub use paginate::{
    paginate, JsonFileStore, MemoryStore, Navigation, PageView, PaginatedText, PaginationSession,
    SessionId, SessionKey, SessionOptions, SessionRegistry, SessionStore, DEFAULT_PAGE_SIZE,
};
pub use source::{JsonRunSource, MemoryRunSource, RunSource, RunStream, RunStreamBuilder};
pub use structure::{
    GateMarkers, HeadingCriteria, HeadingIndexBuilder, HeadingMode, SectionExtractor,
    StructureOptions,
};

/// Collect headings with explicit font parameters, in unconditional mode.
///
/// # Arguments
///
/// * `runs` - Ordered run stream
/// * `primary_size` - Rounded size of body section headings
/// * `secondary_size` - Rounded size of glossary headings
/// * `font_match` - Case-insensitive substring of the heading font family
pub fn build_headings(
    runs: &[TextRun],
    primary_size: u32,
    secondary_size: u32,
    font_match: &str,
) -> HeadingIndex {
    let criteria = HeadingCriteria::new(primary_size, secondary_size, font_match);
    HeadingIndexBuilder::from_criteria(criteria, None).build(runs)
}

/// Extract a section with explicit font parameters.
///
/// Subheadings use the default subheading size.
///
/// # Example
///
/// ```
/// use docsect::source::RunStreamBuilder;
/// use docsect::{extract_section, SectionKind};
///
/// let runs = RunStreamBuilder::new()
///     .line("Aura", 14.0, "Arial")
///     .line("Affects nearby models.", 11.0, "Times")
///     .build();
///
/// let section = extract_section(&runs, "Aura", 30, 14, "Arial").unwrap();
/// assert_eq!(section.kind, SectionKind::Glossary);
/// ```
pub fn extract_section(
    runs: &[TextRun],
    title: &str,
    primary_size: u32,
    secondary_size: u32,
    font_match: &str,
) -> Option<Section> {
    let criteria = HeadingCriteria::new(primary_size, secondary_size, font_match);
    SectionExtractor::from_criteria(criteria, structure::DEFAULT_SUBHEADING_SIZE)
        .extract(runs, title)
}
