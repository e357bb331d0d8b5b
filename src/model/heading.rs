//! Heading types and the immutable heading index.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Maximum heading title length in characters.
///
/// Longer "titles" are paragraphs that happen to share the heading font.
pub const MAX_TITLE_LEN: usize = 100;

/// Number of suggestions a chat client can show at once.
pub const SUGGESTION_LIMIT: usize = 25;

/// Which heading-size population a heading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// Body section headings
    Primary,
    /// Glossary entry headings
    Secondary,
}

/// A line recognized as a section title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Title text
    pub title: String,

    /// Size class the title matched
    pub size_class: SizeClass,

    /// Page the heading was found on (1-indexed)
    pub page: u32,
}

/// Check whether a title length is inside `[1, MAX_TITLE_LEN]`.
pub fn is_valid_title(title: &str) -> bool {
    let len = title.chars().count();
    (1..=MAX_TITLE_LEN).contains(&len)
}

/// Deduplicated set of headings for one document.
///
/// Built once per document load and shared read-only afterwards. Serialized
/// as a plain list of headings; deserializing goes through [`insert`], so
/// stored lists get the same title checks as built ones.
///
/// [`insert`]: HeadingIndex::insert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Heading>", into = "Vec<Heading>")]
pub struct HeadingIndex {
    headings: Vec<Heading>,
    titles: BTreeSet<String>,
}

impl HeadingIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a heading. Returns `false` for duplicate or out-of-range titles.
    pub fn insert(&mut self, heading: Heading) -> bool {
        if !is_valid_title(&heading.title) || self.titles.contains(&heading.title) {
            return false;
        }
        self.titles.insert(heading.title.clone());
        self.headings.push(heading);
        true
    }

    /// Headings in first-occurrence order.
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Titles in lexicographic order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.titles.iter().map(String::as_str)
    }

    /// Sorted titles as owned strings.
    pub fn sorted_titles(&self) -> Vec<String> {
        self.titles.iter().cloned().collect()
    }

    /// Check for an exact title.
    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Look up the heading record for an exact title.
    pub fn get(&self, title: &str) -> Option<&Heading> {
        if !self.contains(title) {
            return None;
        }
        self.headings.iter().find(|h| h.title == title)
    }

    /// Sorted titles containing `query`, case-insensitively, up to `limit`.
    ///
    /// An empty query matches every title.
    pub fn matching(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.to_lowercase();
        self.titles()
            .filter(|t| t.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

impl From<Vec<Heading>> for HeadingIndex {
    fn from(headings: Vec<Heading>) -> Self {
        let mut index = Self::new();
        for heading in headings {
            index.insert(heading);
        }
        index
    }
}

impl From<HeadingIndex> for Vec<Heading> {
    fn from(index: HeadingIndex) -> Self {
        index.headings
    }
}
