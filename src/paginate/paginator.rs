//! Fixed-size text pagination.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default page size in characters.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Split text into pages of `page_size` characters.
///
/// Every page but the last holds exactly `page_size` characters; concatenating
/// the pages gives back `text`. Empty text yields no pages. Pages never split
/// a character.
///
/// # Example
///
/// ```
/// use docsect::paginate::paginate;
///
/// let pages = paginate("abcdefg", 3).unwrap();
/// assert_eq!(pages, vec!["abc", "def", "g"]);
/// ```
pub fn paginate(text: &str, page_size: usize) -> Result<Vec<String>> {
    if page_size == 0 {
        return Err(Error::InvalidPageSize);
    }

    let mut pages = Vec::new();
    let mut start = 0;
    let mut count = 0;
    for (idx, _) in text.char_indices() {
        if count == page_size {
            pages.push(text[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }
    if start < text.len() {
        pages.push(text[start..].to_string());
    }
    Ok(pages)
}

/// Text split into display pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedText {
    pages: Vec<String>,
    page_size: usize,
}

impl PaginatedText {
    /// Paginate text with the given page size.
    pub fn new(text: &str, page_size: usize) -> Result<Self> {
        Ok(Self {
            pages: paginate(text, page_size)?,
            page_size,
        })
    }

    /// Paginate text with [`DEFAULT_PAGE_SIZE`].
    pub fn with_default_size(text: &str) -> Self {
        let pages = paginate(text, DEFAULT_PAGE_SIZE).unwrap_or_default();
        Self {
            pages,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// All pages in order.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Get a page by 0-based index.
    pub fn page(&self, index: usize) -> Result<&str> {
        self.pages
            .get(index)
            .map(String::as_str)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Configured page size in characters.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Check if there are no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Reassemble the paginated text.
    pub fn text(&self) -> String {
        self.pages.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginate_reconstructs_text() {
        let text = "The quick brown fox jumps over the lazy dog.".repeat(50);
        for size in [1, 7, 100, 1000, 5000] {
            let pages = paginate(&text, size).unwrap();
            assert_eq!(pages.concat(), text);
            assert_eq!(pages.len(), text.chars().count().div_ceil(size));
            assert!(pages[..pages.len() - 1]
                .iter()
                .all(|p| p.chars().count() == size));
        }
    }

    #[test]
    fn test_paginate_empty_text() {
        assert!(paginate("", 10).unwrap().is_empty());
        assert!(PaginatedText::with_default_size("").is_empty());
    }

    #[test]
    fn test_paginate_exact_multiple() {
        let pages = paginate("abcdef", 3).unwrap();
        assert_eq!(pages, vec!["abc", "def"]);
    }

    #[test]
    fn test_paginate_counts_characters_not_bytes() {
        let text = "\u{e9}\u{e9}\u{e9}\u{1F600}\u{1F600}";
        let pages = paginate(text, 2).unwrap();
        assert_eq!(pages, vec!["\u{e9}\u{e9}", "\u{e9}\u{1F600}", "\u{1F600}"]);
    }

    #[test]
    fn test_paginate_zero_page_size() {
        assert!(matches!(paginate("abc", 0), Err(Error::InvalidPageSize)));
        assert!(PaginatedText::new("abc", 0).is_err());
    }

    #[test]
    fn test_page_access() {
        let paginated = PaginatedText::new("abcdefg", 3).unwrap();
        assert_eq!(paginated.page_count(), 3);
        assert_eq!(paginated.page(0).unwrap(), "abc");
        assert_eq!(paginated.page(2).unwrap(), "g");
        assert!(matches!(paginated.page(3), Err(Error::PageOutOfRange(3, 3))));
        assert_eq!(paginated.text(), "abcdefg");
    }

    #[test]
    fn test_default_page_size() {
        let text = "x".repeat(2500);
        let paginated = PaginatedText::with_default_size(&text);
        assert_eq!(paginated.page_size(), 1000);
        assert_eq!(paginated.page_count(), 3);
        assert_eq!(paginated.page(2).unwrap().len(), 500);
    }
}
