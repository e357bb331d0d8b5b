//! Styled text runs.

use serde::{Deserialize, Serialize};

/// A styled text fragment as delivered by a run stream provider.
///
/// Runs are the atomic input of structure inference. The `(page, block, line)`
/// triple places a run in the provider's layout hierarchy and `order` totally
/// orders all runs of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Font size in points
    pub font_size: f32,

    /// Font family name (e.g., "Arial-BoldMT")
    pub font_family: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Block index within the page
    #[serde(default)]
    pub block: u32,

    /// Line index within the block
    #[serde(default)]
    pub line: u32,

    /// Document-wide ordering key
    pub order: u64,
}

impl TextRun {
    /// Create a run on page 1 with zeroed layout coordinates.
    pub fn new(text: impl Into<String>, font_size: f32, font_family: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_family: font_family.into(),
            page: 1,
            block: 0,
            line: 0,
            order: 0,
        }
    }

    /// Place the run at a page/block/line position.
    pub fn at(mut self, page: u32, block: u32, line: u32) -> Self {
        self.page = page;
        self.block = block;
        self.line = line;
        self
    }

    /// Set the ordering key.
    pub fn with_order(mut self, order: u64) -> Self {
        self.order = order;
        self
    }

    /// Font size rounded to whole points.
    ///
    /// Halves round to the even neighbour so that 13.5pt and 14.5pt both land
    /// on 14, which keeps slightly jittered heading sizes in one bucket.
    pub fn rounded_size(&self) -> u32 {
        self.font_size.round_ties_even().max(0.0) as u32
    }

    /// Check whether the run carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The `(page, block, line)` key shared by all runs of one visual line.
    pub fn line_key(&self) -> (u32, u32, u32) {
        (self.page, self.block, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded_size() {
        assert_eq!(TextRun::new("a", 29.7, "Arial").rounded_size(), 30);
        assert_eq!(TextRun::new("a", 13.5, "Arial").rounded_size(), 14);
        assert_eq!(TextRun::new("a", 14.5, "Arial").rounded_size(), 14);
        assert_eq!(TextRun::new("a", 11.2, "Arial").rounded_size(), 11);
        assert_eq!(TextRun::new("a", -3.0, "Arial").rounded_size(), 0);
    }

    #[test]
    fn test_blank_detection() {
        assert!(TextRun::new("   ", 12.0, "Arial").is_blank());
        assert!(TextRun::new("", 12.0, "Arial").is_blank());
        assert!(!TextRun::new(" x ", 12.0, "Arial").is_blank());
    }

    #[test]
    fn test_deserialize_defaults_layout_fields() {
        let json = r#"{"text":"Movement","font_size":30.0,"font_family":"Arial","page":3,"order":7}"#;
        let run: TextRun = serde_json::from_str(json).unwrap();
        assert_eq!(run.line_key(), (3, 0, 0));
        assert_eq!(run.order, 7);
    }
}
