//! Structure inference options and configuration.

use serde::{Deserialize, Serialize};

use super::HeadingCriteria;

/// Default font size of body section headings.
pub const DEFAULT_PRIMARY_SIZE: u32 = 30;

/// Default font size of glossary entry headings.
pub const DEFAULT_SECONDARY_SIZE: u32 = 14;

/// Default font family matcher for headings.
pub const DEFAULT_FONT_MATCH: &str = "Arial";

/// Default font size of in-section subheadings.
pub const DEFAULT_SUBHEADING_SIZE: u32 = 14;

/// Options for heading detection and section extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureOptions {
    /// Rounded font size of primary (body section) headings
    pub primary_size: u32,

    /// Rounded font size of secondary (glossary) headings
    pub secondary_size: u32,

    /// Case-insensitive substring a heading font family must contain
    pub font_match: String,

    /// Rounded font size of subheadings rendered in bold inside a section
    pub subheading_size: u32,

    /// Whether heading collection is gated by marker lines
    pub mode: HeadingMode,
}

impl StructureOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary heading size.
    pub fn with_primary_size(mut self, size: u32) -> Self {
        self.primary_size = size;
        self
    }

    /// Set the secondary heading size.
    pub fn with_secondary_size(mut self, size: u32) -> Self {
        self.secondary_size = size;
        self
    }

    /// Set the font family matcher.
    pub fn with_font_match(mut self, pattern: impl Into<String>) -> Self {
        self.font_match = pattern.into();
        self
    }

    /// Set the subheading size.
    pub fn with_subheading_size(mut self, size: u32) -> Self {
        self.subheading_size = size;
        self
    }

    /// Set the heading mode.
    pub fn with_mode(mut self, mode: HeadingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Gate heading collection on marker lines.
    pub fn gated(mut self, markers: GateMarkers) -> Self {
        self.mode = HeadingMode::Gated(markers);
        self
    }

    /// Heading criteria derived from these options.
    pub fn criteria(&self) -> HeadingCriteria {
        HeadingCriteria::new(self.primary_size, self.secondary_size, &self.font_match)
    }

    /// Gate markers, if gated.
    pub fn markers(&self) -> Option<&GateMarkers> {
        match &self.mode {
            HeadingMode::Unconditional => None,
            HeadingMode::Gated(markers) => Some(markers),
        }
    }
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            primary_size: DEFAULT_PRIMARY_SIZE,
            secondary_size: DEFAULT_SECONDARY_SIZE,
            font_match: DEFAULT_FONT_MATCH.to_string(),
            subheading_size: DEFAULT_SUBHEADING_SIZE,
            mode: HeadingMode::Unconditional,
        }
    }
}

/// Heading collection policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HeadingMode {
    /// Every qualifying line is a heading
    #[default]
    Unconditional,
    /// Collection starts at a start marker and switches to glossary headings
    /// at a glossary marker
    Gated(GateMarkers),
}

/// Marker lines driving a gated heading scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateMarkers {
    /// Exact text of the line that switches collection on
    pub start_marker: String,

    /// Exact text of the line that switches to secondary-size headings
    pub glossary_marker: String,

    /// Rounded font size both markers are set in
    pub marker_size: u32,
}

impl GateMarkers {
    /// Create marker settings.
    pub fn new(
        start_marker: impl Into<String>,
        glossary_marker: impl Into<String>,
        marker_size: u32,
    ) -> Self {
        Self {
            start_marker: start_marker.into(),
            glossary_marker: glossary_marker.into(),
            marker_size,
        }
    }
}
