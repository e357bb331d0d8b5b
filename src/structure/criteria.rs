//! Font criteria for heading recognition.

use crate::model::{DominantFont, SizeClass};

/// Case-insensitive substring matcher over font family names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMatcher {
    needle: String,
}

impl FontMatcher {
    /// Create a matcher. An empty pattern matches every family.
    pub fn new(pattern: &str) -> Self {
        Self {
            needle: pattern.to_lowercase(),
        }
    }

    /// Check whether a family name contains the pattern.
    pub fn matches(&self, family: &str) -> bool {
        family.to_lowercase().contains(&self.needle)
    }
}

/// Size and font thresholds that make a line a heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingCriteria {
    /// Rounded size of primary headings
    pub primary_size: u32,
    /// Rounded size of secondary headings
    pub secondary_size: u32,
    /// Font family matcher
    pub font: FontMatcher,
}

impl HeadingCriteria {
    /// Create criteria from sizes and a font pattern.
    pub fn new(primary_size: u32, secondary_size: u32, font_match: &str) -> Self {
        Self {
            primary_size,
            secondary_size,
            font: FontMatcher::new(font_match),
        }
    }

    /// Rounded size configured for a size class.
    pub fn size_for(&self, class: SizeClass) -> u32 {
        match class {
            SizeClass::Primary => self.primary_size,
            SizeClass::Secondary => self.secondary_size,
        }
    }

    /// Check whether a font is uniform at `size` with a matching family.
    pub fn matches_size(&self, font: DominantFont<'_>, size: u32) -> bool {
        match font {
            DominantFont::Uniform { size: s, family } => s == size && self.font.matches(family),
            DominantFont::Mixed => false,
        }
    }

    /// Check whether a font qualifies for a size class.
    pub fn matches(&self, font: DominantFont<'_>, class: SizeClass) -> bool {
        self.matches_size(font, self.size_for(class))
    }

    /// Size class a font qualifies for, primary first.
    pub fn classify(&self, font: DominantFont<'_>) -> Option<SizeClass> {
        [SizeClass::Primary, SizeClass::Secondary]
            .into_iter()
            .find(|class| self.matches(font, *class))
    }
}
