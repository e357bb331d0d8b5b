//! Extracted section types.

use serde::{Deserialize, Serialize};

/// Where a section's heading was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Heading matched at the primary size
    #[default]
    Regular,
    /// Heading matched only under the secondary-size fallback
    Glossary,
}

impl SectionKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SectionKind::Regular => "Section",
            SectionKind::Glossary => "Glossary",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A section body captured between its heading and the next qualifying heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading title
    pub title: String,

    /// Regular section or glossary entry
    pub kind: SectionKind,

    /// Reassembled body text, one line per source line
    pub body: String,
}

impl Section {
    /// Create a new section.
    pub fn new(title: impl Into<String>, kind: SectionKind, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            body: body.into(),
        }
    }

    /// Check if this is a glossary entry.
    pub fn is_glossary(&self) -> bool {
        self.kind == SectionKind::Glossary
    }

    /// Display title, e.g. `"Glossary: Aura"`.
    pub fn display_title(&self) -> String {
        format!("{}: {}", self.kind, self.title)
    }
}
