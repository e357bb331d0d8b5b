//! Document structure inference from font heuristics.

mod criteria;
mod extractor;
mod headings;
mod options;

pub use criteria::{FontMatcher, HeadingCriteria};
pub use extractor::{is_bullet_glyph, SectionExtractor, BULLET_GLYPHS};
pub use headings::{HeadingIndexBuilder, Phase, PhaseGate};
pub use options::{
    GateMarkers, HeadingMode, StructureOptions, DEFAULT_FONT_MATCH, DEFAULT_PRIMARY_SIZE,
    DEFAULT_SECONDARY_SIZE, DEFAULT_SUBHEADING_SIZE,
};
