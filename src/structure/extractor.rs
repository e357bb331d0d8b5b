//! Section extraction.
//!
//! Locates a heading by exact title and captures the lines after it up to the
//! next line set in the same heading font. The captured lines are normalized:
//! bullet glyphs become `"- "` prefixes and subheadings are set in bold.
//!
//! Documents mix two heading populations (body sections and glossary entries)
//! and callers do not know which one a title belongs to, so the scan runs at
//! the primary size first and falls back to the secondary size.

use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::model::{
    join_runs, lines, DominantFont, Section, SectionKind, SizeClass, TextLine, TextRun,
};
use crate::source::RunSource;

use super::{HeadingCriteria, StructureOptions};

/// Runs consisting solely of one of these glyphs mark the next text as a list item.
pub const BULLET_GLYPHS: &[&str] = &[
    "\u{2022}", // •
    "\u{25CB}", // ○
    "\u{25CF}", // ●
    "\u{25E6}", // ◦
    "\u{25AA}", // ▪
    "-",
    "\u{2013}", // –
    "\u{2014}", // —
];

/// Check whether text is a lone bullet glyph.
pub fn is_bullet_glyph(text: &str) -> bool {
    BULLET_GLYPHS.contains(&text.trim())
}

/// Extracts section bodies by heading title.
///
/// # Example
///
/// ```
/// use docsect::source::RunStreamBuilder;
/// use docsect::structure::{SectionExtractor, StructureOptions};
/// use docsect::SectionKind;
///
/// let runs = RunStreamBuilder::new()
///     .line("Movement", 30.0, "Arial")
///     .line("\u{2022}", 11.0, "Symbol")
///     .line("Fly", 11.0, "Times")
///     .line("Charge", 30.0, "Arial")
///     .build();
///
/// let extractor = SectionExtractor::new(&StructureOptions::default());
/// let section = extractor.extract(&runs, "Movement").unwrap();
/// assert_eq!(section.kind, SectionKind::Regular);
/// assert_eq!(section.body, "- Fly");
/// ```
#[derive(Debug, Clone)]
pub struct SectionExtractor {
    criteria: HeadingCriteria,
    subheading_size: u32,
}

impl SectionExtractor {
    /// Create an extractor from structure options.
    pub fn new(options: &StructureOptions) -> Self {
        Self::from_criteria(options.criteria(), options.subheading_size)
    }

    /// Create an extractor from explicit criteria.
    pub fn from_criteria(criteria: HeadingCriteria, subheading_size: u32) -> Self {
        Self {
            criteria,
            subheading_size,
        }
    }

    /// Extract the section titled `title`.
    ///
    /// Returns `None` when the title is not a heading at either size, or when
    /// its body is empty.
    pub fn extract(&self, runs: &[TextRun], title: &str) -> Option<Section> {
        let title: String = title.nfc().collect();

        for (class, kind) in [
            (SizeClass::Primary, SectionKind::Regular),
            (SizeClass::Secondary, SectionKind::Glossary),
        ] {
            match self.capture(runs, &title, class) {
                Some(body) if !body.is_empty() => {
                    return Some(Section::new(title, kind, body));
                }
                Some(_) => {
                    log::debug!("'{}' heading at {:?} size has an empty body", title, class);
                }
                None => {
                    log::debug!("'{}' not found at {:?} size", title, class);
                }
            }
        }
        None
    }

    /// Read a run source and extract a section, surfacing provider failures.
    pub fn try_extract_from(&self, source: &dyn RunSource, title: &str) -> Result<Option<Section>> {
        let runs = source.read_runs()?;
        Ok(self.extract(&runs, title))
    }

    /// Read a run source and extract a section.
    ///
    /// An unavailable document is logged and reported as not found.
    pub fn extract_from(&self, source: &dyn RunSource, title: &str) -> Option<Section> {
        self.try_extract_from(source, title).unwrap_or_else(|e| {
            log::error!("Error processing {}: {}", source.name(), e);
            None
        })
    }

    /// Scan for the heading at one size class and capture its body.
    ///
    /// `None` means the start line never appeared.
    fn capture(&self, runs: &[TextRun], title: &str, class: SizeClass) -> Option<String> {
        let mut body: Option<BodyAssembler> = None;

        for line in lines(runs) {
            if line.is_blank() {
                continue;
            }
            let is_heading_font = self.criteria.matches(line.dominant_font(), class);

            match body.as_mut() {
                None => {
                    if is_heading_font && line.text() == title {
                        body = Some(BodyAssembler::new(self.subheading_size));
                    }
                }
                Some(_) if is_heading_font => break,
                Some(assembler) => assembler.push_line(line),
            }
        }

        body.map(BodyAssembler::finish)
    }
}

/// Accumulates normalized body lines.
#[derive(Debug)]
struct BodyAssembler {
    lines: Vec<String>,
    pending_bullet: bool,
    subheading_size: u32,
}

impl BodyAssembler {
    fn new(subheading_size: u32) -> Self {
        Self {
            lines: Vec::new(),
            pending_bullet: false,
            subheading_size,
        }
    }

    fn push_line(&mut self, line: TextLine<'_>) {
        let runs: Vec<&TextRun> = line.runs().iter().filter(|r| !r.is_blank()).collect();
        let Some(first) = runs.iter().position(|r| !is_bullet_glyph(&r.text)) else {
            // Glyph-only line: the bullet belongs to the next text
            self.pending_bullet |= !runs.is_empty();
            return;
        };
        let last = runs
            .iter()
            .rposition(|r| !is_bullet_glyph(&r.text))
            .unwrap_or(first);

        // Leading glyphs mark this line as an item; trailing glyphs mark the
        // next one. Glyphs between content runs are ordinary punctuation.
        if first > 0 {
            self.pending_bullet = true;
        }
        let content = &runs[first..=last];

        let mut text = join_runs(content.iter().copied());
        let font = DominantFont::of_runs(
            content
                .iter()
                .copied()
                .filter(|r| !is_bullet_glyph(&r.text)),
        );
        if font.size() == Some(self.subheading_size) {
            text = format!("**{}**", text);
        }
        if self.pending_bullet {
            text = format!("- {}", text);
            self.pending_bullet = false;
        }
        self.lines.push(text);

        if last + 1 < runs.len() {
            self.pending_bullet = true;
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{JsonRunSource, RunStreamBuilder};

    fn extractor() -> SectionExtractor {
        SectionExtractor::new(&StructureOptions::default())
    }

    #[test]
    fn test_capture_stops_before_next_heading() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("Each model may move.", 11.0, "Times")
            .line("Measure from the base.", 11.0, "Times")
            .line("Charge", 30.0, "Arial")
            .line("Declare targets.", 11.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "Each model may move.\nMeasure from the base.");
        assert!(!section.body.contains("Charge"));
        assert_eq!(section.kind, SectionKind::Regular);
    }

    #[test]
    fn test_capture_runs_to_end_of_document() {
        let runs = RunStreamBuilder::new()
            .line("Charge", 30.0, "Arial")
            .line("Declare targets.", 11.0, "Times")
            .page(2)
            .line("Roll 2D6.", 11.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Charge").unwrap();
        assert_eq!(section.body, "Declare targets.\nRoll 2D6.");
    }

    #[test]
    fn test_bullet_line_prefixes_next_text() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("\u{2022}", 11.0, "Symbol")
            .line("Fly", 11.0, "Times")
            .line("Normal text", 11.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "- Fly\nNormal text");
        assert!(!section.body.contains('\u{2022}'));
    }

    #[test]
    fn test_bullet_sharing_line_with_item() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .spans(&[("\u{25CF}", 11.0, "Symbol"), ("Advance", 11.0, "Times")])
            .spans(&[("-", 11.0, "Times"), ("Fall Back", 11.0, "Times")])
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "- Advance\n- Fall Back");
    }

    #[test]
    fn test_glyph_between_content_is_kept() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .spans(&[
                ("Range", 11.0, "Times"),
                ("\u{2013}", 11.0, "Times"),
                ("12\"", 11.0, "Times"),
            ])
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "Range \u{2013} 12\"");
    }

    #[test]
    fn test_trailing_glyph_marks_next_line() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .spans(&[("Abilities", 11.0, "Times"), ("\u{2022}", 11.0, "Symbol")])
            .line("Fly", 11.0, "Times")
            .line("Deep Strike", 11.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "Abilities\n- Fly\nDeep Strike");
    }

    #[test]
    fn test_pending_bullet_skips_blank_lines() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("\u{25AA}", 11.0, "Symbol")
            .line("  ", 11.0, "Times")
            .line("Hover", 11.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "- Hover");
    }

    #[test]
    fn test_subheading_is_bold() {
        let runs = RunStreamBuilder::new()
            .line("Shooting", 30.0, "Arial")
            .line("Select Targets", 14.0, "Times-Bold")
            .line("Select Targets", 11.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Shooting").unwrap();
        assert_eq!(section.body, "**Select Targets**\nSelect Targets");
    }

    #[test]
    fn test_bulleted_subheading() {
        let runs = RunStreamBuilder::new()
            .line("Shooting", 30.0, "Arial")
            .line("\u{2022}", 11.0, "Symbol")
            .line("Pistols", 14.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Shooting").unwrap();
        assert_eq!(section.body, "- **Pistols**");
    }

    #[test]
    fn test_lines_are_trimmed() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .spans(&[("  Move ", 11.0, "Times"), (" models  ", 11.0, "Times")])
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "Move models");
    }

    #[test]
    fn test_glossary_fallback() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("Move.", 11.0, "Times")
            .line("Aura", 14.0, "Arial")
            .line("Affects units within range.", 11.0, "Times")
            .line("Battle-shock", 14.0, "Arial")
            .line("Roll 2D6.", 11.0, "Times")
            .build();

        let section = extractor().extract(&runs, "Aura").unwrap();
        assert_eq!(section.kind, SectionKind::Glossary);
        assert_eq!(section.body, "Affects units within range.");
    }

    #[test]
    fn test_glossary_size_heading_inside_section_is_body() {
        // Only primary headings end a primary-pass capture
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("Advance", 14.0, "Arial")
            .line("Add D6.", 11.0, "Times")
            .line("Charge", 30.0, "Arial")
            .build();

        let section = extractor().extract(&runs, "Movement").unwrap();
        assert_eq!(section.body, "**Advance**\nAdd D6.");
    }

    #[test]
    fn test_heading_followed_by_heading_is_not_found() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("Charge", 30.0, "Arial")
            .line("Declare.", 11.0, "Times")
            .build();

        assert!(extractor().extract(&runs, "Movement").is_none());
    }

    #[test]
    fn test_absent_title_is_not_found() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("Move.", 11.0, "Times")
            .build();

        assert!(extractor().extract(&runs, "Psychic").is_none());
    }

    #[test]
    fn test_title_match_is_exact_and_case_sensitive() {
        let runs = RunStreamBuilder::new()
            .line("Movement Phase", 30.0, "Arial")
            .line("Move.", 11.0, "Times")
            .build();

        assert!(extractor().extract(&runs, "movement phase").is_none());
        assert!(extractor().extract(&runs, "Movement").is_none());
        assert!(extractor().extract(&runs, "Movement Phase").is_some());
    }

    #[test]
    fn test_title_in_body_font_is_not_start() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 11.0, "Times")
            .line("Not a section.", 11.0, "Times")
            .build();

        assert!(extractor().extract(&runs, "Movement").is_none());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let runs = RunStreamBuilder::new()
            .line("Movement", 30.0, "Arial")
            .line("\u{2022}", 11.0, "Symbol")
            .line("Fly", 11.0, "Times")
            .build();

        let first = extractor().extract(&runs, "Movement");
        let second = extractor().extract(&runs, "Movement");
        assert_eq!(first, second);
    }

    #[test]
    fn test_extract_from_unavailable_source() {
        let source = JsonRunSource::new("/nonexistent/runs.json");
        assert!(extractor().extract_from(&source, "Movement").is_none());
        assert!(extractor().try_extract_from(&source, "Movement").is_err());
    }

    #[test]
    fn test_is_bullet_glyph() {
        assert!(is_bullet_glyph("\u{2022}"));
        assert!(is_bullet_glyph(" - "));
        assert!(!is_bullet_glyph("-5"));
        assert!(!is_bullet_glyph("Fly"));
    }
}
