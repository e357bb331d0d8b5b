//! Visual lines reconstructed from consecutive runs.

use unicode_normalization::UnicodeNormalization;

use super::TextRun;

/// The font a line is set in, when its runs agree on one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominantFont<'a> {
    /// Every non-blank run shares this rounded size and family
    Uniform {
        /// Rounded font size in points
        size: u32,
        /// Font family name
        family: &'a str,
    },
    /// Runs disagree on size or family
    Mixed,
}

impl<'a> DominantFont<'a> {
    /// Compute the dominant font of a run slice.
    ///
    /// Blank runs are ignored unless the slice has nothing else, since
    /// providers often emit whitespace spans in a fallback font.
    pub fn of(runs: &'a [TextRun]) -> Self {
        Self::of_runs(runs.iter())
    }

    /// Compute the dominant font of any run sequence.
    pub fn of_runs<I>(runs: I) -> Self
    where
        I: Iterator<Item = &'a TextRun> + Clone,
    {
        let has_visible = runs.clone().any(|r| !r.is_blank());
        let mut iter = runs.filter(|r| !has_visible || !r.is_blank());

        let Some(first) = iter.next() else {
            return DominantFont::Mixed;
        };
        let size = first.rounded_size();
        let family = first.font_family.as_str();

        if iter.all(|r| r.rounded_size() == size && r.font_family == family) {
            DominantFont::Uniform { size, family }
        } else {
            DominantFont::Mixed
        }
    }

    /// Rounded size if the font is uniform.
    pub fn size(&self) -> Option<u32> {
        match self {
            DominantFont::Uniform { size, .. } => Some(*size),
            DominantFont::Mixed => None,
        }
    }

    /// Family name if the font is uniform.
    pub fn family(&self) -> Option<&'a str> {
        match self {
            DominantFont::Uniform { family, .. } => Some(family),
            DominantFont::Mixed => None,
        }
    }
}

/// A maximal group of consecutive runs sharing one `(page, block, line)` key.
#[derive(Debug, Clone, Copy)]
pub struct TextLine<'a> {
    runs: &'a [TextRun],
}

impl<'a> TextLine<'a> {
    /// Wrap a run slice as a line. The slice must not be empty.
    pub fn new(runs: &'a [TextRun]) -> Self {
        debug_assert!(!runs.is_empty());
        Self { runs }
    }

    /// The runs in this line.
    pub fn runs(&self) -> &'a [TextRun] {
        self.runs
    }

    /// Page the line sits on.
    pub fn page(&self) -> u32 {
        self.runs.first().map(|r| r.page).unwrap_or_default()
    }

    /// Space-joined trimmed run texts, NFC-normalized. Blank runs are skipped.
    pub fn text(&self) -> String {
        join_runs(self.runs.iter())
    }

    /// Check whether the line has no visible text.
    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(TextRun::is_blank)
    }

    /// The line's dominant font.
    pub fn dominant_font(&self) -> DominantFont<'a> {
        DominantFont::of(self.runs)
    }
}

/// Join run texts the way a line renders them.
pub(crate) fn join_runs<'r>(runs: impl Iterator<Item = &'r TextRun>) -> String {
    let mut result = String::new();
    for run in runs {
        let text = run.text.trim();
        if text.is_empty() {
            continue;
        }
        if !result.is_empty() {
            result.push(' ');
        }
        result.extend(text.nfc());
    }
    result
}

/// Iterator over the lines of a run slice.
///
/// Each call to [`lines`] yields an independent cursor, so concurrent scans
/// over the same snapshot never interfere.
pub struct Lines<'a> {
    inner: std::slice::ChunkBy<'a, TextRun, fn(&TextRun, &TextRun) -> bool>,
}

impl<'a> Iterator for Lines<'a> {
    type Item = TextLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(TextLine::new)
    }
}

fn same_line(a: &TextRun, b: &TextRun) -> bool {
    a.line_key() == b.line_key()
}

/// Group an ordered run slice into visual lines.
pub fn lines(runs: &[TextRun]) -> Lines<'_> {
    Lines {
        inner: runs.chunk_by(same_line as fn(&TextRun, &TextRun) -> bool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, size: f32, family: &str, line: u32) -> TextRun {
        TextRun::new(text, size, family).at(1, 0, line)
    }

    #[test]
    fn test_lines_group_by_key() {
        let runs = vec![
            run("Movement", 30.0, "Arial", 0),
            run("Each", 11.0, "Times", 1),
            run("model", 11.0, "Times", 1),
            run("moves", 11.0, "Times", 2),
        ];
        let grouped: Vec<_> = lines(&runs).collect();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[1].text(), "Each model");
        assert_eq!(grouped[2].runs().len(), 1);
    }

    #[test]
    fn test_line_text_trims_and_skips_blank_runs() {
        let runs = vec![
            run("  Charge ", 11.0, "Times", 0),
            run("   ", 11.0, "Symbol", 0),
            run("phase", 11.0, "Times", 0),
        ];
        let line = lines(&runs).next().unwrap();
        assert_eq!(line.text(), "Charge phase");
    }

    #[test]
    fn test_line_text_is_nfc_normalized() {
        let runs = vec![run("Me\u{301}lee", 30.0, "Arial", 0)];
        let line = lines(&runs).next().unwrap();
        assert_eq!(line.text(), "M\u{e9}lee");
    }

    #[test]
    fn test_dominant_font_uniform() {
        let runs = vec![run("Fight", 29.8, "Arial", 0), run("Phase", 30.2, "Arial", 0)];
        let line = lines(&runs).next().unwrap();
        assert_eq!(
            line.dominant_font(),
            DominantFont::Uniform {
                size: 30,
                family: "Arial"
            }
        );
    }

    #[test]
    fn test_dominant_font_mixed() {
        let runs = vec![run("Fight", 30.0, "Arial", 0), run("Phase", 11.0, "Arial", 0)];
        let line = lines(&runs).next().unwrap();
        assert_eq!(line.dominant_font(), DominantFont::Mixed);
        assert_eq!(line.dominant_font().size(), None);
    }

    #[test]
    fn test_dominant_font_ignores_blank_runs() {
        let runs = vec![run("Fight", 30.0, "Arial", 0), run(" ", 11.0, "Symbol", 0)];
        let line = lines(&runs).next().unwrap();
        assert_eq!(line.dominant_font().size(), Some(30));
    }

    #[test]
    fn test_dominant_font_all_blank() {
        let runs = vec![run(" ", 30.0, "Arial", 0)];
        let line = lines(&runs).next().unwrap();
        assert!(line.is_blank());
        assert_eq!(line.dominant_font().family(), Some("Arial"));
    }

    #[test]
    fn test_empty_slice_has_no_lines() {
        assert_eq!(lines(&[]).count(), 0);
    }
}
