//! Builder for assembling run streams by hand.

use crate::model::TextRun;

use super::MemoryRunSource;

/// Assembles an ordered run stream line by line.
///
/// Providers that decode documents themselves, and tests, use this to get
/// consistent `(page, block, line)` keys and a dense ordering.
///
/// # Example
///
/// ```
/// use docsect::source::RunStreamBuilder;
///
/// let runs = RunStreamBuilder::new()
///     .line("Movement", 30.0, "Arial-BoldMT")
///     .spans(&[("\u{2022}", 11.0, "Symbol"), ("Fly", 11.0, "Times")])
///     .page(2)
///     .line("Charge", 30.0, "Arial-BoldMT")
///     .build();
/// assert_eq!(runs.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RunStreamBuilder {
    runs: Vec<TextRun>,
    page: u32,
    block: u32,
    line: u32,
}

impl RunStreamBuilder {
    /// Start a stream on page 1.
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            page: 1,
            block: 0,
            line: 0,
        }
    }

    /// Continue on another page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self.block = 0;
        self.line = 0;
        self
    }

    /// Start a new block on the current page.
    pub fn block(mut self) -> Self {
        self.block += 1;
        self.line = 0;
        self
    }

    /// Append a single-run line.
    pub fn line(self, text: &str, font_size: f32, font_family: &str) -> Self {
        self.spans(&[(text, font_size, font_family)])
    }

    /// Append a line made of several runs.
    pub fn spans(mut self, spans: &[(&str, f32, &str)]) -> Self {
        for (text, font_size, font_family) in spans {
            let order = self.runs.len() as u64;
            self.runs.push(
                TextRun::new(*text, *font_size, *font_family)
                    .at(self.page, self.block, self.line)
                    .with_order(order),
            );
        }
        self.line += 1;
        self
    }

    /// Finish and return the runs.
    pub fn build(self) -> Vec<TextRun> {
        self.runs
    }

    /// Finish into an in-memory source.
    pub fn into_source(self, name: impl Into<String>) -> MemoryRunSource {
        MemoryRunSource::new(name, self.runs)
    }
}

impl Default for RunStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}
