//! Document model types for structure inference.
//!
//! Runs arrive flat from a provider; lines are reconstructed on the fly from
//! consecutive runs, and headings and sections are the inferred structure.

mod heading;
mod line;
mod run;
mod section;

pub use heading::{
    is_valid_title, Heading, HeadingIndex, SizeClass, MAX_TITLE_LEN, SUGGESTION_LIMIT,
};
pub(crate) use line::join_runs;
pub use line::{lines, DominantFont, Lines, TextLine};
pub use run::TextRun;
pub use section::{Section, SectionKind};
