//! Heading index construction.
//!
//! A single scan over the run stream collects every line whose dominant font
//! matches the heading criteria. Optionally a [`PhaseGate`] restricts which
//! lines count: nothing before the start marker, primary headings until the
//! glossary marker, secondary headings after it.

use crate::error::Result;
use crate::model::{lines, DominantFont, Heading, HeadingIndex, SizeClass, TextRun};
use crate::source::RunSource;

use super::{FontMatcher, GateMarkers, HeadingCriteria, StructureOptions};

/// Collection phase of a gated scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the start marker; nothing is collected
    Off,
    /// Collecting primary-size headings
    Primary,
    /// After the glossary marker; collecting secondary-size headings
    Secondary,
}

/// State machine gating heading collection on marker lines.
#[derive(Debug, Clone)]
pub struct PhaseGate {
    markers: GateMarkers,
    phase: Phase,
}

impl PhaseGate {
    /// Create a gate in the [`Phase::Off`] state.
    pub fn new(markers: GateMarkers) -> Self {
        Self {
            markers,
            phase: Phase::Off,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Size class collected in the current phase.
    pub fn active_class(&self) -> Option<SizeClass> {
        match self.phase {
            Phase::Off => None,
            Phase::Primary => Some(SizeClass::Primary),
            Phase::Secondary => Some(SizeClass::Secondary),
        }
    }

    /// Feed a line to the gate.
    ///
    /// Returns `true` when the line is a marker. Marker lines never become
    /// headings, whether or not they change the phase.
    pub fn observe(&mut self, text: &str, font: DominantFont<'_>, matcher: &FontMatcher) -> bool {
        let at_marker_size = match font {
            DominantFont::Uniform { size, family } => {
                size == self.markers.marker_size && matcher.matches(family)
            }
            DominantFont::Mixed => false,
        };
        if !at_marker_size {
            return false;
        }

        if text == self.markers.start_marker {
            if self.phase == Phase::Off {
                log::debug!("Start marker '{}' reached, collecting headings", text);
                self.phase = Phase::Primary;
            }
            true
        } else if text == self.markers.glossary_marker {
            if self.phase == Phase::Primary {
                log::debug!("Glossary marker '{}' reached, collecting glossary headings", text);
                self.phase = Phase::Secondary;
            }
            true
        } else {
            false
        }
    }
}

/// Builds a [`HeadingIndex`] from a run stream.
///
/// # Example
///
/// ```
/// use docsect::source::RunStreamBuilder;
/// use docsect::structure::{HeadingIndexBuilder, StructureOptions};
///
/// let runs = RunStreamBuilder::new()
///     .line("Movement", 30.0, "Arial")
///     .line("Move each model.", 11.0, "Times")
///     .line("Aura", 14.0, "Arial")
///     .build();
///
/// let index = HeadingIndexBuilder::new(&StructureOptions::default()).build(&runs);
/// assert_eq!(index.sorted_titles(), vec!["Aura", "Movement"]);
/// ```
#[derive(Debug, Clone)]
pub struct HeadingIndexBuilder {
    criteria: HeadingCriteria,
    markers: Option<GateMarkers>,
}

impl HeadingIndexBuilder {
    /// Create a builder from structure options.
    pub fn new(options: &StructureOptions) -> Self {
        Self::from_criteria(options.criteria(), options.markers().cloned())
    }

    /// Create a builder from explicit criteria. `None` markers means every
    /// qualifying line is collected.
    pub fn from_criteria(criteria: HeadingCriteria, markers: Option<GateMarkers>) -> Self {
        Self { criteria, markers }
    }

    /// Scan runs and collect headings.
    pub fn build(&self, runs: &[TextRun]) -> HeadingIndex {
        let mut index = HeadingIndex::new();
        let mut gate = self.markers.clone().map(PhaseGate::new);
        let mut rejected = 0usize;

        for line in lines(runs) {
            if line.is_blank() {
                continue;
            }
            let font = line.dominant_font();
            let text = line.text();

            if let Some(gate) = gate.as_mut() {
                if gate.observe(&text, font, &self.criteria.font) {
                    continue;
                }
            }

            let class = match gate.as_ref() {
                Some(gate) => gate
                    .active_class()
                    .filter(|class| self.criteria.matches(font, *class)),
                None => self.criteria.classify(font),
            };
            let Some(size_class) = class else {
                continue;
            };

            let heading = Heading {
                title: text,
                size_class,
                page: line.page(),
            };
            if !index.insert(heading) {
                rejected += 1;
            }
        }

        log::debug!(
            "Collected {} headings ({} duplicate or malformed dropped)",
            index.len(),
            rejected
        );
        index
    }

    /// Read a run source and collect headings, surfacing provider failures.
    pub fn try_build_from(&self, source: &dyn RunSource) -> Result<HeadingIndex> {
        let runs = source.read_runs()?;
        Ok(self.build(&runs))
    }

    /// Read a run source and collect headings.
    ///
    /// An unavailable document is logged and yields an empty index.
    pub fn build_from(&self, source: &dyn RunSource) -> HeadingIndex {
        self.try_build_from(source).unwrap_or_else(|e| {
            log::error!("Error extracting headings from {}: {}", source.name(), e);
            HeadingIndex::new()
        })
    }
}
