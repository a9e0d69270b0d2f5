//! Font normalization pass over a converted document.
//!
//! Rewrites the font name and size of the default paragraph style and of
//! every run in top-level paragraphs and table cells.

mod rule;

pub use self::rule::FontRule;

use crate::document::{CharacterProps, Document, RunLocation, StyleLookupError};
use crate::Result;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// An element the normalizer could not adjust.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("skipped {element}: {reason}")]
pub struct ElementSkipped {
    pub element: ElementRef,
    pub reason: SkipReason,
}

/// Which element was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef {
    DefaultStyle,
    Run(RunLocation),
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementRef::DefaultStyle => f.write_str("default style"),
            ElementRef::Run(location) => write!(f, "run ({location})"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("{0}")]
    StyleLookup(String),
    #[error("{0}")]
    InvalidSize(String),
}

impl From<StyleLookupError> for SkipReason {
    fn from(err: StyleLookupError) -> Self {
        SkipReason::StyleLookup(err.to_string())
    }
}

/// Outcome of a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Number of runs traversed.
    pub runs_visited: usize,
    /// Number of runs whose font name or size was written.
    pub runs_changed: usize,
    /// Whether the default style was written.
    pub style_changed: bool,
    /// Elements left as they were.
    pub skipped: Vec<ElementSkipped>,
}

impl NormalizeReport {
    fn skip(&mut self, element: ElementRef, reason: SkipReason) {
        let skipped = ElementSkipped { element, reason };
        log::warn!("{skipped}");
        self.skipped.push(skipped);
    }
}

/// Applies a [`FontRule`] to documents.
#[derive(Debug, Clone)]
pub struct FontNormalizer {
    rule: FontRule,
}

impl FontNormalizer {
    pub fn new(rule: FontRule) -> Self {
        Self { rule }
    }

    /// Adjusts `document` in place.
    ///
    /// Never fails as a whole: styles or runs that cannot be adjusted are
    /// recorded in the returned report and the traversal continues.
    pub fn normalize(&self, document: &mut Document) -> NormalizeReport {
        let mut report = NormalizeReport::default();
        if self.rule.is_empty() {
            log::debug!("empty font rule, leaving document unchanged");
            return report;
        }

        match document.default_style_mut() {
            Ok(mut style) => match self.apply(&mut style) {
                Ok(changed) => report.style_changed = changed,
                Err(reason) => report.skip(ElementRef::DefaultStyle, reason),
            },
            Err(err) => report.skip(ElementRef::DefaultStyle, err.into()),
        }

        for mut run in document.runs_mut() {
            report.runs_visited += 1;
            let location = run.location();
            match self.apply(run.props()) {
                Ok(true) => report.runs_changed += 1,
                Ok(false) => {}
                Err(reason) => report.skip(ElementRef::Run(location), reason),
            }
        }

        log::debug!(
            "normalized {} of {} runs, default style {}",
            report.runs_changed,
            report.runs_visited,
            if report.style_changed { "changed" } else { "unchanged" }
        );
        report
    }

    /// Applies the rule to one run or style; `Ok(true)` if anything was
    /// written. On `Err` nothing has been written.
    fn apply(&self, props: &mut CharacterProps<'_>) -> std::result::Result<bool, SkipReason> {
        let delta = self.rule.size_delta();
        let size = match self.rule.absolute_size() {
            Some(size) => Some(size),
            None if delta.is_zero() => None,
            // Only explicit sizes shrink; inherited sizes are left alone.
            None => props
                .size()
                .map_err(SkipReason::InvalidSize)?
                .map(|current| current.shrink(delta)),
        };

        let mut changed = false;
        if let Some(name) = self.rule.font_name() {
            props.set_font_name(name);
            changed = true;
        }
        if let Some(size) = size {
            props.set_size(size);
            changed = true;
        }
        Ok(changed)
    }

    /// Loads `input`, normalizes it and saves the result to `output`.
    pub fn normalize_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<NormalizeReport> {
        let mut document = Document::open(input)?;
        let report = self.normalize(&mut document);
        document.save(output)?;
        Ok(report)
    }
}

/// Convenience wrapper around [`FontNormalizer::normalize_file`].
pub fn normalize_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    rule: &FontRule,
) -> Result<NormalizeReport> {
    FontNormalizer::new(rule.clone()).normalize_file(input, output)
}
