//! # hwp2docx
//!
//! HWP/HWPX to DOCX conversion with optional font normalization.
//!
//! Conversion is delegated to a [`converter::Converter`] backend. When a
//! [`FontRule`] is given, the converted package is then passed through the
//! [`FontNormalizer`], which rewrites the font name and size of the default
//! paragraph style and of every run.
//!
//! ## Example
//!
//! ```no_run
//! use hwp2docx::{ConvertOptions, FontRule, HwpToDocx, Points};
//!
//! let options = ConvertOptions {
//!     font_rule: FontRule::default()
//!         .with_font_name("Batang")
//!         .with_size_delta(Points::from_half_points(2)),
//!     ..Default::default()
//! };
//!
//! let report = HwpToDocx::new(options)
//!     .convert("report.hwp", "report.docx")
//!     .unwrap();
//! println!("{:?}", report);
//! ```

pub mod converter;
pub mod document;
pub mod error;
pub mod normalizer;
pub mod package;
mod pipeline;

pub use converter::ConverterKind;
pub use document::{Document, Points};
pub use error::{Error, Result};
pub use normalizer::{normalize_file, FontNormalizer, FontRule, NormalizeReport};
pub use pipeline::HwpToDocx;

use std::path::PathBuf;

/// Options for HWP to DOCX conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Which conversion backend to use.
    pub mode: ConverterKind,
    /// Font adjustment applied after conversion; skipped when empty.
    pub font_rule: FontRule,
    /// Office suite executable used by [`ConverterKind::Office`].
    pub office_program: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: ConverterKind::Office,
            font_rule: FontRule::default(),
            office_program: PathBuf::from(converter::DEFAULT_OFFICE_PROGRAM),
        }
    }
}
