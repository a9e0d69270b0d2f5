//! The two-stage pipeline: convert, then optionally normalize fonts.

use crate::converter::Converter;
use crate::normalizer::{FontNormalizer, NormalizeReport};
use crate::{error::Error, ConvertOptions, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Converts HWP/HWPX files to DOCX according to [`ConvertOptions`].
pub struct HwpToDocx {
    options: ConvertOptions,
}

impl HwpToDocx {
    /// Creates a new converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Creates a new converter with default options.
    pub fn with_defaults() -> Self {
        Self::new(ConvertOptions::default())
    }

    /// Converts `input` into a DOCX package at `output`.
    ///
    /// With a non-empty font rule the converter writes an intermediate
    /// `<output>.tmp.docx`, which is normalized into `output` and then
    /// removed. Returns the normalization report when that step ran.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<Option<NormalizeReport>> {
        let converter = self.options.mode.build(&self.options.office_program);
        self.convert_with(converter.as_ref(), input.as_ref(), output.as_ref())
    }

    /// Same as [`HwpToDocx::convert`] with an explicit backend.
    pub fn convert_with(
        &self,
        converter: &dyn Converter,
        input: &Path,
        output: &Path,
    ) -> Result<Option<NormalizeReport>> {
        if !input.is_file() {
            return Err(Error::InputNotFound(input.to_path_buf()));
        }

        let rule = &self.options.font_rule;
        if rule.is_empty() {
            log::info!("converting {} with {} backend", input.display(), converter.name());
            converter.convert(input, output)?;
            return Ok(None);
        }

        let intermediate = Intermediate(intermediate_path(output));
        log::info!(
            "converting {} with {} backend into {}",
            input.display(),
            converter.name(),
            intermediate.0.display()
        );
        converter.convert(input, &intermediate.0)?;

        let report = FontNormalizer::new(rule.clone()).normalize_file(&intermediate.0, output)?;
        log::info!(
            "adjusted {} runs, {} skipped",
            report.runs_changed,
            report.skipped.len()
        );
        Ok(Some(report))
    }
}

/// `<output>.tmp.docx`
fn intermediate_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".tmp.docx");
    PathBuf::from(name)
}

/// Removes the intermediate package when dropped.
struct Intermediate(PathBuf);

impl Drop for Intermediate {
    fn drop(&mut self) {
        if self.0.exists() {
            if let Err(e) = std::fs::remove_file(&self.0) {
                log::warn!("could not remove {}: {e}", self.0.display());
            }
        }
    }
}
