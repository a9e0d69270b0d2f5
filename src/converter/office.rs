//! Conversion through a headless office suite (LibreOffice `soffice`).

use super::{absolutize, Converter};
use crate::{error::Error, Result};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default executable name of the office suite.
pub const DEFAULT_PROGRAM: &str = "soffice";

/// Runs `<program> --headless --convert-to docx --outdir <dir> <input>`.
///
/// The suite names its output after the input file; the result is moved to
/// the requested output path afterwards. HWP import requires the suite's HWP
/// filter to be installed.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: PathBuf,
}

impl Default for OfficeConverter {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl OfficeConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Converter for OfficeConverter {
    fn name(&self) -> &'static str {
        "office"
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let output = absolutize(output)?;
        let outdir = output
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let stem = input.file_stem().ok_or_else(|| Error::ConversionFailed {
            backend: self.name().to_owned(),
            reason: format!("input path {} has no file name", input.display()),
        })?;

        log::debug!(
            "running {} on {} (outdir {})",
            self.program.display(),
            input.display(),
            outdir.display()
        );
        let status = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("docx")
            .arg("--outdir")
            .arg(&outdir)
            .arg(input)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::UnavailableBackend(format!(
                    "'{}' not found; install LibreOffice",
                    self.program.display()
                )),
                _ => Error::Io(e),
            })?;

        if !status.success() {
            return Err(Error::ConversionFailed {
                backend: self.name().to_owned(),
                reason: format!("'{}' {status}", self.program.display()),
            });
        }

        let mut file_name = OsString::from(stem);
        file_name.push(".docx");
        let generated = outdir.join(file_name);
        if !generated.is_file() {
            return Err(Error::ConversionFailed {
                backend: self.name().to_owned(),
                reason: format!("expected output {} was not produced", generated.display()),
            });
        }
        if generated != output {
            std::fs::rename(&generated, &output)?;
        }
        Ok(())
    }
}
