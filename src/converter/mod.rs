//! HWP/HWPX to DOCX conversion backends.

mod office;
mod text;

pub use self::office::{OfficeConverter, DEFAULT_PROGRAM as DEFAULT_OFFICE_PROGRAM};
pub use self::text::{write_text_docx, TextConverter};

use crate::Result;
use std::path::{Path, PathBuf};

/// Produces a DOCX package at `output` from an HWP/HWPX file at `input`.
pub trait Converter {
    /// Short backend name for messages.
    fn name(&self) -> &'static str;

    fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Selects a conversion backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConverterKind {
    /// Full-fidelity conversion through a headless office suite.
    #[default]
    Office,
    /// Text-only extraction; no images, tables or styles.
    Text,
}

impl ConverterKind {
    /// Builds the converter for this kind.
    pub fn build(self, office_program: &Path) -> Box<dyn Converter> {
        match self {
            ConverterKind::Office => Box::new(OfficeConverter::new(office_program)),
            ConverterKind::Text => Box::new(TextConverter),
        }
    }
}

/// Makes `path` absolute against the current directory without touching the
/// file system.
pub(crate) fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
