//! Text-only conversion: plain text is extracted from the HWP/HWPX file and
//! written as one DOCX paragraph per line. Images, tables and styles are not
//! carried over.

use super::Converter;
use crate::{error::Error, Result};
use rs_docx::document::Paragraph;
use rs_docx::Docx;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextConverter;

impl Converter for TextConverter {
    fn name(&self) -> &'static str {
        "text"
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        let text = extract_text(input)?;
        let paragraphs = write_text_docx(&text, output)?;
        log::debug!("wrote {paragraphs} text paragraphs to {}", output.display());
        Ok(())
    }
}

#[cfg(feature = "hwp")]
fn extract_text(input: &Path) -> Result<String> {
    let document = unhwp::parse_file(input).map_err(|e| Error::ConversionFailed {
        backend: "text".to_owned(),
        reason: format!("{}: {e}", input.display()),
    })?;
    Ok(document.plain_text())
}

#[cfg(not(feature = "hwp"))]
fn extract_text(_input: &Path) -> Result<String> {
    Err(Error::UnavailableBackend(
        "text mode needs HWP support; rebuild with `--features hwp`".to_owned(),
    ))
}

/// Writes every non-blank line of `text`, trimmed, as a paragraph of a new
/// DOCX package at `output`. Returns the number of paragraphs written.
pub fn write_text_docx(text: &str, output: &Path) -> Result<usize> {
    let mut docx = Docx::default();
    let mut count = 0;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        docx.document
            .push(Paragraph::default().push_text(line.to_owned()));
        count += 1;
    }
    docx.write_file(output)
        .map_err(|e| Error::Package(format!("{}: {e:?}", output.display())))?;
    Ok(count)
}
