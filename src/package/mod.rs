//! DOCX package (OPC zip container) reading and writing.
//!
//! Entries are kept as raw bytes in archive order so that parts the
//! normalizer never touches are written back unchanged.

mod xml;

pub use self::xml::{XmlElement, XmlNode, XmlTree};

use crate::{error::Error, Result};
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

const PACKAGE_RELS: &str = "_rels/.rels";
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";
const STYLES_REL: &str = "/styles";
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const DEFAULT_STYLES_PART: &str = "word/styles.xml";

/// A single zip entry.
#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// The raw contents of a DOCX package.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<PackageEntry>,
}

impl DocxPackage {
    /// Creates an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a package from disk.
    ///
    /// A missing file or a file that is not a zip archive is reported as
    /// [`Error::Package`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::Package(format!(
                "{} does not exist or is not a file",
                path.display()
            )));
        }
        let file = File::open(path)?;
        Self::from_reader(file).map_err(|e| match e {
            Error::Package(reason) => Error::Package(format!("{}: {reason}", path.display())),
            other => other,
        })
    }

    /// Reads a package from any seekable source.
    ///
    /// Archive errors and corrupt entry data are reported as
    /// [`Error::Package`].
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = zip::ZipArchive::new(reader).map_err(invalid_archive)?;
        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive.by_index(index).map_err(invalid_archive)?;
            let mut data = Vec::with_capacity(file.size() as usize);
            if let Err(e) = file.read_to_end(&mut data) {
                return Err(Error::Package(format!("corrupt entry {}: {e}", file.name())));
            }
            entries.push(PackageEntry {
                name: file.name().to_owned(),
                data,
                compression: file.compression(),
                is_dir: file.is_dir(),
            });
        }
        Ok(Self { entries })
    }

    /// Writes the package to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.write_to(file)?;
        Ok(())
    }

    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = zip::ZipWriter::new(writer);
        for entry in &self.entries {
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
            } else {
                zip.start_file(entry.name.as_str(), options)?;
                zip.write_all(&entry.data)?;
            }
        }
        Ok(zip.finish()?)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.is_dir)
            .map(|e| e.name.as_str())
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| !e.is_dir && e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Replaces the bytes of `name`, appending a new deflated entry if the
    /// part does not exist yet.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| !e.is_dir && e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_owned(),
                data,
                compression: CompressionMethod::Deflated,
                is_dir: false,
            }),
        }
    }

    /// Name of the main document part.
    pub fn main_document_part(&self) -> String {
        self.relationship_target("", PACKAGE_RELS, OFFICE_DOCUMENT_REL)
            .filter(|name| self.part(name).is_some())
            .unwrap_or_else(|| DEFAULT_MAIN_PART.to_owned())
    }

    /// Name of the styles part belonging to `main_part`, if the package has
    /// one.
    pub fn styles_part(&self, main_part: &str) -> Option<String> {
        let (dir, file) = split_part_name(main_part);
        let rels = if dir.is_empty() {
            format!("_rels/{file}.rels")
        } else {
            format!("{dir}/_rels/{file}.rels")
        };
        self.relationship_target(dir, &rels, STYLES_REL)
            .or_else(|| Some(DEFAULT_STYLES_PART.to_owned()))
            .filter(|name| self.part(name).is_some())
    }

    /// Resolves the target of the first relationship in `rels_part` whose
    /// type ends with `type_suffix`, relative to `base_dir`.
    fn relationship_target(
        &self,
        base_dir: &str,
        rels_part: &str,
        type_suffix: &str,
    ) -> Option<String> {
        let tree = XmlTree::parse(self.part(rels_part)?).ok()?;
        let root = tree.root()?;
        let target = root
            .elements_named("Relationship")
            .filter(|rel| rel.attribute("TargetMode").as_deref() != Some("External"))
            .find(|rel| {
                rel.attribute("Type")
                    .is_some_and(|ty| ty.ends_with(type_suffix))
            })
            .and_then(|rel| rel.attribute("Target").map(|t| resolve_target(base_dir, &t)));
        target
    }
}

fn invalid_archive(err: zip::result::ZipError) -> Error {
    Error::Package(err.to_string())
}

fn split_part_name(name: &str) -> (&str, &str) {
    name.rsplit_once('/').unwrap_or(("", name))
}

/// Resolves a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_owned(),
        None if base_dir.is_empty() => target.to_owned(),
        None => format!("{base_dir}/{target}"),
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("", "/word/document.xml"), "word/document.xml");
        assert_eq!(resolve_target("word", "styles.xml"), "word/styles.xml");
        assert_eq!(resolve_target("word", "../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("word", "./media/../styles.xml"), "word/styles.xml");
    }

    #[test]
    fn test_parts_follow_relationships() {
        let mut package = DocxPackage::new();
        package.set_part(
            PACKAGE_RELS,
            br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="doc/main.xml"/></Relationships>"#.to_vec(),
        );
        package.set_part(
            "doc/_rels/main.xml.rels",
            br#"<Relationships><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="look.xml"/></Relationships>"#.to_vec(),
        );
        package.set_part("doc/main.xml", b"<w:document/>".to_vec());
        package.set_part("doc/look.xml", b"<w:styles/>".to_vec());

        let main = package.main_document_part();
        assert_eq!(main, "doc/main.xml");
        assert_eq!(package.styles_part(&main).as_deref(), Some("doc/look.xml"));
    }

    #[test]
    fn test_missing_relationships_fall_back_to_defaults() {
        let mut package = DocxPackage::new();
        package.set_part(DEFAULT_MAIN_PART, b"<w:document/>".to_vec());
        assert_eq!(package.main_document_part(), DEFAULT_MAIN_PART);
        assert_eq!(package.styles_part(DEFAULT_MAIN_PART), None);

        package.set_part(DEFAULT_STYLES_PART, b"<w:styles/>".to_vec());
        assert_eq!(
            package.styles_part(DEFAULT_MAIN_PART).as_deref(),
            Some(DEFAULT_STYLES_PART)
        );
    }

    #[test]
    fn test_write_and_read_back_preserves_entries() {
        let mut package = DocxPackage::new();
        package.set_part("[Content_Types].xml", b"<Types/>".to_vec());
        package.set_part("word/media/image1.png", vec![0x89, b'P', b'N', b'G', 0, 1, 2]);

        let cursor = package.write_to(Cursor::new(Vec::new())).unwrap();
        let reread = DocxPackage::from_reader(Cursor::new(cursor.into_inner())).unwrap();

        let names: Vec<_> = reread.part_names().collect();
        assert_eq!(names, ["[Content_Types].xml", "word/media/image1.png"]);
        assert_eq!(
            reread.part("word/media/image1.png"),
            Some(&[0x89, b'P', b'N', b'G', 0, 1, 2][..])
        );
    }

    #[test]
    fn test_corrupt_entry_data_is_a_package_error() {
        let mut package = DocxPackage::new();
        package.set_part("word/document.xml", b"<w:document>AAAAAAAAAAAAAAAA</w:document>".to_vec());
        package.entries[0].compression = CompressionMethod::Stored;

        let mut bytes = package.write_to(Cursor::new(Vec::new())).unwrap().into_inner();
        let start = bytes
            .windows(16)
            .position(|w| w == b"AAAAAAAAAAAAAAAA")
            .expect("stored payload");
        bytes[start..start + 16].copy_from_slice(b"BBBBBBBBBBBBBBBB");

        let err = DocxPackage::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::Package(_)), "{err}");
    }

    #[test]
    fn test_open_rejects_non_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-package.docx");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(matches!(DocxPackage::open(&path), Err(Error::Package(_))));
        assert!(matches!(
            DocxPackage::open(dir.path().join("missing.docx")),
            Err(Error::Package(_))
        ));
    }
}
