//! In-memory view of a DOCX document: the default style plus paragraphs and
//! tables of the body, down to individual runs.

mod points;
mod properties;

pub use self::points::Points;
pub use self::properties::CharacterProps;

use self::properties::{read_font_name, read_size, PropsOwner};
use crate::package::{DocxPackage, XmlElement, XmlTree};
use crate::{error::Error, Result};
use std::fmt;
use std::path::Path;

const NORMAL_STYLE_NAME: &str = "Normal";

/// A loaded DOCX document.
///
/// Only the main document part and the styles part are parsed; every other
/// part stays raw inside the package.
#[derive(Debug, Clone)]
pub struct Document {
    package: DocxPackage,
    main_part: String,
    body: XmlTree,
    body_modified: bool,
    styles: Option<StylesPart>,
}

#[derive(Debug, Clone)]
struct StylesPart {
    name: String,
    tree: XmlTree,
    modified: bool,
}

/// Why the default style could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleLookupError {
    /// The package has no styles part.
    NoStylesPart,
    /// The styles part has no `Normal` or default paragraph style.
    NoDefaultStyle,
}

impl fmt::Display for StyleLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleLookupError::NoStylesPart => f.write_str("package has no styles part"),
            StyleLookupError::NoDefaultStyle => f.write_str("no default paragraph style"),
        }
    }
}

/// Position of a run inside the document, in traversal order terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunLocation {
    /// Run `run` of top-level block `block`.
    Paragraph { block: usize, run: usize },
    /// Run `run` of paragraph `paragraph` in cell (`row`, `cell`) of the table
    /// at top-level block `block`.
    TableCell {
        block: usize,
        row: usize,
        cell: usize,
        paragraph: usize,
        run: usize,
    },
}

impl fmt::Display for RunLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunLocation::Paragraph { block, run } => write!(f, "block {block}, run {run}"),
            RunLocation::TableCell {
                block,
                row,
                cell,
                paragraph,
                run,
            } => write!(
                f,
                "table at block {block}, row {row}, cell {cell}, paragraph {paragraph}, run {run}"
            ),
        }
    }
}

/// A run with mutable access to its character properties.
pub struct RunMut<'a> {
    location: RunLocation,
    props: CharacterProps<'a>,
}

impl<'a> RunMut<'a> {
    pub fn location(&self) -> RunLocation {
        self.location
    }

    pub fn props(&mut self) -> &mut CharacterProps<'a> {
        &mut self.props
    }
}

/// A top-level block of the body.
#[derive(Debug, Clone, Copy)]
pub enum Block<'a> {
    Paragraph(Paragraph<'a>),
    Table(Table<'a>),
}

#[derive(Debug, Clone, Copy)]
pub struct Paragraph<'a>(&'a XmlElement);

#[derive(Debug, Clone, Copy)]
pub struct Table<'a>(&'a XmlElement);

#[derive(Debug, Clone, Copy)]
pub struct Row<'a>(&'a XmlElement);

#[derive(Debug, Clone, Copy)]
pub struct Cell<'a>(&'a XmlElement);

#[derive(Debug, Clone, Copy)]
pub struct Run<'a>(&'a XmlElement);

/// Read-only view of a style.
#[derive(Debug, Clone, Copy)]
pub struct Style<'a>(&'a XmlElement);

impl<'a> Paragraph<'a> {
    pub fn runs(&self) -> impl Iterator<Item = Run<'a>> {
        self.0.elements_named("r").map(Run)
    }

    pub fn text(&self) -> String {
        self.runs().map(|run| run.text()).collect()
    }
}

impl<'a> Table<'a> {
    pub fn rows(&self) -> impl Iterator<Item = Row<'a>> {
        self.0.elements_named("tr").map(Row)
    }
}

impl<'a> Row<'a> {
    pub fn cells(&self) -> impl Iterator<Item = Cell<'a>> {
        self.0.elements_named("tc").map(Cell)
    }
}

impl<'a> Cell<'a> {
    pub fn paragraphs(&self) -> impl Iterator<Item = Paragraph<'a>> {
        self.0.elements_named("p").map(Paragraph)
    }
}

impl<'a> Run<'a> {
    pub fn text(&self) -> String {
        self.0.elements_named("t").map(XmlElement::text).collect()
    }

    pub fn font_name(&self) -> Option<String> {
        read_font_name(self.0)
    }

    pub fn east_asia_font(&self) -> Option<String> {
        let fonts = self.0.child("rPr")?.child("rFonts")?;
        fonts.attribute("eastAsia").map(|name| name.into_owned())
    }

    pub fn size(&self) -> std::result::Result<Option<Points>, String> {
        read_size(self.0)
    }

    /// The `w:rPr` element, if the run has one.
    pub fn properties(&self) -> Option<&'a XmlElement> {
        self.0.child("rPr")
    }
}

impl<'a> Style<'a> {
    pub fn style_id(&self) -> Option<String> {
        self.0.attribute("styleId").map(|id| id.into_owned())
    }

    pub fn font_name(&self) -> Option<String> {
        read_font_name(self.0)
    }

    pub fn east_asia_font(&self) -> Option<String> {
        let fonts = self.0.child("rPr")?.child("rFonts")?;
        fonts.attribute("eastAsia").map(|name| name.into_owned())
    }

    pub fn size(&self) -> std::result::Result<Option<Points>, String> {
        read_size(self.0)
    }
}

impl Document {
    /// Loads a DOCX package from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_package(DocxPackage::open(path)?)
    }

    /// Parses the main document and styles parts of `package`.
    pub fn from_package(package: DocxPackage) -> Result<Self> {
        let main_part = package.main_document_part();
        let bytes = package
            .part(&main_part)
            .ok_or_else(|| Error::Package(format!("missing main document part {main_part}")))?;
        let body = XmlTree::parse(bytes).map_err(|e| Error::Package(format!("{main_part}: {e}")))?;
        if body.root().and_then(|root| root.child("body")).is_none() {
            return Err(Error::Package(format!("{main_part} has no w:body")));
        }

        let styles = match package.styles_part(&main_part) {
            Some(name) => match package.part(&name).map(XmlTree::parse) {
                Some(Ok(tree)) => Some(StylesPart {
                    name,
                    tree,
                    modified: false,
                }),
                Some(Err(e)) => {
                    log::warn!("ignoring unreadable styles part {name}: {e}");
                    None
                }
                None => None,
            },
            None => None,
        };

        Ok(Self {
            package,
            main_part,
            body,
            body_modified: false,
            styles,
        })
    }

    /// Writes the document to `path` as a DOCX package.
    ///
    /// Parts that were not modified are copied byte for byte.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_package()?.save(path)
    }

    /// The package with all modifications applied.
    pub fn to_package(&self) -> Result<DocxPackage> {
        let mut package = self.package.clone();
        if self.body_modified {
            package.set_part(&self.main_part, self.body.to_bytes()?);
        }
        if let Some(styles) = self.styles.as_ref().filter(|s| s.modified) {
            package.set_part(&styles.name, styles.tree.to_bytes()?);
        }
        Ok(package)
    }

    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    fn body_element(&self) -> Option<&XmlElement> {
        self.body.root().and_then(|root| root.child("body"))
    }

    /// Top-level paragraphs and tables in document order.
    pub fn blocks(&self) -> Vec<Block<'_>> {
        let Some(body) = self.body_element() else {
            return Vec::new();
        };
        body.elements()
            .filter_map(|element| match element.local_name() {
                "p" => Some(Block::Paragraph(Paragraph(element))),
                "tbl" => Some(Block::Table(Table(element))),
                _ => None,
            })
            .collect()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = Paragraph<'_>> {
        self.blocks().into_iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = Table<'_>> {
        self.blocks().into_iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
    }

    /// Every run reachable from the body, in traversal order.
    pub fn runs(&self) -> Vec<Run<'_>> {
        let mut runs = Vec::new();
        for block in self.blocks() {
            match block {
                Block::Paragraph(paragraph) => runs.extend(paragraph.runs()),
                Block::Table(table) => {
                    for row in table.rows() {
                        for cell in row.cells() {
                            for paragraph in cell.paragraphs() {
                                runs.extend(paragraph.runs());
                            }
                        }
                    }
                }
            }
        }
        runs
    }

    /// Every run reachable from the body with mutable properties, in
    /// traversal order: blocks in document order, rows top-to-bottom, cells
    /// left-to-right, then paragraphs and runs in order.
    ///
    /// Marks the main document part as modified.
    pub fn runs_mut(&mut self) -> Vec<RunMut<'_>> {
        self.body_modified = true;
        let mut runs = Vec::new();
        let Some(body) = self.body.root_mut().and_then(|root| root.child_mut("body")) else {
            return runs;
        };

        let blocks = body
            .elements_mut()
            .filter(|e| matches!(e.local_name(), "p" | "tbl"));
        for (block_index, block) in blocks.enumerate() {
            if block.local_name() == "p" {
                runs.extend(paragraph_runs_mut(block, |run| RunLocation::Paragraph {
                    block: block_index,
                    run,
                }));
                continue;
            }

            for (row_index, row) in block.elements_named_mut("tr").enumerate() {
                for (cell_index, cell) in row.elements_named_mut("tc").enumerate() {
                    for (para_index, paragraph) in cell.elements_named_mut("p").enumerate() {
                        runs.extend(paragraph_runs_mut(paragraph, |run| {
                            RunLocation::TableCell {
                                block: block_index,
                                row: row_index,
                                cell: cell_index,
                                paragraph: para_index,
                                run,
                            }
                        }));
                    }
                }
            }
        }
        runs
    }

    /// The default paragraph style: the style named `Normal`, or else the
    /// paragraph style flagged as default.
    pub fn default_style(&self) -> std::result::Result<Style<'_>, StyleLookupError> {
        let styles = self.styles.as_ref().ok_or(StyleLookupError::NoStylesPart)?;
        let root = styles.tree.root().ok_or(StyleLookupError::NoDefaultStyle)?;
        let index = default_style_index(root).ok_or(StyleLookupError::NoDefaultStyle)?;
        root.elements_named("style")
            .nth(index)
            .map(Style)
            .ok_or(StyleLookupError::NoDefaultStyle)
    }

    /// Mutable properties of the default paragraph style.
    ///
    /// Marks the styles part as modified on success.
    pub fn default_style_mut(
        &mut self,
    ) -> std::result::Result<CharacterProps<'_>, StyleLookupError> {
        let styles = self.styles.as_mut().ok_or(StyleLookupError::NoStylesPart)?;
        let root = styles.tree.root_mut().ok_or(StyleLookupError::NoDefaultStyle)?;
        let index = default_style_index(root).ok_or(StyleLookupError::NoDefaultStyle)?;
        let style = root
            .elements_named_mut("style")
            .nth(index)
            .ok_or(StyleLookupError::NoDefaultStyle)?;
        styles.modified = true;
        Ok(CharacterProps::new(style, PropsOwner::Style))
    }
}

fn paragraph_runs_mut<'a>(
    paragraph: &'a mut XmlElement,
    location: impl Fn(usize) -> RunLocation,
) -> Vec<RunMut<'a>> {
    paragraph
        .elements_named_mut("r")
        .enumerate()
        .map(|(index, run)| RunMut {
            location: location(index),
            props: CharacterProps::new(run, PropsOwner::Run),
        })
        .collect()
}

/// Index among the `w:style` children of the default paragraph style.
fn default_style_index(styles: &XmlElement) -> Option<usize> {
    let mut flagged = None;
    for (index, style) in styles.elements_named("style").enumerate() {
        let name = style.child("name").and_then(|n| n.attribute("val"));
        if name.as_deref() == Some(NORMAL_STYLE_NAME) {
            return Some(index);
        }
        let is_paragraph = style.attribute("type").as_deref() == Some("paragraph");
        let is_default = matches!(style.attribute("default").as_deref(), Some("1" | "true" | "on"));
        if flagged.is_none() && is_paragraph && is_default {
            flagged = Some(index);
        }
    }
    flagged
}
