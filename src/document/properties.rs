//! Font name and size editing on `w:rPr` character properties.

use super::Points;
use crate::package::XmlElement;

/// Children of `w:r`; run properties come first.
const RUN_CHILDREN: &[&str] = &["rPr"];

/// Children of `w:style` (CT_Style sequence).
const STYLE_CHILDREN: &[&str] = &[
    "name",
    "aliases",
    "basedOn",
    "next",
    "link",
    "autoRedefine",
    "hidden",
    "uiPriority",
    "semiHidden",
    "unhideWhenUsed",
    "qFormat",
    "locked",
    "personal",
    "personalCompose",
    "personalReply",
    "rsid",
    "pPr",
    "rPr",
    "tblPr",
    "trPr",
    "tcPr",
    "tblStylePr",
];

/// Children of `w:rPr` (CT_RPr sequence).
const RPR_CHILDREN: &[&str] = &[
    "rStyle",
    "rFonts",
    "b",
    "bCs",
    "i",
    "iCs",
    "caps",
    "smallCaps",
    "strike",
    "dstrike",
    "outline",
    "shadow",
    "emboss",
    "imprint",
    "noProof",
    "snapToGrid",
    "vanish",
    "webHidden",
    "color",
    "spacing",
    "w",
    "kern",
    "position",
    "sz",
    "szCs",
    "highlight",
    "u",
    "effect",
    "bdr",
    "shd",
    "fitText",
    "vertAlign",
    "rtl",
    "cs",
    "em",
    "lang",
    "eastAsianLayout",
    "specVanish",
    "oMath",
    "rPrChange",
];

/// Font slots written for a font name, with the theme attribute that would
/// otherwise take precedence over each.
const FONT_SLOTS: &[(&str, &str)] = &[
    ("ascii", "asciiTheme"),
    ("hAnsi", "hAnsiTheme"),
    ("eastAsia", "eastAsiaTheme"),
];

/// The kind of element that owns a `w:rPr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropsOwner {
    Run,
    Style,
}

impl PropsOwner {
    fn children(self) -> &'static [&'static str] {
        match self {
            PropsOwner::Run => RUN_CHILDREN,
            PropsOwner::Style => STYLE_CHILDREN,
        }
    }
}

/// Character properties of a run or style, edited in place.
///
/// Reads never create elements; writes create `w:rPr`, `w:rFonts` and `w:sz`
/// at their schema position when missing.
pub struct CharacterProps<'a> {
    owner: &'a mut XmlElement,
    kind: PropsOwner,
}

impl<'a> CharacterProps<'a> {
    pub(crate) fn new(owner: &'a mut XmlElement, kind: PropsOwner) -> Self {
        Self { owner, kind }
    }

    /// Latin font name, falling back to the East-Asian slot.
    pub fn font_name(&self) -> Option<String> {
        read_font_name(self.owner)
    }

    pub fn east_asia_font(&self) -> Option<String> {
        let fonts = self.owner.child("rPr")?.child("rFonts")?;
        fonts.attribute("eastAsia").map(|name| name.into_owned())
    }

    /// Explicit size override.
    ///
    /// `Ok(None)` means no `w:sz`; `Err` carries a value that could not be
    /// parsed.
    pub fn size(&self) -> Result<Option<Points>, String> {
        read_size(self.owner)
    }

    /// Writes `name` into the Latin and East-Asian font slots.
    pub fn set_font_name(&mut self, name: &str) {
        let fonts = self.rpr().ensure_child("rFonts", RPR_CHILDREN);
        for (slot, theme) in FONT_SLOTS {
            fonts.set_attribute(slot, name);
            fonts.remove_attribute(theme);
        }
    }

    pub fn set_size(&mut self, size: Points) {
        self.rpr()
            .ensure_child("sz", RPR_CHILDREN)
            .set_attribute("val", &size.half_points().to_string());
    }

    fn rpr(&mut self) -> &mut XmlElement {
        self.owner.ensure_child("rPr", self.kind.children())
    }
}

pub(crate) fn read_font_name(owner: &XmlElement) -> Option<String> {
    let fonts = owner.child("rPr")?.child("rFonts")?;
    fonts
        .attribute("ascii")
        .or_else(|| fonts.attribute("eastAsia"))
        .map(|name| name.into_owned())
}

pub(crate) fn read_size(owner: &XmlElement) -> Result<Option<Points>, String> {
    let Some(sz) = owner.child("rPr").and_then(|rpr| rpr.child("sz")) else {
        return Ok(None);
    };
    let raw = sz.attribute("val").ok_or("w:sz without w:val")?;
    Points::parse_half_point_measure(&raw)
        .map(Some)
        .ok_or_else(|| format!("unreadable font size '{raw}'"))
}
