//! Lossless element tree over a single XML part.
//!
//! Only elements are modelled; every other event (text, entity references,
//! comments, declarations, ...) is kept as the original `quick_xml` event and
//! written back unchanged. Attribute values are stored still escaped.

use crate::{error::Error, Result};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

/// A parsed XML part.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlTree {
    nodes: Vec<XmlNode>,
}

/// A node of an [`XmlTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Event(Event<'static>),
}

/// An element with its qualified name, raw attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
    self_closing: bool,
}

impl XmlTree {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut nodes = Vec::new();

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::Xml(format!("at byte {position}: {e}")))?;
            match event {
                Event::Start(start) => stack.push(XmlElement::from_start(&start, false)?),
                Event::Empty(start) => {
                    let element = XmlElement::from_start(&start, true)?;
                    attach(&mut stack, &mut nodes, XmlNode::Element(element));
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        Error::Xml(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(end.name().as_ref())
                        ))
                    })?;
                    attach(&mut stack, &mut nodes, XmlNode::Element(element));
                }
                Event::Eof => break,
                other => attach(&mut stack, &mut nodes, XmlNode::Event(other.into_owned())),
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(Error::Xml(format!("unclosed element <{}>", open.name)));
        }

        Ok(Self { nodes })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.nodes {
            write_node(&mut writer, node)?;
        }
        Ok(writer.into_inner())
    }

    /// The document element.
    pub fn root(&self) -> Option<&XmlElement> {
        self.nodes.iter().find_map(XmlNode::as_element)
    }

    pub fn root_mut(&mut self) -> Option<&mut XmlElement> {
        self.nodes.iter_mut().find_map(XmlNode::as_element_mut)
    }
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            XmlNode::Event(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            XmlNode::Event(_) => None,
        }
    }
}

impl XmlElement {
    /// Creates an empty element that serializes as `<name/>` until it gets
    /// children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
        }
    }

    fn from_start(start: &BytesStart<'_>, self_closing: bool) -> Result<Self> {
        let name = utf8(start.name().as_ref())?.to_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::Xml(format!("<{name}>: {e}")))?;
            attributes.push((
                utf8(attr.key.as_ref())?.to_owned(),
                utf8(&attr.value)?.to_owned(),
            ));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            self_closing,
        })
    }

    /// Qualified name, e.g. `w:rPr`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Qualifies `local` with this element's prefix.
    pub fn qualify(&self, local: &str) -> String {
        match self.prefix() {
            Some(prefix) => format!("{prefix}:{local}"),
            None => local.to_owned(),
        }
    }

    /// Raw (escaped) value of the attribute whose local name is `local`.
    pub fn raw_attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == local)
            .map(|(_, value)| value.as_str())
    }

    /// Unescaped value of the attribute whose local name is `local`.
    pub fn attribute(&self, local: &str) -> Option<Cow<'_, str>> {
        let raw = self.raw_attribute(local)?;
        Some(unescape(raw).unwrap_or(Cow::Borrowed(raw)))
    }

    /// Sets an attribute, matching existing attributes by local name and
    /// creating it with this element's prefix otherwise.
    pub fn set_attribute(&mut self, local: &str, value: &str) {
        let escaped = escape(value).into_owned();
        if let Some(slot) = self
            .attributes
            .iter_mut()
            .find(|(key, _)| local_part(key) == local)
        {
            slot.1 = escaped;
        } else {
            let key = self.qualify(local);
            self.attributes.push((key, escaped));
        }
    }

    pub fn remove_attribute(&mut self, local: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(key, _)| local_part(key) != local);
        before != self.attributes.len()
    }

    /// Child elements, skipping text and other events.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(XmlNode::as_element_mut)
    }

    /// Child elements with the given local name.
    pub fn elements_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.local_name() == local)
    }

    pub fn elements_named_mut<'a>(
        &'a mut self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |e| e.local_name() == local)
    }

    /// First child element with the given local name.
    pub fn child(&self, local: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.local_name() == local)
    }

    pub fn child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.local_name() == local)
    }

    /// Returns the child `local`, inserting an empty one first if missing.
    ///
    /// `order` lists the local names of the schema sequence the child belongs
    /// to. The new element goes before the first sibling that comes later in
    /// that sequence; siblings missing from `order` count as coming last.
    pub fn ensure_child(&mut self, local: &str, order: &[&str]) -> &mut XmlElement {
        let index = match self.position_of(local) {
            Some(index) => index,
            None => {
                let rank = rank_in(order, local);
                let index = self
                    .children
                    .iter()
                    .position(|node| {
                        node.as_element()
                            .is_some_and(|e| rank_in(order, e.local_name()) > rank)
                    })
                    .unwrap_or(self.children.len());
                let element = XmlElement::new(self.qualify(local));
                self.children.insert(index, XmlNode::Element(element));
                index
            }
        };
        match &mut self.children[index] {
            XmlNode::Element(element) => element,
            XmlNode::Event(_) => unreachable!("index points at an element"),
        }
    }

    fn position_of(&self, local: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| node.as_element().is_some_and(|e| e.local_name() == local))
    }

    /// Concatenated text content of all descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Element(element) => element.collect_text(out),
                XmlNode::Event(Event::Text(text)) => {
                    let raw = String::from_utf8_lossy(&text[..]);
                    out.push_str(&unescape(&raw).unwrap_or(Cow::Borrowed(&raw)));
                }
                XmlNode::Event(Event::CData(data)) => {
                    out.push_str(&String::from_utf8_lossy(&data[..]));
                }
                XmlNode::Event(Event::GeneralRef(reference)) => {
                    let raw = format!("&{};", String::from_utf8_lossy(&reference[..]));
                    out.push_str(&unescape(&raw).unwrap_or(Cow::Borrowed(&raw)));
                }
                XmlNode::Event(_) => {}
            }
        }
    }
}

fn attach(stack: &mut [XmlElement], nodes: &mut Vec<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => {
            parent.self_closing = false;
            parent.children.push(node);
        }
        None => nodes.push(node),
    }
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &XmlNode) -> Result<()> {
    match node {
        XmlNode::Event(event) => writer.write_event(event.clone()).map_err(xml_error),
        XmlNode::Element(element) => {
            let mut start = BytesStart::new(element.name.as_str());
            for (key, value) in &element.attributes {
                // Values read from single-quoted attributes may hold a bare `"`.
                let value: Cow<'_, str> = if value.contains('"') {
                    Cow::Owned(value.replace('"', "&quot;"))
                } else {
                    Cow::Borrowed(value)
                };
                start.push_attribute(Attribute {
                    key: QName(key.as_bytes()),
                    value: match value {
                        Cow::Borrowed(v) => Cow::Borrowed(v.as_bytes()),
                        Cow::Owned(v) => Cow::Owned(v.into_bytes()),
                    },
                });
            }

            if element.children.is_empty() && element.self_closing {
                return writer.write_event(Event::Empty(start)).map_err(xml_error);
            }

            writer.write_event(Event::Start(start)).map_err(xml_error)?;
            for child in &element.children {
                write_node(writer, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(element.name.as_str())))
                .map_err(xml_error)
        }
    }
}

fn xml_error(err: impl std::fmt::Display) -> Error {
    Error::Xml(err.to_string())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(xml_error)
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn rank_in(order: &[&str], local: &str) -> usize {
    order
        .iter()
        .position(|candidate| *candidate == local)
        .unwrap_or(usize::MAX)
}
