//! Schema-less tree view of an XML document.
//!
//! [`parse_document`] reads a response body with `quick-xml` and hands the
//! root element to [`convert`], which descends one level per nested element
//! and returns a fully owned [`XmlNode`] tree. Names are local names with
//! any namespace prefix removed.

use std::fmt;

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::DecodeError;

/// Deepest element nesting [`convert`] will descend into. The root element
/// is level 1.
pub const MAX_DEPTH: usize = 256;

/// One element of a decoded XML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    name: String,
    value: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Local tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text and CDATA content, concatenated in document order.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `(local name, value)` pairs in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    pub fn has_elements(&self) -> bool {
        !self.children.is_empty()
    }

    /// Value of the first attribute with the given local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    fn open(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let name = utf8(start.local_name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = utf8(attr.key.local_name().as_ref())?.to_string();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            value: String::new(),
            attributes,
            children: Vec::new(),
        })
    }
}

impl Serialize for XmlNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("XmlNode", 6)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("has_attributes", &self.has_attributes())?;
        state.serialize_field("attributes", &self.attributes)?;
        state.serialize_field("has_elements", &self.has_elements())?;
        state.serialize_field("elements", &self.children)?;
        state.end()
    }
}

/// Parse a whole document and convert its root element.
///
/// Fails when there is no root element, more than one, text outside the
/// root, or any well-formedness error reported by the reader.
pub fn parse_document(text: &str) -> Result<XmlNode, DecodeError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut root: Option<XmlNode> = None;
    loop {
        match next_event(&mut reader)? {
            Event::Start(start) => {
                ensure_single_root(&root)?;
                root = Some(convert(&mut reader, &start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&root)?;
                root = Some(XmlNode::open(&start)?);
            }
            Event::Text(text) if is_blank(&text) => {}
            Event::Text(_) | Event::CData(_) => {
                return Err(DecodeError::Shape(
                    "character data outside the root element".to_string(),
                ));
            }
            Event::End(end) => {
                return Err(DecodeError::Xml(format!(
                    "unexpected closing tag </{}>",
                    String::from_utf8_lossy(end.name().as_ref())
                )));
            }
            Event::Eof => break,
            // declaration, doctype, comments, processing instructions
            _ => {}
        }
    }

    root.ok_or_else(|| DecodeError::Shape("document has no root element".to_string()))
}

/// Convert the element opened by `start`, consuming events up to and
/// including its closing tag.
///
/// Whitespace-only text is ignored. Elements nested more than [`MAX_DEPTH`]
/// levels below `start` (counting `start` itself) fail with
/// [`DecodeError::Shape`].
pub fn convert(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<XmlNode, DecodeError> {
    convert_at(reader, start, 1)
}

fn convert_at(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    depth: usize,
) -> Result<XmlNode, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::Shape(format!(
            "element nesting exceeds {MAX_DEPTH} levels"
        )));
    }
    let mut node = XmlNode::open(start)?;
    loop {
        match next_event(reader)? {
            Event::Start(child) => node.children.push(convert_at(reader, &child, depth + 1)?),
            Event::Empty(child) => node.children.push(XmlNode::open(&child)?),
            Event::Text(text) => {
                if !is_blank(&text) {
                    node.value.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => node.value.push_str(utf8(&data)?),
            Event::End(_) => return Ok(node),
            Event::Eof => {
                return Err(DecodeError::Xml(format!(
                    "document ended inside <{}>",
                    node.name
                )));
            }
            _ => {}
        }
    }
}

fn next_event<'i>(reader: &mut Reader<&'i [u8]>) -> Result<Event<'i>, DecodeError> {
    match reader.read_event() {
        Ok(event) => Ok(event),
        Err(err) => Err(DecodeError::Xml(format!(
            "{err} (near byte {})",
            reader.buffer_position()
        ))),
    }
}

fn ensure_single_root(root: &Option<XmlNode>) -> Result<(), DecodeError> {
    match root {
        Some(existing) => Err(DecodeError::Shape(format!(
            "second root element after <{}>",
            existing.name
        ))),
        None => Ok(()),
    }
}

fn is_blank(text: &BytesText<'_>) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn utf8(bytes: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(bytes).map_err(xml_error)
}

fn xml_error(err: impl fmt::Display) -> DecodeError {
    DecodeError::Xml(err.to_string())
}
