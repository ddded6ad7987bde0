//! XML layer: the parsed response tree and its conversion into structured data.
//!
//! Every API response is parsed into an [`XmlNode`] tree first. Raw-mode calls
//! return that tree as-is; every other call converts it with
//! [`XmlNode::to_value`] and, for typed results, deserializes the value through
//! the helpers in [`coerce`].

pub mod coerce;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::{Map, Value};

/// Key under which [`XmlNode::to_value`] stores element attributes.
pub const ATTRIBUTES_KEY: &str = "@attributes";
/// Key under which [`XmlNode::to_value`] stores text of mixed-content elements.
pub const TEXT_KEY: &str = "#text";

#[derive(Debug, thiserror::Error)]
/// Errors produced while parsing a response body as XML.
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("element <{0}> is not closed")]
    Unclosed(String),

    #[error("closing tag without a matching opening tag")]
    UnexpectedEnd,

    #[error("text outside of the root element")]
    StrayText,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// One element of a parsed response document.
///
/// Text is trimmed and unescaped; CDATA sections are appended to the text.
/// Comments, processing instructions and the XML declaration are dropped.
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Create an empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Walk down a path of element names, taking the first match at each level.
    ///
    /// An empty path returns `self`.
    pub fn find(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter()
            .try_fold(self, |node, name| node.child(name))
    }

    /// Value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `true` when the element has neither text, attributes nor children.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.attributes.is_empty() && self.children.is_empty()
    }

    /// Convert this element into nested maps, sequences and string leaves.
    ///
    /// - text-only element: string
    /// - empty element: empty object
    /// - element with children or attributes: object keyed by child name;
    ///   repeated siblings become an array in document order; attributes live
    ///   under [`ATTRIBUTES_KEY`] and non-empty text under [`TEXT_KEY`]
    pub fn to_value(&self) -> Value {
        if self.children.is_empty() && self.attributes.is_empty() {
            if self.text.is_empty() {
                return Value::Object(Map::new());
            }
            return Value::String(self.text.clone());
        }

        let mut map = Map::new();
        if !self.attributes.is_empty() {
            let attributes = self
                .attributes
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            map.insert(ATTRIBUTES_KEY.to_owned(), Value::Object(attributes));
        }

        for child in &self.children {
            let value = child.to_value();
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }

        if !self.text.is_empty() {
            map.insert(TEXT_KEY.to_owned(), Value::String(self.text.clone()));
        }

        Value::Object(map)
    }
}

/// Parse a response body into its root element.
pub fn parse(body: &str) -> Result<XmlNode, XmlError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::MultipleRoots);
                }
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::MultipleRoots);
                }
                let node = open_element(&start)?;
                close_element(node, &mut stack, &mut root);
            }
            Event::End(_) => {
                let node = stack.pop().ok_or(XmlError::UnexpectedEnd)?;
                close_element(node, &mut stack, &mut root);
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(cdata) => {
                let bytes = cdata.into_inner();
                append_text(&mut stack, &String::from_utf8_lossy(&bytes))?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlNode, XmlError> {
    let mut node = XmlNode::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn close_element(node: XmlNode, stack: &mut [XmlNode], root: &mut Option<XmlNode>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn append_text(stack: &mut [XmlNode], text: &str) -> Result<(), XmlError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(node) => {
            node.text.push_str(text.trim());
            Ok(())
        }
        None => Err(XmlError::StrayText),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_nested_document_with_attributes() {
        let doc = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <page>
              <status><success>Device created</success></status>
              <payment currency="EUR"><amount>10.5</amount></payment>
            </page>"#,
        )
        .unwrap();

        assert_eq!(doc.name, "page");
        assert_eq!(
            doc.find(&["status", "success"]).map(|node| node.text.as_str()),
            Some("Device created")
        );
        assert_eq!(
            doc.child("payment").and_then(|node| node.attribute("currency")),
            Some("EUR")
        );
    }

    #[test]
    fn unescapes_entities_and_keeps_cdata() {
        let doc = parse("<a><b>R&amp;D</b><c><![CDATA[<raw>]]></c></a>").unwrap();
        assert_eq!(doc.child("b").unwrap().text, "R&D");
        assert_eq!(doc.child("c").unwrap().text, "<raw>");
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse("not xml at all").is_err());
        assert!(parse("").is_err());
        assert!(parse("<a><b></a>").is_err());
        assert!(parse("<a>").is_err());
        assert!(matches!(parse("<a/><b/>"), Err(XmlError::MultipleRoots)));
    }

    #[test]
    fn single_repeatable_child_stays_scalar_in_generic_form() {
        let doc = parse("<lcrs><lcr><id>1</id></lcr></lcrs>").unwrap();
        assert_eq!(doc.to_value(), json!({"lcr": {"id": "1"}}));
    }

    #[test]
    fn repeated_siblings_become_array_in_document_order() {
        let doc = parse(
            "<lcrs><lcr><id>1</id></lcr><lcr><id>2</id></lcr><lcr><id>3</id></lcr></lcrs>",
        )
        .unwrap();
        assert_eq!(
            doc.to_value(),
            json!({"lcr": [{"id": "1"}, {"id": "2"}, {"id": "3"}]})
        );
    }

    #[test]
    fn empty_elements_and_attributes_are_normalized() {
        let doc = parse(r#"<Invoices from="1" till="2"><note/></Invoices>"#).unwrap();
        assert_eq!(
            doc.to_value(),
            json!({"@attributes": {"from": "1", "till": "2"}, "note": {}})
        );

        let doc = parse(r#"<rate currency="USD">0.5</rate>"#).unwrap();
        assert_eq!(
            doc.to_value(),
            json!({"@attributes": {"currency": "USD"}, "#text": "0.5"})
        );
    }
}
