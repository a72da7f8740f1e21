use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::XmlError;

/// Declaration line the pretty printer starts every document with.
pub const PRETTY_DECLARATION: &str = "<?xml version=\"1.0\" ?>\n";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

/// A parsed element with attributes kept in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn required_attribute(&self, name: &str) -> Result<&str, XmlError> {
        self.attribute(name).ok_or_else(|| XmlError::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    /// Every element below this one, in document order.
    pub fn descendants(&self) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        let mut pending: Vec<&XmlElement> = self.child_elements().rev().collect();
        while let Some(element) = pending.pop() {
            found.push(element);
            pending.extend(element.child_elements().rev());
        }
        found
    }

    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Parses text holding exactly one root element. Declarations, processing
    /// instructions and comments outside the root are ignored.
    pub fn parse_fragment(text: &str) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_str(text);
        let mut open: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let element = element_from_start(&start)?;
                    if open.is_empty() && root.is_some() {
                        return Err(XmlError::MultipleRoots(element.name));
                    }
                    open.push(element);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(element, &mut open, &mut root)?;
                }
                // The reader rejects end tags that do not match an open element.
                Event::End(_) => {
                    if let Some(element) = open.pop() {
                        attach(element, &mut open, &mut root)?;
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    push_text(&mut open, &text)?;
                }
                Event::CData(data) => {
                    let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    match open.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::CData(data)),
                        None => return Err(XmlError::StrayText(data)),
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = open.last_mut() {
                        let comment = String::from_utf8_lossy(&comment).into_owned();
                        parent.children.push(XmlNode::Comment(comment));
                    }
                }
                Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(unclosed) = open.pop() {
            return Err(XmlError::Unclosed(unclosed.name));
        }
        root.ok_or(XmlError::NoRootElement)
    }

    /// Renders the element as a pretty printed document, declaration first.
    ///
    /// Layout: one element per line, `indent` per level, childless elements
    /// self-closed, a lone text or CDATA child kept inline with its element.
    /// CDATA sections are written as they came, without indent or newline.
    pub fn to_pretty_xml(&self, indent: &str) -> String {
        let mut out = String::from(PRETTY_DECLARATION);
        self.write_pretty(&mut out, "", indent);
        out
    }

    fn write_pretty(&self, out: &mut String, current: &str, indent: &str) {
        out.push_str(current);
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_attribute(out, value);
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>\n");
            return;
        }
        out.push('>');

        match self.children.as_slice() {
            [XmlNode::Text(text)] => escape_text(out, text),
            [XmlNode::CData(data)] => push_cdata(out, data),
            _ => self.write_children(out, current, indent),
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push_str(">\n");
    }

    fn write_children(&self, out: &mut String, current: &str, indent: &str) {
        out.push('\n');
        let nested = format!("{current}{indent}");
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write_pretty(out, &nested, indent),
                XmlNode::Text(text) => {
                    out.push_str(&nested);
                    escape_text(out, text);
                    out.push('\n');
                }
                XmlNode::CData(data) => push_cdata(out, data),
                XmlNode::Comment(comment) => {
                    out.push_str(&nested);
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->\n");
                }
            }
        }
        out.push_str(current);
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    element: XmlElement,
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_some() => return Err(XmlError::MultipleRoots(element.name)),
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(open: &mut [XmlElement], text: &str) -> Result<(), XmlError> {
    let Some(parent) = open.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(XmlError::StrayText(text.to_string()));
    };
    // Adjacent text events form one node.
    if let Some(XmlNode::Text(previous)) = parent.children.last_mut() {
        previous.push_str(text);
    } else {
        parent.children.push(XmlNode::Text(text.to_string()));
    }
    Ok(())
}

fn push_cdata(out: &mut String, data: &str) {
    out.push_str("<![CDATA[");
    out.push_str(data);
    out.push_str("]]>");
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\r' => out.push_str("&#13;"),
            '\n' => out.push_str("&#10;"),
            '\t' => out.push_str("&#9;"),
            _ => escape_text(out, c.encode_utf8(&mut [0; 4])),
        }
    }
}
