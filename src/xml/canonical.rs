use crate::error::XmlError;

use super::tree::{PRETTY_DECLARATION, XmlElement};

pub const INDENT: &str = "  ";

//------------------------------------------------------------------------------
// Functions
//------------------------------------------------------------------------------

/// Turns a raw API response into the fixture form of its entity: the envelope
/// and declaration are dropped, the remaining lines are trimmed and joined, and
/// the fragment is pretty printed with two-space indentation.
pub fn canonicalize(raw: &str) -> Result<String, XmlError> {
    let fragment = strip_envelope(raw);
    let root = XmlElement::parse_fragment(&fragment)?;
    let mut pretty = root.to_pretty_xml(INDENT);
    Ok(pretty.split_off(PRETTY_DECLARATION.len()))
}

/// Keeps the lines between the `<osm>` envelope tags, trimmed and concatenated.
pub fn strip_envelope(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_declaration(line) && !is_envelope(line))
        .collect()
}

fn is_declaration(line: &str) -> bool {
    line.starts_with("<?xml")
}

fn is_envelope(line: &str) -> bool {
    line.starts_with("<osm") || line == "</osm>"
}
