use crate::error::XmlError;
use crate::types::{EntityRef, Kind};

use super::tree::XmlElement;

/// What a canonical record says about itself and the entities it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRecord {
    pub entity: EntityRef,
    pub dependencies: Vec<EntityRef>,
}

/// Reads the root entity and its references from a record.
///
/// Every `nd` element yields a node reference. Relation `member` elements are
/// only followed when `follow_members` is set.
pub fn extract_dependencies(record: &str, follow_members: bool) -> Result<ParsedRecord, XmlError> {
    let root = XmlElement::parse_fragment(record)?;
    let kind: Kind = root.name.parse()?;
    let entity = EntityRef::new(kind, parse_identifier(root.required_attribute("id")?)?);

    let mut dependencies = Vec::new();
    for element in root.descendants() {
        match element.name.as_str() {
            "nd" => {
                let identifier = parse_identifier(element.required_attribute("ref")?)?;
                dependencies.push(EntityRef::node(identifier));
            }
            "member" if follow_members => {
                let kind: Kind = element.required_attribute("type")?.parse()?;
                let identifier = parse_identifier(element.required_attribute("ref")?)?;
                dependencies.push(EntityRef::new(kind, identifier));
            }
            _ => {}
        }
    }

    Ok(ParsedRecord { entity, dependencies })
}

fn parse_identifier(value: &str) -> Result<u64, XmlError> {
    value
        .trim()
        .parse()
        .map_err(|_| XmlError::InvalidIdentifier(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELATION: &str = r#"<relation id="77" visible="true" version="1">
  <member type="way" ref="5" role="outer"/>
  <member type="node" ref="30" role="label"/>
  <member type="relation" ref="78" role=""/>
  <tag k="type" v="multipolygon"/>
</relation>
"#;

    #[test]
    fn node_without_references_has_no_dependencies() {
        let record = "<node id=\"10\" lat=\"1\" lon=\"2\">\n  <tag k=\"a\" v=\"b\"/>\n</node>\n";
        let parsed = extract_dependencies(record, false).unwrap();
        assert_eq!(parsed.entity, EntityRef::node(10));
        assert!(parsed.dependencies.is_empty());
    }

    #[test]
    fn way_yields_one_node_per_nd_in_order() {
        let record = "<way id=\"5\">\n  <nd ref=\"20\"/>\n  <nd ref=\"10\"/>\n\
                      \x20 <tag k=\"x\" v=\"y\"/>\n  <nd ref=\"20\"/>\n</way>\n";
        let parsed = extract_dependencies(record, false).unwrap();
        assert_eq!(parsed.entity, EntityRef::new(Kind::Way, 5));
        assert_eq!(
            parsed.dependencies,
            vec![EntityRef::node(20), EntityRef::node(10), EntityRef::node(20)]
        );
    }

    #[test]
    fn members_are_ignored_unless_requested() {
        let parsed = extract_dependencies(RELATION, false).unwrap();
        assert_eq!(parsed.entity, EntityRef::new(Kind::Relation, 77));
        assert!(parsed.dependencies.is_empty());
    }

    #[test]
    fn members_are_followed_when_requested() {
        let parsed = extract_dependencies(RELATION, true).unwrap();
        assert_eq!(
            parsed.dependencies,
            vec![
                EntityRef::new(Kind::Way, 5),
                EntityRef::node(30),
                EntityRef::new(Kind::Relation, 78),
            ]
        );
    }

    #[test]
    fn missing_id_is_a_lookup_error() {
        let err = extract_dependencies("<way>\n  <nd ref=\"1\"/>\n</way>\n", false).unwrap_err();
        assert!(matches!(
            err,
            XmlError::MissingAttribute { ref attribute, .. } if attribute == "id"
        ));
    }

    #[test]
    fn missing_ref_is_a_lookup_error() {
        let err = extract_dependencies("<way id=\"1\">\n  <nd/>\n</way>\n", false).unwrap_err();
        assert!(matches!(err, XmlError::MissingAttribute { ref element, .. } if element == "nd"));
    }

    #[test]
    fn non_numeric_reference_is_rejected() {
        let record = "<way id=\"1\">\n  <nd ref=\"abc\"/>\n</way>\n";
        let err = extract_dependencies(record, false).unwrap_err();
        assert!(matches!(err, XmlError::InvalidIdentifier(ref value) if value == "abc"));
    }

    #[test]
    fn unknown_root_element_is_rejected() {
        let err = extract_dependencies("<changeset id=\"1\"/>\n", false).unwrap_err();
        assert!(matches!(err, XmlError::UnknownKind(_)));
    }
}
