use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::UnknownKind;

/// The kinds of entity the OSM API serves under `/api/0.6/{kind}/{id}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Node,
    Way,
    Relation,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Node, Kind::Way, Kind::Relation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Node => "node",
            Kind::Way => "way",
            Kind::Relation => "relation",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Identifies one remote entity. Two references are equal iff kind and id are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef {
    pub kind: Kind,
    pub identifier: u64,
}

impl EntityRef {
    pub const fn new(kind: Kind, identifier: u64) -> Self {
        EntityRef { kind, identifier }
    }

    pub const fn node(identifier: u64) -> Self {
        EntityRef::new(Kind::Node, identifier)
    }

    /// Path segment substituted into `{base}/api/0.6/{path}`.
    pub fn api_path(&self) -> String {
        format!("{}/{}", self.kind, self.identifier)
    }

    /// Fixture file name. The id is zero padded to 12 digits so lexical and
    /// numeric order agree.
    pub fn file_name(&self) -> String {
        format!("{}{:012}.xml", self.kind, self.identifier)
    }
}

impl Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn kind_round_trips_through_its_name() {
        for kind in Kind::ALL {
            assert_eq!(kind.as_str().parse::<Kind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = "changeset".parse::<Kind>().unwrap_err();
        assert_eq!(err, UnknownKind("changeset".to_string()));
        assert!("Node".parse::<Kind>().is_err());
    }

    #[test]
    fn file_name_pads_identifier_to_twelve_digits() {
        assert_eq!(
            EntityRef::new(Kind::Way, 5).file_name(),
            "way000000000005.xml"
        );
        assert_eq!(EntityRef::node(0).file_name(), "node000000000000.xml");
        assert_eq!(
            EntityRef::new(Kind::Relation, 999_999_999_999).file_name(),
            "relation999999999999.xml"
        );
    }

    #[test]
    fn file_names_are_distinct_and_fixed_width() {
        let ids = [
            0u64,
            1,
            9,
            10,
            11,
            100,
            12_345,
            1_000_000,
            11_000_000_000,
            999_999_999_999,
        ];
        let names: HashSet<String> = ids
            .iter()
            .map(|id| EntityRef::node(*id).file_name())
            .collect();
        assert_eq!(names.len(), ids.len());
        for name in &names {
            let digits = &name["node".len()..name.len() - ".xml".len()];
            assert_eq!(digits.len(), 12);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn lexical_order_of_file_names_follows_numeric_order() {
        let mut names: Vec<String> = [300u64, 20, 1]
            .iter()
            .map(|id| EntityRef::node(*id).file_name())
            .collect();
        names.sort();
        assert_eq!(
            names,
            ["node000000000001.xml", "node000000000020.xml", "node000000000300.xml"]
        );
    }

    #[test]
    fn api_path_uses_plain_identifier() {
        assert_eq!(EntityRef::new(Kind::Relation, 42).api_path(), "relation/42");
        assert_eq!(EntityRef::new(Kind::Way, 7).to_string(), "way/7");
    }

    #[test]
    fn equality_needs_both_fields() {
        assert_eq!(EntityRef::node(1), EntityRef::new(Kind::Node, 1));
        assert_ne!(EntityRef::node(1), EntityRef::new(Kind::Way, 1));
        assert_ne!(EntityRef::node(1), EntityRef::node(2));
    }
}
