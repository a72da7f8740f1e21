use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::EntityRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown entity kind '{0}' (expected node, way or relation)")]
pub struct UnknownKind(pub String);

/// Failures while turning a response body or a record file into structure.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Malformed(#[from] quick_xml::Error),
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("document has no root element")]
    NoRootElement,
    #[error("document has more than one root element (second one is <{0}>)")]
    MultipleRoots(String),
    #[error("text outside of the root element: {0:?}")]
    StrayText(String),
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("element <{element}> has no '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },
    #[error("'{0}' is not a valid entity identifier")]
    InvalidIdentifier(String),
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),
}

/// Errors that abort a closure fetch. Each message already carries its cause,
/// so callers print it once.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for {entity} failed: {source}")]
    Transport {
        entity: EntityRef,
        #[source]
        source: ureq::Error,
    },
    #[error("remote service answered {status} for {entity}")]
    Status { entity: EntityRef, status: u16 },
    #[error("could not process {entity}: {source}")]
    Xml {
        entity: EntityRef,
        #[source]
        source: XmlError,
    },
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
