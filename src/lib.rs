//! Materializes OpenStreetMap entities and everything they reference as
//! canonical, diff-friendly XML fixtures.
//!
//! An [`EntityRef`] names one remote entity. [`ClosureFetcher`] pulls it from
//! an [`EntitySource`] (normally [`OsmClient`]), writes the canonical record
//! and follows its node references until the closure is complete.

pub mod error;
pub mod fetcher;
pub mod osm;
pub mod settings;
pub mod types;
pub mod xml;

pub use error::{FetchError, SettingsError, UnknownKind, XmlError};
pub use fetcher::{ClosureFetcher, FetchReport, RecordOrigin, StoredRecord};
pub use osm::{EntitySource, OsmClient, RawResponse};
pub use settings::FetchSettings;
pub use types::{EntityRef, Kind};
