//! Canonical fixture form of OSM entity documents and the references they
//! carry. Both sides share the element tree in `tree`.

mod canonical;
mod dependencies;
mod tree;

pub use canonical::*;
pub use dependencies::*;
pub use tree::*;
