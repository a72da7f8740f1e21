mod entity_types;

pub use entity_types::*;
