//! The core object model: binary decoding, the schema registry, component
//! base data, the tagged object variant and dependency sorting.

pub mod component;
pub mod dependency;
pub mod object;
pub mod reader;
pub mod registry;

pub use component::{Component, Dirt};
pub use object::CoreObject;
pub use reader::BinaryReader;
pub use registry::{FieldType, PropertyValue};
