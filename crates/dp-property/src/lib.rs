//! dp-property: typed, named plugin properties behind a type-erased boundary.
//!
//! - property (`PropertySlot` trait object + `Property<T>`)
//! - container (`PropertyContainer`, by-name and declaration-order views)
//! - schema (field descriptors captured once per initializer type)
//! - initializer (`Initializer`, a plugin's own typed configuration)
//! - instantiable (`Instantiable` + `Capability`, direct and merge paths)

pub mod container;
pub mod error;
pub mod initializer;
pub mod instantiable;
pub mod property;
pub mod schema;

pub use container::PropertyContainer;
pub use error::{PropertyError, PropertyResult};
pub use initializer::Initializer;
pub use instantiable::{Capability, Instantiable, InstantiatePath, resolve};
pub use property::{Property, PropertySlot, PropertyValue};
pub use schema::{FieldDescriptor, Schema};

/// Name given to containers assembled generically (by loaders or factories)
/// rather than by a concrete initializer type. It never matches a canonical
/// name, so such containers always take the merge path.
pub const GENERIC_CONTAINER_NAME: &str = "Initializer";
