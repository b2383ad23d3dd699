//! Strongly-typed initializer structs.

use crate::container::PropertyContainer;
use crate::error::PropertyResult;
use std::fmt;

/// A plugin's own configuration type.
///
/// Implementors are plain structs of [`Property`](crate::Property) fields.
/// `Default` must produce one slot per field in a fixed declaration order, and
/// the two conversions must use the same field names.
///
/// ```
/// use dp_property::{Initializer, Property, PropertyContainer, PropertyResult};
///
/// #[derive(Debug, Clone)]
/// struct PendulumInitializer {
///     length: Property<f64>,
/// }
///
/// impl Default for PendulumInitializer {
///     fn default() -> Self {
///         Self { length: Property::with_value("length", false, 1.0) }
///     }
/// }
///
/// impl Initializer for PendulumInitializer {
///     const CONTAINER_NAME: &'static str = "Pendulum";
///
///     fn into_container(self) -> PropertyContainer {
///         PropertyContainer::new(Self::CONTAINER_NAME).with(self.length)
///     }
///
///     fn from_container(mut container: PropertyContainer) -> PropertyResult<Self> {
///         Ok(Self { length: container.take("length")? })
///     }
/// }
///
/// let c = PendulumInitializer::default().into_container();
/// assert_eq!(c.get::<f64>("length").unwrap(), 1.0);
/// ```
pub trait Initializer: Default + Clone + fmt::Debug + 'static {
    /// Canonical container name; equal names mean equal shape.
    const CONTAINER_NAME: &'static str;

    /// Erase into a container named [`Self::CONTAINER_NAME`].
    fn into_container(self) -> PropertyContainer;

    /// Rebuild from a container of this exact shape, moving its slots.
    fn from_container(container: PropertyContainer) -> PropertyResult<Self>;

    fn to_container(&self) -> PropertyContainer {
        self.clone().into_container()
    }
}
