//! Property slots: the atomic unit of plugin configuration.
//!
//! [`PropertySlot`] is the type-erased view used by containers and the merge
//! protocol. [`Property<T>`] is the only implementation and actually stores a
//! value. Cross-slot copies check the concrete value type at runtime, so a
//! name collision between differently typed fields surfaces as
//! [`PropertyError::TypeMismatch`] instead of corrupting the destination.

use crate::error::{PropertyError, PropertyResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::Any;
use std::fmt;

/// Value types that can live inside a [`Property`].
pub trait PropertyValue:
    Clone + fmt::Debug + Default + Serialize + DeserializeOwned + 'static
{
    /// Human-readable type identity, used in diagnostics only.
    const TYPE_TAG: &'static str;
}

macro_rules! property_value {
    ($($ty:ty => $tag:literal),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                const TYPE_TAG: &'static str = $tag;
            }
        )*
    };
}

property_value! {
    f64 => "double",
    i64 => "int",
    bool => "bool",
    String => "string",
    Vec<f64> => "vector",
    Vec<String> => "string_list",
}

/// Type-erased, named, flagged value holder.
pub trait PropertySlot: fmt::Display + fmt::Debug {
    /// Unique key within the owning container.
    fn name(&self) -> &str;

    /// Declared value type, for printing.
    fn type_tag(&self) -> &str;

    /// Whether a value has ever been assigned.
    fn is_set(&self) -> bool;

    /// Whether absence of this field fails instantiation.
    fn is_required(&self) -> bool;

    /// Copy the value of `other` into `self` if `other` is set.
    ///
    /// Fails with [`PropertyError::TypeMismatch`] (leaving `self` untouched)
    /// when `other` stores a different value type.
    fn copy_values(&mut self, other: &dyn PropertySlot) -> PropertyResult<()>;

    /// Assign from a serialized value and mark the slot as set.
    fn assign_serialized(&mut self, value: serde_yaml::Value) -> PropertyResult<()>;

    /// Serialize the current value (set or not).
    fn to_serialized(&self) -> PropertyResult<serde_yaml::Value>;

    fn box_clone(&self) -> Box<dyn PropertySlot>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl Clone for Box<dyn PropertySlot> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// A slot storing a value of type `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property<T> {
    name: String,
    is_set: bool,
    is_required: bool,
    value: T,
}

impl<T: PropertyValue> Property<T> {
    /// Unset slot that must be supplied at instantiation time.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_set: false,
            is_required: true,
            value: T::default(),
        }
    }

    /// Unset slot that may be left out.
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_set: false,
            is_required: false,
            value: T::default(),
        }
    }

    /// Slot that starts out set to `value`.
    pub fn with_value(name: impl Into<String>, is_required: bool, value: T) -> Self {
        Self {
            name: name.into(),
            is_set: true,
            is_required,
            value,
        }
    }

    /// Current value. An unset slot reads as `T::default()` (or its declared default).
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn get(&self) -> T {
        self.value.clone()
    }

    /// Store `value` and mark the slot as set.
    pub fn assign(&mut self, value: T) {
        self.value = value;
        self.is_set = true;
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: PropertyValue> PropertySlot for Property<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_tag(&self) -> &str {
        T::TYPE_TAG
    }

    fn is_set(&self) -> bool {
        self.is_set
    }

    fn is_required(&self) -> bool {
        self.is_required
    }

    fn copy_values(&mut self, other: &dyn PropertySlot) -> PropertyResult<()> {
        let Some(source) = other.as_any().downcast_ref::<Property<T>>() else {
            return Err(PropertyError::TypeMismatch {
                name: self.name.clone(),
                expected: T::TYPE_TAG.to_string(),
                found: other.type_tag().to_string(),
            });
        };
        if source.is_set {
            self.value = source.value.clone();
            self.is_set = true;
        }
        Ok(())
    }

    fn assign_serialized(&mut self, value: serde_yaml::Value) -> PropertyResult<()> {
        let value: T = serde_yaml::from_value(value).map_err(|e| PropertyError::Serialization {
            name: self.name.clone(),
            message: format!("expected {}: {}", T::TYPE_TAG, e),
        })?;
        self.assign(value);
        Ok(())
    }

    fn to_serialized(&self) -> PropertyResult<serde_yaml::Value> {
        serde_yaml::to_value(&self.value).map_err(|e| PropertyError::Serialization {
            name: self.name.clone(),
            message: e.to_string(),
        })
    }

    fn box_clone(&self) -> Box<dyn PropertySlot> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl<T: PropertyValue> fmt::Display for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Property '{}' ({}) [{}, {}]",
            self.name,
            T::TYPE_TAG,
            if self.is_required { "required" } else { "optional" },
            if self.is_set { "set" } else { "unset" },
        )?;
        if self.is_set {
            write!(f, " = {:?}", self.value)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn assign_then_read_back(values in prop::collection::vec(any::<i64>(), 1..8)) {
            let mut p = Property::<i64>::required("x");
            for v in &values {
                p.assign(*v);
                prop_assert!(p.is_set());
                prop_assert_eq!(p.get(), *v);
            }
        }

        #[test]
        fn unset_source_never_changes_destination(start in any::<i64>()) {
            let mut dst = Property::with_value("x", false, start);
            let before = dst.clone();
            dst.copy_values(&Property::<i64>::optional("x")).unwrap();
            prop_assert_eq!(dst, before);
        }
    }
}
