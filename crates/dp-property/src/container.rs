//! Named, ordered collections of property slots.

use crate::error::{PropertyError, PropertyResult};
use crate::property::{Property, PropertySlot, PropertyValue};
use std::collections::BTreeMap;
use std::fmt;

/// Type-erased view of one initializer.
///
/// Slots are kept in declaration order; a by-name index points into that
/// sequence. Every mutation updates both, so each name appears exactly once in
/// each view.
#[derive(Debug, Clone, Default)]
pub struct PropertyContainer {
    name: String,
    index: BTreeMap<String, usize>,
    ordered: Vec<Box<dyn PropertySlot>>,
}

impl PropertyContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: BTreeMap::new(),
            ordered: Vec::new(),
        }
    }

    /// Identity of the declaring initializer type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, slot: impl PropertySlot + 'static) -> Self {
        self.insert(Box::new(slot));
        self
    }

    /// Insert a slot, replacing (in place) any slot with the same name.
    pub fn insert(&mut self, slot: Box<dyn PropertySlot>) -> Option<Box<dyn PropertySlot>> {
        match self.index.get(slot.name()) {
            Some(&pos) => Some(std::mem::replace(&mut self.ordered[pos], slot)),
            None => {
                self.index.insert(slot.name().to_string(), self.ordered.len());
                self.ordered.push(slot);
                None
            }
        }
    }

    /// Remove a slot from both views.
    pub fn remove(&mut self, key: &str) -> Option<Box<dyn PropertySlot>> {
        let pos = self.index.remove(key)?;
        let slot = self.ordered.remove(pos);
        for idx in self.index.values_mut() {
            if *idx > pos {
                *idx -= 1;
            }
        }
        Some(slot)
    }

    pub fn slot(&self, key: &str) -> PropertyResult<&dyn PropertySlot> {
        self.index
            .get(key)
            .map(|&pos| self.ordered[pos].as_ref())
            .ok_or_else(|| PropertyError::missing(key, &self.name))
    }

    pub fn slot_mut(&mut self, key: &str) -> PropertyResult<&mut dyn PropertySlot> {
        match self.index.get(key) {
            Some(&pos) => Ok(self.ordered[pos].as_mut()),
            None => Err(PropertyError::missing(key, &self.name)),
        }
    }

    /// Typed lookup by name.
    pub fn property<T: PropertyValue>(&self, key: &str) -> PropertyResult<&Property<T>> {
        let slot = self.slot(key)?;
        slot.as_any()
            .downcast_ref::<Property<T>>()
            .ok_or_else(|| mismatch::<T>(slot))
    }

    /// Read the value stored under `key` as `T`.
    pub fn get<T: PropertyValue>(&self, key: &str) -> PropertyResult<T> {
        self.property::<T>(key).map(Property::get)
    }

    /// Assign `value` to the existing slot `key`.
    pub fn set<T: PropertyValue>(&mut self, key: &str, value: T) -> PropertyResult<()> {
        let slot = self.slot_mut(key)?;
        let found = slot.type_tag().to_string();
        match slot.as_any_mut().downcast_mut::<Property<T>>() {
            Some(prop) => {
                prop.assign(value);
                Ok(())
            }
            None => Err(PropertyError::TypeMismatch {
                name: key.to_string(),
                expected: T::TYPE_TAG.to_string(),
                found,
            }),
        }
    }

    /// Remove `key` and hand it back as a typed property.
    ///
    /// On a type mismatch the slot stays in the container.
    pub fn take<T: PropertyValue>(&mut self, key: &str) -> PropertyResult<Property<T>> {
        let slot = self.slot(key)?;
        if !slot.as_any().is::<Property<T>>() {
            return Err(mismatch::<T>(slot));
        }
        let slot = self
            .remove(key)
            .ok_or_else(|| PropertyError::missing(key, &self.name))?;
        slot.into_any()
            .downcast::<Property<T>>()
            .map(|boxed| *boxed)
            .map_err(|_| PropertyError::missing(key, &self.name))
    }

    /// By-name view, sorted by key.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &dyn PropertySlot)> + '_ {
        self.index
            .iter()
            .map(|(name, &pos)| (name.as_str(), self.ordered[pos].as_ref()))
    }

    /// Declaration-order view.
    pub fn properties_ordered(&self) -> impl Iterator<Item = &dyn PropertySlot> + '_ {
        self.ordered.iter().map(|slot| slot.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.ordered.iter().map(|slot| slot.name())
    }

    /// Names of required slots that were never assigned.
    pub fn missing_required(&self) -> Vec<&str> {
        self.ordered
            .iter()
            .filter(|slot| slot.is_required() && !slot.is_set())
            .map(|slot| slot.name())
            .collect()
    }

    /// Fail with [`PropertyError::Rejected`] if any required slot is unset.
    pub fn ensure_required_set(&self) -> PropertyResult<()> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PropertyError::Rejected {
                what: format!(
                    "'{}' requires unset properties: {}",
                    self.name,
                    missing.join(", ")
                ),
            })
        }
    }
}

fn mismatch<T: PropertyValue>(slot: &dyn PropertySlot) -> PropertyError {
    PropertyError::TypeMismatch {
        name: slot.name().to_string(),
        expected: T::TYPE_TAG.to_string(),
        found: slot.type_tag().to_string(),
    }
}

impl fmt::Display for PropertyContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Container '{}'", self.name)?;
        for slot in &self.ordered {
            writeln!(f, "  {}", slot)?;
        }
        Ok(())
    }
}
