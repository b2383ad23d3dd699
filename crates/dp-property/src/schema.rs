//! Explicit per-type schemas.
//!
//! A [`Schema`] is captured once from a default-constructed initializer and
//! then passed wherever two containers have to be matched by name.

use crate::container::PropertyContainer;
use crate::error::{PropertyError, PropertyResult};
use crate::initializer::Initializer;
use crate::property::PropertySlot;
use std::fmt;
use tracing::{debug, warn};

/// Declaration of one field of an initializer type.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    type_tag: String,
    required: bool,
    prototype: Box<dyn PropertySlot>,
}

impl FieldDescriptor {
    fn from_slot(slot: &dyn PropertySlot) -> Self {
        Self {
            name: slot.name().to_string(),
            type_tag: slot.type_tag().to_string(),
            required: slot.is_required(),
            prototype: slot.box_clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the declaring type supplies a default value.
    pub fn has_default(&self) -> bool {
        self.prototype.is_set()
    }

    /// A fresh slot of this field's value type, holding its declared default.
    pub fn fresh_slot(&self) -> Box<dyn PropertySlot> {
        self.prototype.box_clone()
    }
}

/// Ordered field list of one initializer type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Capture the schema of `C` from its default instance.
    pub fn of<C: Initializer>() -> Self {
        Self::from_container(&C::default().into_container())
    }

    pub fn from_container(container: &PropertyContainer) -> Self {
        Self {
            name: container.name().to_string(),
            fields: container
                .properties_ordered()
                .map(FieldDescriptor::from_slot)
                .collect(),
        }
    }

    /// Canonical container name of the described type.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.fields.iter().filter(|f| f.required)
    }

    /// Default container of the described type.
    pub fn template(&self) -> PropertyContainer {
        let mut container = PropertyContainer::new(self.name.clone());
        for field in &self.fields {
            container.insert(field.fresh_slot());
        }
        container
    }

    /// A fresh slot for `key`, used by loaders that build generic containers.
    pub fn generic_slot(&self, key: &str) -> PropertyResult<Box<dyn PropertySlot>> {
        self.field(key)
            .map(FieldDescriptor::fresh_slot)
            .ok_or_else(|| PropertyError::MissingProperty {
                name: key.to_string(),
                container: self.name.clone(),
            })
    }

    /// Copy every declared field from `source` into `target` by name.
    ///
    /// A required field absent from `source` fails the whole merge; optional
    /// fields absent from `source` keep whatever `target` holds. The check is
    /// done for all fields before anything is copied.
    pub fn merge_into(
        &self,
        target: &mut PropertyContainer,
        source: &PropertyContainer,
    ) -> PropertyResult<()> {
        if let Some(missing) = self
            .required_fields()
            .find(|field| !source.contains(&field.name))
        {
            return Err(PropertyError::IncompatibleInitializer {
                source_name: source.name().to_string(),
                target: self.name.clone(),
                missing: missing.name.clone(),
            });
        }

        for field in &self.fields {
            let Ok(from) = source.slot(&field.name) else {
                debug!(field = %field.name, target = %self.name, "keeping default");
                continue;
            };
            if field.required && !from.is_set() {
                warn!(
                    field = %field.name,
                    source = %source.name(),
                    "required property present but never set"
                );
            }
            target.slot_mut(&field.name)?.copy_values(from)?;
        }
        Ok(())
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schema '{}'", self.name)?;
        for field in &self.fields {
            writeln!(
                f,
                "  {}: {} ({}{})",
                field.name,
                field.type_tag,
                if field.required { "required" } else { "optional" },
                if field.has_default() { ", has default" } else { "" },
            )?;
        }
        Ok(())
    }
}
