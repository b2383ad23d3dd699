//! Problem file format.
//!
//! A problem lists solver declarations. Each declaration names a registered
//! solver type and carries loosely typed properties; the solver's schema
//! gives them their concrete types when the declaration is turned into a
//! property container.

use crate::{ProjectError, ProjectResult};
use dp_property::{GENERIC_CONTAINER_NAME, PropertyContainer, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDef {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub solvers: Vec<SolverDef>,
}

impl ProblemDef {
    /// Declaration whose `name` property equals `name`.
    pub fn solver(&self, name: &str) -> Option<&SolverDef> {
        self.solvers.iter().find(|s| s.name() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverDef {
    #[serde(rename = "type")]
    pub solver_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_yaml::Value>,
}

impl SolverDef {
    pub fn new(solver_type: impl Into<String>) -> Self {
        Self {
            solver_type: solver_type.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The `name` property, when present as a string.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(serde_yaml::Value::as_str)
    }

    /// Build a generic container holding only the declared properties.
    ///
    /// Slots come from `schema`, so each value is converted to the field's
    /// type here. The result is named [`GENERIC_CONTAINER_NAME`] and always
    /// goes through the merge path when instantiated.
    pub fn to_container(&self, schema: &Schema) -> ProjectResult<PropertyContainer> {
        let mut container = PropertyContainer::new(GENERIC_CONTAINER_NAME);
        for (key, value) in &self.properties {
            let mut slot =
                schema
                    .generic_slot(key)
                    .map_err(|_| ProjectError::UnknownProperty {
                        solver_type: self.solver_type.clone(),
                        key: key.clone(),
                    })?;
            slot.assign_serialized(value.clone())?;
            container.insert(slot);
        }
        debug!(
            solver_type = %self.solver_type,
            properties = container.len(),
            "built initializer container"
        );
        Ok(container)
    }

    /// Declaration listing the set slots of `container`.
    pub fn from_container(
        solver_type: impl Into<String>,
        container: &PropertyContainer,
    ) -> ProjectResult<Self> {
        let mut properties = BTreeMap::new();
        for (key, slot) in container.properties() {
            if slot.is_set() {
                properties.insert(key.to_string(), slot.to_serialized()?);
            }
        }
        Ok(Self {
            solver_type: solver_type.into(),
            properties,
        })
    }
}
