//! Registry mapping solver type names to factories.
//!
//! Each registration builds the plugin's [`Capability`] once and keeps the
//! schema next to it, so callers can print templates or build generic
//! containers without instantiating anything.

use crate::cartpole::{CARTPOLE_TYPE_NAME, CartpoleDynamicsSolver};
use crate::error::{DynamicsError, DynamicsResult};
use crate::solver::DynamicsSolver;
use dp_property::{Capability, Instantiable, PropertyContainer, Schema};
use std::collections::BTreeMap;
use tracing::debug;

type Factory = Box<dyn Fn(PropertyContainer) -> DynamicsResult<Box<dyn DynamicsSolver>>>;

struct Registration {
    schema: Schema,
    template: Box<dyn Fn() -> PropertyContainer>,
    factory: Factory,
}

/// Registry of available dynamics solver types.
#[derive(Default)]
pub struct SolverRegistry {
    entries: BTreeMap<String, Registration>,
}

impl SolverRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with built-in solvers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<CartpoleDynamicsSolver>(CARTPOLE_TYPE_NAME);
        registry
    }

    /// Register solver type `P` under `type_name`, replacing any previous entry.
    pub fn register<P>(&mut self, type_name: &str)
    where
        P: DynamicsSolver + Instantiable + Default + 'static,
    {
        let capability = Capability::<P>::new();
        let schema = capability.schema().clone();
        let for_template = capability.clone();
        let name = type_name.to_string();

        let factory: Factory = Box::new(move |init: PropertyContainer| -> DynamicsResult<Box<dyn DynamicsSolver>> {
            let mut solver = P::default();
            let path = capability.instantiate(&mut solver, init)?;
            debug!(solver_type = %name, ?path, "dynamics solver instantiated");
            Ok(Box::new(solver) as Box<dyn DynamicsSolver>)
        });

        self.entries.insert(
            type_name.to_string(),
            Registration {
                schema,
                template: Box::new(move || for_template.template()),
                factory,
            },
        );
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn schema(&self, type_name: &str) -> DynamicsResult<&Schema> {
        self.entry(type_name).map(|e| &e.schema)
    }

    /// Default initializer container of `type_name`.
    pub fn template(&self, type_name: &str) -> DynamicsResult<PropertyContainer> {
        self.entry(type_name).map(|e| (e.template)())
    }

    /// Build and instantiate a solver of `type_name` from `init`.
    pub fn create(
        &self,
        type_name: &str,
        init: PropertyContainer,
    ) -> DynamicsResult<Box<dyn DynamicsSolver>> {
        let entry = self.entry(type_name)?;
        (entry.factory)(init)
    }

    fn entry(&self, type_name: &str) -> DynamicsResult<&Registration> {
        self.entries
            .get(type_name)
            .ok_or_else(|| DynamicsError::UnknownSolver {
                name: type_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dp_property::{GENERIC_CONTAINER_NAME, Property, PropertyError};

    #[test]
    fn registry_new_empty() {
        let registry = SolverRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults() {
        let registry = SolverRegistry::with_defaults();
        assert!(registry.contains(CARTPOLE_TYPE_NAME));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![CARTPOLE_TYPE_NAME]);
        assert_eq!(
            registry.schema(CARTPOLE_TYPE_NAME).unwrap().name(),
            CARTPOLE_TYPE_NAME
        );
        assert_eq!(
            registry.template(CARTPOLE_TYPE_NAME).unwrap().name(),
            CARTPOLE_TYPE_NAME
        );
    }

    #[test]
    fn unknown_type_is_an_error() {
        let registry = SolverRegistry::with_defaults();
        let err = registry
            .create("PinocchioDynamicsSolver", PropertyContainer::new(GENERIC_CONTAINER_NAME))
            .err()
            .unwrap();
        assert!(matches!(err, DynamicsError::UnknownSolver { .. }));
    }

    #[test]
    fn create_from_generic_container() {
        let registry = SolverRegistry::with_defaults();
        let init = PropertyContainer::new(GENERIC_CONTAINER_NAME)
            .with(Property::with_value("name", true, "cp".to_string()))
            .with(Property::with_value("dt", false, 0.05));
        let solver = registry.create(CARTPOLE_TYPE_NAME, init).unwrap();
        assert_eq!(solver.type_name(), CARTPOLE_TYPE_NAME);
        assert_eq!(solver.dt(), 0.05);
        assert_eq!(solver.num_controls(), 1);
    }

    #[test]
    fn create_without_name_fails() {
        let registry = SolverRegistry::with_defaults();
        let err = registry
            .create(CARTPOLE_TYPE_NAME, PropertyContainer::new(GENERIC_CONTAINER_NAME))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            DynamicsError::Property(PropertyError::IncompatibleInitializer { .. })
        ));
    }
}
