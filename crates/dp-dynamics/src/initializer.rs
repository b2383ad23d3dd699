//! Initializer shared by every dynamics solver.

use dp_property::{Initializer, Property, PropertyContainer, PropertyResult};

/// Fields every dynamics solver understands.
///
/// Plugin initializers repeat these names so the base hook can merge them out
/// of any plugin container.
#[derive(Debug, Clone)]
pub struct DynamicsSolverInitializer {
    pub name: Property<String>,
    pub dt: Property<f64>,
    pub integrator: Property<String>,
    pub control_limits_low: Property<Vec<f64>>,
    pub control_limits_high: Property<Vec<f64>>,
    pub debug: Property<bool>,
}

pub const DEFAULT_DT: f64 = 0.01;
pub const DEFAULT_INTEGRATOR: &str = "RK1";

impl Default for DynamicsSolverInitializer {
    fn default() -> Self {
        Self {
            name: Property::required("name"),
            dt: Property::with_value("dt", false, DEFAULT_DT),
            integrator: Property::with_value("integrator", false, DEFAULT_INTEGRATOR.to_string()),
            control_limits_low: Property::with_value("control_limits_low", false, Vec::new()),
            control_limits_high: Property::with_value("control_limits_high", false, Vec::new()),
            debug: Property::with_value("debug", false, false),
        }
    }
}

impl Initializer for DynamicsSolverInitializer {
    const CONTAINER_NAME: &'static str = "DynamicsSolver";

    fn into_container(self) -> PropertyContainer {
        PropertyContainer::new(Self::CONTAINER_NAME)
            .with(self.name)
            .with(self.dt)
            .with(self.integrator)
            .with(self.control_limits_low)
            .with(self.control_limits_high)
            .with(self.debug)
    }

    fn from_container(mut container: PropertyContainer) -> PropertyResult<Self> {
        Ok(Self {
            name: container.take("name")?,
            dt: container.take("dt")?,
            integrator: container.take("integrator")?,
            control_limits_low: container.take("control_limits_low")?,
            control_limits_high: container.take("control_limits_high")?,
            debug: container.take("debug")?,
        })
    }
}
