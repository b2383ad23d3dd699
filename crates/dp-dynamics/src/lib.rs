//! dp-dynamics: pluggable dynamics solvers configured through initializers.
//!
//! Every solver implements [`DynamicsSolver`] for the numerics and
//! [`Instantiable`](dp_property::Instantiable) for configuration. Solvers are
//! looked up by type name in a [`SolverRegistry`], which accepts any
//! property container whose names cover the solver's required fields.
//!
//! # Example
//!
//! ```
//! use dp_dynamics::{CARTPOLE_TYPE_NAME, DynamicsSolver, SolverRegistry};
//! use dp_property::{GENERIC_CONTAINER_NAME, Property, PropertyContainer};
//! use nalgebra::DVector;
//!
//! let registry = SolverRegistry::with_defaults();
//! let init = PropertyContainer::new(GENERIC_CONTAINER_NAME)
//!     .with(Property::with_value("name", true, "cartpole".to_string()))
//!     .with(Property::with_value("integrator", false, "RK4".to_string()));
//!
//! let solver = registry.create(CARTPOLE_TYPE_NAME, init).unwrap();
//! let x = DVector::from_vec(vec![0.0, 0.1, 0.0, 0.0]);
//! let u = DVector::zeros(1);
//! let next = solver.simulate_one_step(&x, &u).unwrap();
//! assert_eq!(next.len(), 4);
//! ```

pub mod cartpole;
pub mod derivatives;
pub mod error;
pub mod initializer;
pub mod integrator;
pub mod registry;
pub mod scene;
pub mod solver;

// Re-exports
pub use cartpole::{CARTPOLE_TYPE_NAME, CartpoleDynamicsSolver, CartpoleDynamicsSolverInitializer};
pub use error::{DynamicsError, DynamicsResult};
pub use initializer::DynamicsSolverInitializer;
pub use integrator::Integrator;
pub use registry::SolverRegistry;
pub use scene::{JointCountScene, Scene};
pub use solver::{DynamicsSolver, DynamicsSolverBase};
