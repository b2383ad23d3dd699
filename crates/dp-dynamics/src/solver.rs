//! Dynamics solver abstraction and the state every solver shares.

use crate::derivatives::central_difference_jacobian;
use crate::error::{DynamicsError, DynamicsResult};
use crate::initializer::{DEFAULT_DT, DynamicsSolverInitializer};
use crate::integrator::Integrator;
use crate::scene::Scene;
use dp_core::ensure_positive;
use dp_property::{PropertyContainer, PropertyError, PropertyResult, Schema, resolve};
use nalgebra::{DMatrix, DVector};
use tracing::debug;

const JACOBIAN_EPSILON: f64 = 1e-6;

/// Configuration and dimensions common to all dynamics solvers.
#[derive(Debug, Clone)]
pub struct DynamicsSolverBase {
    pub name: String,
    pub dt: f64,
    pub integrator: Integrator,
    /// Per-control (low, high) bounds, if any were configured.
    pub control_limits: Option<(DVector<f64>, DVector<f64>)>,
    pub debug: bool,
    pub num_positions: usize,
    pub num_velocities: usize,
    pub num_controls: usize,
}

impl DynamicsSolverBase {
    pub fn new(num_positions: usize, num_velocities: usize, num_controls: usize) -> Self {
        Self {
            name: String::new(),
            dt: DEFAULT_DT,
            integrator: Integrator::default(),
            control_limits: None,
            debug: false,
            num_positions,
            num_velocities,
            num_controls,
        }
    }

    /// Base hook: pull the shared fields out of any solver container by name.
    pub fn instantiate_base(&mut self, init: &PropertyContainer) -> PropertyResult<()> {
        let schema = Schema::of::<DynamicsSolverInitializer>();
        let (base, _) = resolve::<DynamicsSolverInitializer>(&schema, init.clone())?;
        self.apply(&base)
    }

    fn apply(&mut self, init: &DynamicsSolverInitializer) -> PropertyResult<()> {
        let dt = ensure_positive(init.dt.get(), "dt").map_err(rejected)?;
        let integrator = init
            .integrator
            .value()
            .parse::<Integrator>()
            .map_err(rejected)?;

        let low = init.control_limits_low.value();
        let high = init.control_limits_high.value();
        let control_limits = match (low.is_empty(), high.is_empty()) {
            (true, true) => None,
            _ if low.len() != high.len() => {
                return Err(PropertyError::Rejected {
                    what: format!(
                        "control limits differ in length (low {}, high {})",
                        low.len(),
                        high.len()
                    ),
                });
            }
            _ if low.len() != self.num_controls => {
                return Err(PropertyError::Rejected {
                    what: format!(
                        "control limits have {} entries, solver has {} controls",
                        low.len(),
                        self.num_controls
                    ),
                });
            }
            _ => {
                if low.iter().chain(high).any(|v| !v.is_finite()) {
                    return Err(PropertyError::Rejected {
                        what: "control limits must be finite".to_string(),
                    });
                }
                if low.iter().zip(high).any(|(l, h)| l > h) {
                    return Err(PropertyError::Rejected {
                        what: "control_limits_low exceeds control_limits_high".to_string(),
                    });
                }
                Some((DVector::from_vec(low.clone()), DVector::from_vec(high.clone())))
            }
        };

        self.dt = dt;
        self.integrator = integrator;
        self.control_limits = control_limits;
        self.name = init.name.get();
        self.debug = init.debug.get();
        debug!(
            solver = %self.name,
            dt = self.dt,
            integrator = %self.integrator,
            "dynamics solver base configured"
        );
        Ok(())
    }

    pub fn state_dim(&self) -> usize {
        self.num_positions + self.num_velocities
    }

    /// Dimension of the state tangent space.
    pub fn state_derivative_dim(&self) -> usize {
        2 * self.num_velocities
    }

    pub fn check_state(&self, x: &DVector<f64>) -> DynamicsResult<()> {
        check_len("state", self.state_dim(), x.len())
    }

    pub fn check_control(&self, u: &DVector<f64>) -> DynamicsResult<()> {
        check_len("control", self.num_controls, u.len())
    }

    /// Vector-space state arithmetic needs as many velocities as positions.
    pub fn check_euclidean(&self) -> DynamicsResult<()> {
        if self.num_positions == self.num_velocities {
            Ok(())
        } else {
            Err(DynamicsError::NotSupported {
                what: "default state arithmetic needs as many velocities as positions",
            })
        }
    }
}

fn rejected(e: impl std::fmt::Display) -> PropertyError {
    PropertyError::Rejected {
        what: e.to_string(),
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> DynamicsResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(DynamicsError::DimensionMismatch {
            what,
            expected,
            got,
        })
    }
}

/// A model of continuous-time dynamics `xdot = f(x, u)`.
///
/// States stack positions then velocities. Implementors provide `f` and the
/// scene check; derivatives default to central finite differences and state
/// arithmetic defaults to the Euclidean case.
pub trait DynamicsSolver {
    fn base(&self) -> &DynamicsSolverBase;

    fn base_mut(&mut self) -> &mut DynamicsSolverBase;

    /// Type name the solver is registered under.
    fn type_name(&self) -> &'static str;

    /// Validate the solver against the scene it will be used with.
    fn assign_scene(&mut self, scene: &dyn Scene) -> DynamicsResult<()>;

    /// State derivative.
    fn f(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<DVector<f64>>;

    /// Derivative of `f` with respect to the state.
    fn fx(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<DMatrix<f64>> {
        self.base().check_control(u)?;
        central_difference_jacobian(x, |x| self.f(x, u), JACOBIAN_EPSILON)
    }

    /// Derivative of `f` with respect to the control.
    fn fu(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<DMatrix<f64>> {
        self.base().check_state(x)?;
        central_difference_jacobian(u, |u| self.f(x, u), JACOBIAN_EPSILON)
    }

    fn name(&self) -> &str {
        &self.base().name
    }

    fn dt(&self) -> f64 {
        self.base().dt
    }

    fn integrator(&self) -> Integrator {
        self.base().integrator
    }

    fn set_integrator(&mut self, integrator: Integrator) {
        self.base_mut().integrator = integrator;
    }

    fn num_positions(&self) -> usize {
        self.base().num_positions
    }

    fn num_velocities(&self) -> usize {
        self.base().num_velocities
    }

    fn num_controls(&self) -> usize {
        self.base().num_controls
    }

    /// Configuration part of the state.
    fn get_position(&self, x: &DVector<f64>) -> DynamicsResult<DVector<f64>> {
        self.base().check_state(x)?;
        Ok(x.rows(0, self.num_positions()).into_owned())
    }

    /// Difference `x_1 - x_2` in the state tangent space.
    ///
    /// The default is Euclidean; solvers whose configuration space is not a
    /// vector space (`num_positions != num_velocities`) must override it.
    fn state_delta(&self, x_1: &DVector<f64>, x_2: &DVector<f64>) -> DynamicsResult<DVector<f64>> {
        self.base().check_state(x_1)?;
        self.base().check_state(x_2)?;
        self.base().check_euclidean()?;
        Ok(x_1 - x_2)
    }

    /// `x + dt * dx` on the state manifold. Euclidean by default, like
    /// [`state_delta`](Self::state_delta).
    fn integrate(
        &self,
        x: &DVector<f64>,
        dx: &DVector<f64>,
        dt: f64,
    ) -> DynamicsResult<DVector<f64>> {
        self.base().check_state(x)?;
        self.base().check_euclidean()?;
        check_len("state derivative", self.base().state_derivative_dim(), dx.len())?;
        Ok(x + dx * dt)
    }

    /// Clamp `u` into the configured control limits.
    fn clamp_control(&self, u: &DVector<f64>) -> DynamicsResult<DVector<f64>> {
        self.base().check_control(u)?;
        match &self.base().control_limits {
            None => Ok(u.clone()),
            Some((low, high)) => {
                check_len("control limits", self.num_controls(), low.len())?;
                Ok(u.zip_zip_map(low, high, |v, l, h| v.clamp(l, h)))
            }
        }
    }

    /// Advance the state by one `dt` with the configured integrator.
    fn simulate_one_step(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<DVector<f64>> {
        self.base().check_state(x)?;
        let u = self.clamp_control(u)?;
        self.integrator()
            .step(x, self.dt(), self.num_positions(), |x| self.f(x, &u))
    }
}
