//! Fixed-step integration schemes selectable from an initializer.

use crate::error::{DynamicsError, DynamicsResult};
use nalgebra::DVector;
use std::fmt;
use std::str::FromStr;

/// Integration scheme used by `simulate_one_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Forward Euler.
    #[default]
    RK1,
    /// Velocities first, then positions with the updated velocities.
    SymplecticEuler,
    /// Explicit midpoint.
    RK2,
    /// Classical Runge-Kutta.
    RK4,
}

impl Integrator {
    pub fn as_str(self) -> &'static str {
        match self {
            Integrator::RK1 => "RK1",
            Integrator::SymplecticEuler => "SymplecticEuler",
            Integrator::RK2 => "RK2",
            Integrator::RK4 => "RK4",
        }
    }

    /// Advance `x` by `dt` using the state derivative `rhs`.
    ///
    /// `num_positions` splits the state into positions and velocities for the
    /// symplectic scheme, which needs as many velocities as positions.
    pub fn step<F>(
        self,
        x: &DVector<f64>,
        dt: f64,
        num_positions: usize,
        rhs: F,
    ) -> DynamicsResult<DVector<f64>>
    where
        F: Fn(&DVector<f64>) -> DynamicsResult<DVector<f64>>,
    {
        match self {
            Integrator::RK1 => {
                let xdot = rhs(x)?;
                Ok(x + xdot * dt)
            }
            Integrator::SymplecticEuler => {
                let nq = num_positions;
                if x.len() != 2 * nq {
                    return Err(DynamicsError::NotSupported {
                        what: "symplectic Euler needs as many velocities as positions",
                    });
                }
                let xdot = rhs(x)?;
                let v_next = x.rows(nq, nq) + xdot.rows(nq, nq) * dt;
                let q_next = x.rows(0, nq) + &v_next * dt;

                let mut out = x.clone();
                out.rows_mut(0, nq).copy_from(&q_next);
                out.rows_mut(nq, nq).copy_from(&v_next);
                Ok(out)
            }
            Integrator::RK2 => {
                let k1 = rhs(x)?;
                let k2 = rhs(&(x + &k1 * (0.5 * dt)))?;
                Ok(x + k2 * dt)
            }
            Integrator::RK4 => {
                let k1 = rhs(x)?;
                let k2 = rhs(&(x + &k1 * (0.5 * dt)))?;
                let k3 = rhs(&(x + &k2 * (0.5 * dt)))?;
                let k4 = rhs(&(x + &k3 * dt))?;

                // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
                let k_sum = k1 + k2 * 2.0 + k3 * 2.0 + k4;
                Ok(x + k_sum * (dt / 6.0))
            }
        }
    }
}

impl FromStr for Integrator {
    type Err = DynamicsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RK1" => Ok(Integrator::RK1),
            "SymplecticEuler" => Ok(Integrator::SymplecticEuler),
            "RK2" => Ok(Integrator::RK2),
            "RK4" => Ok(Integrator::RK4),
            other => Err(DynamicsError::InvalidArg {
                what: format!("unknown integrator '{other}' (expected RK1, SymplecticEuler, RK2 or RK4)"),
            }),
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
