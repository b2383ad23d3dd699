//! Cart-pole dynamics with analytic derivatives.
//!
//! State is `(x, theta, xdot, thetadot)`, the single control is the force on
//! the cart. `theta = 0` is the pole hanging down.

use crate::error::{DynamicsError, DynamicsResult};
use crate::initializer::{DEFAULT_DT, DEFAULT_INTEGRATOR};
use crate::scene::Scene;
use crate::solver::{DynamicsSolver, DynamicsSolverBase};
use dp_core::ensure_positive;
use dp_property::{
    Initializer, Instantiable, Property, PropertyContainer, PropertyError, PropertyResult,
    PropertySlot,
};
use nalgebra::{DMatrix, DVector};
use std::f64::consts::PI;

pub const CARTPOLE_TYPE_NAME: &str = "CartpoleDynamicsSolver";

/// Typed initializer of [`CartpoleDynamicsSolver`].
#[derive(Debug, Clone)]
pub struct CartpoleDynamicsSolverInitializer {
    pub name: Property<String>,
    pub dt: Property<f64>,
    pub integrator: Property<String>,
    pub control_limits_low: Property<Vec<f64>>,
    pub control_limits_high: Property<Vec<f64>>,
    pub debug: Property<bool>,
    pub cart_mass: Property<f64>,
    pub pole_mass: Property<f64>,
    pub pole_length: Property<f64>,
    pub gravity: Property<f64>,
}

impl Default for CartpoleDynamicsSolverInitializer {
    fn default() -> Self {
        Self {
            name: Property::required("name"),
            dt: Property::with_value("dt", false, DEFAULT_DT),
            integrator: Property::with_value("integrator", false, DEFAULT_INTEGRATOR.to_string()),
            control_limits_low: Property::with_value("control_limits_low", false, Vec::new()),
            control_limits_high: Property::with_value("control_limits_high", false, Vec::new()),
            debug: Property::with_value("debug", false, false),
            cart_mass: Property::with_value("cart_mass", false, 1.0),
            pole_mass: Property::with_value("pole_mass", false, 1.0),
            pole_length: Property::with_value("pole_length", false, 1.0),
            gravity: Property::with_value("gravity", false, 9.81),
        }
    }
}

impl Initializer for CartpoleDynamicsSolverInitializer {
    const CONTAINER_NAME: &'static str = CARTPOLE_TYPE_NAME;

    fn into_container(self) -> PropertyContainer {
        PropertyContainer::new(Self::CONTAINER_NAME)
            .with(self.name)
            .with(self.dt)
            .with(self.integrator)
            .with(self.control_limits_low)
            .with(self.control_limits_high)
            .with(self.debug)
            .with(self.cart_mass)
            .with(self.pole_mass)
            .with(self.pole_length)
            .with(self.gravity)
    }

    fn from_container(mut container: PropertyContainer) -> PropertyResult<Self> {
        Ok(Self {
            name: container.take("name")?,
            dt: container.take("dt")?,
            integrator: container.take("integrator")?,
            control_limits_low: container.take("control_limits_low")?,
            control_limits_high: container.take("control_limits_high")?,
            debug: container.take("debug")?,
            cart_mass: container.take("cart_mass")?,
            pole_mass: container.take("pole_mass")?,
            pole_length: container.take("pole_length")?,
            gravity: container.take("gravity")?,
        })
    }
}

/// Cart on a rail with a freely swinging pole.
#[derive(Debug, Clone)]
pub struct CartpoleDynamicsSolver {
    base: DynamicsSolverBase,
    /// Cart mass (kg)
    m_c: f64,
    /// Pole mass (kg)
    m_p: f64,
    /// Pole length (m)
    l: f64,
    /// Gravity (m/s^2)
    g: f64,
}

impl Default for CartpoleDynamicsSolver {
    fn default() -> Self {
        Self {
            base: DynamicsSolverBase::new(2, 2, 1),
            m_c: 1.0,
            m_p: 1.0,
            l: 1.0,
            g: 9.81,
        }
    }
}

impl CartpoleDynamicsSolver {
    pub fn cart_mass(&self) -> f64 {
        self.m_c
    }

    pub fn pole_mass(&self) -> f64 {
        self.m_p
    }

    pub fn pole_length(&self) -> f64 {
        self.l
    }

    pub fn gravity(&self) -> f64 {
        self.g
    }

    fn check(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<()> {
        self.base.check_state(x)?;
        self.base.check_control(u)
    }
}

impl Instantiable for CartpoleDynamicsSolver {
    type Initializer = CartpoleDynamicsSolverInitializer;

    fn instantiate_base(&mut self, init: &PropertyContainer) -> PropertyResult<()> {
        self.base.instantiate_base(init)
    }

    fn instantiate(&mut self, init: CartpoleDynamicsSolverInitializer) -> PropertyResult<()> {
        if !init.name.is_set() {
            return Err(PropertyError::Rejected {
                what: format!("{CARTPOLE_TYPE_NAME} requires 'name' to be set"),
            });
        }
        let positive = |p: &Property<f64>, what: &'static str| {
            ensure_positive(p.get(), what).map_err(|e| PropertyError::Rejected {
                what: e.to_string(),
            })
        };
        let m_c = positive(&init.cart_mass, "cart_mass")?;
        let m_p = positive(&init.pole_mass, "pole_mass")?;
        let l = positive(&init.pole_length, "pole_length")?;
        let g = dp_core::ensure_finite(init.gravity.get(), "gravity").map_err(|e| {
            PropertyError::Rejected {
                what: e.to_string(),
            }
        })?;

        self.m_c = m_c;
        self.m_p = m_p;
        self.l = l;
        self.g = g;
        Ok(())
    }
}

impl DynamicsSolver for CartpoleDynamicsSolver {
    fn base(&self) -> &DynamicsSolverBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut DynamicsSolverBase {
        &mut self.base
    }

    fn type_name(&self) -> &'static str {
        CARTPOLE_TYPE_NAME
    }

    fn assign_scene(&mut self, scene: &dyn Scene) -> DynamicsResult<()> {
        // Only the joint count is checkable; names are not compared.
        let joints = scene.num_controlled_joints();
        if joints != 2 {
            return Err(DynamicsError::Scene {
                what: format!("robot model may not be a cart-pole ({joints} controlled joints, expected 2)"),
            });
        }
        Ok(())
    }

    fn f(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<DVector<f64>> {
        self.check(x, u)?;
        let (m_c, m_p, l, g) = (self.m_c, self.m_p, self.l, self.g);
        let theta = x[1];
        let xdot = x[2];
        let thetadot = x[3];

        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let theta_dot_squared = thetadot * thetadot;

        let x_ddot = (u[0] + m_p * sin_theta * (l * theta_dot_squared + g * cos_theta))
            / (m_c + m_p * sin_theta * sin_theta);
        let theta_ddot = -(l * m_p * cos_theta * sin_theta * theta_dot_squared
            + u[0] * cos_theta
            + (m_c + m_p) * g * sin_theta)
            / (l * m_c + l * m_p * sin_theta * sin_theta);

        Ok(DVector::from_vec(vec![xdot, thetadot, x_ddot, theta_ddot]))
    }

    fn fx(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<DMatrix<f64>> {
        self.check(x, u)?;
        let (m_c, m_p, l, g) = (self.m_c, self.m_p, self.l, self.g);
        let theta = x[1];
        let tdot = x[3];
        let u0 = u[0];

        let s = theta.sin();
        let c = theta.cos();
        let tdot2 = tdot * tdot;
        let d_cart = m_c + m_p * s * s;
        let d_pole = l * m_c + l * m_p * s * s;

        let dxdd_dtheta = -2.0 * m_p * (m_p * (g * c + l * tdot2) * s + u0) * s * c
            / d_cart.powi(2)
            + (-g * m_p * s * s + m_p * (g * c + l * tdot2) * c) / d_cart;
        let dxdd_dtdot = 2.0 * l * m_p * tdot * s / d_cart;

        let dtdd_dtheta = -2.0 * l * m_p
            * (-g * (m_c + m_p) * s - l * m_p * tdot2 * s * c - u0 * c)
            * s
            * c
            / d_pole.powi(2)
            + (-g * (m_c + m_p) * c + l * m_p * tdot2 * s * s - l * m_p * tdot2 * c * c + u0 * s)
                / d_pole;
        let dtdd_dtdot = -2.0 * l * m_p * tdot * s * c / d_pole;

        #[rustfmt::skip]
        let fx = DMatrix::from_row_slice(4, 4, &[
            0.0, 0.0,          1.0, 0.0,
            0.0, 0.0,          0.0, 1.0,
            0.0, dxdd_dtheta,  0.0, dxdd_dtdot,
            0.0, dtdd_dtheta,  0.0, dtdd_dtdot,
        ]);
        Ok(fx)
    }

    fn fu(&self, x: &DVector<f64>, u: &DVector<f64>) -> DynamicsResult<DMatrix<f64>> {
        self.check(x, u)?;
        let (m_c, m_p, l) = (self.m_c, self.m_p, self.l);
        let s = x[1].sin();
        let c = x[1].cos();

        Ok(DMatrix::from_column_slice(
            4,
            1,
            &[
                0.0,
                0.0,
                1.0 / (m_c + m_p * s * s),
                -c / (l * m_c + l * m_p * s * s),
            ],
        ))
    }

    /// Cart position and pole angle measured from upright.
    fn get_position(&self, x: &DVector<f64>) -> DynamicsResult<DVector<f64>> {
        self.base.check_state(x)?;
        Ok(DVector::from_vec(vec![x[0], PI - x[1]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derivatives::central_difference_jacobian;
    use crate::scene::JointCountScene;
    use dp_property::GENERIC_CONTAINER_NAME;

    fn solver() -> CartpoleDynamicsSolver {
        let mut init = CartpoleDynamicsSolverInitializer::default();
        init.name.assign("cartpole".into());
        let mut solver = CartpoleDynamicsSolver::default();
        solver.instantiate_internal(init.into_container()).unwrap();
        solver
    }

    fn assert_close(a: &DMatrix<f64>, b: &DMatrix<f64>, tol: f64) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{a} vs {b}");
        }
    }

    #[test]
    fn hanging_at_rest_is_equilibrium() {
        let s = solver();
        let xdot = s
            .f(&DVector::zeros(4), &DVector::zeros(1))
            .unwrap();
        assert!(xdot.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn push_accelerates_cart() {
        let s = solver();
        let xdot = s
            .f(&DVector::zeros(4), &DVector::from_element(1, 2.0))
            .unwrap();
        // theta = 0: x_ddot = u / m_c, theta_ddot = -u / (l m_c)
        assert!((xdot[2] - 2.0).abs() < 1e-12);
        assert!((xdot[3] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn analytic_fx_matches_finite_difference() {
        let s = solver();
        let u = DVector::from_element(1, 0.7);
        for x in [
            DVector::from_vec(vec![0.1, 0.4, -0.3, 1.2]),
            DVector::from_vec(vec![-1.0, 2.5, 0.8, -0.6]),
        ] {
            let analytic = s.fx(&x, &u).unwrap();
            let numeric = central_difference_jacobian(&x, |x| s.f(x, &u), 1e-6).unwrap();
            assert_close(&analytic, &numeric, 1e-6);
        }
    }

    #[test]
    fn analytic_fu_matches_finite_difference() {
        let s = solver();
        let x = DVector::from_vec(vec![0.2, 1.1, 0.5, -0.4]);
        let u = DVector::from_element(1, -1.5);
        let analytic = s.fu(&x, &u).unwrap();
        let numeric = central_difference_jacobian(&u, |u| s.f(&x, u), 1e-6).unwrap();
        assert_close(&analytic, &numeric, 1e-6);
    }

    #[test]
    fn position_reports_angle_from_upright() {
        let s = solver();
        let q = s
            .get_position(&DVector::from_vec(vec![0.5, 0.0, 0.0, 0.0]))
            .unwrap();
        assert_eq!(q[0], 0.5);
        assert!((q[1] - PI).abs() < 1e-12);
    }

    #[test]
    fn scene_must_have_two_joints() {
        let mut s = solver();
        assert!(s.assign_scene(&JointCountScene::new(2)).is_ok());
        assert!(matches!(
            s.assign_scene(&JointCountScene::new(7)),
            Err(DynamicsError::Scene { .. })
        ));
    }

    #[test]
    fn wrong_state_size_is_rejected() {
        let s = solver();
        let err = s
            .f(&DVector::zeros(3), &DVector::zeros(1))
            .unwrap_err();
        assert!(matches!(
            err,
            DynamicsError::DimensionMismatch {
                expected: 4,
                got: 3,
                ..
            }
        ));
    }

    #[test]
    fn generic_container_merges_physical_parameters() {
        let init = PropertyContainer::new(GENERIC_CONTAINER_NAME)
            .with(Property::with_value("name", true, "cp".to_string()))
            .with(Property::with_value("pole_length", false, 0.5))
            .with(Property::with_value("integrator", false, "RK4".to_string()));
        let mut s = CartpoleDynamicsSolver::default();
        s.instantiate_internal(init).unwrap();

        assert_eq!(s.pole_length(), 0.5);
        assert_eq!(s.cart_mass(), 1.0);
        assert_eq!(s.name(), "cp");
        assert_eq!(s.integrator(), crate::Integrator::RK4);
    }

    #[test]
    fn unset_name_is_rejected_by_plugin() {
        let init = PropertyContainer::new(GENERIC_CONTAINER_NAME)
            .with(Property::<String>::required("name"));
        let mut s = CartpoleDynamicsSolver::default();
        let err = s.instantiate_internal(init).unwrap_err();
        assert!(matches!(err, PropertyError::Rejected { .. }));
    }

    #[test]
    fn non_positive_mass_is_rejected() {
        let mut init = CartpoleDynamicsSolverInitializer::default();
        init.name.assign("cp".into());
        init.pole_mass.assign(0.0);
        let mut s = CartpoleDynamicsSolver::default();
        assert!(s.instantiate_internal(init.into_container()).is_err());
        assert_eq!(s.pole_mass(), 1.0);
    }
}
