//! Finite difference Jacobians, used as the default `fx`/`fu`.

use crate::error::DynamicsResult;
use nalgebra::{DMatrix, DVector};

/// Compute a Jacobian using central finite differences.
///
/// Column j is (f(x + h e_j) - f(x - h e_j)) / 2h with h scaled by |x_j|.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> DynamicsResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> DynamicsResult<DVector<f64>>,
{
    let n = x.len();
    let m = f(x)?.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dx = epsilon * x[j].abs().max(1.0);

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let f_plus = f(&x_plus)?;

        let mut x_minus = x.clone();
        x_minus[j] -= dx;
        let f_minus = f(&x_minus)?;

        jac.set_column(j, &((f_plus - f_minus) / (2.0 * dx)));
    }

    Ok(jac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jacobian_quadratic() {
        // f(x) = (x0^2, x0*x1), J = [[2 x0, 0], [x1, x0]]
        let f = |x: &DVector<f64>| -> DynamicsResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![x[0] * x[0], x[0] * x[1]]))
        };

        let x = DVector::from_vec(vec![3.0, -2.0]);
        let jac = central_difference_jacobian(&x, f, 1e-6).unwrap();

        assert!((jac[(0, 0)] - 6.0).abs() < 1e-6);
        assert!(jac[(0, 1)].abs() < 1e-6);
        assert!((jac[(1, 0)] + 2.0).abs() < 1e-6);
        assert!((jac[(1, 1)] - 3.0).abs() < 1e-6);
    }
}
