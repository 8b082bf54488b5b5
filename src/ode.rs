//! User-supplied ODE system.

use crate::{Float, matrix::Matrix};

/// User-supplied system `M·y' = f(x, y)`.
///
/// Implement this trait for your problem to provide the right-hand side
/// function. The integrator repeatedly calls `ode` with the current abscissa
/// `x` and state `y` and expects you to fill `dydx` with the derivative values.
/// `ode` must be a pure function of `x` and `y`: it is called at intermediate
/// stage points and, when the Jacobian is approximated by finite differences,
/// with a temporarily perturbed `y`.
///
/// `jac` is only called when [`crate::Settings::analytic_jacobian`] is set and
/// `mass` only when [`crate::Settings::mass_storage`] is not
/// [`crate::MatrixStorage::Identity`]. Both receive a zeroed matrix whose storage
/// matches the configured layout, so only the non-zero entries need writing.
///
/// For second order structure (`m1 > 0`) the Jacobian holds the rows
/// `m1..n` only (row `i` of the matrix is component `m1 + i`) and the mass
/// matrix is the trailing `(n - m1) × (n - m1)` block.
///
/// # Example
///
/// ```
/// use radau5::prelude::*;
///
/// struct VanDerPol { eps: f64 }
///
/// impl ODE for VanDerPol {
///     fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
///         dydx[0] = y[1];
///         dydx[1] = ((1.0 - y[0] * y[0]) * y[1] - y[0]) / self.eps;
///     }
///
///     fn jac(&self, _x: f64, y: &[f64], j: &mut Matrix) {
///         j[(0, 1)] = 1.0;
///         j[(1, 0)] = (-2.0 * y[0] * y[1] - 1.0) / self.eps;
///         j[(1, 1)] = (1.0 - y[0] * y[0]) / self.eps;
///     }
/// }
/// ```
pub trait ODE {
    fn ode(&self, x: Float, y: &[Float], dydx: &mut [Float]);

    /// Analytic Jacobian `∂f/∂y` at `(x, y)`.
    fn jac(&self, _x: Float, _y: &[Float], _jac: &mut Matrix) {}

    /// Constant mass matrix `M`.
    fn mass(&self, _mass: &mut Matrix) {}
}
