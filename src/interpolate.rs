//! Shared interpolation interface

use crate::Float;

/// Trait for interpolating the solution within the last accepted step.
pub trait Interpolate {
    /// Interpolate the solution at the given abscissa `xi`.
    fn interpolate(&self, xi: Float, yi: &mut [Float]);

    /// Copy of the dense output coefficients together with `xold` and `h`.
    fn get_cont(&self) -> (Vec<Float>, Float, Float);
}
