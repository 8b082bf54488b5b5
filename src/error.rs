//! Errors for integrator construction and invocation

use thiserror::Error;

use crate::Float;

/// Validation errors returned by [`crate::Radau5::new`] and [`crate::radau5`].
///
/// Construction reports every problem it finds, so these usually arrive
/// as a `Vec<Error>`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("uround must be in (1e-19, 1.0) (got {0})")]
    URoundOutOfRange(Float),
    #[error("safety_factor must be in (0.001, 1.0) (got {0})")]
    SafetyFactorOutOfRange(Float),
    #[error("step size bounds require scale_min <= 1 <= scale_max (got {0}, {1})")]
    InvalidScaleFactors(Float, Float),
    #[error("newton_tol must exceed uround/rtol = {bound} (got {got})")]
    NewtonTolTooSmall { got: Float, bound: Float },
    #[error("tolerances must be finite at component {index}: rtol = {rtol}, atol = {atol}")]
    ToleranceNotFinite { index: usize, rtol: Float, atol: Float },
    #[error("tolerances too small at component {index}: rtol = {rtol}, atol = {atol}")]
    ToleranceTooSmall { index: usize, rtol: Float, atol: Float },
    #[error("{name} has length {got}, expected {expected}")]
    ToleranceLength {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("index partition nind1 + nind2 + nind3 = {0} + {1} + {2} does not match n = {3}")]
    InvalidIndexPartition(usize, usize, usize, usize),
    #[error("invalid second order partition m1 = {m1}, m2 = {m2} for n = {n}")]
    InvalidSecondOrderPartition { m1: usize, m2: usize, n: usize },
    #[error("step freeze band requires quot1 <= 1 <= quot2 (got {0}, {1})")]
    InvalidStepFreeze(Float, Float),
    #[error("jacobian_threshold must be below 1 (got {0})")]
    JacobianThresholdTooLarge(Float),
    #[error("bandwidth of the mass matrix ({ml}, {mu}) exceeds the bandwidth of the Jacobian")]
    MassBandwidthExceedsJacobian { ml: usize, mu: usize },
    #[error("the Jacobian cannot use identity storage")]
    IdentityJacobian,
    #[error("Hessenberg option only for explicit first order equations with full Jacobian")]
    HessenbergNotApplicable,
    #[error("output spacing must be finite and non-zero (got {0})")]
    InvalidOutputSpacing(Float),
    #[error("state vector has length {got}, expected {expected}")]
    DimensionMismatch { expected: usize, got: usize },
}
