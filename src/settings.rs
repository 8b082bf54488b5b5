//! Settings for the Radau5 integrator

use bon::Builder;

use crate::{Float, matrix::MatrixStorage};

/// Optional settings for [`crate::Radau5`].
///
/// Every `None` field, and every numeric field set to zero, falls back to
/// the documented default.
///
/// ```
/// use radau5::prelude::*;
///
/// let settings = Settings::builder()
///     .nmax(50_000)
///     .jac_storage(MatrixStorage::Banded { ml: 1, mu: 1 })
///     .build();
/// assert_eq!(settings.nmax, Some(50_000));
/// ```
#[derive(Builder, Clone, Debug)]
pub struct Settings {
    /// Rounding unit, default 1e-16. Must lie in (1e-19, 1).
    pub uround: Option<Float>,
    /// Safety factor in step-size prediction, default 0.9. Must lie in (0.001, 1).
    pub safety_factor: Option<Float>,
    /// Parameter for step size selection where scale_min <= hnew/hold <= scale_max.
    /// Default 0.2.
    pub scale_min: Option<Float>,
    /// Parameter for step size selection where scale_min <= hnew/hold <= scale_max.
    /// Default 8.
    pub scale_max: Option<Float>,
    /// Maximal step size, default `|xend - x|`.
    pub hmax: Option<Float>,
    /// Initial step size guess, default 1e-6. Only its magnitude is used.
    pub h0: Option<Float>,
    /// Maximum number of attempted steps, default 100,000. The step that
    /// would exceed it is not attempted and the run ends with
    /// [`crate::Status::NeedLargerNmax`].
    pub nmax: Option<usize>,
    /// Maximum number of Newton iterations per step, default 7.
    pub newton_maxiter: Option<usize>,
    /// Start every Newton iteration from zero instead of extrapolating the
    /// previous collocation polynomial. Advisable for difficult problems.
    #[builder(default)]
    pub newton_start_zero: bool,
    /// Stopping criterion for the Newton iteration, default
    /// `max(10·uround/rtol, min(0.03, sqrt(rtol)))` with the internal `rtol`.
    pub newton_tol: Option<Float>,
    /// Number of index-1 components (default `n - nind2 - nind3`).
    pub nind1: Option<usize>,
    /// Number of index-2 components, default 0.
    pub nind2: Option<usize>,
    /// Number of index-3 components, default 0.
    pub nind3: Option<usize>,
    /// Gustafsson predictive step-size control (default `true`); `false`
    /// selects the classical controller.
    pub predictive: Option<bool>,
    /// Second order structure: `y'[i] = y[i + m2]` for `i < m1`. Default 0.
    pub m1: Option<usize>,
    /// Default `m1` when `m1 > 0`.
    pub m2: Option<usize>,
    /// Reduce the Jacobian to Hessenberg form before decomposing. Only for
    /// explicit first order systems with a full Jacobian.
    #[builder(default)]
    pub hessenberg: bool,
    /// Keep the step size when `quot1 <= hnew/hold <= quot2`, default 1.
    pub quot1: Option<Float>,
    /// Keep the step size when `quot1 <= hnew/hold <= quot2`, default 1.2.
    pub quot2: Option<Float>,
    /// Recompute the Jacobian after an accepted step only if the Newton
    /// contraction exceeded this value, default 0.001. A negative value forces
    /// a new Jacobian on every step.
    pub jacobian_threshold: Option<Float>,
    /// Call [`crate::ODE::jac`] instead of approximating by finite differences.
    #[builder(default)]
    pub analytic_jacobian: bool,
    /// Layout of the Jacobian.
    #[builder(default = MatrixStorage::Full)]
    pub jac_storage: MatrixStorage,
    /// Layout of the mass matrix; `Identity` for explicit systems.
    #[builder(default = MatrixStorage::Identity)]
    pub mass_storage: MatrixStorage,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::builder().build()
    }
}
