//! Data structure for holding the result of integrations

use crate::{
    Float,
    stats::{Evals, Steps},
    status::Status,
};

/// Outcome of an integration. The state itself is updated in place.
#[derive(Debug, Clone)]
pub struct IntegrationResult {
    /// Abscissa reached: `xend` on success, otherwise the last accepted point.
    pub x: Float,
    /// Predicted step size for a continuation from `x`.
    pub h: Float,
    /// Termination status.
    pub status: Status,
    /// Work counters.
    pub evals: Evals,
    /// Step counters.
    pub steps: Steps,
}

impl IntegrationResult {
    pub fn new(x: Float, h: Float, status: Status, evals: Evals, steps: Steps) -> Self {
        Self {
            x,
            h,
            status,
            evals,
            steps,
        }
    }
}
