//! Work counters reported with each integration.

/// Number of expensive operations performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evals {
    /// Right-hand side evaluations, including those spent on finite differences.
    pub ode: usize,
    /// Jacobian evaluations, analytic or numerical.
    pub jac: usize,
    /// LU decompositions of the real and complex systems (counted as one).
    pub decomp: usize,
    /// Forward/back substitutions of the real and complex systems (counted as one).
    pub solve: usize,
}

/// Step bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steps {
    /// Attempted steps.
    pub total: usize,
    pub accepted: usize,
    /// Rejected steps, not counting rejections before the first accepted step.
    pub rejected: usize,
}
