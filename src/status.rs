//! Status codes for the integrator

/// Termination status of an integration.
///
/// Fatal conditions leave the last accepted `x` and `y` in place for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Reached `xend`.
    Success,
    /// The output hook asked to stop.
    Interrupted,
    /// More than `nmax` steps were needed.
    NeedLargerNmax,
    /// The step size became negligible relative to `x`.
    StepSizeTooSmall,
    /// The iteration matrix was singular five times in a row.
    RepeatedlySingular,
}

impl Status {
    /// Classical integer return code (`IDID`).
    pub fn code(self) -> i32 {
        match self {
            Status::Success => 1,
            Status::Interrupted => 2,
            Status::NeedLargerNmax => -2,
            Status::StepSizeTooSmall => -3,
            Status::RepeatedlySingular => -4,
        }
    }

    /// `true` for `Success` and `Interrupted`.
    pub fn is_ok(self) -> bool {
        self.code() > 0
    }
}
