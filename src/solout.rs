//! User defined callback hook executed after each accepted step.

use crate::{Float, error::Error, interpolate::Interpolate};

/// Return flags for [`SolOut`].
///
/// - `Continue`: proceed with integration as normal.
/// - `Interrupt`: stop integration and return control to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlag {
    Continue,
    Interrupt,
}

/// Callback hook executed after each accepted step.
///
/// The callback is invoked once before the first step (with `xold == x`) and
/// after every accepted step. The arguments are:
/// - `xold`: the left end of the last accepted step,
/// - `x`: the new abscissa,
/// - `y`: the solution at `x`,
/// - `interpolator`: evaluates the collocation polynomial anywhere in `[xold, x]`.
///
/// Returning `ControlFlag::Interrupt` stops the integration cleanly with
/// [`crate::Status::Interrupted`].
pub trait SolOut {
    fn solout<I: Interpolate>(
        &mut self,
        xold: Float,
        x: Float,
        y: &[Float],
        interpolator: &I,
    ) -> ControlFlag;
}

/// Output hook that does nothing; use it to name the type of a `None` hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct DummySolOut;

impl SolOut for DummySolOut {
    fn solout<I: Interpolate>(&mut self, _: Float, _: Float, _: &[Float], _: &I) -> ControlFlag {
        ControlFlag::Continue
    }
}

/// Records the solution at output points as the integration passes them.
///
/// Either equidistant (`x0, x0 + dx, ...`) or at an explicit list of points
/// ordered in the direction of integration.
#[derive(Debug, Clone)]
pub struct Sampler {
    grid: Grid,
    /// Output abscissae reached so far.
    pub t: Vec<Float>,
    /// Solution at each entry of `t`.
    pub y: Vec<Vec<Float>>,
}

#[derive(Debug, Clone)]
enum Grid {
    Equidistant { dx: Float, x0: Option<Float>, k: usize },
    Points { points: Vec<Float>, next: usize },
}

impl Sampler {
    /// Samples every `dx`, starting at the initial point. The sign of `dx`
    /// must match the direction of integration; zero and non-finite
    /// spacings are rejected.
    pub fn equidistant(dx: Float) -> Result<Self, Error> {
        if dx == 0.0 || !dx.is_finite() {
            return Err(Error::InvalidOutputSpacing(dx));
        }
        Ok(Self {
            grid: Grid::Equidistant { dx, x0: None, k: 0 },
            t: Vec::new(),
            y: Vec::new(),
        })
    }

    /// Samples at the given points.
    pub fn at(points: Vec<Float>) -> Self {
        Self {
            grid: Grid::Points { points, next: 0 },
            t: Vec::new(),
            y: Vec::new(),
        }
    }

    fn next_point(&mut self, xold: Float) -> Option<Float> {
        match &mut self.grid {
            Grid::Equidistant { dx, x0, k } => {
                let x0 = *x0.get_or_insert(xold);
                Some(x0 + *k as Float * *dx)
            }
            Grid::Points { points, next } => points.get(*next).copied(),
        }
    }

    fn advance(&mut self) {
        match &mut self.grid {
            Grid::Equidistant { k, .. } => *k += 1,
            Grid::Points { next, .. } => *next += 1,
        }
    }

    fn direction(&self, xold: Float, x: Float) -> Float {
        match &self.grid {
            Grid::Equidistant { dx, .. } => dx.signum(),
            Grid::Points { points, .. } => match (points.first(), points.last()) {
                (Some(a), Some(b)) if b < a => -1.0,
                _ if x < xold => -1.0,
                _ => 1.0,
            },
        }
    }
}

impl SolOut for Sampler {
    fn solout<I: Interpolate>(
        &mut self,
        xold: Float,
        x: Float,
        y: &[Float],
        interpolator: &I,
    ) -> ControlFlag {
        let dir = self.direction(xold, x);
        while let Some(xd) = self.next_point(xold) {
            if (xd - x) * dir > 0.0 {
                break;
            }
            let mut yd = vec![0.0; y.len()];
            if xd == x {
                yd.copy_from_slice(y);
            } else {
                interpolator.interpolate(xd, &mut yd);
            }
            log::trace!("output at x = {xd}: {yd:?}");
            self.t.push(xd);
            self.y.push(yd);
            self.advance();
        }
        ControlFlag::Continue
    }
}
