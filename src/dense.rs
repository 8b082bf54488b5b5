//! Dense output over the whole integration interval.

use crate::{
    Float,
    interpolate::Interpolate,
    radau::contr5,
    solout::{ControlFlag, SolOut},
};

#[derive(Debug, Clone)]
struct Segment {
    cont: Vec<Float>,
    xold: Float,
    h: Float,
}

/// Piecewise collocation polynomials of all accepted steps.
///
/// ```
/// use radau5::prelude::*;
///
/// struct Decay;
///
/// impl ODE for Decay {
///     fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
///         dydx[0] = -y[0];
///     }
/// }
///
/// let mut rec = DenseRecorder::new();
/// let mut y = [1.0];
/// radau5(&Decay, 0.0, 2.0, &mut y, 1e-8, 1e-8, Some(&mut rec), Settings::default()).unwrap();
/// let dense = rec.into_output();
/// let (a, b) = dense.t_span().unwrap();
/// assert_eq!(a, 0.0);
/// assert!((b - 2.0).abs() < 1e-12);
/// let y1 = dense.evaluate(1.0).unwrap();
/// assert!((y1[0] - (-1.0f64).exp()).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContinuousOutput {
    segs: Vec<Segment>,
}

impl ContinuousOutput {
    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.segs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    /// Interval covered, in the direction of integration.
    pub fn t_span(&self) -> Option<(Float, Float)> {
        let first = self.segs.first()?;
        let last = self.segs.last()?;
        Some((first.xold, last.xold + last.h))
    }

    /// Solution at `t`, or `None` outside the covered interval.
    pub fn evaluate(&self, t: Float) -> Option<Vec<Float>> {
        let seg = self.find_segment(t)?;
        let mut yi = vec![0.0; seg.cont.len() / 4];
        contr5(t, &mut yi, &seg.cont, seg.xold, seg.h);
        Some(yi)
    }

    pub fn evaluate_many(&self, ts: &[Float]) -> Vec<Option<Vec<Float>>> {
        ts.iter().map(|&t| self.evaluate(t)).collect()
    }

    fn push(&mut self, cont: Vec<Float>, xold: Float, h: Float) {
        if h != 0.0 {
            self.segs.push(Segment { cont, xold, h });
        }
    }

    /// Segments are ordered along the direction of integration, so a binary
    /// search on the signed offset from the start finds the step.
    fn find_segment(&self, t: Float) -> Option<&Segment> {
        let first = self.segs.first()?;
        let dir = first.h.signum();
        let (start, end) = self.t_span()?;
        if (t - start) * dir < 0.0 || (t - end) * dir > 0.0 {
            return None;
        }
        let k = self.segs.partition_point(|s| (s.xold + s.h - t) * dir < 0.0);
        self.segs.get(k.min(self.segs.len() - 1))
    }
}

/// Output hook that keeps every step for a [`ContinuousOutput`].
#[derive(Debug, Clone, Default)]
pub struct DenseRecorder {
    output: ContinuousOutput,
}

impl DenseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &ContinuousOutput {
        &self.output
    }

    pub fn into_output(self) -> ContinuousOutput {
        self.output
    }
}

impl SolOut for DenseRecorder {
    fn solout<I: Interpolate>(&mut self, _xold: Float, _x: Float, _y: &[Float], interpolator: &I) -> ControlFlag {
        let (cont, xold, h) = interpolator.get_cont();
        self.output.push(cont, xold, h);
        ControlFlag::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(xold: Float, h: Float, y0: Float, slope: Float) -> Segment {
        // y(x) = y0 + slope·(x - xold): c0 = y(xold + h), c1 = slope·h
        Segment {
            cont: vec![y0 + slope * h, slope * h, 0.0, 0.0],
            xold,
            h,
        }
    }

    #[test]
    fn picks_the_right_step() {
        let out = ContinuousOutput {
            segs: vec![linear(0.0, 1.0, 0.0, 1.0), linear(1.0, 0.5, 1.0, -2.0)],
        };
        assert_eq!(out.t_span(), Some((0.0, 1.5)));
        assert_eq!(out.evaluate(0.5), Some(vec![0.5]));
        assert_eq!(out.evaluate(1.25), Some(vec![0.5]));
        assert_eq!(out.evaluate(1.5), Some(vec![0.0]));
        assert_eq!(out.evaluate(1.6), None);
        assert_eq!(out.evaluate(-0.1), None);
    }

    #[test]
    fn backward_steps() {
        let out = ContinuousOutput {
            segs: vec![linear(0.0, -1.0, 0.0, 1.0), linear(-1.0, -1.0, -1.0, 1.0)],
        };
        assert_eq!(out.t_span(), Some((0.0, -2.0)));
        assert_eq!(out.evaluate(-1.5), Some(vec![-1.5]));
        assert_eq!(out.evaluate(0.5), None);
        assert_eq!(out.evaluate_many(&[-0.5, -3.0]), vec![Some(vec![-0.5]), None]);
    }

    #[test]
    fn zero_length_steps_are_skipped() {
        let mut out = ContinuousOutput::default();
        out.push(vec![1.0, 0.0, 0.0, 0.0], 0.0, 0.0);
        assert!(out.is_empty());
        assert_eq!(out.evaluate(0.0), None);
    }
}
