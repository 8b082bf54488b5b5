//! Collocation polynomial of the last accepted step.

use crate::{Float, interpolate::Interpolate};

use super::{C1, C1M1, C1MC2, C2, C2M1};

/// Evaluates the collocation polynomial stored in `cont` at `xi`.
///
/// `cont` holds four blocks of length `n`: the solution at `xold + h`
/// followed by the three divided differences built by [`build_cont`].
pub fn contr5(xi: Float, yi: &mut [Float], cont: &[Float], xold: Float, h: Float) {
    let n = cont.len() / 4;
    let s = (xi - (xold + h)) / h;
    let (c0, rest) = cont.split_at(n);
    let (c1, rest) = rest.split_at(n);
    let (c2, c3) = rest.split_at(n);
    for i in 0..n {
        yi[i] = c0[i] + s * (c1[i] + (s - C2M1) * (c2[i] + (s - C1M1) * c3[i]));
    }
}

/// Fills `cont` from the new solution `y` and the stage increments.
pub(crate) fn build_cont(cont: &mut [Float], y: &[Float], z1: &[Float], z2: &[Float], z3: &[Float]) {
    let n = y.len();
    for i in 0..n {
        let c1 = (z2[i] - z3[i]) / C2M1;
        let ak = (z1[i] - z2[i]) / C1MC2;
        let acont3 = (ak - z1[i] / C1) / C2;
        let c2 = (ak - c1) / C1M1;
        cont[i] = y[i];
        cont[n + i] = c1;
        cont[2 * n + i] = c2;
        cont[3 * n + i] = c2 - acont3;
    }
}

/// Extrapolates the previous polynomial to the nodes of a step of size
/// `c3q · hold`, giving the Newton starting increments.
pub(crate) fn extrapolate(cont: &[Float], c3q: Float, z1: &mut [Float], z2: &mut [Float], z3: &mut [Float]) {
    let n = z1.len();
    let (c1q, c2q) = (C1 * c3q, C2 * c3q);
    let poly = |q: Float, ak1: Float, ak2: Float, ak3: Float| q * (ak1 + (q - C2M1) * (ak2 + (q - C1M1) * ak3));
    for i in 0..n {
        let (ak1, ak2, ak3) = (cont[n + i], cont[2 * n + i], cont[3 * n + i]);
        z1[i] = poly(c1q, ak1, ak2, ak3);
        z2[i] = poly(c2q, ak1, ak2, ak3);
        z3[i] = poly(c3q, ak1, ak2, ak3);
    }
}

/// Dense output handed to [`crate::SolOut`].
pub struct DenseRadau<'a> {
    pub(crate) cont: &'a [Float],
    pub(crate) xold: Float,
    pub(crate) h: Float,
}

impl Interpolate for DenseRadau<'_> {
    fn interpolate(&self, xi: Float, yi: &mut [Float]) {
        if self.h == 0.0 {
            // Before the first step there is only the initial point.
            yi.copy_from_slice(&self.cont[..yi.len()]);
        } else {
            contr5(xi, yi, self.cont, self.xold, self.h);
        }
    }

    fn get_cont(&self) -> (Vec<Float>, Float, Float) {
        (self.cont.to_vec(), self.xold, self.h)
    }
}
