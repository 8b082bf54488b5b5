//! Jacobian evaluation: analytic or by forward differences.

use std::iter::StepBy;
use std::ops::Range;

use crate::{Float, ode::ODE};

use super::{Radau5, structure::JacLayout};

/// Components of `y` shifted by `delta`, restored when dropped.
struct Perturbation<'a> {
    y: &'a mut [Float],
    saved: &'a [Float],
    cols: StepBy<Range<usize>>,
}

impl<'a> Perturbation<'a> {
    fn apply(
        y: &'a mut [Float],
        saved: &'a mut [Float],
        delta: &mut [Float],
        cols: StepBy<Range<usize>>,
        uround: Float,
    ) -> Self {
        for j in cols.clone() {
            saved[j] = y[j];
            delta[j] = (uround * y[j].abs().max(1e-5)).sqrt();
            y[j] += delta[j];
        }
        Self { y, saved, cols }
    }

    fn state(&self) -> &[Float] {
        self.y
    }
}

impl Drop for Perturbation<'_> {
    fn drop(&mut self) {
        for j in self.cols.clone() {
            self.y[j] = self.saved[j];
        }
    }
}

impl Radau5 {
    /// Refreshes `fjac` at `(x, y)`.
    ///
    /// Finite differences need `f(x, y)` in `work.y0`. Banded Jacobians
    /// perturb every `ml + mu + 1`-th column of a block at once.
    pub(super) fn compute_jacobian<F: ODE>(&mut self, f: &F, x: Float, y: &mut [Float]) {
        self.evals.jac += 1;
        let uround = self.params.uround;
        let st = self.sys.structure;
        let fjac = &mut self.sys.fjac;
        let w = &mut self.work;

        if self.params.analytic_jac {
            fjac.fill(0.0);
            f.jac(x, y, fjac);
        } else {
            match st.jac() {
                JacLayout::Full | JacLayout::Hessenberg => {
                    for j in 0..st.n {
                        let p = Perturbation::apply(y, &mut w.f1, &mut w.f2, (j..j + 1).step_by(1), uround);
                        f.ode(x, p.state(), &mut w.tmp);
                        drop(p);
                        for i in st.m1..st.n {
                            fjac[(i - st.m1, j)] = (w.tmp[i] - w.y0[i]) / w.f2[j];
                        }
                    }
                    self.evals.ode += st.n;
                }
                JacLayout::Banded { ml, mu } => {
                    // Blocks of m2 columns for y[..m1], then one block for y[m1..]
                    for block in 0..=st.m1 / st.m2 {
                        let start = block * st.m2;
                        let end = if start == st.m1 { st.n } else { start + st.m2 };
                        let md = (ml + mu + 1).min(end - start);
                        for k in 0..md {
                            let cols = (start + k..end).step_by(md);
                            let p = Perturbation::apply(y, &mut w.f1, &mut w.f2, cols.clone(), uround);
                            f.ode(x, p.state(), &mut w.tmp);
                            drop(p);
                            self.evals.ode += 1;
                            for j in cols {
                                let j1 = j - start;
                                let rows = j1.saturating_sub(mu)..(j1 + ml + 1).min(st.nm1);
                                for i in rows {
                                    fjac[(i, j)] = (w.tmp[i + st.m1] - w.y0[i + st.m1]) / w.f2[j];
                                }
                            }
                        }
                    }
                }
            }
        }
        self.caljac = true;
        self.sys.calhes = true;
        log::debug!("Jacobian evaluated at x = {x}");
    }
}
