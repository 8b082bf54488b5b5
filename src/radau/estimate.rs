//! Local error estimate of the embedded method.

use crate::{Float, ode::ODE, stats::Evals};

use super::{DD1, DD2, DD3, LinearSystems, Workspace};

/// `sqrt(Σ (v/scal)² / n)`, floored at `1e-10`.
fn scaled_norm(v: &[Float], scal: &[Float]) -> Float {
    let n = v.len().max(1) as Float;
    let sum: Float = v.iter().zip(scal).map(|(v, s)| (v / s) * (v / s)).sum();
    (sum / n).sqrt().max(1e-10)
}

impl LinearSystems {
    /// Error of the step `h` from `(x, y)` in the scaled RMS norm.
    ///
    /// The estimate `e1⁻¹·(f(x, y) + M·Σ dd_k·z_k / h)` is left in
    /// `w.cont[..n]`. When it fails and `refine` is set (first or
    /// previously rejected step), it is recomputed once through an extra
    /// function evaluation at `y + err`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn error_estimate<F: ODE>(
        &self,
        f: &F,
        x: Float,
        y: &[Float],
        h: Float,
        refine: bool,
        w: &mut Workspace,
        evals: &mut Evals,
    ) -> Float {
        let st = self.structure;
        let n = st.n;
        let (hee1, hee2, hee3) = (DD1 / h, DD2 / h, DD3 / h);
        for i in 0..n {
            w.f1[i] = hee1 * w.z1[i] + hee2 * w.z2[i] + hee3 * w.z3[i];
        }
        for i in 0..n {
            w.f2[i] = if i < st.m1 {
                w.f1[i]
            } else {
                self.fmas.row_dot(i - st.m1, &w.f1[st.m1..])
            };
            w.cont[i] = w.f2[i] + w.y0[i];
        }
        let cont = &mut w.cont[..n];
        self.solve_real(cont);
        let mut err = scaled_norm(cont, &w.scal);

        if err >= 1.0 && refine {
            for i in 0..n {
                w.tmp[i] = y[i] + w.cont[i];
            }
            f.ode(x, &w.tmp, &mut w.f1);
            evals.ode += 1;
            for i in 0..n {
                w.cont[i] = w.f1[i] + w.f2[i];
            }
            let cont = &mut w.cont[..n];
            self.solve_real(cont);
            err = scaled_norm(cont, &w.scal);
        }
        err
    }
}
