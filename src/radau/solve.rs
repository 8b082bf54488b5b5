//! Solves with the decomposed iteration matrices.

use crate::{
    Float,
    linalg::{cdiv, hes_reduce, hes_restore, sol, solb, solbc, solc, solh, solhc},
};

use super::{LinearSystems, Workspace, decomp::jac_rows, structure::JacLayout};

impl LinearSystems {
    /// Overwrites `b` (length `n`) with `e1⁻¹·b`, handling the second order
    /// block elimination.
    pub(crate) fn solve_real(&self, b: &mut [Float]) {
        let st = self.structure;
        let (m1, m2) = (st.m1, st.m2);
        if m1 > 0 {
            let mm = m1 / m2;
            for j in 0..m2 {
                let mut sum = 0.0;
                for k in (0..mm).rev() {
                    let jkm = j + k * m2;
                    sum = (b[jkm] + sum) / self.fac1;
                    for i in jac_rows(&st, j) {
                        b[i + m1] += self.fjac[(i, jkm)] * sum;
                    }
                }
            }
        }

        let tail = &mut b[m1..];
        match st.jac() {
            JacLayout::Full => sol(st.nm1, &self.e1, tail, &self.ip1),
            JacLayout::Banded { ml, mu } => solb(st.nm1, &self.e1, ml, mu, tail, &self.ip1),
            JacLayout::Hessenberg => {
                hes_reduce(st.nm1, &self.fjac, &self.iphes, tail);
                solh(st.nm1, &self.e1, 1, tail, &self.ip1);
                hes_restore(st.nm1, &self.fjac, &self.iphes, tail);
            }
        }

        for i in (0..m1).rev() {
            b[i] = (b[i] + b[m2 + i]) / self.fac1;
        }
    }

    /// Overwrites `(br, bi)` with `(e2r + i·e2i)⁻¹·(br + i·bi)`.
    pub(crate) fn solve_complex(&self, br: &mut [Float], bi: &mut [Float]) {
        let st = self.structure;
        let (m1, m2) = (st.m1, st.m2);
        let (alphn, betan) = (self.alphn, self.betan);
        if m1 > 0 {
            let mm = m1 / m2;
            for j in 0..m2 {
                let (mut sumr, mut sumi) = (0.0, 0.0);
                for k in (0..mm).rev() {
                    let jkm = j + k * m2;
                    (sumr, sumi) = cdiv(br[jkm] + sumr, bi[jkm] + sumi, alphn, betan);
                    for i in jac_rows(&st, j) {
                        let a = self.fjac[(i, jkm)];
                        br[i + m1] += a * sumr;
                        bi[i + m1] += a * sumi;
                    }
                }
            }
        }

        let (tr, ti) = (&mut br[m1..], &mut bi[m1..]);
        match st.jac() {
            JacLayout::Full => solc(st.nm1, &self.e2r, &self.e2i, tr, ti, &self.ip2),
            JacLayout::Banded { ml, mu } => solbc(st.nm1, &self.e2r, &self.e2i, ml, mu, tr, ti, &self.ip2),
            JacLayout::Hessenberg => {
                hes_reduce(st.nm1, &self.fjac, &self.iphes, tr);
                hes_reduce(st.nm1, &self.fjac, &self.iphes, ti);
                solhc(st.nm1, &self.e2r, &self.e2i, 1, tr, ti, &self.ip2);
                hes_restore(st.nm1, &self.fjac, &self.iphes, tr);
                hes_restore(st.nm1, &self.fjac, &self.iphes, ti);
            }
        }

        for i in (0..m1).rev() {
            (br[i], bi[i]) = cdiv(br[i] + br[m2 + i], bi[i] + bi[m2 + i], alphn, betan);
        }
    }

    /// One simplified Newton correction.
    ///
    /// On entry `z1..z3` hold `T⁻¹·f(stage values)`, on exit the increments
    /// `Δf1..Δf3` of the transformed stage variables.
    pub(crate) fn linear_solve(&self, w: &mut Workspace) {
        let st = self.structure;
        let (fac1, alphn, betan) = (self.fac1, self.alphn, self.betan);
        for i in 0..st.n {
            let (s1, s2, s3) = if i < st.m1 {
                (w.f1[i], w.f2[i], w.f3[i])
            } else {
                let r = i - st.m1;
                (
                    self.fmas.row_dot(r, &w.f1[st.m1..]),
                    self.fmas.row_dot(r, &w.f2[st.m1..]),
                    self.fmas.row_dot(r, &w.f3[st.m1..]),
                )
            };
            w.z1[i] -= s1 * fac1;
            w.z2[i] += -s2 * alphn + s3 * betan;
            w.z3[i] += -s3 * alphn - s2 * betan;
        }
        self.solve_real(&mut w.z1);
        self.solve_complex(&mut w.z2, &mut w.z3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        matrix::MatrixStorage,
        radau::{ALPH, BETA, U1, structure::Structure},
    };
    use approx::assert_relative_eq;

    /// Dense reference: solves the real `2n × 2n` embedding of
    /// `(g·M − J)·x = b` for complex `g`.
    fn reference(j: &[Vec<Float>], m: &[Vec<Float>], g: (Float, Float), b: (&[Float], &[Float])) -> (Vec<Float>, Vec<Float>) {
        use crate::linalg::{Pivots, dec, sol};
        let n = j.len();
        let mut a = crate::matrix::Matrix::full(2 * n, 2 * n);
        for r in 0..n {
            for c in 0..n {
                let re = g.0 * m[r][c] - j[r][c];
                let im = g.1 * m[r][c];
                a[(r, c)] = re;
                a[(r, c + n)] = -im;
                a[(r + n, c)] = im;
                a[(r + n, c + n)] = re;
            }
        }
        let mut rhs: Vec<Float> = b.0.iter().chain(b.1).copied().collect();
        let mut ip = Pivots::new(2 * n);
        dec(2 * n, &mut a, &mut ip).unwrap();
        sol(2 * n, &a, &mut rhs, &ip);
        (rhs[..n].to_vec(), rhs[n..].to_vec())
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        n: usize,
        m1: usize,
        m2: usize,
        jac: MatrixStorage,
        mass: MatrixStorage,
        hess: bool,
        full_jac: &[Vec<Float>],
        full_mass: &[Vec<Float>],
    ) -> LinearSystems {
        let st = Structure::classify(n, m1, m2, jac, mass, hess).unwrap();
        let mut sys = LinearSystems::new(st);
        for i in 0..st.nm1 {
            for j in 0..n {
                if sys.fjac.offset(i, j).is_some() {
                    sys.fjac[(i, j)] = full_jac[i + m1][j];
                }
            }
            for j in 0..st.nm1 {
                if sys.fmas.offset(i, j).is_some() {
                    sys.fmas[(i, j)] = full_mass[i + m1][j + m1];
                }
            }
        }
        sys.set_step(0.05);
        sys
    }

    #[allow(clippy::too_many_arguments)]
    fn systems(
        n: usize,
        m1: usize,
        m2: usize,
        jac: MatrixStorage,
        mass: MatrixStorage,
        hess: bool,
        full_jac: &[Vec<Float>],
        full_mass: &[Vec<Float>],
    ) -> LinearSystems {
        let mut sys = assemble(n, m1, m2, jac, mass, hess, full_jac, full_mass);
        sys.decomp_real().unwrap();
        sys.decomp_complex().unwrap();
        sys
    }

    #[allow(clippy::too_many_arguments)]
    fn check_with(
        n: usize,
        m1: usize,
        m2: usize,
        jac: MatrixStorage,
        mass: MatrixStorage,
        hess: bool,
        mut j: Vec<Vec<Float>>,
        m: Vec<Vec<Float>>,
    ) {
        let mut sys = assemble(n, m1, m2, jac, mass, hess, &j, &m);
        // Entries outside the stored band are not part of the system. Read
        // them before the Hessenberg reduction overwrites `fjac`.
        for i in m1..n {
            for (c, v) in j[i].iter_mut().enumerate() {
                *v = sys.fjac.get(i - m1, c);
            }
        }
        sys.decomp_real().unwrap();
        sys.decomp_complex().unwrap();
        let b: Vec<Float> = (0..n).map(|i| 1.0 + i as Float * 0.5).collect();
        let bi: Vec<Float> = (0..n).map(|i| (i as Float).sin()).collect();

        let zero = vec![0.0; n];
        let (xr, _) = reference(&j, &m, (sys.fac1, 0.0), (&b, &zero));
        let mut x = b.clone();
        sys.solve_real(&mut x);
        for i in 0..n {
            assert_relative_eq!(x[i], xr[i], epsilon = 1e-10, max_relative = 1e-10);
        }

        let (yr, yi) = reference(&j, &m, (sys.alphn, sys.betan), (&b, &bi));
        let (mut zr, mut zi) = (b.clone(), bi.clone());
        sys.solve_complex(&mut zr, &mut zi);
        for i in 0..n {
            assert_relative_eq!(zr[i], yr[i], epsilon = 1e-10, max_relative = 1e-10);
            assert_relative_eq!(zi[i], yi[i], epsilon = 1e-10, max_relative = 1e-10);
        }
    }

    fn check(n: usize, m1: usize, jac: MatrixStorage, mass: MatrixStorage, hess: bool, j: Vec<Vec<Float>>, m: Vec<Vec<Float>>) {
        let m2 = if m1 == 0 { n } else { m1 };
        check_with(n, m1, m2, jac, mass, hess, j, m);
    }

    fn tridiagonal(n: usize) -> Vec<Vec<Float>> {
        let mut j = vec![vec![0.0; n]; n];
        for i in 0..n {
            j[i][i] = -2.0 - i as Float;
            if i > 0 {
                j[i][i - 1] = 1.0;
            }
            if i + 1 < n {
                j[i][i + 1] = 0.5;
            }
        }
        j
    }

    fn eye(n: usize) -> Vec<Vec<Float>> {
        (0..n).map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect()).collect()
    }

    fn dense_jac(n: usize) -> Vec<Vec<Float>> {
        (0..n)
            .map(|i| (0..n).map(|j| ((i * 7 + j * 3) % 5) as Float - 2.0 + if i == j { -6.0 } else { 0.0 }).collect())
            .collect()
    }

    #[test]
    fn step_constants() {
        let mut sys = systems(2, 0, 2, MatrixStorage::Full, MatrixStorage::Identity, false, &eye(2), &eye(2));
        sys.set_step(2.0);
        assert_relative_eq!(sys.fac1, U1 / 2.0);
        assert_relative_eq!(sys.alphn, ALPH / 2.0);
        assert_relative_eq!(sys.betan, BETA / 2.0);
    }

    #[test]
    fn explicit_layouts() {
        use MatrixStorage::*;
        check(5, 0, Full, Identity, false, dense_jac(5), eye(5));
        check(5, 0, Banded { ml: 1, mu: 1 }, Identity, false, tridiagonal(5), eye(5));
    }

    #[test]
    fn hessenberg_layout() {
        // The reduction works in place on `fjac`; the solves must still
        // match the unreduced Jacobian.
        let j = dense_jac(5);
        check(5, 0, MatrixStorage::Full, MatrixStorage::Identity, true, j.clone(), eye(5));
        let sys = systems(5, 0, 5, MatrixStorage::Full, MatrixStorage::Identity, true, &j, &eye(5));
        assert!(!sys.calhes);
    }

    #[test]
    fn mass_layouts() {
        use MatrixStorage::*;
        let mut m = eye(5);
        m[1][0] = 0.25;
        m[3][3] = 0.0;
        check(5, 0, Full, Banded { ml: 1, mu: 0 }, false, dense_jac(5), m.clone());
        check(5, 0, Banded { ml: 1, mu: 1 }, Banded { ml: 1, mu: 0 }, false, tridiagonal(5), m.clone());
        m[0][4] = -0.5;
        check(5, 0, Full, Full, false, dense_jac(5), m);
    }

    /// `y'[i] = y[i + k]` for `i < k = n/2`, coupled to a damped chain.
    fn second_order(n: usize) -> Vec<Vec<Float>> {
        let k = n / 2;
        let mut j = vec![vec![0.0; n]; n];
        for i in 0..k {
            j[i][i + k] = 1.0;
            j[i + k][i] = -4.0;
            j[i + k][i + k] = -0.5;
            if i > 0 {
                j[i + k][i - 1] = 1.0;
                j[i + k][i + k - 1] = 0.25;
            }
            if i + 1 < k {
                j[i + k][i + 1] = 1.0;
            }
        }
        j
    }

    #[test]
    fn second_order_layouts() {
        use MatrixStorage::*;
        check(6, 3, Full, Identity, false, second_order(6), eye(6));
        check(6, 3, Banded { ml: 1, mu: 1 }, Identity, false, second_order(6), eye(6));
        let mut m = eye(6);
        m[4][3] = 0.5;
        check(6, 3, Full, Full, false, second_order(6), m.clone());
        check(6, 3, Banded { ml: 1, mu: 1 }, Banded { ml: 1, mu: 0 }, false, second_order(6), m);
    }

    /// `y'[i] = y[i + m2]` for `i < m1`, dense coupling below.
    fn shifted(n: usize, m1: usize, m2: usize) -> Vec<Vec<Float>> {
        let mut j = dense_jac(n);
        for (i, row) in j.iter_mut().enumerate().take(m1) {
            row.fill(0.0);
            row[i + m2] = 1.0;
        }
        j
    }

    #[test]
    fn wide_trailing_block() {
        use MatrixStorage::*;
        // m1 = m2 = 2, n - m1 = 4
        check_with(6, 2, 2, Full, Identity, false, shifted(6, 2, 2), eye(6));
        check_with(6, 2, 2, Banded { ml: 2, mu: 1 }, Identity, false, shifted(6, 2, 2), eye(6));
        check_with(6, 2, 2, Banded { ml: 2, mu: 1 }, Banded { ml: 1, mu: 1 }, false, shifted(6, 2, 2), eye(6));
        // m1 = 4, m2 = 2 folds two blocks
        check_with(8, 4, 2, Banded { ml: 1, mu: 2 }, Identity, false, shifted(8, 4, 2), eye(8));
    }
}
