//! Assembly and decomposition of `fac1·M − J` and `(alphn + i·betan)·M − J`.
//!
//! Band work matrices use the kernel layout: logical `(i, j)` lives in
//! physical row `i − j + ml + mu`. For second order systems the leading
//! `m1` block rows are eliminated first, which adds
//! `Σ_k J[:, j + k·m2] / γ^(k+1)` to the first `m2` columns.

use std::ops::Range;

use crate::{
    Float,
    linalg::{Singular, dec, decb, decbc, decc, dech, dechc, elmhes},
    matrix::Matrix,
};

use super::{
    LinearSystems,
    structure::{JacLayout, MassLayout, Structure},
};

/// Physical slot of logical entry `(i, j)` in a work matrix.
#[inline]
fn slot(layout: JacLayout, i: usize, j: usize) -> (usize, usize) {
    match layout {
        JacLayout::Full | JacLayout::Hessenberg => (i, j),
        JacLayout::Banded { ml, mu } => (i + ml + mu - j, j),
    }
}

/// Rows of column `j` (modulo `m2`) that the Jacobian can touch.
pub(super) fn jac_rows(st: &Structure, j: usize) -> Range<usize> {
    match st.jac() {
        JacLayout::Full | JacLayout::Hessenberg => 0..st.nm1,
        JacLayout::Banded { ml, mu } => j.saturating_sub(mu)..(j + ml + 1).min(st.nm1),
    }
}

/// Rows of column `j` of the mass matrix.
fn mass_rows(st: &Structure, j: usize) -> Range<usize> {
    match st.mass() {
        MassLayout::Identity => j..j + 1,
        MassLayout::Full => 0..st.nm1,
        MassLayout::Banded { ml, mu } => j.saturating_sub(mu)..(j + ml + 1).min(st.nm1),
    }
}

/// `e = −J` on the trailing columns.
fn load_jacobian(st: &Structure, fjac: &Matrix, e: &mut Matrix) {
    let m1 = st.m1;
    match st.jac() {
        JacLayout::Full => {
            for i in 0..st.nm1 {
                for j in 0..st.nm1 {
                    e[(i, j)] = -fjac[(i, j + m1)];
                }
            }
        }
        JacLayout::Hessenberg => {
            for i in 0..st.nm1 {
                for j in 0..st.nm1 {
                    e[(i, j)] = if i <= j + 1 { -fjac[(i, j)] } else { 0.0 };
                }
            }
        }
        JacLayout::Banded { ml, mu } => {
            e.fill(0.0);
            for j in 0..st.nm1 {
                for r in 0..=ml + mu {
                    e[(r + ml, j)] = -fjac.raw(r, j + m1);
                }
            }
        }
    }
}

/// `e += fac·M`.
fn add_mass(st: &Structure, fmas: &Matrix, e: &mut Matrix, fac: Float) {
    let layout = st.jac();
    for j in 0..st.nm1 {
        for i in mass_rows(st, j) {
            e[slot(layout, i, j)] += fac * fmas.get(i, j);
        }
    }
}

impl LinearSystems {
    /// Builds and decomposes `e1 = fac1·M − J`.
    pub(crate) fn decomp_real(&mut self) -> Result<(), Singular> {
        let st = self.structure;
        let layout = st.jac();
        if layout == JacLayout::Hessenberg && self.calhes {
            elmhes(st.nm1, 0, st.nm1, &mut self.fjac, &mut self.iphes);
            self.calhes = false;
        }
        load_jacobian(&st, &self.fjac, &mut self.e1);
        add_mass(&st, &self.fmas, &mut self.e1, self.fac1);

        if st.m1 > 0 {
            let mm = st.m1 / st.m2;
            for j in 0..st.m2 {
                for i in jac_rows(&st, j) {
                    let mut sum = 0.0;
                    for k in 0..mm {
                        sum = (sum + self.fjac[(i, j + k * st.m2)]) / self.fac1;
                    }
                    self.e1[slot(layout, i, j)] -= sum;
                }
            }
        }

        match layout {
            JacLayout::Full => dec(st.nm1, &mut self.e1, &mut self.ip1),
            JacLayout::Banded { ml, mu } => decb(st.nm1, &mut self.e1, ml, mu, &mut self.ip1),
            JacLayout::Hessenberg => dech(st.nm1, &mut self.e1, 1, &mut self.ip1),
        }
    }

    /// Builds and decomposes `e2r + i·e2i = (alphn + i·betan)·M − J`.
    ///
    /// Must follow [`LinearSystems::decomp_real`], which performs the
    /// Hessenberg reduction.
    pub(crate) fn decomp_complex(&mut self) -> Result<(), Singular> {
        let st = self.structure;
        let layout = st.jac();
        load_jacobian(&st, &self.fjac, &mut self.e2r);
        self.e2i.fill(0.0);
        add_mass(&st, &self.fmas, &mut self.e2r, self.alphn);
        add_mass(&st, &self.fmas, &mut self.e2i, self.betan);

        if st.m1 > 0 {
            let mm = st.m1 / st.m2;
            let abno = self.alphn * self.alphn + self.betan * self.betan;
            let alp = self.alphn / abno;
            let bet = self.betan / abno;
            for j in 0..st.m2 {
                for i in jac_rows(&st, j) {
                    let (mut sumr, mut sumi) = (0.0, 0.0);
                    for k in 0..mm {
                        let sums = sumr + self.fjac[(i, j + k * st.m2)];
                        sumr = sums * alp + sumi * bet;
                        sumi = sumi * alp - sums * bet;
                    }
                    let ij = slot(layout, i, j);
                    self.e2r[ij] -= sumr;
                    self.e2i[ij] -= sumi;
                }
            }
        }

        match layout {
            JacLayout::Full => decc(st.nm1, &mut self.e2r, &mut self.e2i, &mut self.ip2),
            JacLayout::Banded { ml, mu } => decbc(st.nm1, &mut self.e2r, &mut self.e2i, ml, mu, &mut self.ip2),
            JacLayout::Hessenberg => dechc(st.nm1, &mut self.e2r, &mut self.e2i, 1, &mut self.ip2),
        }
    }
}
