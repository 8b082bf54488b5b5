//! Band kernels: `decb`/`solb` and the complex `decbc`/`solbc`.
//!
//! The matrix occupies a buffer with `2·ml + mu + 1` rows: logical entry
//! `(i, j)` is stored at physical row `i - j + ml + mu`, column `j`.

use crate::{Float, matrix::Matrix};

use super::{Pivots, Singular, cdiv};

/// Triangularizes a band matrix with `ml` sub- and `mu` super-diagonals.
///
/// `U` is returned in the upper `ml + mu + 1` physical rows (fill-in
/// included), the multipliers in the lower `ml` rows.
pub fn decb(n: usize, a: &mut Matrix, ml: usize, mu: usize, ip: &mut Pivots) -> Result<(), Singular> {
    ip.sign = 1;
    let md = ml + mu;
    let md1 = md + 1;
    if n > 1 && ml > 0 {
        for j in mu + 1..n {
            for i in 0..ml {
                a[(i, j)] = 0.0;
            }
        }
        let mut ju = 0;
        for k in 0..n - 1 {
            let mut m = md;
            let mdl = ml.min(n - 1 - k) + md;
            for i in md1..=mdl {
                if a[(i, k)].abs() > a[(m, k)].abs() {
                    m = i;
                }
            }
            ip.ip[k] = m + k - md;
            let t = a[(m, k)];
            if m != md {
                ip.sign = -ip.sign;
                a[(m, k)] = a[(md, k)];
                a[(md, k)] = t;
            }
            if t == 0.0 {
                return ip.singular(k);
            }
            let t = 1.0 / t;
            for i in md1..=mdl {
                a[(i, k)] *= -t;
            }
            ju = ju.max(mu + ip.ip[k] + 1).min(n);
            let mut mm = md;
            for j in k + 1..ju {
                m -= 1;
                mm -= 1;
                let t = a[(m, j)];
                if m != mm {
                    a[(m, j)] = a[(mm, j)];
                    a[(mm, j)] = t;
                }
                if t == 0.0 {
                    continue;
                }
                let jk = j - k;
                for i in md1..=mdl {
                    a[(i - jk, j)] += a[(i, k)] * t;
                }
            }
        }
    }
    if ml == 0 {
        // No elimination happened, so every pivot is a plain diagonal entry.
        for k in 0..n {
            if a[(md, k)] == 0.0 {
                return ip.singular(k);
            }
        }
    }
    if n > 0 && a[(md, n - 1)] == 0.0 {
        return ip.singular(n - 1);
    }
    Ok(())
}

/// Solves with the factors from [`decb`]; `b` is overwritten by `x`.
pub fn solb(n: usize, a: &Matrix, ml: usize, mu: usize, b: &mut [Float], ip: &Pivots) {
    if n == 0 {
        return;
    }
    let md = ml + mu;
    if n > 1 {
        if ml != 0 {
            for k in 0..n - 1 {
                let m = ip.ip[k];
                let t = b[m];
                b[m] = b[k];
                b[k] = t;
                let mdl = ml.min(n - 1 - k) + md;
                for i in md + 1..=mdl {
                    b[i + k - md] += a[(i, k)] * t;
                }
            }
        }
        for kb in (1..n).rev() {
            b[kb] /= a[(md, kb)];
            let t = -b[kb];
            for i in md.saturating_sub(kb)..md {
                b[i + kb - md] += a[(i, kb)] * t;
            }
        }
    }
    b[0] /= a[(md, 0)];
}

/// Complex version of [`decb`] on the pair `(ar, ai)`.
pub fn decbc(
    n: usize,
    ar: &mut Matrix,
    ai: &mut Matrix,
    ml: usize,
    mu: usize,
    ip: &mut Pivots,
) -> Result<(), Singular> {
    ip.sign = 1;
    let md = ml + mu;
    let md1 = md + 1;
    if n > 1 && ml > 0 {
        for j in mu + 1..n {
            for i in 0..ml {
                ar[(i, j)] = 0.0;
                ai[(i, j)] = 0.0;
            }
        }
        let mut ju = 0;
        for k in 0..n - 1 {
            let mut m = md;
            let mdl = ml.min(n - 1 - k) + md;
            for i in md1..=mdl {
                if ar[(i, k)].abs() + ai[(i, k)].abs() > ar[(m, k)].abs() + ai[(m, k)].abs() {
                    m = i;
                }
            }
            ip.ip[k] = m + k - md;
            let (tr, ti) = (ar[(m, k)], ai[(m, k)]);
            if m != md {
                ip.sign = -ip.sign;
                ar[(m, k)] = ar[(md, k)];
                ai[(m, k)] = ai[(md, k)];
                ar[(md, k)] = tr;
                ai[(md, k)] = ti;
            }
            if tr.abs() + ti.abs() == 0.0 {
                return ip.singular(k);
            }
            let (tr, ti) = cdiv(1.0, 0.0, tr, ti);
            for i in md1..=mdl {
                let (xr, xi) = (ar[(i, k)], ai[(i, k)]);
                ar[(i, k)] = -(xr * tr - xi * ti);
                ai[(i, k)] = -(xi * tr + xr * ti);
            }
            ju = ju.max(mu + ip.ip[k] + 1).min(n);
            let mut mm = md;
            for j in k + 1..ju {
                m -= 1;
                mm -= 1;
                let (tr, ti) = (ar[(m, j)], ai[(m, j)]);
                if m != mm {
                    ar[(m, j)] = ar[(mm, j)];
                    ai[(m, j)] = ai[(mm, j)];
                    ar[(mm, j)] = tr;
                    ai[(mm, j)] = ti;
                }
                if tr.abs() + ti.abs() == 0.0 {
                    continue;
                }
                let jk = j - k;
                for i in md1..=mdl {
                    let (lr, li) = (ar[(i, k)], ai[(i, k)]);
                    ar[(i - jk, j)] += lr * tr - li * ti;
                    ai[(i - jk, j)] += li * tr + lr * ti;
                }
            }
        }
    }
    if ml == 0 {
        for k in 0..n {
            if ar[(md, k)].abs() + ai[(md, k)].abs() == 0.0 {
                return ip.singular(k);
            }
        }
    }
    if n > 0 && ar[(md, n - 1)].abs() + ai[(md, n - 1)].abs() == 0.0 {
        return ip.singular(n - 1);
    }
    Ok(())
}

/// Solves with the factors from [`decbc`]; `(br, bi)` is overwritten.
pub fn solbc(
    n: usize,
    ar: &Matrix,
    ai: &Matrix,
    ml: usize,
    mu: usize,
    br: &mut [Float],
    bi: &mut [Float],
    ip: &Pivots,
) {
    if n == 0 {
        return;
    }
    let md = ml + mu;
    if ml != 0 {
        for k in 0..n - 1 {
            let m = ip.ip[k];
            let (tr, ti) = (br[m], bi[m]);
            br[m] = br[k];
            bi[m] = bi[k];
            br[k] = tr;
            bi[k] = ti;
            let mdl = ml.min(n - 1 - k) + md;
            for i in md + 1..=mdl {
                let imd = i + k - md;
                br[imd] += ar[(i, k)] * tr - ai[(i, k)] * ti;
                bi[imd] += ai[(i, k)] * tr + ar[(i, k)] * ti;
            }
        }
    }
    for kb in (0..n).rev() {
        let (xr, xi) = cdiv(br[kb], bi[kb], ar[(md, kb)], ai[(md, kb)]);
        br[kb] = xr;
        bi[kb] = xi;
        let (tr, ti) = (-xr, -xi);
        for i in md.saturating_sub(kb)..md {
            let imd = i + kb - md;
            br[imd] += ar[(i, kb)] * tr - ai[(i, kb)] * ti;
            bi[imd] += ai[(i, kb)] * tr + ar[(i, kb)] * ti;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg::{dec, decc, sol, solc};
    use approx::assert_relative_eq;

    /// Packs `f(i, j)` for `|i - j|` inside the band into decomposition layout.
    fn pack(n: usize, ml: usize, mu: usize, f: impl Fn(usize, usize) -> Float) -> Matrix {
        let mut a = Matrix::full(2 * ml + mu + 1, n);
        for j in 0..n {
            for i in j.saturating_sub(mu)..(j + ml + 1).min(n) {
                a[(i + ml + mu - j, j)] = f(i, j);
            }
        }
        a
    }

    fn dense(n: usize, ml: usize, mu: usize, f: impl Fn(usize, usize) -> Float) -> Matrix {
        let mut a = Matrix::full(n, n);
        for j in 0..n {
            for i in j.saturating_sub(mu)..(j + ml + 1).min(n) {
                a[(i, j)] = f(i, j);
            }
        }
        a
    }

    fn laplacian(i: usize, j: usize) -> Float {
        if i == j { 2.0 } else { -1.0 }
    }

    #[test]
    fn tridiagonal_closed_form() {
        // tridiag(-1, 2, -1)·x = 1 has x_i = (i + 1)(n - i) / 2.
        let n = 5;
        let mut a = pack(n, 1, 1, laplacian);
        let mut ip = Pivots::new(n);
        decb(n, &mut a, 1, 1, &mut ip).unwrap();
        let mut b = vec![1.0; n];
        solb(n, &a, 1, 1, &mut b, &ip);
        for i in 0..n {
            let expected = ((i + 1) * (n - i)) as Float / 2.0;
            assert_relative_eq!(b[i], expected, epsilon = 1e-13);
        }
    }

    #[test]
    fn pivoting_band_matches_dense() {
        // Weak diagonal forces row interchanges inside the band.
        let f = |i: usize, j: usize| {
            if i == j {
                1e-3 * (i + 1) as Float
            } else {
                1.0 + 0.5 * i as Float - 0.25 * j as Float
            }
        };
        let (n, ml, mu) = (7, 2, 1);
        let mut a = pack(n, ml, mu, f);
        let mut ip = Pivots::new(n);
        decb(n, &mut a, ml, mu, &mut ip).unwrap();
        let mut d = dense(n, ml, mu, f);
        let mut ipd = Pivots::new(n);
        dec(n, &mut d, &mut ipd).unwrap();

        let b: Vec<Float> = (0..n).map(|i| (i as Float).sin() + 1.0).collect();
        let (mut x, mut y) = (b.clone(), b);
        solb(n, &a, ml, mu, &mut x, &ip);
        sol(n, &d, &mut y, &ipd);
        for i in 0..n {
            assert_relative_eq!(x[i], y[i], epsilon = 1e-10, max_relative = 1e-10);
        }
        assert_eq!(ip.det_sign(), ipd.det_sign());
    }

    #[test]
    fn upper_band_zero_diagonal() {
        let mut a = pack(3, 0, 1, |i, j| if i == j && i == 1 { 0.0 } else { 1.0 });
        let mut ip = Pivots::new(3);
        assert_eq!(decb(3, &mut a, 0, 1, &mut ip), Err(Singular(1)));
    }

    #[test]
    fn zero_last_row() {
        let n = 4;
        let mut a = pack(n, 1, 1, |i, _| if i == n - 1 { 0.0 } else { 1.0 + i as Float });
        let mut ip = Pivots::new(n);
        assert_eq!(decb(n, &mut a, 1, 1, &mut ip), Err(Singular(n - 1)));
        assert_eq!(ip.det_sign(), 0);
    }

    #[test]
    fn complex_band_matches_dense() {
        let (n, ml, mu) = (6, 1, 2);
        let re = |i: usize, j: usize| if i == j { 0.1 } else { 1.0 + (i + 2 * j) as Float * 0.1 };
        let im = |i: usize, j: usize| if i == j { 3.0 } else { -0.5 };
        let mut ar = pack(n, ml, mu, re);
        let mut ai = pack(n, ml, mu, im);
        let mut ip = Pivots::new(n);
        decbc(n, &mut ar, &mut ai, ml, mu, &mut ip).unwrap();

        let mut dr = dense(n, ml, mu, re);
        let mut di = dense(n, ml, mu, im);
        let mut ipd = Pivots::new(n);
        decc(n, &mut dr, &mut di, &mut ipd).unwrap();

        let br0: Vec<Float> = (0..n).map(|i| 1.0 + i as Float).collect();
        let bi0: Vec<Float> = (0..n).map(|i| -(i as Float)).collect();
        let (mut br, mut bi) = (br0.clone(), bi0.clone());
        let (mut cr, mut ci) = (br0, bi0);
        solbc(n, &ar, &ai, ml, mu, &mut br, &mut bi, &ip);
        solc(n, &dr, &di, &mut cr, &mut ci, &ipd);
        for i in 0..n {
            assert_relative_eq!(br[i], cr[i], epsilon = 1e-12, max_relative = 1e-10);
            assert_relative_eq!(bi[i], ci[i], epsilon = 1e-12, max_relative = 1e-10);
        }
    }

    #[test]
    fn scalar_band() {
        let mut ar = pack(1, 1, 1, |_, _| 0.0);
        let mut ai = pack(1, 1, 1, |_, _| 2.0);
        let mut ip = Pivots::new(1);
        decbc(1, &mut ar, &mut ai, 1, 1, &mut ip).unwrap();
        let (mut br, mut bi) = ([4.0], [0.0]);
        solbc(1, &ar, &ai, 1, 1, &mut br, &mut bi, &ip);
        assert_relative_eq!(br[0], 0.0, epsilon = 1e-15);
        assert_relative_eq!(bi[0], -2.0, epsilon = 1e-15);
    }
}
