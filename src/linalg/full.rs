//! Dense kernels: `dec`/`sol` and their complex counterparts `decc`/`solc`.

use crate::{Float, matrix::Matrix};

use super::{Pivots, Singular, cdiv};

/// Triangularizes the leading `n × n` block of `a` in place.
///
/// On return the upper triangle holds `U` and the strict lower triangle the
/// negated multipliers of `L`. `ip` records the pivot rows and the sign of
/// the determinant.
pub fn dec(n: usize, a: &mut Matrix, ip: &mut Pivots) -> Result<(), Singular> {
    ip.sign = 1;
    for k in 0..n.saturating_sub(1) {
        let mut m = k;
        for i in k + 1..n {
            if a[(i, k)].abs() > a[(m, k)].abs() {
                m = i;
            }
        }
        ip.ip[k] = m;
        let t = a[(m, k)];
        if m != k {
            ip.sign = -ip.sign;
            a[(m, k)] = a[(k, k)];
            a[(k, k)] = t;
        }
        if t == 0.0 {
            return ip.singular(k);
        }
        let t = 1.0 / t;
        for i in k + 1..n {
            a[(i, k)] *= -t;
        }
        for j in k + 1..n {
            let t = a[(m, j)];
            a[(m, j)] = a[(k, j)];
            a[(k, j)] = t;
            if t != 0.0 {
                for i in k + 1..n {
                    a[(i, j)] += a[(i, k)] * t;
                }
            }
        }
    }
    if n > 0 && a[(n - 1, n - 1)] == 0.0 {
        return ip.singular(n - 1);
    }
    Ok(())
}

/// Solves `A·x = b` with the factors from [`dec`]; `b` is overwritten by `x`.
pub fn sol(n: usize, a: &Matrix, b: &mut [Float], ip: &Pivots) {
    if n == 0 {
        return;
    }
    for k in 0..n - 1 {
        let m = ip.ip[k];
        let t = b[m];
        b[m] = b[k];
        b[k] = t;
        for i in k + 1..n {
            b[i] += a[(i, k)] * t;
        }
    }
    for kb in (1..n).rev() {
        b[kb] /= a[(kb, kb)];
        let t = -b[kb];
        for i in 0..kb {
            b[i] += a[(i, kb)] * t;
        }
    }
    b[0] /= a[(0, 0)];
}

/// Complex version of [`dec`] on the pair `(ar, ai)`.
pub fn decc(n: usize, ar: &mut Matrix, ai: &mut Matrix, ip: &mut Pivots) -> Result<(), Singular> {
    ip.sign = 1;
    for k in 0..n.saturating_sub(1) {
        let mut m = k;
        for i in k + 1..n {
            if ar[(i, k)].abs() + ai[(i, k)].abs() > ar[(m, k)].abs() + ai[(m, k)].abs() {
                m = i;
            }
        }
        ip.ip[k] = m;
        let (tr, ti) = (ar[(m, k)], ai[(m, k)]);
        if m != k {
            ip.sign = -ip.sign;
            ar[(m, k)] = ar[(k, k)];
            ai[(m, k)] = ai[(k, k)];
            ar[(k, k)] = tr;
            ai[(k, k)] = ti;
        }
        if tr.abs() + ti.abs() == 0.0 {
            return ip.singular(k);
        }
        let (tr, ti) = cdiv(1.0, 0.0, tr, ti);
        for i in k + 1..n {
            let (xr, xi) = (ar[(i, k)], ai[(i, k)]);
            ar[(i, k)] = -(xr * tr - xi * ti);
            ai[(i, k)] = -(xi * tr + xr * ti);
        }
        for j in k + 1..n {
            let (tr, ti) = (ar[(m, j)], ai[(m, j)]);
            ar[(m, j)] = ar[(k, j)];
            ai[(m, j)] = ai[(k, j)];
            ar[(k, j)] = tr;
            ai[(k, j)] = ti;
            if tr.abs() + ti.abs() == 0.0 {
                continue;
            }
            for i in k + 1..n {
                let (lr, li) = (ar[(i, k)], ai[(i, k)]);
                ar[(i, j)] += lr * tr - li * ti;
                ai[(i, j)] += li * tr + lr * ti;
            }
        }
    }
    if n > 0 && ar[(n - 1, n - 1)].abs() + ai[(n - 1, n - 1)].abs() == 0.0 {
        return ip.singular(n - 1);
    }
    Ok(())
}

/// Solves the complex system factored by [`decc`]; `(br, bi)` is overwritten.
pub fn solc(n: usize, ar: &Matrix, ai: &Matrix, br: &mut [Float], bi: &mut [Float], ip: &Pivots) {
    if n == 0 {
        return;
    }
    for k in 0..n - 1 {
        let m = ip.ip[k];
        let (tr, ti) = (br[m], bi[m]);
        br[m] = br[k];
        bi[m] = bi[k];
        br[k] = tr;
        bi[k] = ti;
        for i in k + 1..n {
            br[i] += ar[(i, k)] * tr - ai[(i, k)] * ti;
            bi[i] += ai[(i, k)] * tr + ar[(i, k)] * ti;
        }
    }
    for kb in (0..n).rev() {
        let (xr, xi) = cdiv(br[kb], bi[kb], ar[(kb, kb)], ai[(kb, kb)]);
        br[kb] = xr;
        bi[kb] = xi;
        let (tr, ti) = (-xr, -xi);
        for i in 0..kb {
            br[i] += ar[(i, kb)] * tr - ai[(i, kb)] * ti;
            bi[i] += ai[(i, kb)] * tr + ar[(i, kb)] * ti;
        }
    }
}
