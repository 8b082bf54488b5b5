//! Upper Hessenberg kernels and the elementary reduction `elmhes`.

use crate::{Float, matrix::Matrix};

use super::{Pivots, Singular, cdiv};

/// Triangularizes a matrix with lower bandwidth `lb` (`lb = 1` for upper
/// Hessenberg). Entries more than `lb` below the diagonal are never read.
pub fn dech(n: usize, a: &mut Matrix, lb: usize, ip: &mut Pivots) -> Result<(), Singular> {
    ip.sign = 1;
    for k in 0..n.saturating_sub(1) {
        let na = n.min(lb + k + 1);
        let mut m = k;
        for i in k + 1..na {
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
        for i in k + 1..na {
            a[(i, k)] *= -t;
        }
        for j in k + 1..n {
            let t = a[(m, j)];
            a[(m, j)] = a[(k, j)];
            a[(k, j)] = t;
            if t != 0.0 {
                for i in k + 1..na {
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

/// Solves with the factors from [`dech`]; `b` is overwritten by `x`.
pub fn solh(n: usize, a: &Matrix, lb: usize, b: &mut [Float], ip: &Pivots) {
    if n == 0 {
        return;
    }
    for k in 0..n - 1 {
        let m = ip.ip[k];
        let t = b[m];
        b[m] = b[k];
        b[k] = t;
        for i in k + 1..n.min(lb + k + 1) {
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

/// Complex version of [`dech`].
pub fn dechc(
    n: usize,
    ar: &mut Matrix,
    ai: &mut Matrix,
    lb: usize,
    ip: &mut Pivots,
) -> Result<(), Singular> {
    ip.sign = 1;
    for k in 0..n.saturating_sub(1) {
        let na = n.min(lb + k + 1);
        let mut m = k;
        for i in k + 1..na {
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
        for i in k + 1..na {
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
            for i in k + 1..na {
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

/// Solves with the factors from [`dechc`]; `(br, bi)` is overwritten.
pub fn solhc(
    n: usize,
    ar: &Matrix,
    ai: &Matrix,
    lb: usize,
    br: &mut [Float],
    bi: &mut [Float],
    ip: &Pivots,
) {
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
        for i in k + 1..n.min(lb + k + 1) {
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

/// Reduces rows and columns `low..igh` of `a` to upper Hessenberg form by
/// stabilized elementary similarity transformations.
///
/// On return the Hessenberg matrix occupies the upper triangle and the first
/// subdiagonal; the multipliers are kept below the subdiagonal and
/// `inter[m]` records the row and column interchanged with `m` at stage `m`.
/// Both are consumed by [`hes_reduce`] and [`hes_restore`].
pub fn elmhes(n: usize, low: usize, igh: usize, a: &mut Matrix, inter: &mut [usize]) {
    if igh < low + 3 {
        return;
    }
    for m in low + 1..igh - 1 {
        let mm1 = m - 1;
        let mut x: Float = 0.0;
        let mut p = m;
        for j in m..igh {
            if a[(j, mm1)].abs() > x.abs() {
                x = a[(j, mm1)];
                p = j;
            }
        }
        inter[m] = p;
        if p != m {
            for j in mm1..n {
                let y = a[(p, j)];
                a[(p, j)] = a[(m, j)];
                a[(m, j)] = y;
            }
            for j in 0..igh {
                let y = a[(j, p)];
                a[(j, p)] = a[(j, m)];
                a[(j, m)] = y;
            }
        }
        if x == 0.0 {
            continue;
        }
        for i in m + 1..igh {
            let y = a[(i, mm1)];
            if y == 0.0 {
                continue;
            }
            let y = y / x;
            a[(i, mm1)] = y;
            for j in m..n {
                a[(i, j)] -= y * a[(m, j)];
            }
            for j in 0..igh {
                a[(j, m)] += y * a[(j, i)];
            }
        }
    }
}

/// Maps a right-hand side of `γI - A` to one of `γI - H`, with `H` and the
/// transformations produced by [`elmhes`] on the full range.
pub fn hes_reduce(n: usize, a: &Matrix, inter: &[usize], b: &mut [Float]) {
    for mp in 1..n.saturating_sub(1) {
        b.swap(mp, inter[mp]);
        for i in mp + 1..n {
            b[i] -= a[(i, mp - 1)] * b[mp];
        }
    }
}

/// Inverse of [`hes_reduce`]: maps a solution of `γI - H` back to `γI - A`.
pub fn hes_restore(n: usize, a: &Matrix, inter: &[usize], b: &mut [Float]) {
    for mp in (1..n.saturating_sub(1)).rev() {
        for i in mp + 1..n {
            b[i] += a[(i, mp - 1)] * b[mp];
        }
        b.swap(mp, inter[mp]);
    }
}
