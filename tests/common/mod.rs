#![allow(dead_code)]

use radau5::prelude::*;

/// `y' = -λ·y`
pub struct Decay {
    pub lambda: f64,
}

impl ODE for Decay {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = -self.lambda * y[0];
    }

    fn jac(&self, _x: f64, _y: &[f64], j: &mut Matrix) {
        j[(0, 0)] = -self.lambda;
    }
}

/// Robertson's chemical kinetics.
pub struct Robertson;

/// Solution at `x = 40` from `y0 = (1, 0, 0)`.
pub const ROBERTSON_40: [f64; 3] = [0.715_827_068_7, 9.185_534_765e-6, 0.284_163_745_7];

impl ODE for Robertson {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = -0.04 * y[0] + 1.0e4 * y[1] * y[2];
        dydx[1] = 0.04 * y[0] - 1.0e4 * y[1] * y[2] - 3.0e7 * y[1] * y[1];
        dydx[2] = 3.0e7 * y[1] * y[1];
    }

    fn jac(&self, _x: f64, y: &[f64], j: &mut Matrix) {
        j[(0, 0)] = -0.04;
        j[(0, 1)] = 1.0e4 * y[2];
        j[(0, 2)] = 1.0e4 * y[1];
        j[(1, 0)] = 0.04;
        j[(1, 1)] = -1.0e4 * y[2] - 6.0e7 * y[1];
        j[(1, 2)] = -1.0e4 * y[1];
        j[(2, 1)] = 6.0e7 * y[1];
    }
}

/// Van der Pol oscillator `y1' = y2, ε·y2' = (1 - y1²)·y2 - y1`.
///
/// With `mass` set the `ε` moves into a diagonal mass matrix.
pub struct VanDerPol {
    pub eps: f64,
    pub mass: bool,
}

/// Solution at `x = 2` for `ε = 1e-6` from `y0 = (2, -0.66)`.
pub const VDP_2: [f64; 2] = [1.706_167_437_5, -0.892_810_016_6];

impl VanDerPol {
    pub fn stiff() -> Self {
        Self { eps: 1e-6, mass: false }
    }

    fn scale(&self) -> f64 {
        if self.mass { 1.0 } else { 1.0 / self.eps }
    }
}

impl ODE for VanDerPol {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = ((1.0 - y[0] * y[0]) * y[1] - y[0]) * self.scale();
    }

    fn jac(&self, _x: f64, y: &[f64], j: &mut Matrix) {
        let s = self.scale();
        if j.nrows() == 2 {
            j[(0, 1)] = 1.0;
            j[(1, 0)] = (-2.0 * y[0] * y[1] - 1.0) * s;
            j[(1, 1)] = (1.0 - y[0] * y[0]) * s;
        } else {
            // second order form: only the row of y2'
            j[(0, 0)] = (-2.0 * y[0] * y[1] - 1.0) * s;
            j[(0, 1)] = (1.0 - y[0] * y[0]) * s;
        }
    }

    fn mass(&self, m: &mut Matrix) {
        if m.nrows() == 2 {
            m[(0, 0)] = 1.0;
            m[(1, 1)] = self.eps;
        } else {
            m[(0, 0)] = self.eps;
        }
    }
}

/// Discretized reaction-diffusion `u_t = d·u_xx - u² + source`, tridiagonal.
///
/// The right-hand side is multiplied by `weight`, and so is the mass
/// matrix, which leaves the solution unchanged.
pub struct Chain {
    pub n: usize,
    pub d: f64,
    pub weight: f64,
}

impl Chain {
    pub fn new(n: usize) -> Self {
        Self { n, d: 4.0, weight: 1.0 }
    }

    pub fn y0(&self) -> Vec<f64> {
        (0..self.n).map(|i| 0.5 * (i + 1) as f64 / self.n as f64).collect()
    }
}

impl ODE for Chain {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        let n = self.n;
        for i in 0..n {
            let left = if i > 0 { y[i - 1] } else { 0.0 };
            let right = if i + 1 < n { y[i + 1] } else { 0.0 };
            let source = if i == 0 { 1.0 } else { 0.0 };
            dydx[i] = self.weight * (self.d * (left - 2.0 * y[i] + right) - y[i] * y[i] + source);
        }
    }

    fn jac(&self, _x: f64, y: &[f64], j: &mut Matrix) {
        let n = self.n;
        for i in 0..n {
            j[(i, i)] = self.weight * (-2.0 * self.d - 2.0 * y[i]);
            if i > 0 {
                j[(i, i - 1)] = self.weight * self.d;
            }
            if i + 1 < n {
                j[(i, i + 1)] = self.weight * self.d;
            }
        }
    }

    fn mass(&self, m: &mut Matrix) {
        for i in 0..self.n {
            m[(i, i)] = self.weight;
        }
    }
}

/// Chain of `k` damped, weakly nonlinear oscillators in first order form
/// `y = (q, v)`: `q' = v`, `v' = -K·q - c·v - 0.2·q³`.
pub struct Springs {
    pub k: usize,
}

impl Springs {
    pub fn y0(&self) -> Vec<f64> {
        let mut y = vec![0.0; 2 * self.k];
        for (i, q) in y.iter_mut().take(self.k).enumerate() {
            *q = [1.0, 0.0, -0.5][i % 3];
        }
        y[self.k + 1] = 0.3;
        y
    }
}

impl ODE for Springs {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        let k = self.k;
        let (q, v) = y.split_at(k);
        for i in 0..k {
            let left = if i > 0 { q[i - 1] } else { 0.0 };
            let right = if i + 1 < k { q[i + 1] } else { 0.0 };
            dydx[i] = v[i];
            dydx[k + i] = -4.0 * q[i] + left + right - 0.5 * v[i] - 0.2 * q[i].powi(3);
        }
    }

    fn mass(&self, m: &mut Matrix) {
        for i in 0..m.nrows() {
            m[(i, i)] = 1.0;
        }
    }
}

/// Settings with the given Jacobian and mass layouts.
pub fn layout(jac: MatrixStorage, mass: MatrixStorage) -> Settings {
    Settings::builder().jac_storage(jac).mass_storage(mass).build()
}

pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max)
}
