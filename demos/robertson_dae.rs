//! # Example: Robertson kinetics as an index-1 DAE
//!
//! The third rate equation is replaced by the conservation law, which makes
//! the mass matrix `diag(1, 1, 0)` singular. It is passed as a band with no
//! off-diagonals.
//!
//! Equations:
//! dy0/dt = -0.04 y0 + 1e4 y1 y2
//! dy1/dt =  0.04 y0 - 1e4 y1 y2 - 3e7 y1^2
//!      0 = y0 + y1 + y2 - 1
//!
//! Initial conditions: y = (1, 0, 0)
//!

use radau5::prelude::*;

struct Robertson;

impl ODE for Robertson {
    fn ode(&self, _x: f64, y: &[f64], f: &mut [f64]) {
        f[0] = -0.04 * y[0] + 1.0e4 * y[1] * y[2];
        f[1] = 0.04 * y[0] - 1.0e4 * y[1] * y[2] - 3.0e7 * y[1] * y[1];
        f[2] = y[0] + y[1] + y[2] - 1.0;
    }

    fn jac(&self, _x: f64, y: &[f64], j: &mut Matrix) {
        j[(0, 0)] = -0.04;
        j[(0, 1)] = 1.0e4 * y[2];
        j[(0, 2)] = 1.0e4 * y[1];
        j[(1, 0)] = 0.04;
        j[(1, 1)] = -1.0e4 * y[2] - 6.0e7 * y[1];
        j[(1, 2)] = -1.0e4 * y[1];
        j[(2, 0)] = 1.0;
        j[(2, 1)] = 1.0;
        j[(2, 2)] = 1.0;
    }

    fn mass(&self, m: &mut Matrix) {
        m[(0, 0)] = 1.0;
        m[(1, 1)] = 1.0;
    }
}

fn main() {
    let settings = Settings::builder()
        .mass_storage(MatrixStorage::Banded { ml: 0, mu: 0 })
        .analytic_jacobian(true)
        .build();
    let mut solver = match Radau5::new(3, 1e-6, [1e-8, 1e-14, 1e-8], settings) {
        Ok(solver) => solver,
        Err(errors) => {
            for e in errors {
                eprintln!("invalid settings: {e}");
            }
            return;
        }
    };
    println!("structure: {:?} (ijob {})", solver.system_kind(), solver.ijob());

    // Decades 0.4, 4, 40, ... continuing from the previous endpoint
    let mut x = 0.0;
    let mut y = [1.0, 0.0, 0.0];
    let mut xend = 0.4;
    println!("{:>10}  {:>14}  {:>14}  {:>14}", "t", "y0", "y1", "y2");
    for _ in 0..8 {
        match solver.integrate(&Robertson, x, xend, &mut y, None::<&mut DummySolOut>) {
            Ok(res) if res.status == Status::Success => {
                println!("{:>10.1e}  {:>14.8e}  {:>14.8e}  {:>14.8e}", res.x, y[0], y[1], y[2]);
                x = res.x;
                xend *= 10.0;
            }
            Ok(res) => {
                eprintln!("stopped at x = {} with {:?}", res.x, res.status);
                return;
            }
            Err(e) => {
                eprintln!("radau5 failed: {e}");
                return;
            }
        }
    }
    let evals = solver.evals();
    println!("last segment: fcn={} jac={} lu={}", evals.ode, evals.jac, evals.decomp);
}
