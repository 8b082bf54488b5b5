//! # Example: Exponential Decay
//!
//! Solve a stiff exponential decay and reuse the integrator for several
//! decay rates.
//!
//! Equations:
//! dy/dx = -lambda * y
//!
//! Initial condition: y(0) = 1.0
//!

use radau5::prelude::*;

struct Decay {
    lambda: f64,
}

impl ODE for Decay {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        for i in 0..y.len() {
            dydx[i] = -self.lambda * y[i];
        }
    }
}

fn main() {
    let x0 = 0.0;
    let xend = 5.0;

    let mut solver = match Radau5::new(1, 1e-6, 1e-6, Settings::default()) {
        Ok(solver) => solver,
        Err(errors) => {
            for e in errors {
                eprintln!("invalid settings: {e}");
            }
            return;
        }
    };

    for lambda in [1.0, 1.0e2, 1.0e4, 1.0e6] {
        let mut y = [1.0];
        match solver.integrate(&Decay { lambda }, x0, xend, &mut y, None::<&mut DummySolOut>) {
            Ok(res) => {
                println!("lambda = {lambda:e}: status {:?}, y({xend}) = {:e}", res.status, y[0]);
                println!(
                    "  function evaluations: {}, steps: {} (accepted {}, rejected {})",
                    res.evals.ode, res.steps.total, res.steps.accepted, res.steps.rejected
                );
            }
            Err(e) => eprintln!("Integration failed: {e}"),
        }
    }
}
