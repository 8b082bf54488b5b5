//! # Example: Van der Pol oscillator
//!
//! Solve the stiff Van der Pol oscillator, once as a first-order system with
//! an analytic Jacobian and once in second order form (`y0' = y1`), where
//! only the Jacobian row of `y1'` is needed.
//!
//! Equations:
//! dy0/dt = y1
//! dy1/dt = ((1 - y0^2) * y1 - y0) / eps
//!
//! Initial conditions: y0(0) = 2.0, y1(0) = -0.66
//!

use radau5::prelude::*;

struct VanDerPol {
    eps: f64,
}

impl ODE for VanDerPol {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = ((1.0 - y[0] * y[0]) * y[1] - y[0]) / self.eps;
    }

    fn jac(&self, _x: f64, y: &[f64], j: &mut Matrix) {
        // Second order form stores only the rows from m1 on
        let r = j.nrows() - 1;
        if r == 1 {
            j[(0, 1)] = 1.0;
        }
        j[(r, 0)] = (-2.0 * y[0] * y[1] - 1.0) / self.eps;
        j[(r, 1)] = (1.0 - y[0] * y[0]) / self.eps;
    }
}

fn main() {
    let van_der_pol = VanDerPol { eps: 1e-6 };
    let x0 = 0.0;
    let xend = 2.0;

    let first_order = Settings::builder().analytic_jacobian(true).build();
    let second_order = Settings::builder().analytic_jacobian(true).m1(1).build();

    for (name, settings) in [("first order", first_order), ("second order", second_order)] {
        let mut y = [2.0, -0.66];
        let mut sampler = match Sampler::equidistant(0.2) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("invalid output spacing: {e}");
                return;
            }
        };
        match radau5(&van_der_pol, x0, xend, &mut y, 1e-6, 1e-6, Some(&mut sampler), settings) {
            Ok(res) => {
                println!("{name}: {:?}, y({xend}) = {y:?}", res.status);
                println!(
                    "  fcn={} jac={} lu={} steps={} accepted={} rejected={}",
                    res.evals.ode,
                    res.evals.jac,
                    res.evals.decomp,
                    res.steps.total,
                    res.steps.accepted,
                    res.steps.rejected
                );
                for (ti, yi) in sampler.t.iter().zip(&sampler.y) {
                    println!("  x = {:>8.5}, y = [{:>12.8}, {:>12.8}]", ti, yi[0], yi[1]);
                }
            }
            Err(e) => eprintln!("radau5 failed: {:?}", e),
        }
    }
}
