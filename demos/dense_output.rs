//! Example: Dense output interpolation on a harmonic oscillator

use radau5::prelude::*;
use std::f64::consts::PI;

struct SHO;

impl ODE for SHO {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        // y' = [y1, -y0]
        dydx[0] = y[1];
        dydx[1] = -y[0];
    }
}

fn main() {
    let x0 = 0.0;
    let xend = 2.0 * PI; // one period
    let mut y = [1.0, 0.0];

    let mut recorder = DenseRecorder::new();
    let res = match radau5(&SHO, x0, xend, &mut y, 1e-9, 1e-9, Some(&mut recorder), Settings::default()) {
        Ok(res) => res,
        Err(e) => {
            eprintln!("radau5 failed: {:?}", e);
            return;
        }
    };
    println!("Final status: {:?}", res.status);
    println!(
        "Steps: {} (accepted {} / rejected {})",
        res.steps.total, res.steps.accepted, res.steps.rejected
    );

    // Evaluate the piecewise collocation polynomial on a fine grid
    let dense = recorder.into_output();
    if let Some((t0, t1)) = dense.t_span() {
        let npts = 41;
        let ts: Vec<f64> = (0..=npts)
            .map(|i| t0 + (t1 - t0) * (i as f64) / (npts as f64))
            .collect();
        let ys = dense.evaluate_many(&ts);

        for (i, (t, y_opt)) in ts.iter().zip(ys.iter()).enumerate() {
            if i % 8 == 0 {
                if let Some(y) = y_opt {
                    println!(
                        "t = {:>7.4}, y = [{:>.6}, {:>.6}]  ref = [{:>.6}, {:>.6}]",
                        t,
                        y[0],
                        y[1],
                        t.cos(),
                        -t.sin()
                    );
                }
            }
        }
    }
}
