use radau5::prelude::*;

mod common;
use common::{Decay, VanDerPol};

/// Harmonic oscillator `y0' = y1, y1' = -y0`.
struct Sho;

impl ODE for Sho {
    fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
        dydx[0] = y[1];
        dydx[1] = -y[0];
    }
}

#[test]
fn backward_integration_works() {
    let x0 = 2.0 * std::f64::consts::PI;
    let mut y = [1.0, 0.0];
    let mut rec = DenseRecorder::new();
    let res = radau5(&Sho, x0, 0.0, &mut y, 1e-9, 1e-9, Some(&mut rec), Settings::default()).unwrap();
    assert_eq!(res.status, Status::Success);
    assert_eq!(res.x, 0.0);
    assert!(res.h < 0.0);
    assert!((y[0] - 1.0).abs() < 1e-6 && y[1].abs() < 1e-6);

    let dense = rec.into_output();
    let (t0, t1) = dense.t_span().unwrap();
    assert!(t0 > t1);
    let mid = 0.5 * (t0 + t1);
    let y_mid = dense.evaluate(mid).unwrap();
    assert!((y_mid[0] - mid.cos()).abs() < 1e-6);
    assert!((y_mid[1] + mid.sin()).abs() < 1e-6);
    assert!(dense.evaluate(x0 + 0.1).is_none());
}

#[test]
fn backward_decay_grows() {
    let mut y = [1.0];
    let res = radau5(
        &Decay { lambda: 1.0 },
        0.0,
        -1.0,
        &mut y,
        1e-8,
        1e-8,
        None::<&mut DummySolOut>,
        Settings::default(),
    )
    .unwrap();
    assert_eq!(res.status, Status::Success);
    assert!((y[0] - 1.0f64.exp()).abs() < 1e-6);
}

/// Checks the interpolant against the state at both ends of each step.
#[derive(Default)]
struct EndpointCheck {
    prev: Vec<f64>,
    steps: usize,
    worst: f64,
}

impl SolOut for EndpointCheck {
    fn solout<I: Interpolate>(&mut self, xold: f64, x: f64, y: &[f64], interp: &I) -> ControlFlag {
        let mut yi = vec![0.0; y.len()];
        if x != xold {
            interp.interpolate(x, &mut yi);
            assert_eq!(yi, y);
            interp.interpolate(xold, &mut yi);
            for (a, b) in yi.iter().zip(&self.prev) {
                self.worst = self.worst.max((a - b).abs() / b.abs().max(1.0));
            }
            self.steps += 1;
        } else {
            interp.interpolate(x, &mut yi);
            assert_eq!(yi, y);
        }
        self.prev = y.to_vec();
        ControlFlag::Continue
    }
}

#[test]
fn interpolant_matches_step_ends() {
    let mut check = EndpointCheck::default();
    let mut y = [2.0, -0.66];
    let problem = VanDerPol { eps: 1e-3, mass: false };
    let res = radau5(&problem, 0.0, 1.0, &mut y, 1e-6, 1e-6, Some(&mut check), Settings::default()).unwrap();
    assert_eq!(res.status, Status::Success);
    assert_eq!(check.steps, res.steps.accepted);
    assert!(check.worst < 1e-10, "{}", check.worst);
}

#[test]
fn sampler_points() {
    let mut sampler = Sampler::at(vec![0.25, 0.5, 0.75]);
    let mut y = [1.0];
    radau5(&Decay { lambda: 1.0 }, 0.0, 1.0, &mut y, 1e-8, 1e-8, Some(&mut sampler), Settings::default()).unwrap();
    assert_eq!(sampler.t, vec![0.25, 0.5, 0.75]);
    for (t, yt) in sampler.t.iter().zip(&sampler.y) {
        assert!((yt[0] - (-t).exp()).abs() < 1e-6, "t = {t}");
    }
}

#[test]
fn sampler_equidistant_backward() {
    let mut sampler = Sampler::equidistant(-0.5).unwrap();
    let mut y = [1.0, 0.0];
    radau5(&Sho, 0.0, -2.2, &mut y, 1e-8, 1e-8, Some(&mut sampler), Settings::default()).unwrap();
    assert_eq!(sampler.t, vec![0.0, -0.5, -1.0, -1.5, -2.0]);
    assert_eq!(sampler.y[0], vec![1.0, 0.0]);
    for (t, yt) in sampler.t.iter().zip(&sampler.y) {
        assert!((yt[0] - t.cos()).abs() < 1e-6);
    }
}

#[test]
fn dense_output_over_stiff_transient() {
    let mut rec = DenseRecorder::new();
    let mut y = [1.0];
    let res = radau5(&Decay { lambda: 50.0 }, 0.0, 1.0, &mut y, 1e-8, 1e-10, Some(&mut rec), Settings::default()).unwrap();
    let dense = rec.output();
    assert_eq!(dense.len(), res.steps.accepted);
    let ts = [0.0, 0.01, 0.05, 0.2, 1.0];
    for (t, yt) in ts.iter().zip(dense.evaluate_many(&ts)) {
        let yt = yt.unwrap();
        assert!((yt[0] - (-50.0 * t).exp()).abs() < 1e-5, "t = {t}: {}", yt[0]);
    }
}

#[test]
fn zero_output_spacing_is_rejected() {
    assert_eq!(Sampler::equidistant(0.0).unwrap_err(), Error::InvalidOutputSpacing(0.0));
    assert!(Sampler::equidistant(f64::NAN).is_err());

    // A valid spacing finer than every step still terminates
    let mut sampler = Sampler::equidistant(1e-3).unwrap();
    let mut y = [1.0];
    let res = radau5(&Decay { lambda: 1.0 }, 0.0, 1.0, &mut y, 1e-6, 1e-6, Some(&mut sampler), Settings::default()).unwrap();
    assert_eq!(res.status, Status::Success);
    assert_eq!(sampler.t.len(), 1001);
}
