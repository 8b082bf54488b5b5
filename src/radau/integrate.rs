//! Step size control and the simplified Newton iteration.

use crate::{
    Float,
    error::Error,
    ode::ODE,
    result::IntegrationResult,
    solout::{ControlFlag, SolOut},
    stats::{Evals, Steps},
    status::Status,
};

use super::{
    C1, C2, Radau5, T11, T12, T13, T21, T22, T23, T31, TI11, TI12, TI13, TI21, TI22, TI23, TI31, TI32, TI33,
    dense::{DenseRadau, build_cont, extrapolate},
};

/// Consecutive singular decompositions tolerated before giving up.
const MAX_SINGULAR: usize = 5;

/// `v ← TI·v` applied componentwise to the three stage vectors.
fn apply_ti(z1: &mut [Float], z2: &mut [Float], z3: &mut [Float]) {
    for i in 0..z1.len() {
        let (a1, a2, a3) = (z1[i], z2[i], z3[i]);
        z1[i] = TI11 * a1 + TI12 * a2 + TI13 * a3;
        z2[i] = TI21 * a1 + TI22 * a2 + TI23 * a3;
        z3[i] = TI31 * a1 + TI32 * a2 + TI33 * a3;
    }
}

/// Ratio `h / hnew`, limited to `[facr, facl]`.
fn step_quotient(err: Float, fac: Float, facr: Float, facl: Float) -> Float {
    (err.powf(0.25) / fac).min(facl).max(facr)
}

impl Radau5 {
    /// Integrates from `x` to `xend`, overwriting `y` with the solution.
    ///
    /// `solout` is called once before the first step and after every
    /// accepted step. Fatal conditions are reported through
    /// [`IntegrationResult::status`] with `x` and `y` left at the last
    /// accepted point; `Err` is only returned when `y` has the wrong length.
    pub fn integrate<F, S>(
        &mut self,
        f: &F,
        mut x: Float,
        xend: Float,
        y: &mut [Float],
        mut solout: Option<&mut S>,
    ) -> Result<IntegrationResult, Error>
    where
        F: ODE,
        S: SolOut,
    {
        let n = self.n;
        if y.len() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                got: y.len(),
            });
        }
        self.evals = Evals::default();
        self.steps = Steps::default();
        let p = self.params;

        let posneg = (xend - x).signum();
        let span = (xend - x).abs();
        let hmaxn = p.hmax.map_or(span, |hmax| hmax.abs().min(span));
        let cfac = p.safe * (1 + 2 * p.nit) as Float;

        if self.sys.structure.implicit() {
            self.sys.fmas.fill(0.0);
            f.mass(&mut self.sys.fmas);
        }

        let mut h = p.h0.min(hmaxn).copysign(posneg);
        let mut hold = h;
        let mut last = false;
        if (x + h * 1.0001 - xend) * posneg >= 0.0 {
            h = xend - x;
            last = true;
        }
        let mut hopt = h;
        let mut faccon: Float = 1.0;

        self.work.cont[..n].copy_from_slice(y);
        self.work.cont[n..].fill(0.0);
        if let Some(s) = solout.as_mut() {
            let dense = DenseRadau {
                cont: &self.work.cont,
                xold: x,
                h: 0.0,
            };
            if s.solout(x, x, y, &dense) == ControlFlag::Interrupt {
                log::info!("integration interrupted by output hook at x = {x}");
                return Ok(self.result(x, h, Status::Interrupted));
            }
        }
        if x == xend {
            return Ok(self.result(x, h, Status::Success));
        }

        self.compute_scal(y);
        f.ode(x, y, &mut self.work.y0);
        self.evals.ode += 1;

        let mut hhfac = h;
        let (mut hacc, mut erracc, mut thqold): (Float, Float, Float) = (0.0, 0.0, 0.0);
        let mut nsing = 0;
        let mut first = true;
        let mut reject = false;

        self.compute_jacobian(f, x, y);

        let status = 'decompose: loop {
            self.sys.set_step(h);
            let decomposed = self.sys.decomp_real().and_then(|()| self.sys.decomp_complex());
            if let Err(singular) = decomposed {
                nsing += 1;
                if nsing >= MAX_SINGULAR {
                    log::warn!("iteration matrix is repeatedly singular ({singular}) at x = {x}");
                    break 'decompose Status::RepeatedlySingular;
                }
                log::debug!("singular iteration matrix ({singular}) at x = {x}, halving h = {h}");
                h *= 0.5;
                hhfac = 0.5;
                reject = true;
                last = false;
                if !self.caljac {
                    self.compute_jacobian(f, x, y);
                }
                continue 'decompose;
            }
            self.evals.decomp += 1;

            'step: loop {
                if self.steps.total >= p.nmax {
                    log::warn!("more than nmax = {} steps are needed at x = {x}", p.nmax);
                    break 'decompose Status::NeedLargerNmax;
                }
                self.steps.total += 1;
                if 0.1 * h.abs() <= x.abs() * p.uround {
                    log::warn!("step size too small, h = {h} at x = {x}");
                    break 'decompose Status::StepSizeTooSmall;
                }

                // Error scale of higher index components
                let w = &mut self.work;
                let i2 = p.nind1 + p.nind2;
                for s in &mut w.scal[p.nind1..i2] {
                    *s /= hhfac;
                }
                for s in &mut w.scal[i2..i2 + p.nind3] {
                    *s /= hhfac * hhfac;
                }

                let xph = x + h;
                if first || p.startn {
                    for v in [&mut w.z1, &mut w.z2, &mut w.z3, &mut w.f1, &mut w.f2, &mut w.f3] {
                        v.fill(0.0);
                    }
                } else {
                    extrapolate(&w.cont, h / hold, &mut w.z1, &mut w.z2, &mut w.z3);
                    w.f1.copy_from_slice(&w.z1);
                    w.f2.copy_from_slice(&w.z2);
                    w.f3.copy_from_slice(&w.z3);
                    apply_ti(&mut w.f1, &mut w.f2, &mut w.f3);
                }

                // Simplified Newton iteration
                let mut newt = 0;
                faccon = faccon.max(p.uround).powf(0.8);
                let mut theta = p.thet.abs();
                let mut dynold: Float = 0.0;
                loop {
                    if newt >= p.nit {
                        log::debug!("Newton iteration did not converge at x = {x}, halving h = {h}");
                        h *= 0.5;
                        hhfac = 0.5;
                        reject = true;
                        last = false;
                        if !self.caljac {
                            self.compute_jacobian(f, x, y);
                        }
                        continue 'decompose;
                    }

                    let w = &mut self.work;
                    for (c, z) in [(C1, &mut w.z1), (C2, &mut w.z2), (1.0, &mut w.z3)] {
                        for i in 0..n {
                            w.tmp[i] = y[i] + z[i];
                        }
                        f.ode(x + c * h, &w.tmp, z);
                    }
                    self.evals.ode += 3;
                    apply_ti(&mut w.z1, &mut w.z2, &mut w.z3);
                    self.sys.linear_solve(w);
                    self.evals.solve += 1;
                    newt += 1;

                    let mut dyno = 0.0;
                    for i in 0..n {
                        let s = w.scal[i];
                        dyno += (w.z1[i] / s).powi(2) + (w.z2[i] / s).powi(2) + (w.z3[i] / s).powi(2);
                    }
                    let dyno = (dyno / (3 * n).max(1) as Float).sqrt();

                    if newt > 1 && newt < p.nit {
                        let thq = dyno / dynold;
                        theta = if newt == 2 { thq } else { (thq * thqold).sqrt() };
                        thqold = thq;
                        if theta < 0.99 {
                            faccon = theta / (1.0 - theta);
                            let dyth = faccon * dyno * theta.powi((p.nit - 1 - newt) as i32) / p.fnewt;
                            if dyth >= 1.0 {
                                let qnewt = dyth.clamp(1e-4, 20.0);
                                hhfac = 0.8 * qnewt.powf(-1.0 / (4.0 + (p.nit - 1 - newt) as Float));
                                log::debug!("slow Newton convergence at x = {x}, theta = {theta}, h *= {hhfac}");
                                h *= hhfac;
                                reject = true;
                                last = false;
                                if self.caljac {
                                    self.compute_jacobian(f, x, y);
                                }
                                continue 'decompose;
                            }
                        } else {
                            log::debug!("Newton iteration diverges at x = {x}, theta = {theta}, halving h = {h}");
                            h *= 0.5;
                            hhfac = 0.5;
                            reject = true;
                            last = false;
                            if !self.caljac {
                                self.compute_jacobian(f, x, y);
                            }
                            continue 'decompose;
                        }
                    }
                    dynold = dyno.max(p.uround);

                    for i in 0..n {
                        w.f1[i] += w.z1[i];
                        w.f2[i] += w.z2[i];
                        w.f3[i] += w.z3[i];
                        w.z1[i] = T11 * w.f1[i] + T12 * w.f2[i] + T13 * w.f3[i];
                        w.z2[i] = T21 * w.f1[i] + T22 * w.f2[i] + T23 * w.f3[i];
                        w.z3[i] = T31 * w.f1[i] + w.f2[i];
                    }
                    if faccon * dyno <= p.fnewt {
                        break;
                    }
                }

                let err = self
                    .sys
                    .error_estimate(f, x, y, h, first || reject, &mut self.work, &mut self.evals);

                let fac = p.safe.min(cfac / (newt + 2 * p.nit) as Float);
                let mut quot = step_quotient(err, fac, p.facr, p.facl);
                let mut hnew = h / quot;

                if err < 1.0 {
                    first = false;
                    self.steps.accepted += 1;
                    if p.pred {
                        // Gustafsson
                        if self.steps.accepted > 1 {
                            let facgus = ((hacc / h) * (err * err / erracc).powf(0.25) / p.safe)
                                .min(p.facl)
                                .max(p.facr);
                            quot = quot.max(facgus);
                            hnew = h / quot;
                        }
                        hacc = h;
                        erracc = err.max(1e-2);
                    }
                    let xold = x;
                    hold = h;
                    x = xph;
                    let w = &mut self.work;
                    for i in 0..n {
                        y[i] += w.z3[i];
                    }
                    build_cont(&mut w.cont, y, &w.z1, &w.z2, &w.z3);
                    self.compute_scal(y);
                    log::trace!("accepted step to x = {x} with h = {h}, err = {err}");

                    if let Some(s) = solout.as_mut() {
                        let dense = DenseRadau {
                            cont: &self.work.cont,
                            xold,
                            h,
                        };
                        if s.solout(xold, x, y, &dense) == ControlFlag::Interrupt {
                            log::info!("integration interrupted by output hook at x = {x}");
                            break 'decompose Status::Interrupted;
                        }
                    }
                    self.caljac = false;
                    nsing = 0;
                    if last {
                        h = hopt;
                        break 'decompose Status::Success;
                    }

                    f.ode(x, y, &mut self.work.y0);
                    self.evals.ode += 1;
                    hnew = posneg * hnew.abs().min(hmaxn);
                    hopt = posneg * h.abs().min(hnew.abs());
                    if reject {
                        hnew = posneg * hnew.abs().min(h.abs());
                    }
                    reject = false;
                    if (x + hnew / p.quot1 - xend) * posneg >= 0.0 {
                        h = xend - x;
                        last = true;
                    } else {
                        let qt = hnew / h;
                        hhfac = h;
                        if theta <= p.thet && qt >= p.quot1 && qt <= p.quot2 {
                            continue 'step;
                        }
                        h = hnew;
                    }
                    hhfac = h;
                    if theta > p.thet {
                        self.compute_jacobian(f, x, y);
                    }
                    continue 'decompose;
                }

                reject = true;
                last = false;
                if first {
                    h *= 0.1;
                    hhfac = 0.1;
                } else {
                    hhfac = hnew / h;
                    h = hnew;
                }
                if self.steps.accepted >= 1 {
                    self.steps.rejected += 1;
                }
                log::debug!("step rejected at x = {x}, err = {err}, new h = {h}");
                if !self.caljac {
                    self.compute_jacobian(f, x, y);
                }
                continue 'decompose;
            }
        };

        Ok(self.result(x, h, status))
    }

    fn result(&self, x: Float, h: Float, status: Status) -> IntegrationResult {
        IntegrationResult::new(x, h, status, self.evals, self.steps)
    }
}
