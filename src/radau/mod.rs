//! Radau IIA (order 5) for stiff and differential-algebraic systems.
//!
//! Three-stage collocation at the Radau points with a simplified Newton
//! iteration. The 3n×3n Newton system is diagonalized into one real system
//! `(γ/h)·M − J` and one complex system `((α + iβ)/h)·M − J`, each decomposed
//! once per step size and reused across iterations.
//!
//! Reference: E. Hairer, G. Wanner, Solving Ordinary Differential Equations II,
//! Stiff and Differential-Algebraic Problems, Section IV.8.

mod decomp;
mod dense;
mod estimate;
mod integrate;
mod jacobian;
mod solve;
mod structure;

pub use dense::{DenseRadau, contr5};
pub use structure::SystemKind;

use crate::{
    Float,
    error::Error,
    linalg::Pivots,
    matrix::Matrix,
    ode::ODE,
    result::IntegrationResult,
    settings::Settings,
    solout::SolOut,
    stats::{Evals, Steps},
    tolerance::Tolerance,
};

use structure::Structure;

/// Radau IIA(5) integrator for `M·y' = f(x, y)`.
///
/// Construction validates the settings and allocates all work storage;
/// [`Radau5::integrate`] may then be called any number of times.
///
/// ```
/// use radau5::prelude::*;
///
/// struct Decay;
///
/// impl ODE for Decay {
///     fn ode(&self, _x: f64, y: &[f64], dydx: &mut [f64]) {
///         dydx[0] = -50.0 * y[0];
///     }
/// }
///
/// let mut solver = Radau5::new(1, 1e-8, 1e-10, Settings::default()).unwrap();
/// let mut y = [1.0];
/// let res = solver.integrate(&Decay, 0.0, 0.1, &mut y, None::<&mut DummySolOut>).unwrap();
/// assert_eq!(res.status, Status::Success);
/// assert!((y[0] - (-5.0f64).exp()).abs() < 1e-7);
/// ```
pub struct Radau5 {
    n: usize,
    rtol: Tolerance,
    atol: Tolerance,
    /// Tolerances actually used by the controller: `0.1·rtol^(2/3)` and
    /// `atol` scaled by the same factor.
    rtol_int: Vec<Float>,
    atol_int: Vec<Float>,
    params: Params,
    sys: LinearSystems,
    work: Workspace,
    /// The Jacobian was evaluated at the current `(x, y)`.
    caljac: bool,
    evals: Evals,
    steps: Steps,
}

/// Validated settings.
#[derive(Debug, Clone, Copy)]
struct Params {
    uround: Float,
    safe: Float,
    /// Bounds on `h / hnew`.
    facl: Float,
    facr: Float,
    hmax: Option<Float>,
    h0: Float,
    nmax: usize,
    nit: usize,
    startn: bool,
    fnewt: Float,
    nind1: usize,
    nind2: usize,
    nind3: usize,
    pred: bool,
    quot1: Float,
    quot2: Float,
    thet: Float,
    analytic_jac: bool,
}

/// Jacobian, mass matrix and the two decomposed iteration matrices.
pub(crate) struct LinearSystems {
    pub(crate) structure: Structure,
    pub(crate) fjac: Matrix,
    pub(crate) fmas: Matrix,
    pub(crate) e1: Matrix,
    pub(crate) e2r: Matrix,
    pub(crate) e2i: Matrix,
    pub(crate) ip1: Pivots,
    pub(crate) ip2: Pivots,
    /// Interchanges of the Hessenberg reduction.
    pub(crate) iphes: Vec<usize>,
    pub(crate) fac1: Float,
    pub(crate) alphn: Float,
    pub(crate) betan: Float,
    /// `fjac` still has to be reduced to Hessenberg form.
    pub(crate) calhes: bool,
}

/// Per-step vectors, all of length `n` except `cont`.
#[derive(Debug, Clone)]
pub(crate) struct Workspace {
    pub(crate) z1: Vec<Float>,
    pub(crate) z2: Vec<Float>,
    pub(crate) z3: Vec<Float>,
    pub(crate) f1: Vec<Float>,
    pub(crate) f2: Vec<Float>,
    pub(crate) f3: Vec<Float>,
    /// `f(x, y)` at the start of the step.
    pub(crate) y0: Vec<Float>,
    pub(crate) scal: Vec<Float>,
    /// Dense output `[y, c1, c2, c3]`.
    pub(crate) cont: Vec<Float>,
    pub(crate) tmp: Vec<Float>,
}

impl Workspace {
    fn new(n: usize) -> Self {
        Self {
            z1: vec![0.0; n],
            z2: vec![0.0; n],
            z3: vec![0.0; n],
            f1: vec![0.0; n],
            f2: vec![0.0; n],
            f3: vec![0.0; n],
            y0: vec![0.0; n],
            scal: vec![0.0; n],
            cont: vec![0.0; 4 * n],
            tmp: vec![0.0; n],
        }
    }
}

impl LinearSystems {
    fn new(structure: Structure) -> Self {
        let nm1 = structure.nm1;
        Self {
            structure,
            fjac: structure.jacobian_matrix(),
            fmas: structure.mass_matrix(),
            e1: structure.work_matrix(),
            e2r: structure.work_matrix(),
            e2i: structure.work_matrix(),
            ip1: Pivots::new(nm1),
            ip2: Pivots::new(nm1),
            iphes: (0..nm1).collect(),
            fac1: 0.0,
            alphn: 0.0,
            betan: 0.0,
            calhes: true,
        }
    }

    /// Scales the eigenvalues of the inverse Butcher matrix by `1/h`.
    fn set_step(&mut self, h: Float) {
        self.fac1 = U1 / h;
        self.alphn = ALPH / h;
        self.betan = BETA / h;
    }
}

impl Radau5 {
    /// Validates `settings` for a system of dimension `n`.
    ///
    /// Every problem found is reported.
    pub fn new(
        n: usize,
        rtol: impl Into<Tolerance>,
        atol: impl Into<Tolerance>,
        settings: Settings,
    ) -> Result<Self, Vec<Error>> {
        let rtol = rtol.into();
        let atol = atol.into();
        let mut errors: Vec<Error> = Vec::new();

        let nmax = nonzero_or(settings.nmax, 100_000);
        let uround = nonzero_or(settings.uround, 1e-16);
        if !(uround > 1e-19 && uround < 1.0) {
            errors.push(Error::URoundOutOfRange(uround));
        }
        let safe = nonzero_or(settings.safety_factor, 0.9);
        if !(safe > 0.001 && safe < 1.0) {
            errors.push(Error::SafetyFactorOutOfRange(safe));
        }
        let scale_min = nonzero_or(settings.scale_min, 0.2);
        let scale_max = nonzero_or(settings.scale_max, 8.0);
        if !(scale_min > 0.0 && scale_min <= 1.0 && scale_max >= 1.0 && scale_max.is_finite()) {
            errors.push(Error::InvalidScaleFactors(scale_min, scale_max));
        }
        let nit = nonzero_or(settings.newton_maxiter, 7);

        // Tolerances
        let mut rtol_int = Vec::new();
        let mut atol_int = Vec::new();
        let mut tol_ok = true;
        for (name, tol) in [("rtol", &rtol), ("atol", &atol)] {
            if tol.is_vector() && tol.len() != n {
                errors.push(Error::ToleranceLength {
                    name,
                    expected: n,
                    got: tol.len(),
                });
                tol_ok = false;
            }
        }
        if tol_ok {
            let r = rtol.expand(n);
            let a = atol.expand(n);
            if let Some(index) = (0..n).find(|&i| !(r[i].is_finite() && a[i].is_finite())) {
                errors.push(Error::ToleranceNotFinite {
                    index,
                    rtol: r[index],
                    atol: a[index],
                });
            } else if let Some(index) = (0..n).find(|&i| a[i] <= 0.0 || r[i] <= 10.0 * uround) {
                errors.push(Error::ToleranceTooSmall {
                    index,
                    rtol: r[index],
                    atol: a[index],
                });
            } else {
                for (ri, ai) in r.into_iter().zip(a) {
                    let quot = ai / ri;
                    let rt = 0.1 * ri.powf(2.0 / 3.0);
                    rtol_int.push(rt);
                    atol_int.push(rt * quot);
                }
            }
        }

        let rtol0 = rtol_int.first().copied();
        let fnewt = match (settings.newton_tol.filter(|&tol| tol != 0.0), rtol0) {
            (Some(tol), Some(rt)) => {
                if !(tol > uround / rt) {
                    errors.push(Error::NewtonTolTooSmall {
                        got: tol,
                        bound: uround / rt,
                    });
                }
                tol
            }
            (Some(tol), None) => tol,
            (None, Some(rt)) => (10.0 * uround / rt).max(0.03_f64.min(rt.sqrt())),
            (None, None) => 0.03,
        };

        // DAE index partition
        let nind2 = settings.nind2.unwrap_or(0);
        let nind3 = settings.nind3.unwrap_or(0);
        let nind1 = settings.nind1.unwrap_or(n.saturating_sub(nind2 + nind3));
        if nind1 + nind2 + nind3 != n {
            errors.push(Error::InvalidIndexPartition(nind1, nind2, nind3, n));
        }

        // Second order structure
        let m1 = settings.m1.unwrap_or(0);
        let m2 = if m1 == 0 {
            n
        } else {
            settings.m2.filter(|&m2| m2 > 0).unwrap_or(m1)
        };
        let partition_ok = m1 + m2 <= n && (m1 == 0 || m1 % m2 == 0);
        if !partition_ok {
            errors.push(Error::InvalidSecondOrderPartition { m1, m2, n });
        }

        let quot1 = nonzero_or(settings.quot1, 1.0);
        let quot2 = nonzero_or(settings.quot2, 1.2);
        if !(quot1 <= 1.0 && quot2 >= 1.0) {
            errors.push(Error::InvalidStepFreeze(quot1, quot2));
        }
        let thet = nonzero_or(settings.jacobian_threshold, 0.001);
        if thet >= 1.0 {
            errors.push(Error::JacobianThresholdTooLarge(thet));
        }

        let structure = if partition_ok {
            match Structure::classify(
                n,
                m1,
                m2,
                settings.jac_storage,
                settings.mass_storage,
                settings.hessenberg,
            ) {
                Ok(s) => Some(s),
                Err(e) => {
                    errors.push(e);
                    None
                }
            }
        } else {
            None
        };

        let h0 = match settings.h0 {
            Some(h0) if h0.abs() >= 10.0 * uround => h0.abs(),
            _ => 1e-6,
        };

        let structure = match structure {
            Some(s) if errors.is_empty() => s,
            _ => return Err(errors),
        };

        let params = Params {
            uround,
            safe,
            facl: 1.0 / scale_min,
            facr: 1.0 / scale_max,
            hmax: settings.hmax.filter(|&hmax| hmax != 0.0),
            h0,
            nmax,
            nit,
            startn: settings.newton_start_zero,
            fnewt,
            nind1,
            nind2,
            nind3,
            pred: settings.predictive.unwrap_or(true),
            quot1,
            quot2,
            thet,
            analytic_jac: settings.analytic_jacobian,
        };

        Ok(Self {
            n,
            rtol,
            atol,
            rtol_int,
            atol_int,
            params,
            sys: LinearSystems::new(structure),
            work: Workspace::new(n),
            caljac: false,
            evals: Evals::default(),
            steps: Steps::default(),
        })
    }

    /// Dimension of the system.
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Relative tolerance as supplied.
    pub fn rtol(&self) -> &Tolerance {
        &self.rtol
    }

    /// Absolute tolerance as supplied.
    pub fn atol(&self) -> &Tolerance {
        &self.atol
    }

    /// Structure of the iteration matrices.
    pub fn system_kind(&self) -> SystemKind {
        self.sys.structure.kind
    }

    /// Classical structure code: 1-5 or 7, plus 10 when `m1 > 0`.
    pub fn ijob(&self) -> u8 {
        self.sys.structure.ijob()
    }

    /// Counters of the last call to [`Radau5::integrate`].
    pub fn evals(&self) -> Evals {
        self.evals
    }

    pub fn steps(&self) -> Steps {
        self.steps
    }

    /// `scal = atol + rtol·|y|` with the internal tolerances.
    fn compute_scal(&mut self, y: &[Float]) {
        for (i, s) in self.work.scal.iter_mut().enumerate() {
            *s = self.atol_int[i] + self.rtol_int[i] * y[i].abs();
        }
    }
}

/// A setting left unset or set to zero takes its default.
fn nonzero_or<T: Copy + Default + PartialEq>(value: Option<T>, default: T) -> T {
    value.filter(|v| *v != T::default()).unwrap_or(default)
}

/// Integrates `f` from `x` to `xend` with a throwaway [`Radau5`].
///
/// `y` holds the initial value on entry and the solution at the returned
/// `x` on exit.
#[allow(clippy::too_many_arguments)]
pub fn radau5<F, S>(
    f: &F,
    x: Float,
    xend: Float,
    y: &mut [Float],
    rtol: impl Into<Tolerance>,
    atol: impl Into<Tolerance>,
    solout: Option<&mut S>,
    settings: Settings,
) -> Result<IntegrationResult, Vec<Error>>
where
    F: ODE,
    S: SolOut,
{
    let mut solver = Radau5::new(y.len(), rtol, atol, settings)?;
    solver.integrate(f, x, xend, y, solout).map_err(|e| vec![e])
}

// Radau nodes: (4 ∓ √6)/10
const C1: Float = 0.155_051_025_721_682_190_180;
const C2: Float = 0.644_948_974_278_317_809_820;
const C1M1: Float = C1 - 1.0;
const C2M1: Float = C2 - 1.0;
const C1MC2: Float = C1 - C2;

// Eigenvalues of the inverse Butcher matrix: U1 real, ALPH ± i·BETA
const U1: Float = 3.637_834_252_744_495_732_21;
const ALPH: Float = 2.681_082_873_627_752_133_90;
const BETA: Float = 3.050_430_199_247_410_569_43;

// Embedded error estimator weights
const DD1: Float = -10.048_809_399_827_415_562_5;
const DD2: Float = 1.382_142_733_160_748_895_79;
const DD3: Float = -1.0 / 3.0;

// Transformation to the eigenbasis (T33 = 0, T32 = 1)
const T11: Float = 9.123_239_487_089_294_279_2e-2;
const T12: Float = -0.141_255_295_020_954_208_43;
const T13: Float = -3.002_919_410_514_742_449_2e-2;
const T21: Float = 0.241_717_932_707_107_018_96;
const T22: Float = 0.204_129_352_293_799_931_99;
const T23: Float = 0.382_942_112_757_261_937_79;
const T31: Float = 0.966_048_182_615_092_936_19;

const TI11: Float = 4.325_579_890_063_155_351_0;
const TI12: Float = 0.339_199_251_815_809_869_54;
const TI13: Float = 0.541_770_539_935_874_871_19;
const TI21: Float = -4.178_718_591_551_904_727_3;
const TI22: Float = -0.327_682_820_761_062_387_08;
const TI23: Float = 0.476_623_554_500_550_451_96;
const TI31: Float = -0.502_872_634_945_786_875_95;
const TI32: Float = 2.571_926_949_855_605_429_2;
const TI33: Float = -0.596_039_204_828_224_924_97;
