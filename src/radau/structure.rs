//! Structural classification of the Newton systems.
//!
//! The layout of the Jacobian, the mass matrix and the second order
//! partition are resolved once at construction into a [`Structure`]; the
//! decomposition, solve and error estimate routines match on it.

use crate::{error::Error, matrix::Matrix, matrix::MatrixStorage};

/// Shape of the iteration matrices, with the bandwidths involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemKind {
    /// `y' = f`, full Jacobian.
    Full,
    /// `y' = f`, banded Jacobian.
    Banded { ml: usize, mu: usize },
    /// `M·y' = f` with banded `M`, full Jacobian.
    BandedMass { mlmas: usize, mumas: usize },
    /// `M·y' = f` with banded `M` and banded Jacobian.
    BandedMassBandedJac {
        ml: usize,
        mu: usize,
        mlmas: usize,
        mumas: usize,
    },
    /// `M·y' = f` with full `M` and full Jacobian.
    FullMass,
    /// `y' = f`, full Jacobian reduced to Hessenberg form.
    Hessenberg,
}

/// Jacobian layout as seen by the assembly code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JacLayout {
    Full,
    Banded { ml: usize, mu: usize },
    Hessenberg,
}

/// Mass matrix layout as seen by the assembly code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MassLayout {
    Identity,
    Full,
    Banded { ml: usize, mu: usize },
}

impl SystemKind {
    pub(crate) fn jac(self) -> JacLayout {
        match self {
            SystemKind::Full | SystemKind::BandedMass { .. } | SystemKind::FullMass => JacLayout::Full,
            SystemKind::Banded { ml, mu } | SystemKind::BandedMassBandedJac { ml, mu, .. } => {
                JacLayout::Banded { ml, mu }
            }
            SystemKind::Hessenberg => JacLayout::Hessenberg,
        }
    }

    pub(crate) fn mass(self) -> MassLayout {
        match self {
            SystemKind::Full | SystemKind::Banded { .. } | SystemKind::Hessenberg => MassLayout::Identity,
            SystemKind::BandedMass { mlmas, mumas }
            | SystemKind::BandedMassBandedJac { mlmas, mumas, .. } => MassLayout::Banded {
                ml: mlmas,
                mu: mumas,
            },
            SystemKind::FullMass => MassLayout::Full,
        }
    }
}

/// System kind plus the second order partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Structure {
    pub kind: SystemKind,
    pub n: usize,
    pub m1: usize,
    pub m2: usize,
    /// `n - m1`, the size of the matrices that get decomposed.
    pub nm1: usize,
}

impl Structure {
    /// Resolves the storage settings. `m1`/`m2` must already be validated.
    pub fn classify(
        n: usize,
        m1: usize,
        m2: usize,
        jac: MatrixStorage,
        mass: MatrixStorage,
        hessenberg: bool,
    ) -> Result<Self, Error> {
        let nm1 = n - m1;
        let jac_band = match jac {
            MatrixStorage::Identity => return Err(Error::IdentityJacobian),
            MatrixStorage::Full => None,
            MatrixStorage::Banded { ml, mu } => (ml < nm1).then_some((ml, mu)),
        };
        let (mljac, mujac) = jac_band.unwrap_or((nm1, nm1));

        let kind = match mass {
            MatrixStorage::Identity => {
                if hessenberg && n > 2 {
                    if jac_band.is_some() || m1 > 0 {
                        return Err(Error::HessenbergNotApplicable);
                    }
                    SystemKind::Hessenberg
                } else {
                    match jac_band {
                        Some((ml, mu)) => SystemKind::Banded { ml, mu },
                        None => SystemKind::Full,
                    }
                }
            }
            _ if hessenberg => return Err(Error::HessenbergNotApplicable),
            MatrixStorage::Banded { ml, mu } if ml < nm1 => {
                if ml > mljac || mu > mujac {
                    return Err(Error::MassBandwidthExceedsJacobian { ml, mu });
                }
                match jac_band {
                    Some((ml_j, mu_j)) => SystemKind::BandedMassBandedJac {
                        ml: ml_j,
                        mu: mu_j,
                        mlmas: ml,
                        mumas: mu,
                    },
                    None => SystemKind::BandedMass { mlmas: ml, mumas: mu },
                }
            }
            MatrixStorage::Full | MatrixStorage::Banded { .. } => {
                if jac_band.is_some() {
                    return Err(Error::MassBandwidthExceedsJacobian { ml: nm1, mu: nm1 });
                }
                SystemKind::FullMass
            }
        };
        Ok(Self { kind, n, m1, m2, nm1 })
    }

    /// Classical structure code: 1-5 or 7, plus 10 for second order systems.
    pub fn ijob(&self) -> u8 {
        let base = match self.kind {
            SystemKind::Full => 1,
            SystemKind::Banded { .. } => 2,
            SystemKind::BandedMass { .. } => 3,
            SystemKind::BandedMassBandedJac { .. } => 4,
            SystemKind::FullMass => 5,
            SystemKind::Hessenberg => 7,
        };
        if self.m1 > 0 { base + 10 } else { base }
    }

    pub fn jac(&self) -> JacLayout {
        self.kind.jac()
    }

    pub fn mass(&self) -> MassLayout {
        self.kind.mass()
    }

    pub fn implicit(&self) -> bool {
        self.mass() != MassLayout::Identity
    }

    /// Jacobian storage: rows `m1..n` of `∂f/∂y`.
    pub fn jacobian_matrix(&self) -> Matrix {
        match self.jac() {
            JacLayout::Full | JacLayout::Hessenberg => Matrix::full(self.nm1, self.n),
            JacLayout::Banded { ml, mu } => {
                Matrix::banded_periodic(self.nm1, self.n, ml, mu, self.m2, self.m1)
            }
        }
    }

    /// Mass matrix storage for the trailing `nm1` components.
    pub fn mass_matrix(&self) -> Matrix {
        match self.mass() {
            MassLayout::Identity => Matrix::identity(self.nm1),
            MassLayout::Full => Matrix::full(self.nm1, self.nm1),
            MassLayout::Banded { ml, mu } => Matrix::banded(self.nm1, self.nm1, ml, mu),
        }
    }

    /// Work matrix for one decomposition: `nm1 × nm1`, or the
    /// `2·ml + mu + 1` row band layout with room for fill-in.
    pub fn work_matrix(&self) -> Matrix {
        match self.jac() {
            JacLayout::Full | JacLayout::Hessenberg => Matrix::full(self.nm1, self.nm1),
            JacLayout::Banded { ml, mu } => Matrix::full(2 * ml + mu + 1, self.nm1),
        }
    }
}
