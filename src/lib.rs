//! Radau IIA (order 5) integrator for stiff ordinary differential equations and
//! differential-algebraic systems `M·y' = f(x, y)`.
//!
//! The crate contains the integrator itself ([`Radau5`] / [`radau5`]) and the
//! elimination kernels it is built on ([`linalg`]): full, banded and Hessenberg
//! triangularization with their complex counterparts, plus the elementary
//! Hessenberg reduction used for unstructured explicit problems.

mod dense;
mod error;
mod interpolate;
mod ode;
mod result;
mod settings;
mod solout;
mod stats;
mod status;
mod tolerance;

pub mod linalg;
pub mod matrix;
pub mod prelude;
pub mod radau;

pub use dense::{ContinuousOutput, DenseRecorder};
pub use error::Error;
pub use interpolate::Interpolate;
pub use matrix::{Matrix, MatrixStorage};
pub use ode::ODE;
pub use radau::{Radau5, SystemKind, contr5, radau5};
pub use result::IntegrationResult;
pub use settings::Settings;
pub use solout::{ControlFlag, DummySolOut, Sampler, SolOut};
pub use stats::{Evals, Steps};
pub use status::Status;
pub use tolerance::Tolerance;

/// Floating point type used throughout the crate.
pub type Float = f64;
