//! Convenient prelude: import the most commonly used traits, types, and functions.
//!
//! Bring this into scope with:
//!
//! ```rust
//! use radau5::prelude::*;
//! ```
//!
//! Re-exports included:
//! - Core traits and types: `ODE`, `Interpolate`, `SolOut`, `ControlFlag`, `Status`.
//! - The integrator: `Radau5`, `radau5`, `Settings`, `Tolerance`, `IntegrationResult`.
//! - Storage and output helpers: `Matrix`, `MatrixStorage`, `Sampler`, `DenseRecorder`.

pub use crate::{
    ContinuousOutput, ControlFlag, DenseRecorder, DummySolOut, Error, Evals, IntegrationResult,
    Interpolate, Matrix, MatrixStorage, ODE, Radau5, Sampler, Settings, SolOut, Status, Steps,
    Tolerance, radau5,
};
