//! Matrix types, storage layouts, and indexing.

mod base;
mod index;

pub use base::{Matrix, MatrixStorage};
