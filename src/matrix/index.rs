//! Logical `(row, column)` indexing.

use crate::Float;

use super::base::{Matrix, MatrixStorage};

const ZERO: Float = 0.0;
const ONE: Float = 1.0;

impl std::ops::Index<(usize, usize)> for Matrix {
    type Output = Float;

    fn index(&self, (i, j): (usize, usize)) -> &Float {
        match self.storage {
            MatrixStorage::Identity => {
                if i == j {
                    &ONE
                } else {
                    &ZERO
                }
            }
            _ => match self.offset(i, j) {
                Some(k) => &self.data[k],
                None => &ZERO,
            },
        }
    }
}

impl std::ops::IndexMut<(usize, usize)> for Matrix {
    /// # Panics
    ///
    /// On identity storage, and for entries outside the band.
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Float {
        match self.offset(i, j) {
            Some(k) => &mut self.data[k],
            None => panic!(
                "entry ({i}, {j}) is not stored in a {:?} matrix",
                self.storage
            ),
        }
    }
}
