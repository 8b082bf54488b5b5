//! Owned matrix storage: identity, dense row-major, or packed band.

use crate::Float;

/// Storage layout of a [`Matrix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixStorage {
    /// Implicit identity, nothing stored.
    Identity,
    /// Dense, row-major.
    Full,
    /// Packed band with `ml` sub- and `mu` super-diagonals.
    Banded { ml: usize, mu: usize },
}

/// A single flat buffer with explicit dimensions.
///
/// For `Full` storage `data[i * m + j]` holds entry `(i, j)`. For `Banded`
/// storage the buffer has `ml + mu + 1` rows of length `m` and entry `(i, j)`
/// lives in row `i + mu - j`, so each column keeps its band contiguous in
/// the row index. Indexing with `(i, j)` always uses logical coordinates;
/// [`Matrix::raw`] exposes the physical layout to the elimination code.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    /// Logical rows.
    pub(crate) n: usize,
    /// Logical columns.
    pub(crate) m: usize,
    pub(crate) data: Vec<Float>,
    pub(crate) storage: MatrixStorage,
    /// Banded only: the band of column `j` is measured against `j % period`,
    /// or against `j - tail` for the trailing columns `j >= tail`.
    pub(crate) period: usize,
    pub(crate) tail: usize,
}

impl Matrix {
    /// Dense `n × m` matrix of zeros.
    pub fn full(n: usize, m: usize) -> Self {
        Self {
            n,
            m,
            data: vec![0.0; n * m],
            storage: MatrixStorage::Full,
            period: m,
            tail: m,
        }
    }

    /// Alias of [`Matrix::full`].
    pub fn zeros(n: usize, m: usize) -> Self {
        Self::full(n, m)
    }

    /// Implicit `n × n` identity.
    pub fn identity(n: usize) -> Self {
        Self {
            n,
            m: n,
            data: Vec::new(),
            storage: MatrixStorage::Identity,
            period: n,
            tail: n,
        }
    }

    /// `n × m` band matrix of zeros.
    pub fn banded(n: usize, m: usize, ml: usize, mu: usize) -> Self {
        Self::banded_periodic(n, m, ml, mu, m.max(1), m)
    }

    /// Band matrix whose band repeats every `period` columns up to `tail`;
    /// the columns from `tail` on form one last block. Second order systems
    /// store the Jacobian blocks of `y[..m1]` and `y[m1..]` side by side this way.
    pub(crate) fn banded_periodic(n: usize, m: usize, ml: usize, mu: usize, period: usize, tail: usize) -> Self {
        Self {
            n,
            m,
            data: vec![0.0; (ml + mu + 1) * m],
            storage: MatrixStorage::Banded { ml, mu },
            period,
            tail,
        }
    }

    /// Builds a zeroed matrix of the given logical shape and layout.
    pub fn with_storage(n: usize, m: usize, storage: MatrixStorage) -> Self {
        match storage {
            MatrixStorage::Identity => Self::identity(n),
            MatrixStorage::Full => Self::full(n, m),
            MatrixStorage::Banded { ml, mu } => Self::banded(n, m, ml, mu),
        }
    }

    pub fn nrows(&self) -> usize {
        self.n
    }

    pub fn ncols(&self) -> usize {
        self.m
    }

    pub fn storage(&self) -> MatrixStorage {
        self.storage
    }

    /// Sets every stored entry to `v`.
    pub fn fill(&mut self, v: Float) {
        self.data.fill(v);
    }

    /// Number of physical rows in the flat buffer.
    fn stride_rows(&self) -> usize {
        match self.storage {
            MatrixStorage::Identity => 0,
            MatrixStorage::Full => self.n,
            MatrixStorage::Banded { ml, mu } => ml + mu + 1,
        }
    }

    /// Physical entry `(r, c)`; for band storage `r` is the band row.
    #[inline]
    pub fn raw(&self, r: usize, c: usize) -> Float {
        debug_assert!(r < self.stride_rows() && c < self.m);
        self.data[r * self.m + c]
    }

    /// Mutable physical entry `(r, c)`.
    #[inline]
    pub fn raw_mut(&mut self, r: usize, c: usize) -> &mut Float {
        debug_assert!(r < self.stride_rows() && c < self.m);
        &mut self.data[r * self.m + c]
    }

    /// Flat offset of logical entry `(i, j)`, `None` outside the band.
    #[inline]
    pub(crate) fn offset(&self, i: usize, j: usize) -> Option<usize> {
        match self.storage {
            MatrixStorage::Identity => None,
            MatrixStorage::Full => Some(i * self.m + j),
            MatrixStorage::Banded { ml, mu } => {
                let j1 = if j >= self.tail { j - self.tail } else { j % self.period };
                let r = (i + mu).checked_sub(j1)?;
                (r <= ml + mu).then_some(r * self.m + j)
            }
        }
    }

    /// Logical entry `(i, j)`, zero outside the stored pattern.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Float {
        match self.storage {
            MatrixStorage::Identity => {
                if i == j {
                    1.0
                } else {
                    0.0
                }
            }
            _ => self.offset(i, j).map_or(0.0, |k| self.data[k]),
        }
    }

    /// Row `i` of `A·v`, only touching the stored pattern.
    pub fn row_dot(&self, i: usize, v: &[Float]) -> Float {
        match self.storage {
            MatrixStorage::Identity => v[i],
            MatrixStorage::Full => {
                let row = &self.data[i * self.m..(i + 1) * self.m];
                row.iter().zip(v).map(|(a, b)| a * b).sum()
            }
            MatrixStorage::Banded { ml, mu } => {
                let lo = i.saturating_sub(ml);
                let hi = (i + mu + 1).min(self.m);
                (lo..hi).map(|j| self.data[(i + mu - j) * self.m + j] * v[j]).sum()
            }
        }
    }

    /// Dense row-major copy, mostly for inspection and testing.
    pub fn to_dense(&self) -> Vec<Float> {
        let mut d = vec![0.0; self.n * self.m];
        for i in 0..self.n {
            for j in 0..self.m {
                d[i * self.m + j] = self.get(i, j);
            }
        }
        d
    }
}
