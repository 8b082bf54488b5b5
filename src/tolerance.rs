//! Tolerance abstraction to allow scalar or vector tolerances

use crate::Float;

/// Tolerance enum to allow scalar or vector tolerances
/// using [`Into`] so that `Float`, `[Float; N]`, `&[Float]` and `Vec<Float>`
/// can all be passed where a tolerance is expected.
#[derive(Clone, Debug, PartialEq)]
pub enum Tolerance {
    Scalar(Float),
    Vector(Vec<Float>),
}

impl Tolerance {
    /// Number of stored entries (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            Tolerance::Scalar(_) => 1,
            Tolerance::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Tolerance::Vector(v) if v.is_empty())
    }

    /// `true` when the tolerance applies componentwise.
    pub fn is_vector(&self) -> bool {
        matches!(self, Tolerance::Vector(_))
    }

    /// Broadcasts to `n` components.
    pub(crate) fn expand(&self, n: usize) -> Vec<Float> {
        match self {
            Tolerance::Scalar(v) => vec![*v; n],
            Tolerance::Vector(v) => v.clone(),
        }
    }
}

impl From<Float> for Tolerance {
    fn from(val: Float) -> Self {
        Tolerance::Scalar(val)
    }
}

impl From<&[Float]> for Tolerance {
    fn from(val: &[Float]) -> Self {
        Tolerance::Vector(val.to_vec())
    }
}

impl<const N: usize> From<[Float; N]> for Tolerance {
    fn from(val: [Float; N]) -> Self {
        Tolerance::Vector(val.to_vec())
    }
}

impl From<Vec<Float>> for Tolerance {
    fn from(val: Vec<Float>) -> Self {
        Tolerance::Vector(val)
    }
}

impl std::ops::Index<usize> for Tolerance {
    type Output = Float;

    fn index(&self, index: usize) -> &Self::Output {
        match self {
            Tolerance::Scalar(v) => v,
            Tolerance::Vector(vs) => &vs[index],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tolerance;

    #[test]
    fn scalar_broadcasts() {
        let t: Tolerance = 1e-6.into();
        assert_eq!(t[3], 1e-6);
        assert_eq!(t.expand(3), vec![1e-6; 3]);
        assert!(!t.is_vector());
    }

    #[test]
    fn vector_from_array() {
        let t: Tolerance = [1e-3, 1e-4].into();
        assert_eq!(t.len(), 2);
        assert_eq!(t[1], 1e-4);
        assert!(t.is_vector());
    }
}
