use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Largest-component magnitudes whose squared sums stay finite and normal in f32
const SAFE_MAGNITUDE: std::ops::RangeInclusive<f32> = 1e-15..=1e15;

/// A face embedding produced by the upstream extractor.
///
/// Serializes as a bare JSON array of floats.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn from_slice(data: &[f32]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// L2 norm
    #[inline]
    pub fn norm(&self) -> f32 {
        crate::simd::norm_simd(&self.data)
    }

    /// Dot product, failing on mismatched dimensions
    #[inline]
    pub fn dot(&self, other: &Vector) -> Result<f32> {
        self.check_same_dim(other)?;
        Ok(crate::simd::dot_product_simd(&self.data, &other.data))
    }

    /// Squared Euclidean distance `||self - other||²`
    #[inline]
    pub fn squared_l2(&self, other: &Vector) -> Result<f32> {
        self.check_same_dim(other)?;
        Ok(crate::simd::squared_l2_simd(&self.data, &other.data))
    }

    /// Largest absolute component; 0.0 for an empty vector
    #[inline]
    pub fn max_abs(&self) -> f32 {
        self.data.iter().fold(0.0f32, |m, x| m.max(x.abs()))
    }

    /// Components divided by [`Vector::max_abs`] when it falls outside the
    /// range where `dot(v, v)` can be formed without overflow or underflow.
    /// Direction is unchanged. Zero and non-finite vectors pass through as is.
    pub(crate) fn well_scaled(&self) -> Cow<'_, [f32]> {
        let max = self.max_abs();
        if max == 0.0 || !max.is_finite() || SAFE_MAGNITUDE.contains(&max) {
            return Cow::Borrowed(&self.data);
        }
        Cow::Owned(self.data.iter().map(|x| x / max).collect())
    }

    /// Unit-length copy of this vector.
    ///
    /// Any nonzero finite vector normalizes, however small or large its
    /// components. Fails with [`Error::DegenerateVector`] when every component
    /// is zero or the vector holds a NaN or infinity.
    pub fn normalized(&self) -> Result<Self> {
        let scaled = self.well_scaled();
        let norm = crate::simd::norm_simd(&scaled);
        if !norm.is_finite() || norm == 0.0 {
            return Err(Error::DegenerateVector);
        }
        Ok(Self::new(scaled.iter().map(|x| x / norm).collect()))
    }

    #[inline]
    pub fn check_same_dim(&self, other: &Vector) -> Result<()> {
        if self.dim() != other.dim() {
            return Err(Error::DimensionMismatch {
                expected: self.dim(),
                actual: other.dim(),
            });
        }
        Ok(())
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Return `v / ||v||₂`.
pub fn normalize(v: &Vector) -> Result<Vector> {
    v.normalized()
}
