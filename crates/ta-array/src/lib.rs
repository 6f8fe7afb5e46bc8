#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArrayError {
    #[error("shape {shape:?} implies {expected} elements but {actual} were supplied")]
    ShapeDataMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
}

/// Homogeneous n-dimensional `f64` array, row-major. Shape is validated once
/// at construction; the buffer is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NumArray {
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self, ArrayError> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(ArrayError::ShapeDataMismatch {
                shape,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// One-dimensional array, shape inferred from the buffer.
    #[must_use]
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elementwise equality over the full shape, NaN equal to NaN. Shape is
    /// compared before any element; a scalar can never be broadcast against
    /// an array through this entry point.
    #[must_use]
    pub fn elementwise_equal(&self, other: &Self) -> bool {
        if self.shape != other.shape {
            return false;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a.is_nan() && b.is_nan()) || (a == b))
    }

    /// Position of the first unequal element pair, None when equal. Only
    /// meaningful when shapes already match.
    #[must_use]
    pub fn first_divergence(&self, other: &Self) -> Option<usize> {
        self.data
            .iter()
            .zip(other.data.iter())
            .position(|(a, b)| !((a.is_nan() && b.is_nan()) || (a == b)))
    }
}
