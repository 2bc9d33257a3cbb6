//! Correlation matrices with Cholesky factorization.
//!
//! Given `n` independent standard normals `Z`, correlated increments come
//! from `W = L * Z` where `L` is the lower-triangular Cholesky factor of
//! the correlation matrix `C = L * L^T`.

use crate::error::ModelError;

/// A validated correlation matrix.
///
/// Requirements: square, symmetric, unit diagonal, off-diagonals in
/// [-1, 1] and positive definite (checked at factorization).
///
/// # Example
///
/// ```
/// use trs_models::correlation::CorrelationMatrix;
///
/// let corr = CorrelationMatrix::new(&[1.0, 0.5, 0.5, 1.0], 2).unwrap();
/// let cholesky = corr.cholesky().unwrap();
///
/// let mut w = [0.0_f64; 2];
/// cholesky.transform(&[0.5, 0.8], &mut w);
/// assert!((w[0] - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    /// Row-major elements.
    data: Vec<f64>,
    dim: usize,
}

impl CorrelationMatrix {
    /// Creates a correlation matrix from a row-major slice.
    ///
    /// # Errors
    ///
    /// - `ModelError::InvalidDimensions`: not `dim * dim` elements
    /// - `ModelError::InvalidDiagonal`: a diagonal element differs from 1
    /// - `ModelError::NotSymmetric`: `c[i][j] != c[j][i]`
    /// - `ModelError::OutOfRange`: an off-diagonal outside [-1, 1]
    pub fn new(data: &[f64], dim: usize) -> Result<Self, ModelError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(ModelError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        const EPSILON: f64 = 1e-10;
        for i in 0..dim {
            let diag = data[i * dim + i];
            if (diag - 1.0).abs() > EPSILON {
                return Err(ModelError::InvalidDiagonal {
                    index: i,
                    value: diag,
                });
            }
        }
        for i in 0..dim {
            for j in (i + 1)..dim {
                let upper = data[i * dim + j];
                let lower = data[j * dim + i];
                if (upper - lower).abs() > EPSILON {
                    return Err(ModelError::NotSymmetric { i, j });
                }
                if !(-1.0..=1.0).contains(&upper) {
                    return Err(ModelError::OutOfRange { i, j, value: upper });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Identity matrix: uncorrelated assets.
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { data, dim }
    }

    /// Returns the matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the element at (i, j).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Computes the lower-triangular Cholesky factor.
    ///
    /// # Errors
    ///
    /// `ModelError::NotPositiveDefinite` naming the failing pivot.
    pub fn cholesky(&self) -> Result<CholeskyFactor, ModelError> {
        let n = self.dim;
        let mut lower = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..=i {
                let mut sum = self.get(i, j);
                for k in 0..j {
                    sum -= lower[i * n + k] * lower[j * n + k];
                }
                if i == j {
                    if sum <= 0.0 {
                        return Err(ModelError::NotPositiveDefinite { pivot: i });
                    }
                    lower[i * n + j] = sum.sqrt();
                } else {
                    lower[i * n + j] = sum / lower[j * n + j];
                }
            }
        }

        Ok(CholeskyFactor { lower, dim: n })
    }
}

/// Lower-triangular Cholesky factor of a correlation matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor {
    lower: Vec<f64>,
    dim: usize,
}

impl CholeskyFactor {
    /// Returns the factor dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Transforms independent normals `z` into correlated normals,
    /// writing into `out`.
    ///
    /// # Panics
    ///
    /// Panics when `z` or `out` length differs from the dimension; the
    /// simulation engine sizes its buffers once per run.
    pub fn transform(&self, z: &[f64], out: &mut [f64]) {
        let n = self.dim;
        assert_eq!(z.len(), n, "input length must match dimension");
        assert_eq!(out.len(), n, "output length must match dimension");
        for i in 0..n {
            let mut sum = 0.0;
            for k in 0..=i {
                sum += self.lower[i * n + k] * z[k];
            }
            out[i] = sum;
        }
    }
}
