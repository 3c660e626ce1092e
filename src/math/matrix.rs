use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Serialize, Deserialize};
use std::ops::{Sub, Mul};

use crate::error::{NetworkError, Result};

/// Dense row-major matrix of `f64`.
///
/// A batch is laid out one sample per row, so a layer's weights of shape
/// `(fan_in, fan_out)` map a `(batch, fan_in)` activation to `(batch, fan_out)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Samples every entry from N(0, 1) and multiplies it by `scale`.
    ///
    /// Layer construction passes `1 / sqrt(fan_out)` so pre-activations stay
    /// bounded at initialization.
    pub fn scaled_normal<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                let z: f64 = StandardNormal.sample(rng);
                res.data[i][j] = z * scale;
            }
        }
        res
    }

    /// Wraps already-rectangular data. Callers outside the crate should
    /// prefer [`Matrix::from_rows`], which validates the shape.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map_or(0, |row| row.len()),
            data,
        }
    }

    /// Builds a matrix from caller-supplied rows, rejecting empty or ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Matrix> {
        let first = rows.first().ok_or(NetworkError::EmptyBatch)?;
        let cols = first.len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(NetworkError::RaggedRows {
                    row,
                    expected: cols,
                    found: values.len(),
                });
            }
        }
        Ok(Matrix::from_data(rows.to_vec()))
    }

    /// A single-row matrix.
    pub fn row_vector(values: &[f64]) -> Matrix {
        Matrix::from_data(vec![values.to_vec()])
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Applies a whole-row transform; the transform must preserve row width.
    pub fn map_rows<F>(&self, functor: F) -> Matrix
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let data: Vec<Vec<f64>> = self.data.iter().map(|row| functor(row.as_slice())).collect();
        debug_assert!(data.iter().all(|row| row.len() == self.cols));
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        self.assert_same_shape(rhs);
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| {
                row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
            })
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// Adds a `1 x cols` row vector to every row.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        if row.rows != 1 || row.cols != self.cols {
            panic!("Row vector of shape {}x{} cannot broadcast over {}x{}",
                row.rows, row.cols, self.rows, self.cols)
        }
        let bias = &row.data[0];
        let data = self.data.iter()
            .map(|r| r.iter().zip(bias.iter()).map(|(x, b)| x + b).collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().flatten().sum()
    }

    /// Sums each column, yielding a `1 x cols` row vector.
    pub fn column_sums(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (acc, x) in sums.iter_mut().zip(row.iter()) {
                *acc += x;
            }
        }
        Matrix::from_data(vec![sums])
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Confirms `data` agrees with `rows` and `cols`. The fields are public,
    /// so a matrix built by hand can disagree with its own dimensions.
    pub fn check_shape(&self) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(NetworkError::ShapeMismatch {
                what: "matrix row count",
                expected: self.rows,
                found: self.data.len(),
            });
        }
        for (row, values) in self.data.iter().enumerate() {
            if values.len() != self.cols {
                return Err(NetworkError::RaggedRows {
                    row,
                    expected: self.cols,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }

    fn assert_same_shape(&self, rhs: &Matrix) {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes: {}x{} vs {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols)
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        self.assert_same_shape(rhs);

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes: {}x{} * {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols)
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}
