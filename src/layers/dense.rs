use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// One layer boundary: the weights and bias row connecting two adjacent layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Shape `(input_size, size)`.
    pub weights: Matrix,
    /// Shape `(1, size)`.
    pub biases: Matrix,
}

impl Layer {
    /// Weights ~ N(0, 1) / sqrt(size), biases zero.
    pub fn new<R: Rng + ?Sized>(input_size: usize, size: usize, rng: &mut R) -> Layer {
        let scale = 1.0 / (size as f64).sqrt();
        Layer {
            weights: Matrix::scaled_normal(input_size, size, scale, rng),
            biases: Matrix::zeros(1, size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    /// Pre-activation `z = a · W + b`, with `b` broadcast over the batch.
    pub fn integrate(&self, input: &Matrix) -> Matrix {
        (input * &self.weights).add_row(&self.biases)
    }

    /// Computes gradient adjustments. Returns (weights_grad, biases_grad).
    ///
    /// `delta` is ∂L/∂z for this layer (already multiplied by the activation
    /// derivative) and `inputs` is the activation that fed the layer.
    pub fn compute_gradients(&self, delta: &Matrix, inputs: &Matrix) -> (Matrix, Matrix) {
        let weights_grad = &inputs.transpose() * delta;
        let biases_grad = delta.column_sums();
        (weights_grad, biases_grad)
    }

    /// Error signal in the activation space of the previous layer: δ · Wᵀ
    pub fn back_propagate(&self, delta: &Matrix) -> Matrix {
        delta * &self.weights.transpose()
    }

    /// Applies pre-computed gradients scaled by lr. Biases move only when a
    /// gradient is supplied for them.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: Option<&Matrix>, lr: f64) {
        self.weights = &self.weights - &weights_grad.scale(lr);
        if let Some(biases_grad) = biases_grad {
            self.biases = &self.biases - &biases_grad.scale(lr);
        }
    }
}
