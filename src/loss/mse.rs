use crate::math::matrix::Matrix;

pub struct MseLoss;

impl MseLoss {
    /// Scalar loss over the whole batch: 0.5 · Σ(output − expected)²
    pub fn loss(expected: &Matrix, output: &Matrix) -> f64 {
        0.5 * (output - expected).map(|x| x * x).sum()
    }

    /// Gradient w.r.t. the output: output − expected
    pub fn derivative(expected: &Matrix, output: &Matrix) -> Matrix {
        output - expected
    }
}
