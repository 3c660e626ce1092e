use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::loss::mse::MseLoss;
use crate::math::matrix::Matrix;

/// Selects which loss function the network trains against.
///
/// - `MeanSquaredError` — 0.5 · Σ(output − expected)²; the only implemented loss.
/// - `CrossEntropy`     — reserved; selecting it fails at construction.
/// - `Svm`              — Weston-Watkins hinge loss; reserved, fails at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    #[default]
    MeanSquaredError,
    CrossEntropy,
    Svm,
}

impl LossType {
    /// Rejects loss slots that have no defined computation.
    pub fn ensure_implemented(self) -> Result<()> {
        match self {
            LossType::MeanSquaredError => Ok(()),
            LossType::CrossEntropy => Err(NetworkError::NotImplemented("cross-entropy loss".into())),
            LossType::Svm => Err(NetworkError::NotImplemented("SVM (hinge) loss".into())),
        }
    }

    /// Scalar loss of `output` against `expected`.
    pub fn loss(self, expected: &Matrix, output: &Matrix) -> Result<f64> {
        self.ensure_implemented()?;
        Ok(MseLoss::loss(expected, output))
    }

    /// Gradient of the loss w.r.t. `output`, same shape as `output`.
    pub fn derivative(self, expected: &Matrix, output: &Matrix) -> Result<Matrix> {
        self.ensure_implemented()?;
        Ok(MseLoss::derivative(expected, output))
    }
}
