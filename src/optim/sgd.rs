use crate::error::{NetworkError, Result};
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::network::config::BiasUpdate;

/// Plain gradient descent: `w ← w − learning_rate · dw`.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    /// A learning rate of zero is allowed and turns every step into a no-op.
    pub fn new(learning_rate: f64) -> Result<Sgd> {
        if !learning_rate.is_finite() || learning_rate < 0.0 {
            return Err(NetworkError::InvalidLearningRate(learning_rate));
        }
        Ok(Sgd { learning_rate })
    }

    /// Applies one update to a layer given its pre-computed gradients.
    pub fn step(&self, layer: &mut Layer, weights_grad: &Matrix, biases_grad: &Matrix, bias_update: BiasUpdate) {
        let biases_grad = match bias_update {
            BiasUpdate::Apply => Some(biases_grad),
            BiasUpdate::Frozen => None,
        };
        layer.apply_gradients(weights_grad, biases_grad, self.learning_rate);
    }
}
