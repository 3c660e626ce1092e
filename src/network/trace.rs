use crate::math::matrix::Matrix;

/// Intermediates of one forward pass, kept for backpropagation.
///
/// `activations[0]` is the input batch and `activations[i + 1]` the output of
/// layer boundary `i`, so there is one more activation than integrations.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    pub integrations: Vec<Matrix>,
    pub activations: Vec<Matrix>,
    pub activation_primes: Vec<Matrix>,
}

impl ForwardTrace {
    pub fn new(input: Matrix) -> Self {
        ForwardTrace {
            integrations: Vec::new(),
            activations: vec![input],
            activation_primes: Vec::new(),
        }
    }

    pub fn push(&mut self, integration: Matrix, activation: Matrix, activation_prime: Matrix) {
        self.integrations.push(integration);
        self.activations.push(activation);
        self.activation_primes.push(activation_prime);
    }

    /// The network output (last recorded activation).
    pub fn output(&self) -> &Matrix {
        &self.activations[self.activations.len() - 1]
    }

    /// The activation that fed layer boundary `layer`.
    pub fn input_of(&self, layer: usize) -> &Matrix {
        &self.activations[layer]
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }
}
