use tracing::trace;

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;

/// Per-layer gradients from one forward/backward pass over a batch.
#[derive(Debug, Clone)]
pub struct Gradients {
    /// Loss of the batch under the parameters the gradients were taken at.
    pub loss: f64,
    /// `weights[i]` has the shape of layer `i`'s weights.
    pub weights: Vec<Matrix>,
    /// `biases[i]` is the column sum of layer `i`'s error signal.
    pub biases: Vec<Matrix>,
}

/// Runs the forward pass and backpropagates the loss without touching the
/// network's parameters.
///
/// The error signal starts as `loss'(expected, output) ⊙ f'(z_last)` and is
/// carried backward through `δ · Wᵀ ⊙ f'(z)` at each earlier boundary.
pub fn compute_gradients(network: &Network, input: &Matrix, expected: &Matrix) -> Result<Gradients> {
    check_expected(network, input, expected)?;

    let trace = network.forward_trace(input)?;
    let layers = network.layers();
    let n = layers.len();
    let output = trace.output();
    let loss_type = network.loss();

    let loss = loss_type.loss(expected, output)?;

    let mut delta = loss_type.derivative(expected, output)?.hadamard(&trace.activation_primes[n - 1]);
    let mut weights = vec![Matrix::default(); n];
    let mut biases = vec![Matrix::default(); n];

    for i in (0..n).rev() {
        if i + 1 < n {
            delta = layers[i + 1].back_propagate(&delta).hadamard(&trace.activation_primes[i]);
        }
        let (w_grad, b_grad) = layers[i].compute_gradients(&delta, trace.input_of(i));
        weights[i] = w_grad;
        biases[i] = b_grad;
    }

    Ok(Gradients { loss, weights, biases })
}

/// One full-batch gradient-descent step. Returns the loss measured before
/// the update.
///
/// Weights always move by `−eta · dW`; biases move only when the network was
/// built with [`BiasUpdate::Apply`](crate::BiasUpdate::Apply).
pub fn gradient_descent(network: &mut Network, input: &Matrix, expected: &Matrix, optimizer: &Sgd) -> Result<f64> {
    let gradients = compute_gradients(network, input, expected)?;
    let bias_update = network.config().bias_update;

    for (layer, (w_grad, b_grad)) in network.layers_mut().iter_mut()
        .zip(gradients.weights.iter().zip(gradients.biases.iter()))
    {
        optimizer.step(layer, w_grad, b_grad, bias_update);
    }

    trace!(loss = gradients.loss, "applied gradient step");
    Ok(gradients.loss)
}

/// Expected output must have one row per input row and one column per output neuron.
fn check_expected(network: &Network, input: &Matrix, expected: &Matrix) -> Result<()> {
    input.check_shape()?;
    expected.check_shape()?;
    if expected.cols != network.output_size() {
        return Err(NetworkError::ShapeMismatch {
            what: "expected output width",
            expected: network.output_size(),
            found: expected.cols,
        });
    }
    if expected.rows != input.rows {
        return Err(NetworkError::ShapeMismatch {
            what: "batch size",
            expected: input.rows,
            found: expected.rows,
        });
    }
    Ok(())
}
