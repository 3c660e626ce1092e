use rand::Rng;
use tracing::{debug, warn};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::layers::dense::Layer;
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::config::NetworkConfig;
use crate::network::trace::ForwardTrace;
use crate::train::loop_fn::train_loop;
use crate::train::observation::LossObservation;
use crate::train::train_config::TrainConfig;

/// A fully-connected feedforward network.
///
/// The network exclusively owns its layers. Inference borrows it shared,
/// training borrows it mutably, so a training step can never overlap with
/// another reader or writer.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a network with the default configuration (arctan everywhere,
    /// mean-squared error, frozen biases).
    pub fn new(layer_sizes: &[usize]) -> Result<Network> {
        Network::from_config(NetworkConfig::new(layer_sizes))
    }

    pub fn from_config(config: NetworkConfig) -> Result<Network> {
        Network::with_rng(config, &mut rand::thread_rng())
    }

    /// Builds a network drawing its initial weights from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: NetworkConfig, rng: &mut R) -> Result<Network> {
        config.validate()?;

        let output_activation = config.resolved_output_activation();
        if config.activation.is_approximate() || output_activation.is_approximate() {
            warn!("softmax uses an elementwise derivative approximation; gradients are not exact");
        }

        let layers = config.layer_sizes
            .windows(2)
            .map(|pair| Layer::new(pair[0], pair[1], &mut *rng))
            .collect();

        debug!(
            layer_sizes = ?config.layer_sizes,
            activation = ?config.activation,
            output_activation = ?output_activation,
            loss = ?config.loss,
            "constructed network"
        );

        Ok(Network { config, layers })
    }

    /// Builds a network around caller-supplied parameters, e.g. to restart
    /// training from a known starting point. Each layer's shape must match
    /// the configured layer sizes.
    pub fn from_layers(config: NetworkConfig, layers: Vec<Layer>) -> Result<Network> {
        config.validate()?;
        if layers.len() != config.layer_sizes.len() - 1 {
            return Err(NetworkError::ShapeMismatch {
                what: "layer count",
                expected: config.layer_sizes.len() - 1,
                found: layers.len(),
            });
        }
        for (layer, pair) in layers.iter().zip(config.layer_sizes.windows(2)) {
            layer.weights.check_shape()?;
            layer.biases.check_shape()?;
            check_dim("weight rows", pair[0], layer.input_size())?;
            check_dim("weight columns", pair[1], layer.size())?;
            check_dim("bias rows", 1, layer.biases.rows)?;
            check_dim("bias columns", pair[1], layer.biases.cols)?;
        }
        Ok(Network { config, layers })
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Number of layers including input and output (`layer_sizes.len()`).
    pub fn num_layers(&self) -> usize {
        self.config.layer_sizes.len()
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.config.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.config.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.config.layer_sizes[self.config.layer_sizes.len() - 1]
    }

    /// Layer boundaries, input side first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn weights(&self) -> impl Iterator<Item = &Matrix> {
        self.layers.iter().map(|layer| &layer.weights)
    }

    pub fn biases(&self) -> impl Iterator<Item = &Matrix> {
        self.layers.iter().map(|layer| &layer.biases)
    }

    pub fn loss(&self) -> LossType {
        self.config.loss
    }

    pub fn regularization(&self) -> f64 {
        self.config.regularization
    }

    /// Activation used at layer boundary `layer`: the output activation for
    /// the last boundary, the hidden activation everywhere else.
    pub fn activation_for(&self, layer: usize) -> ActivationFunction {
        if layer + 1 == self.layers.len() {
            self.config.resolved_output_activation()
        } else {
            self.config.activation
        }
    }

    /// Feeds a `(batch, input_size)` matrix through the network.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        let mut current = input.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            current = self.activation_for(i).apply(&layer.integrate(&current));
        }
        Ok(current)
    }

    /// Feeds a batch of rows through the network.
    pub fn infer(&self, rows: &[Vec<f64>]) -> Result<Matrix> {
        self.forward(&Matrix::from_rows(rows)?)
    }

    /// Feeds a single sample through the network.
    pub fn infer_one(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut output = self.forward(&Matrix::row_vector(input))?;
        Ok(output.data.swap_remove(0))
    }

    /// Forward pass that records every integration, activation and
    /// activation derivative for backpropagation.
    pub fn forward_trace(&self, input: &Matrix) -> Result<ForwardTrace> {
        self.check_input(input)?;
        let mut trace = ForwardTrace::new(input.clone());
        for (i, layer) in self.layers.iter().enumerate() {
            let activation = self.activation_for(i);
            let integration = layer.integrate(trace.output());
            let activated = activation.apply(&integration);
            let prime = activation.derivative(&integration);
            trace.push(integration, activated, prime);
        }
        Ok(trace)
    }

    /// Trains with full-batch gradient descent; see [`train_loop`].
    pub fn train(
        &mut self,
        input: &Matrix,
        expected: &Matrix,
        config: &TrainConfig,
    ) -> Result<Vec<LossObservation>> {
        train_loop(self, input, expected, config, |_| {})
    }

    fn check_input(&self, input: &Matrix) -> Result<()> {
        input.check_shape()?;
        if input.cols != self.input_size() {
            return Err(NetworkError::InvalidInput {
                expected: self.input_size(),
                found: input.cols,
            });
        }
        if input.rows == 0 {
            return Err(NetworkError::EmptyBatch);
        }
        Ok(())
    }
}

fn check_dim(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(NetworkError::ShapeMismatch { what, expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(config: NetworkConfig) -> Network {
        Network::with_rng(config, &mut StdRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn construction_shapes_follow_layer_sizes() {
        let sizes = [3, 5, 7, 5, 1];
        let network = seeded(NetworkConfig::new(&sizes));
        assert_eq!(network.num_layers(), 5);
        assert_eq!(network.layers().len(), 4);
        for (i, layer) in network.layers().iter().enumerate() {
            assert_eq!(layer.weights.shape(), (sizes[i], sizes[i + 1]));
            assert_eq!(layer.biases.shape(), (1, sizes[i + 1]));
            assert!(layer.biases.data[0].iter().all(|&b| b == 0.0));
        }
    }

    #[test]
    fn degenerate_layer_sizes_are_rejected() {
        assert!(matches!(Network::new(&[]), Err(NetworkError::InvalidLayerSizes(_))));
        assert!(matches!(Network::new(&[3]), Err(NetworkError::InvalidLayerSizes(_))));
    }

    #[test]
    fn unimplemented_loss_fails_at_construction() {
        let config = NetworkConfig::new(&[2, 1]).loss(LossType::Svm);
        assert!(matches!(Network::from_config(config), Err(NetworkError::NotImplemented(_))));
    }

    #[test]
    fn output_activation_only_applies_to_last_boundary() {
        let network = seeded(
            NetworkConfig::new(&[2, 3, 3, 2])
                .activation(ActivationFunction::Tanh)
                .output_activation(ActivationFunction::Softmax),
        );
        assert_eq!(network.activation_for(0), ActivationFunction::Tanh);
        assert_eq!(network.activation_for(1), ActivationFunction::Tanh);
        assert_eq!(network.activation_for(2), ActivationFunction::Softmax);
    }

    #[test]
    fn forward_matches_hand_computed_single_layer() {
        let mut network = seeded(NetworkConfig::new(&[2, 1]));
        network.layers_mut()[0].weights = Matrix::from_data(vec![vec![0.5], vec![-1.0]]);
        let out = network.infer(&[vec![2.0, 1.0], vec![0.0, 1.0]]).unwrap();
        assert_eq!(out.shape(), (2, 1));
        assert_eq!(out.data[0][0], 0.0_f64.atan());
        assert_eq!(out.data[1][0], (-1.0_f64).atan());
    }

    #[test]
    fn mismatched_input_width_is_an_error() {
        let network = seeded(NetworkConfig::new(&[3, 4, 2]));
        for width in [0, 1, 2, 4, 9] {
            let rows = vec![vec![0.5; width]; 2];
            match network.infer(&rows) {
                Err(NetworkError::InvalidInput { expected, found }) => {
                    assert_eq!(expected, 3);
                    assert_eq!(found, width);
                }
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn trace_records_every_boundary() {
        let network = seeded(NetworkConfig::new(&[2, 4, 3, 1]));
        let input = Matrix::from_data(vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
        let trace = network.forward_trace(&input).unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.activations.len(), 4);
        assert_eq!(trace.input_of(0), &input);
        assert_eq!(trace.output(), &network.forward(&input).unwrap());
        for (i, prime) in trace.activation_primes.iter().enumerate() {
            assert_eq!(prime.shape(), (2, network.layer_sizes()[i + 1]));
        }
    }

    #[test]
    fn from_layers_checks_every_shape() {
        let config = NetworkConfig::new(&[2, 1]);
        let good = Layer { weights: Matrix::zeros(2, 1), biases: Matrix::zeros(1, 1) };
        assert!(Network::from_layers(config.clone(), vec![good.clone()]).is_ok());

        let wrong_weights = Layer { weights: Matrix::zeros(3, 1), biases: Matrix::zeros(1, 1) };
        assert!(matches!(
            Network::from_layers(config.clone(), vec![wrong_weights]),
            Err(NetworkError::ShapeMismatch { what: "weight rows", expected: 2, found: 3 })
        ));
        assert!(matches!(
            Network::from_layers(config, vec![good.clone(), good]),
            Err(NetworkError::ShapeMismatch { what: "layer count", .. })
        ));
    }

    #[test]
    fn ragged_input_is_an_error_not_a_panic() {
        let network = seeded(NetworkConfig::new(&[2, 3, 1]));
        let ragged = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(
            network.forward(&ragged),
            Err(NetworkError::RaggedRows { row: 1, expected: 2, found: 1 })
        ));
        assert!(matches!(network.forward_trace(&ragged), Err(NetworkError::RaggedRows { .. })));

        let mut miscounted = Matrix::zeros(2, 2);
        miscounted.rows = 4;
        assert!(matches!(network.forward(&miscounted), Err(NetworkError::ShapeMismatch { .. })));
    }

    #[test]
    fn from_layers_rejects_ragged_weights() {
        let layer = Layer {
            weights: Matrix::from_data(vec![vec![1.0], vec![]]),
            biases: Matrix::zeros(1, 1),
        };
        assert!(matches!(
            Network::from_layers(NetworkConfig::new(&[2, 1]), vec![layer]),
            Err(NetworkError::RaggedRows { row: 1, .. })
        ));
    }

    #[test]
    fn trace_uses_output_derivative_only_at_last_boundary() {
        let network = seeded(
            NetworkConfig::new(&[2, 3, 3, 2])
                .activation(ActivationFunction::Tanh)
                .output_activation(ActivationFunction::Sigmoid),
        );
        let input = Matrix::from_data(vec![vec![0.4, -1.2], vec![2.0, 0.1]]);
        let trace = network.forward_trace(&input).unwrap();
        for (i, z) in trace.integrations.iter().enumerate() {
            let activation = if i == 2 { ActivationFunction::Sigmoid } else { ActivationFunction::Tanh };
            assert_eq!(trace.activations[i + 1], activation.apply(z));
            assert_eq!(trace.activation_primes[i], activation.derivative(z));
        }
    }

    #[test]
    fn infer_one_returns_single_row() {
        let network = seeded(NetworkConfig::new(&[2, 3]));
        let out = network.infer_one(&[1.0, -1.0]).unwrap();
        assert_eq!(out.len(), 3);
        assert!(matches!(network.infer_one(&[1.0]), Err(NetworkError::InvalidInput { .. })));
    }
}
