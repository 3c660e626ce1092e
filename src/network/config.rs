use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::loss::loss_type::LossType;

pub const DEFAULT_REGULARIZATION: f64 = 0.01;

/// Whether training moves the bias vectors.
///
/// `Frozen` computes bias gradients but never applies them, so biases keep
/// their initial value of zero for the network's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasUpdate {
    #[default]
    Frozen,
    Apply,
}

/// Construction-time configuration of a [`Network`](crate::Network).
///
/// Every field except `layer_sizes` has a default, so a JSON file only
/// needs to name the layer sizes:
///
/// ```json
/// { "layer_sizes": [2, 4, 1], "activation": "tanh" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Neurons per layer, input first. At least two entries, none zero.
    pub layer_sizes: Vec<usize>,
    /// Used by every boundary except the last.
    #[serde(default)]
    pub activation: ActivationFunction,
    /// Used by the last boundary only. Defaults to `activation`.
    #[serde(default)]
    pub output_activation: Option<ActivationFunction>,
    #[serde(default)]
    pub loss: LossType,
    /// Stored for a future L2 penalty; training never reads it.
    #[serde(default = "default_regularization")]
    pub regularization: f64,
    #[serde(default)]
    pub bias_update: BiasUpdate,
}

fn default_regularization() -> f64 {
    DEFAULT_REGULARIZATION
}

impl NetworkConfig {
    pub fn new(layer_sizes: &[usize]) -> Self {
        NetworkConfig {
            layer_sizes: layer_sizes.to_vec(),
            activation: ActivationFunction::default(),
            output_activation: None,
            loss: LossType::default(),
            regularization: DEFAULT_REGULARIZATION,
            bias_update: BiasUpdate::default(),
        }
    }

    pub fn activation(mut self, activation: ActivationFunction) -> Self {
        self.activation = activation;
        self
    }

    pub fn output_activation(mut self, activation: ActivationFunction) -> Self {
        self.output_activation = Some(activation);
        self
    }

    pub fn loss(mut self, loss: LossType) -> Self {
        self.loss = loss;
        self
    }

    pub fn regularization(mut self, regularization: f64) -> Self {
        self.regularization = regularization;
        self
    }

    pub fn bias_update(mut self, bias_update: BiasUpdate) -> Self {
        self.bias_update = bias_update;
        self
    }

    /// The activation actually used at the last boundary.
    pub fn resolved_output_activation(&self) -> ActivationFunction {
        self.output_activation.unwrap_or(self.activation)
    }

    /// Checks the layer sizes and that the selected loss is implemented.
    pub fn validate(&self) -> Result<()> {
        if self.layer_sizes.len() < 2 || self.layer_sizes.contains(&0) {
            return Err(NetworkError::InvalidLayerSizes(self.layer_sizes.clone()));
        }
        self.loss.ensure_implemented()
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file written by `save_json` or by hand.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
