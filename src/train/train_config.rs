use serde::{Serialize, Deserialize};

use crate::error::Result;

pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`        — number of gradient-descent steps over the full batch
/// - `interval`      — report the loss every `interval` steps; `0` disables
///                     reporting. With reporting on, the loop runs
///                     `epochs + 1` steps so the final epoch index is observed.
/// - `learning_rate` — step size `eta`; must be finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs: usize,
    #[serde(default)]
    pub interval: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}

impl TrainConfig {
    pub fn new(epochs: usize, interval: usize, learning_rate: f64) -> Self {
        TrainConfig { epochs, interval, learning_rate }
    }

    /// Number of gradient-descent steps the loop will run.
    pub fn steps(&self) -> usize {
        if self.interval == 0 { self.epochs } else { self.epochs + 1 }
    }

    /// Whether the step at 0-based index `epoch` reports its loss.
    pub fn reports(&self, epoch: usize) -> bool {
        self.interval > 0 && epoch % self.interval == 0
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a run configuration; missing `interval` and `learning_rate`
    /// fall back to `0` and [`DEFAULT_LEARNING_RATE`].
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(0, 0, DEFAULT_LEARNING_RATE)
    }
}
