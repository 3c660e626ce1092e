use serde::{Serialize, Deserialize};

/// The loss measured by one training step, before that step's update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossObservation {
    /// 0-based step index.
    pub epoch: usize,
    pub loss: f64,
}
