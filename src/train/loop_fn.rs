use tracing::{debug, info};

use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::backprop::gradient_descent;
use crate::train::observation::LossObservation;
use crate::train::train_config::TrainConfig;

/// Trains `network` with full-batch gradient descent.
///
/// # Arguments
/// - `network`        — modified in place
/// - `input`          — `(batch, input_size)` training batch
/// - `expected`       — `(batch, output_size)` targets
/// - `config`         — epochs, reporting interval and learning rate
/// - `on_observation` — called with each reported loss as soon as it is known
///
/// Runs [`TrainConfig::steps`] steps: exactly `config.epochs` with
/// `config.interval == 0` (nothing reported), `config.epochs + 1` otherwise,
/// reporting every step whose 0-based index is a multiple of the interval.
/// The reported observations are also returned in order.
///
/// # Errors
/// An invalid learning rate or shape mismatch aborts the run; steps that
/// already completed keep their updates.
pub fn train_loop<F>(
    network: &mut Network,
    input: &Matrix,
    expected: &Matrix,
    config: &TrainConfig,
    mut on_observation: F,
) -> Result<Vec<LossObservation>>
where
    F: FnMut(LossObservation),
{
    let optimizer = Sgd::new(config.learning_rate)?;
    let mut observations = Vec::new();

    debug!(
        epochs = config.epochs,
        interval = config.interval,
        learning_rate = config.learning_rate,
        steps = config.steps(),
        batch = input.rows,
        "starting training"
    );

    for epoch in 0..config.steps() {
        let loss = gradient_descent(network, input, expected, &optimizer)?;
        if config.reports(epoch) {
            info!("Epoch {epoch}:   Loss: {loss}");
            let observation = LossObservation { epoch, loss };
            on_observation(observation);
            observations.push(observation);
        }
    }

    Ok(observations)
}
