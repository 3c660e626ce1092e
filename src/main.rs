// Trains the XOR demo network and prints its predictions.
//
//   cargo run -- [network-config.json] [train-config.json]
//
// Without arguments the default [2, 4, 1] arctan network is trained for 1000
// epochs at eta 0.25, reporting every 100. Set RUST_LOG=debug to see
// construction and training details.
use feedforward_nn::{Matrix, Network, NetworkConfig, TrainConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run() {
        error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> feedforward_nn::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => NetworkConfig::load_json(&path)?,
        None => NetworkConfig::new(&[2, 4, 1]),
    };
    let mut network = Network::from_config(config)?;

    let inputs = Matrix::from_rows(&[
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ])?;
    let expected = Matrix::from_rows(&[vec![0.0], vec![1.0], vec![1.0], vec![0.0]])?;

    let train_config = match std::env::args().nth(2) {
        Some(path) => TrainConfig::load_json(&path)?,
        None => TrainConfig::new(1000, 100, 0.25),
    };
    network.train(&inputs, &expected, &train_config)?;

    let outputs = network.forward(&inputs)?;
    for (input, output) in inputs.data.iter().zip(outputs.data.iter()) {
        info!("Input: {input:?} -> Output: {output:.4?}");
    }
    Ok(())
}
