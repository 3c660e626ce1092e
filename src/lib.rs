pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::config::{BiasUpdate, NetworkConfig};
pub use network::network::Network;
pub use network::trace::ForwardTrace;
pub use loss::loss_type::LossType;
pub use loss::mse::MseLoss;
pub use optim::sgd::Sgd;
pub use train::{compute_gradients, gradient_descent, train_loop, Gradients, LossObservation, TrainConfig};
