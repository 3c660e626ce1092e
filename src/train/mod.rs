pub mod backprop;
pub mod observation;
pub mod train_config;
pub mod loop_fn;

pub use backprop::{compute_gradients, gradient_descent, Gradients};
pub use observation::LossObservation;
pub use train_config::TrainConfig;
pub use loop_fn::train_loop;
