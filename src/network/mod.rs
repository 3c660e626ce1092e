pub mod config;
pub mod network;
pub mod trace;

pub use config::{BiasUpdate, NetworkConfig};
pub use network::Network;
pub use trace::ForwardTrace;
