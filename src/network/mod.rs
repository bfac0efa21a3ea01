pub mod backward;
pub mod config;
pub mod forward;
pub mod network;
pub mod params;
pub mod record;

pub use config::NetworkConfig;
pub use forward::{evaluate_loss, forward, ForwardPass};
pub use network::Network;
pub use params::NetworkParams;
pub use record::TrainingStepRecord;
