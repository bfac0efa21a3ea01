pub mod math;
pub mod activation;
pub mod loss;
pub mod network;
pub mod optim;
pub mod data;
pub mod train;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use loss::task_type::TaskType;
pub use network::config::NetworkConfig;
pub use network::network::Network;
pub use network::params::NetworkParams;
pub use network::record::TrainingStepRecord;
pub use network::forward::{evaluate_loss, ForwardPass};
pub use optim::sgd::Sgd;
pub use data::dataset::{Dataset, DatasetKind, Example};
pub use train::driver::{check_replacement, TrainingDriver, MAX_HISTORY};
pub use train::landscape::{sample_landscape, LossLandscape, ParamAxis};
pub use train::play::{play_loop, PlayOutcome};
pub use train::play_config::PlayConfig;
pub use train::step_stats::StepStats;
pub use error::{NetworkError, Result};
