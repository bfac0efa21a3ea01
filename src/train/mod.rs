pub mod driver;
pub mod landscape;
pub mod play;
pub mod play_config;
pub mod step_stats;

pub use driver::{check_replacement, TrainingDriver, MAX_HISTORY};
pub use landscape::{sample_landscape, LossLandscape, ParamAxis};
pub use play::{play_loop, PlayOutcome};
pub use play_config::PlayConfig;
pub use step_stats::StepStats;
