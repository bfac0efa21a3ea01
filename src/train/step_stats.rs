use serde::{Serialize, Deserialize};

/// Per-step summary emitted by `TrainingDriver::step` and `play_loop`.
///
/// Loss-over-time charts read a `Vec<StepStats>`; anything that needs the
/// full tensors reads the driver's last `TrainingStepRecord` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// 1-based step number since the last reset.
    pub step: usize,
    /// Loss of the example trained on in this step (pre-update parameters).
    pub loss: f64,
    /// Position of that example in the dataset.
    pub example_index: usize,
}
