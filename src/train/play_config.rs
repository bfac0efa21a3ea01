use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};
use std::time::Duration;

use crate::train::step_stats::StepStats;

/// Configuration for a `play_loop` run.
///
/// # Fields
/// - `interval`    — delay between consecutive steps (the timer tick)
/// - `max_steps`   — stop after this many steps; `None` plays until stopped
/// - `progress_tx` — optional channel sender; one `StepStats` is sent per
///                   completed step.  If the receiver is dropped the loop
///                   terminates (clean shutdown).
/// - `stop_flag`   — optional atomic flag; when set to `true` from another
///                   thread the loop terminates before the next step.
pub struct PlayConfig {
    pub interval: Duration,
    pub max_steps: Option<usize>,
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl PlayConfig {
    /// Creates a minimal `PlayConfig` with no progress channel and no stop flag.
    pub fn new(interval: Duration) -> Self {
        PlayConfig {
            interval,
            max_steps: None,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
