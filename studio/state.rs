use std::sync::{Arc, Mutex, MutexGuard, atomic::{AtomicBool, Ordering}, mpsc};

use ferrite_backprop::{DatasetKind, NetworkConfig, StepStats, TrainingDriver};

// ---------------------------------------------------------------------------
// Playback
// ---------------------------------------------------------------------------

pub enum Playback {
    /// No timer is running; steps only happen on `POST /api/step`.
    Paused,
    /// A background thread is stepping the driver on a fixed interval.
    Playing {
        stop_flag:   Arc<AtomicBool>,
        step_rx:     Arc<Mutex<mpsc::Receiver<StepStats>>>,
        interval_ms: u64,
    },
    /// The last play run ended because a step failed.
    Failed {
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Main state struct
// ---------------------------------------------------------------------------

pub struct StudioState {
    /// The engine and its round-robin driver. Kept behind its own lock so the
    /// play thread never needs the studio lock.
    pub driver:       Arc<Mutex<TrainingDriver>>,
    /// Recipe the current dataset was built from.
    pub dataset_kind: DatasetKind,
    /// Current timer lifecycle state.
    pub playback:     Playback,
}

impl StudioState {
    pub fn new(config: NetworkConfig, dataset_kind: DatasetKind) -> ferrite_backprop::Result<Self> {
        let dataset = dataset_kind.build()?;
        let driver = TrainingDriver::from_config(config, dataset)?;
        Ok(StudioState {
            driver:       Arc::new(Mutex::new(driver)),
            dataset_kind,
            playback:     Playback::Paused,
        })
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing { .. })
    }

    /// Raises the stop flag of a running play thread, if any, and marks the
    /// studio paused. The thread exits before its next step.
    pub fn stop_playback(&mut self) {
        if let Playback::Playing { stop_flag, .. } = &self.playback {
            stop_flag.store(true, Ordering::Relaxed);
        }
        if self.is_playing() {
            self.playback = Playback::Paused;
        }
    }
}

/// Shared state type — an `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;

/// Locks `m`, recovering the data if a previous holder panicked.
pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
