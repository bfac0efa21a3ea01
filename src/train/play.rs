use std::sync::Mutex;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::error::Result;
use crate::train::driver::TrainingDriver;
use crate::train::play_config::PlayConfig;

/// Why a `play_loop` run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// `max_steps` was reached.
    Finished,
    /// The stop flag was raised.
    Stopped,
    /// The progress receiver went away.
    Disconnected,
}

/// Steps `driver` once per `config.interval` until told to stop.
///
/// Each tick holds the driver's lock only for the duration of a single step,
/// so other callers (weight inspection, prediction) interleave between ticks
/// but never run concurrently with a step.
///
/// # Early termination
/// The loop ends before the next tick if:
/// - `config.stop_flag` is set to `true`, **or**
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.max_steps` steps have been taken.
///
/// A failing step ends the loop with that error.
pub fn play_loop(driver: &Mutex<TrainingDriver>, config: &PlayConfig) -> Result<PlayOutcome> {
    let mut taken = 0usize;
    let mut next_tick = Instant::now();

    loop {
        if stop_requested(config) {
            info!(steps = taken, "play loop stopped");
            return Ok(PlayOutcome::Stopped);
        }
        if config.max_steps.is_some_and(|max| taken >= max) {
            info!(steps = taken, "play loop finished");
            return Ok(PlayOutcome::Finished);
        }

        let stats = {
            let mut guard = match driver.lock() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    warn!("training driver lock poisoned; continuing with inner state");
                    poisoned.into_inner()
                }
            };
            // A pause or reconfigure may have landed while we waited for the lock.
            if stop_requested(config) {
                info!(steps = taken, "play loop stopped");
                return Ok(PlayOutcome::Stopped);
            }
            guard.step()?;
            guard.history().back().cloned()
        };
        taken += 1;

        if let (Some(tx), Some(stats)) = (&config.progress_tx, stats) {
            // If the receiver has been dropped, stop playing.
            if tx.send(stats).is_err() {
                info!(steps = taken, "play loop receiver dropped");
                return Ok(PlayOutcome::Disconnected);
            }
        }

        next_tick += config.interval;
        let now = Instant::now();
        if next_tick > now {
            sleep_until(next_tick, config);
        } else {
            // Fell behind; don't try to catch up with a burst of steps.
            next_tick = now;
        }
    }
}

/// Longest single sleep; a raised stop flag is noticed within this time.
const STOP_POLL: Duration = Duration::from_millis(20);

fn sleep_until(deadline: Instant, config: &PlayConfig) {
    loop {
        let now = Instant::now();
        if now >= deadline || stop_requested(config) {
            return;
        }
        thread::sleep((deadline - now).min(STOP_POLL));
    }
}

fn stop_requested(config: &PlayConfig) -> bool {
    config.stop_flag.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
}
