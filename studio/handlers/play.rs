use std::sync::{Arc, Mutex, atomic::AtomicBool, mpsc};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tiny_http::Request;
use tracing::{error, info};

use ferrite_backprop::{play_loop, PlayConfig, StepStats};

use crate::routes::{error_response, ok_json, JsonResponse};
use crate::state::{lock, Playback, SharedState};
use crate::util::body::read_json;

const MIN_INTERVAL_MS: u64 = 1;
const MAX_INTERVAL_MS: u64 = 10_000;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayRequest {
    interval_ms: u64,
    max_steps:   Option<usize>,
}

impl Default for PlayRequest {
    fn default() -> Self {
        PlayRequest { interval_ms: 50, max_steps: None }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaybackView {
    playing:     bool,
    interval_ms: Option<u64>,
}

// ---------------------------------------------------------------------------
// POST /api/play
// ---------------------------------------------------------------------------

/// Starts the fixed-interval timer on a background thread. Step summaries
/// are delivered through `GET /api/events`.
pub fn handle_play(request: &mut Request, state: SharedState) -> JsonResponse {
    let req: PlayRequest = match read_json(request) {
        Ok(r) => r,
        Err(e) => return error_response(400, &e),
    };
    let interval_ms = clamped_interval(req.interval_ms);

    let mut st = lock(&state);

    // If already playing, don't start another timer.
    if st.is_playing() {
        return error_response(409, "already playing");
    }

    let (tx, rx) = mpsc::channel::<StepStats>();
    let stop_flag = Arc::new(AtomicBool::new(false));

    st.playback = Playback::Playing {
        stop_flag:   stop_flag.clone(),
        step_rx:     Arc::new(Mutex::new(rx)),
        interval_ms,
    };
    let driver = st.driver.clone();
    drop(st);

    // Spawn the background timer thread.
    let state_clone = state.clone();
    thread::spawn(move || {
        let mut config = PlayConfig::new(Duration::from_millis(interval_ms));
        config.max_steps   = req.max_steps;
        config.progress_tx = Some(tx);
        config.stop_flag   = Some(stop_flag.clone());

        let outcome = play_loop(&driver, &config);

        let mut st = lock(&state_clone);
        // Only touch playback if it still belongs to this run; a later
        // play may already have replaced it.
        let ours = matches!(&st.playback, Playback::Playing { stop_flag: f, .. } if Arc::ptr_eq(f, &stop_flag));
        match outcome {
            Ok(outcome) => {
                info!(?outcome, "playback ended");
                if ours {
                    st.playback = Playback::Paused;
                }
            }
            Err(e) => {
                error!(error = %e, "playback step failed");
                if ours {
                    st.playback = Playback::Failed { reason: e.to_string() };
                }
            }
        }
    });

    ok_json(&PlaybackView { playing: true, interval_ms: Some(interval_ms) })
}

fn clamped_interval(requested_ms: u64) -> u64 {
    requested_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)
}

// ---------------------------------------------------------------------------
// POST /api/pause
// ---------------------------------------------------------------------------

/// Stops scheduling further steps. A step already in progress completes.
pub fn handle_pause(state: SharedState) -> JsonResponse {
    let mut st = lock(&state);
    st.stop_playback();
    ok_json(&PlaybackView { playing: false, interval_ms: None })
}
