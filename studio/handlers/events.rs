use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use tiny_http::Request;
use tracing::debug;

use crate::state::{lock, Playback, SharedState};
use crate::util::sse::{format_sse_event, format_sse_keepalive, write_sse, SSE_PREAMBLE};

/// `GET /api/events` — Server-Sent Events handler.
///
/// This handler consumes `request` (takes ownership so we can call
/// `into_writer`) and drives a long-lived loop that:
/// 1. Tries to receive a `StepStats` from the play channel with a
///    500 ms timeout.
/// 2. On success — serializes the stats and writes an `event: step` frame.
/// 3. On timeout — writes a keep-alive `: ping` comment.
/// 4. On channel disconnect (playback ended) — writes a `paused` or
///    `failed` event, then closes.
///
/// Only one stream receives each step; views wanting the full tensors poll
/// `GET /api/state` when a `step` event arrives.
pub fn handle(request: Request, state: SharedState) {
    // tiny_http's `into_writer()` gives us the raw TCP stream so we can
    // write the HTTP response and then stream SSE frames directly.
    let mut writer = request.into_writer();

    if write_sse(&mut writer, SSE_PREAMBLE).is_err() {
        return;
    }

    // Extract the receiver Arc from state (clone it out so we don't hold the lock).
    let step_rx = {
        let st = lock(&state);
        match &st.playback {
            Playback::Playing { step_rx, .. } => Some(step_rx.clone()),
            _ => None,
        }
    };

    let rx_arc = match step_rx {
        Some(r) => r,
        None => {
            // Not playing; tell the client and close.
            let _ = write_sse(&mut writer, &format_sse_event("paused", "{}"));
            return;
        }
    };

    // Main receive loop.
    loop {
        let result = {
            let rx = lock(&rx_arc);
            rx.recv_timeout(Duration::from_millis(500))
        };

        match result {
            Ok(stats) => {
                match serde_json::to_string(&stats) {
                    Ok(json) => {
                        if write_sse(&mut writer, &format_sse_event("step", &json)).is_err() {
                            debug!("event stream client went away");
                            return;
                        }
                    }
                    Err(_) => continue,
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if write_sse(&mut writer, format_sse_keepalive()).is_err() {
                    return;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                // Play thread closed the sender — report how it ended.
                let last = {
                    let st = lock(&state);
                    match &st.playback {
                        Playback::Failed { reason } => format_sse_event(
                            "failed",
                            &serde_json::json!({ "reason": reason }).to_string(),
                        ),
                        _ => format_sse_event("paused", "{}"),
                    }
                };
                let _ = write_sse(&mut writer, &last);
                return;
            }
        }
    }
}
