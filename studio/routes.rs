use std::io::Cursor;
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::{debug, error};

use crate::state::SharedState;
use crate::handlers;

pub type JsonResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("static header is valid ASCII")
}

fn bytes_response(status: u16, content_type: &str, bytes: Vec<u8>) -> JsonResponse {
    let len = bytes.len();
    Response::new(
        StatusCode(status),
        vec![
            header("Content-Type", content_type),
            header("Access-Control-Allow-Origin", "*"),
        ],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

/// Serializes `body` as the JSON payload of a `status` response.
pub fn json_response<T: Serialize>(status: u16, body: &T) -> JsonResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => bytes_response(status, "application/json", bytes),
        Err(e) => {
            error!(error = %e, "could not serialize response");
            error_response(500, "could not serialize response")
        }
    }
}

pub fn ok_json<T: Serialize>(body: &T) -> JsonResponse {
    json_response(200, body)
}

/// `{"error": "..."}` with the given status.
pub fn error_response(status: u16, message: &str) -> JsonResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    bytes_response(status, "application/json", body.into_bytes())
}

/// Maps an engine error to a 400 response.
pub fn bad_request(err: impl std::fmt::Display) -> JsonResponse {
    error_response(400, &err.to_string())
}

pub fn not_found() -> JsonResponse {
    error_response(404, "not found")
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
///
/// All handlers (except SSE) receive a `&mut Request` so that the dispatcher
/// retains ownership and can call `request.respond(response)` at the end.
/// The SSE handler takes ownership to perform long-lived streaming.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url    = request.url().to_owned();

    let (path, query) = if let Some(pos) = url.find('?') {
        (url[..pos].to_owned(), url[pos + 1..].to_owned())
    } else {
        (url.clone(), String::new())
    };
    debug!(%method, %path, "request");

    // SSE — long-lived; handler takes ownership and drives the stream loop.
    if method == Method::Get && path == "/api/events" {
        handlers::events::handle(request, state);
        return;
    }

    let response = match (method, path.as_str()) {
        // ── Engine state ─────────────────────────────────────────────────
        (Method::Get,  "/api/state")          => handlers::network::handle_state(&query, state),
        (Method::Get,  "/api/weights")        => handlers::network::handle_get_weights(state),
        (Method::Post, "/api/weights")        => handlers::network::handle_set_weights(&mut request, state),

        // ── Stepping & configuration ─────────────────────────────────────
        (Method::Post, "/api/step")           => handlers::network::handle_step(&mut request, state),
        (Method::Post, "/api/reset")          => handlers::network::handle_reset(state),
        (Method::Post, "/api/config")         => handlers::network::handle_config(&mut request, state),
        (Method::Post, "/api/learning-rate")  => handlers::network::handle_learning_rate(&mut request, state),
        (Method::Post, "/api/predict")        => handlers::network::handle_predict(&mut request, state),

        // ── Loss landscape ───────────────────────────────────────────────
        (Method::Post, "/api/landscape")      => handlers::landscape::handle(&mut request, state),

        // ── Play / pause ─────────────────────────────────────────────────
        (Method::Post, "/api/play")           => handlers::play::handle_play(&mut request, state),
        (Method::Post, "/api/pause")          => handlers::play::handle_pause(state),

        // ── 404 ──────────────────────────────────────────────────────────
        _ => not_found(),
    };

    let _ = request.respond(response);
}
