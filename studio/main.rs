/// ferrite-backprop Studio
///
/// A JSON / Server-Sent-Events feed for backpropagation visualisers.
/// Served by a synchronous tiny_http server; views live elsewhere and read
/// the training-step records this server produces.
///
/// Run with:
///   cargo run --bin studio --release [config.json]
/// Then point a view at http://127.0.0.1:7878/api/state
///
/// The bind address can be overridden with `FERRITE_ADDR`. The optional
/// argument is a `NetworkConfig` JSON file; without it the studio starts on
/// the XOR classification setup.

mod state;
mod routes;
mod handlers;
mod util;

use std::sync::{Arc, Mutex};
use tiny_http::Server;
use tracing::{error, info};

use ferrite_backprop::{DatasetKind, NetworkConfig, TaskType};
use state::StudioState;

const DEFAULT_ADDR: &str = "127.0.0.1:7878";

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match NetworkConfig::load_json(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(%path, error = %e, "could not load config");
                std::process::exit(1);
            }
        },
        None => NetworkConfig::default(),
    };
    let dataset_kind = match config.task_type {
        TaskType::Classification => DatasetKind::Xor,
        TaskType::Regression     => DatasetKind::default_linear(),
    };

    let studio = match StudioState::new(config, dataset_kind) {
        Ok(studio) => studio,
        Err(e) => {
            error!(error = %e, "could not initialise the network");
            std::process::exit(1);
        }
    };
    let shared_state = Arc::new(Mutex::new(studio));

    let addr = std::env::var("FERRITE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind HTTP server");
            std::process::exit(1);
        }
    };
    info!(%addr, "studio listening; GET /api/state to begin");

    // Each request is dispatched on its own thread so the SSE handler
    // (which blocks for as long as playback runs) does not stall
    // regular requests.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
}
