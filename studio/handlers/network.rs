use serde::{Deserialize, Serialize};
use tiny_http::Request;
use tracing::info;

use ferrite_backprop::{
    check_replacement, Dataset, DatasetKind, ForwardPass, NetworkConfig, NetworkParams, StepStats,
    TrainingStepRecord,
};

use crate::routes::{bad_request, error_response, ok_json, JsonResponse};
use crate::state::{lock, Playback, SharedState, StudioState};
use crate::util::body::read_json;
use crate::util::query::{parse_query, query_get};

/// Upper bound on `steps` for a single `POST /api/step`.
const MAX_STEPS_PER_REQUEST: usize = 100_000;

/// Most history entries a single `GET /api/state` returns.
const MAX_HISTORY_PER_RESPONSE: usize = 1_000;

// ---------------------------------------------------------------------------
// GET /api/state
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StateView<'a> {
    config:         &'a NetworkConfig,
    dataset_kind:   &'a DatasetKind,
    dataset:        &'a Dataset,
    step_count:     usize,
    cursor:         usize,
    playing:        bool,
    /// Timer interval while playing.
    interval_ms:    Option<u64>,
    playback_error: Option<String>,
    mean_loss:      Option<f64>,
    /// Newest history entries after step `since`, at most
    /// `MAX_HISTORY_PER_RESPONSE` of them.
    history:        &'a [&'a StepStats],
    /// `null` until the first step after a reset.
    last_record:    Option<&'a TrainingStepRecord>,
}

/// `GET /api/state?since=N`
///
/// Everything a view needs in one response. `since` is a step number: only
/// history entries for later steps are returned, so pollers fetch what is
/// new. Either way the response carries a bounded tail of the history.
pub fn handle_state(query: &str, state: SharedState) -> JsonResponse {
    let pairs = parse_query(query);
    let since: usize = query_get(&pairs, "since").unwrap_or(0);

    let (driver, dataset_kind, interval_ms, playback_error) = {
        let st = lock(&state);
        let (interval, error) = match &st.playback {
            Playback::Playing { interval_ms, .. } => (Some(*interval_ms), None),
            Playback::Failed { reason }           => (None, Some(reason.clone())),
            Playback::Paused                      => (None, None),
        };
        (st.driver.clone(), st.dataset_kind.clone(), interval, error)
    };

    let driver = lock(&driver);
    let recent: Vec<&StepStats> = driver.history_after(since).collect();
    let tail = recent.len().saturating_sub(MAX_HISTORY_PER_RESPONSE);

    let view = StateView {
        config:         driver.network().config(),
        dataset_kind:   &dataset_kind,
        dataset:        driver.dataset(),
        step_count:     driver.step_count(),
        cursor:         driver.cursor(),
        playing:        interval_ms.is_some(),
        interval_ms,
        playback_error,
        mean_loss:      driver.mean_loss().ok(),
        history:        &recent[tail..],
        last_record:    driver.last_record(),
    };
    ok_json(&view)
}

// ---------------------------------------------------------------------------
// GET / POST /api/weights
// ---------------------------------------------------------------------------

pub fn handle_get_weights(state: SharedState) -> JsonResponse {
    let driver = lock(&state).driver.clone();
    let weights = lock(&driver).network().weights();
    ok_json(&weights)
}

/// Installs a full parameter set. Shapes must match the current architecture
/// exactly; nothing changes on mismatch.
pub fn handle_set_weights(request: &mut Request, state: SharedState) -> JsonResponse {
    let params: Option<NetworkParams> = match read_json(request) {
        Ok(p) => p,
        Err(e) => return error_response(400, &e),
    };
    let Some(params) = params else {
        return error_response(400, "request body must contain weights");
    };

    let driver = lock(&state).driver.clone();
    let mut driver = lock(&driver);
    match driver.set_weights(params) {
        Ok(()) => ok_json(&driver.network().weights()),
        Err(e) => bad_request(e),
    }
}

// ---------------------------------------------------------------------------
// POST /api/step
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
struct StepRequest {
    steps: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StepResponse<'a> {
    step_count: usize,
    record:     Option<&'a TrainingStepRecord>,
}

/// Runs `steps` (default 1) training steps and returns the last record.
pub fn handle_step(request: &mut Request, state: SharedState) -> JsonResponse {
    let req: StepRequest = match read_json(request) {
        Ok(r) => r,
        Err(e) => return error_response(400, &e),
    };
    let steps = req.steps.unwrap_or(1);
    if steps == 0 || steps > MAX_STEPS_PER_REQUEST {
        return error_response(400, &format!("steps must be between 1 and {MAX_STEPS_PER_REQUEST}"));
    }

    let driver = lock(&state).driver.clone();
    let mut driver = lock(&driver);
    if let Err(e) = driver.run(steps) {
        return bad_request(e);
    }
    let body = StepResponse { step_count: driver.step_count(), record: driver.last_record() };
    ok_json(&body)
}

// ---------------------------------------------------------------------------
// POST /api/reset
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetResponse {
    step_count: usize,
    weights:    NetworkParams,
}

/// Pauses playback and reinitialises the parameters, counters, and history.
pub fn handle_reset(state: SharedState) -> JsonResponse {
    let driver = {
        let mut st = lock(&state);
        st.stop_playback();
        st.driver.clone()
    };

    let mut driver = lock(&driver);
    driver.reset();
    info!("studio reset");
    ok_json(&ResetResponse { step_count: driver.step_count(), weights: driver.network().weights() })
}

// ---------------------------------------------------------------------------
// POST /api/config
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
struct ConfigRequest {
    /// Keeps the current network configuration when absent.
    network: Option<NetworkConfig>,
    /// Keeps the current dataset recipe when absent.
    dataset: Option<DatasetKind>,
}

/// Replaces the network configuration (and optionally the dataset). Always a
/// full reinitialisation. A rejected request leaves playback running.
pub fn handle_config(request: &mut Request, state: SharedState) -> JsonResponse {
    let req: ConfigRequest = match read_json(request) {
        Ok(r) => r,
        Err(e) => return error_response(400, &e),
    };

    let mut st = lock(&state);
    match apply_config(&mut st, req) {
        Ok(config) => ok_json(&config),
        Err(e) => bad_request(e),
    }
}

/// Validates the new config against the new dataset, then pauses playback
/// and swaps both in. Nothing changes if validation fails.
fn apply_config(st: &mut StudioState, req: ConfigRequest) -> ferrite_backprop::Result<NetworkConfig> {
    let driver = st.driver.clone();
    let mut driver = lock(&driver);

    let kind = req.dataset.unwrap_or_else(|| st.dataset_kind.clone());
    let config = req.network.unwrap_or_else(|| driver.network().config().clone());
    let dataset = kind.build()?;
    check_replacement(&config, &dataset)?;

    st.stop_playback();
    driver.replace(config, dataset)?;
    st.dataset_kind = kind;
    st.playback = Playback::Paused;
    info!(dataset = ?st.dataset_kind, "studio reconfigured");

    Ok(driver.network().config().clone())
}

// ---------------------------------------------------------------------------
// POST /api/learning-rate
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LearningRateRequest {
    learning_rate: f64,
}

/// Changes the step size for subsequent steps only.
pub fn handle_learning_rate(request: &mut Request, state: SharedState) -> JsonResponse {
    let req: LearningRateRequest = match read_json(request) {
        Ok(r) => r,
        Err(e) => return error_response(400, &e),
    };

    let driver = lock(&state).driver.clone();
    let mut driver = lock(&driver);
    match driver.set_learning_rate(req.learning_rate) {
        Ok(()) => ok_json(driver.network().config()),
        Err(e) => bad_request(e),
    }
}

// ---------------------------------------------------------------------------
// POST /api/predict
// ---------------------------------------------------------------------------

#[derive(Default, Deserialize)]
struct PredictRequest {
    inputs: Vec<f64>,
}

/// Forward pass on arbitrary inputs; returns every intermediate activation.
pub fn handle_predict(request: &mut Request, state: SharedState) -> JsonResponse {
    let req: PredictRequest = match read_json(request) {
        Ok(r) => r,
        Err(e) => return error_response(400, &e),
    };

    let driver = lock(&state).driver.clone();
    let driver = lock(&driver);
    let pass: Result<ForwardPass, _> = driver.network().forward(&req.inputs);
    match pass {
        Ok(pass) => ok_json(&pass),
        Err(e) => bad_request(e),
    }
}
