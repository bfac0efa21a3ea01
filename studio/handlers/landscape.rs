use serde::Deserialize;
use tiny_http::Request;

use ferrite_backprop::{sample_landscape, ParamAxis};

use crate::routes::{bad_request, error_response, ok_json, JsonResponse};
use crate::state::{lock, SharedState};
use crate::util::body::read_json;

const MAX_RESOLUTION: usize = 101;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LandscapeRequest {
    x_axis:     ParamAxis,
    y_axis:     ParamAxis,
    span:       f64,
    resolution: usize,
}

impl Default for LandscapeRequest {
    fn default() -> Self {
        LandscapeRequest {
            x_axis:     ParamAxis::Weights1 { input: 0, hidden: 0 },
            y_axis:     ParamAxis::Weights2 { hidden: 0, output: 0 },
            span:       2.0,
            resolution: 25,
        }
    }
}

/// `POST /api/landscape`
///
/// Samples the dataset loss over a grid of two parameters around their
/// current values. The parameters are copied out under the driver lock and
/// the grid is evaluated on those copies, so live training is unaffected
/// and never waits on the sampling.
pub fn handle(request: &mut Request, state: SharedState) -> JsonResponse {
    let req: LandscapeRequest = match read_json(request) {
        Ok(r) => r,
        Err(e) => return error_response(400, &e),
    };
    if req.resolution > MAX_RESOLUTION {
        return error_response(400, &format!("resolution must be at most {MAX_RESOLUTION}"));
    }

    let (params, task, dataset) = {
        let driver = lock(&state).driver.clone();
        let driver = lock(&driver);
        (driver.network().weights(), driver.network().task_type(), driver.dataset().clone())
    };

    match sample_landscape(&params, task, dataset.examples(), req.x_axis, req.y_axis, req.span, req.resolution) {
        Ok(landscape) => ok_json(&landscape),
        Err(e) => bad_request(e),
    }
}
