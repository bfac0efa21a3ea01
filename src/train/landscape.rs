use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::data::dataset::Example;
use crate::error::{NetworkError, Result};
use crate::loss::task_type::TaskType;
use crate::network::forward::evaluate_loss;
use crate::network::params::NetworkParams;

/// Addresses one scalar inside a `NetworkParams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tensor", rename_all = "snake_case")]
pub enum ParamAxis {
    Weights1 { input: usize, hidden: usize },
    Biases1 { hidden: usize },
    Weights2 { hidden: usize, output: usize },
    Biases2 { output: usize },
}

impl ParamAxis {
    pub fn get(&self, params: &NetworkParams) -> Option<f64> {
        match *self {
            ParamAxis::Weights1 { input, hidden } => params.weights1.data.get(input)?.get(hidden).copied(),
            ParamAxis::Biases1 { hidden } => params.biases1.get(hidden).copied(),
            ParamAxis::Weights2 { hidden, output } => params.weights2.data.get(hidden)?.get(output).copied(),
            ParamAxis::Biases2 { output } => params.biases2.get(output).copied(),
        }
    }

    fn slot<'a>(&self, params: &'a mut NetworkParams) -> Option<&'a mut f64> {
        match *self {
            ParamAxis::Weights1 { input, hidden } => params.weights1.data.get_mut(input)?.get_mut(hidden),
            ParamAxis::Biases1 { hidden } => params.biases1.get_mut(hidden),
            ParamAxis::Weights2 { hidden, output } => params.weights2.data.get_mut(hidden)?.get_mut(output),
            ParamAxis::Biases2 { output } => params.biases2.get_mut(output),
        }
    }
}

/// Loss sampled on a square grid around the current parameters.
///
/// `losses[row][col]` is the loss at `(x_values[col], y_values[row])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossLandscape {
    pub x_axis: ParamAxis,
    pub y_axis: ParamAxis,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    pub losses: Vec<Vec<f64>>,
    /// Grid cell nearest the parameters the landscape was centred on.
    pub center: (usize, usize),
}

/// Samples the mean loss over `examples` while sweeping two parameters
/// across `[value - span, value + span]` in `resolution` steps each.
///
/// Works on private copies of `params`; whoever owns the live parameters
/// never sees an intermediate value.
pub fn sample_landscape(
    params: &NetworkParams,
    task: TaskType,
    examples: &[Example],
    x_axis: ParamAxis,
    y_axis: ParamAxis,
    span: f64,
    resolution: usize,
) -> Result<LossLandscape> {
    if resolution < 2 {
        return Err(NetworkError::InvalidConfig(format!("landscape resolution must be at least 2, got {resolution}")));
    }
    if !(span.is_finite() && span > 0.0) {
        return Err(NetworkError::InvalidConfig(format!("landscape span must be positive, got {span}")));
    }
    let x0 = x_axis.get(params).ok_or_else(|| out_of_range(x_axis))?;
    let y0 = y_axis.get(params).ok_or_else(|| out_of_range(y_axis))?;

    let x_values = sweep(x0, span, resolution);
    let y_values = sweep(y0, span, resolution);

    let mut scratch = params.clone();
    let mut losses = Vec::with_capacity(resolution);
    for &y in &y_values {
        let mut row = Vec::with_capacity(resolution);
        for &x in &x_values {
            set(&mut scratch, x_axis, x);
            set(&mut scratch, y_axis, y);
            row.push(evaluate_loss(&scratch, task, examples)?);
        }
        losses.push(row);
    }
    trace!(?x_axis, ?y_axis, resolution, "loss landscape sampled");

    let mid = (resolution - 1) / 2;
    Ok(LossLandscape { x_axis, y_axis, x_values, y_values, losses, center: (mid, mid) })
}

fn sweep(center: f64, span: f64, resolution: usize) -> Vec<f64> {
    let step = 2.0 * span / (resolution - 1) as f64;
    (0..resolution).map(|i| center - span + step * i as f64).collect()
}

fn set(params: &mut NetworkParams, axis: ParamAxis, value: f64) {
    if let Some(slot) = axis.slot(params) {
        *slot = value;
    }
}

fn out_of_range(axis: ParamAxis) -> NetworkError {
    NetworkError::InvalidConfig(format!("parameter {axis:?} does not exist in this network"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_is_centred_and_evenly_spaced() {
        let xs = sweep(1.0, 0.5, 5);
        assert_eq!(xs, vec![0.5, 0.75, 1.0, 1.25, 1.5]);
    }

    #[test]
    fn axis_get_reports_missing_entries() {
        let params = NetworkParams::filled(2, 3, 1, 0.1);
        assert_eq!(ParamAxis::Weights1 { input: 1, hidden: 2 }.get(&params), Some(0.1));
        assert_eq!(ParamAxis::Weights1 { input: 2, hidden: 0 }.get(&params), None);
        assert_eq!(ParamAxis::Biases2 { output: 1 }.get(&params), None);
    }

    #[test]
    fn axis_deserializes_from_tagged_json() {
        let axis: ParamAxis = serde_json::from_str(r#"{"tensor":"weights2","hidden":3,"output":0}"#).unwrap();
        assert_eq!(axis, ParamAxis::Weights2 { hidden: 3, output: 0 });
    }
}
