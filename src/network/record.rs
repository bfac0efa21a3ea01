use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;
use crate::network::params::NetworkParams;

/// Inputs, activations, and the parameters the step started from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardSection {
    pub inputs: Vec<f64>,
    pub hidden_pre: Vec<f64>,
    pub hidden_post: Vec<f64>,
    pub output_pre: Vec<f64>,
    pub output_post: Vec<f64>,
    pub weights1: Matrix,
    pub biases1: Vec<f64>,
    pub weights2: Matrix,
    pub biases2: Vec<f64>,
}

/// Loss and every gradient, all computed from the pre-update parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackwardSection {
    pub targets: Vec<f64>,
    pub loss: f64,
    /// dL/d(outputPre); equals `outputPost - targets` for both task types.
    pub output_gradients: Vec<f64>,
    /// dL/d(hiddenPre).
    pub hidden_gradients: Vec<f64>,
    pub weights1_gradients: Matrix,
    pub biases1_gradients: Vec<f64>,
    pub weights2_gradients: Matrix,
    pub biases2_gradients: Vec<f64>,
}

/// Parameters after the gradient-descent update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AfterSection {
    pub weights1: Matrix,
    pub biases1: Vec<f64>,
    pub weights2: Matrix,
    pub biases2: Vec<f64>,
}

/// Immutable snapshot of one training step, the only thing a view ever
/// needs to draw the network, its gradients, and the update.
///
/// For every parameter tensor `X`:
/// `after.X == forward.X - learning_rate * backward.XGradients`, elementwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingStepRecord {
    pub learning_rate: f64,
    pub forward: ForwardSection,
    pub backward: BackwardSection,
    pub after: AfterSection,
}

impl TrainingStepRecord {
    /// Parameters the step started from.
    pub fn params_before(&self) -> NetworkParams {
        NetworkParams {
            weights1: self.forward.weights1.clone(),
            biases1: self.forward.biases1.clone(),
            weights2: self.forward.weights2.clone(),
            biases2: self.forward.biases2.clone(),
        }
    }

    /// Parameters the step left behind.
    pub fn params_after(&self) -> NetworkParams {
        NetworkParams {
            weights1: self.after.weights1.clone(),
            biases1: self.after.biases1.clone(),
            weights2: self.after.weights2.clone(),
            biases2: self.after.biases2.clone(),
        }
    }
}

impl From<NetworkParams> for AfterSection {
    fn from(p: NetworkParams) -> Self {
        AfterSection { weights1: p.weights1, biases1: p.biases1, weights2: p.weights2, biases2: p.biases2 }
    }
}
