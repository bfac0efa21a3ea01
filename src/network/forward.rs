//! Pure forward computations over a set of parameters.
//!
//! Nothing here touches a live `Network`: loss landscapes and "what if"
//! evaluations hand in their own `NetworkParams` by value or reference.

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::data::Example;
use crate::error::{NetworkError, Result};
use crate::loss::task_type::TaskType;
use crate::network::params::NetworkParams;

/// Every intermediate of one forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardPass {
    pub hidden_pre: Vec<f64>,
    pub hidden_post: Vec<f64>,
    pub output_pre: Vec<f64>,
    pub output_post: Vec<f64>,
}

/// Runs the network defined by `params` on `inputs`.
///
/// Fails if `params` is internally inconsistent or `inputs` has the wrong length.
pub fn forward(params: &NetworkParams, task: TaskType, inputs: &[f64]) -> Result<ForwardPass> {
    check_params(params)?;
    check_len("inputs", inputs, params.input_size())?;
    Ok(forward_unchecked(params, task, inputs))
}

/// Mean loss of `params` over `examples`.
pub fn evaluate_loss(params: &NetworkParams, task: TaskType, examples: &[Example]) -> Result<f64> {
    if examples.is_empty() {
        return Err(NetworkError::EmptyDataset);
    }
    check_params(params)?;

    let mut total = 0.0;
    for example in examples {
        check_len("inputs", &example.inputs, params.input_size())?;
        check_len("targets", &example.targets, params.output_size())?;
        let pass = forward_unchecked(params, task, &example.inputs);
        total += task.loss(&pass.output_post, &example.targets);
    }
    Ok(total / examples.len() as f64)
}

/// Forward pass without validation; callers guarantee the shapes.
pub(crate) fn forward_unchecked(params: &NetworkParams, task: TaskType, inputs: &[f64]) -> ForwardPass {
    // hiddenPre[h] = Σ_i inputs[i] · weights1[i][h] + biases1[h]
    let hidden_pre = add(params.weights1.transpose_mul_vec(inputs), &params.biases1);
    let hidden_post = ActivationFunction::Sigmoid.apply(&hidden_pre);

    let output_pre = add(params.weights2.transpose_mul_vec(&hidden_post), &params.biases2);
    let output_post = task.output_activation().apply(&output_pre);

    ForwardPass { hidden_pre, hidden_post, output_pre, output_post }
}

pub(crate) fn check_len(what: &'static str, v: &[f64], expected: usize) -> Result<()> {
    if v.len() != expected {
        return Err(NetworkError::DimensionMismatch { what, expected, found: v.len() });
    }
    Ok(())
}

fn check_params(params: &NetworkParams) -> Result<()> {
    params.check_shape(params.input_size(), params.hidden_size(), params.output_size())
}

fn add(mut a: Vec<f64>, b: &[f64]) -> Vec<f64> {
    for (x, y) in a.iter_mut().zip(b.iter()) {
        *x += y;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_params_give_half_and_zero() {
        let params = NetworkParams::filled(2, 3, 1, 0.0);
        let cls = forward(&params, TaskType::Classification, &[1.0, -1.0]).unwrap();
        assert_eq!(cls.hidden_post, vec![0.5; 3]);
        assert_eq!(cls.output_post, vec![0.5]);

        let reg = forward(&params, TaskType::Regression, &[1.0, -1.0]).unwrap();
        assert_eq!(reg.output_post, vec![0.0]);
    }

    #[test]
    fn regression_output_is_linear_in_hidden() {
        let params = NetworkParams::filled(1, 2, 1, 0.5);
        let pass = forward(&params, TaskType::Regression, &[2.0]).unwrap();
        // hiddenPre = 0.5·2 + 0.5
        assert_eq!(pass.hidden_pre, vec![1.5, 1.5]);
        let h = 1.0 / (1.0 + (-1.5f64).exp());
        assert_relative_eq!(pass.output_pre[0], 2.0 * 0.5 * h + 0.5, max_relative = 1e-15);
        assert_eq!(pass.output_post, pass.output_pre);
    }

    #[test]
    fn wrong_input_length_is_an_error() {
        let params = NetworkParams::filled(2, 3, 1, 0.0);
        assert!(matches!(
            forward(&params, TaskType::Classification, &[1.0]),
            Err(NetworkError::DimensionMismatch { what: "inputs", expected: 2, found: 1 })
        ));
    }

    #[test]
    fn evaluate_loss_rejects_empty_dataset() {
        let params = NetworkParams::filled(1, 1, 1, 0.0);
        assert!(matches!(
            evaluate_loss(&params, TaskType::Regression, &[]),
            Err(NetworkError::EmptyDataset)
        ));
    }

    #[test]
    fn evaluate_loss_averages_examples() {
        let params = NetworkParams::filled(1, 1, 1, 0.0);
        let examples = vec![
            Example::new(vec![0.0], vec![1.0]),
            Example::new(vec![0.0], vec![3.0]),
        ];
        // outputs are all 0: (0.5·1 + 0.5·9) / 2
        let loss = evaluate_loss(&params, TaskType::Regression, &examples).unwrap();
        assert_eq!(loss, 2.5);
    }
}
