use crate::activation::activation::ActivationFunction;
use crate::loss::task_type::TaskType;
use crate::math::matrix::Matrix;
use crate::network::forward::ForwardPass;
use crate::network::params::NetworkParams;

/// Loss plus every gradient of one example.
#[derive(Debug, Clone)]
pub struct Backprop {
    pub loss: f64,
    pub output_gradients: Vec<f64>,
    pub hidden_gradients: Vec<f64>,
    /// Parameter gradients, laid out like the parameters themselves.
    pub params: NetworkParams,
}

/// Backpropagates one example through `params`.
///
/// `pass` must be the forward pass of `inputs` through these same `params`;
/// nothing here reads anything but the pre-update values.
pub fn backward(
    params: &NetworkParams,
    task: TaskType,
    inputs: &[f64],
    pass: &ForwardPass,
    targets: &[f64],
) -> Backprop {
    let loss = task.loss(&pass.output_post, targets);

    // δ_out = outputPost - target, for sigmoid+BCE and linear+½MSE alike
    let output_gradients = task.loss_derivative(&pass.output_post, targets);

    // hiddenError[h] = Σ_o δ_out[o] · weights2[h][o]
    let hidden_error = params.weights2.mul_vec(&output_gradients);
    let hidden_gradients: Vec<f64> = hidden_error.iter().zip(pass.hidden_pre.iter())
        .map(|(e, &z)| e * ActivationFunction::Sigmoid.derivative(z))
        .collect();

    let weights2 = Matrix::outer(&pass.hidden_post, &output_gradients);
    let weights1 = Matrix::outer(inputs, &hidden_gradients);

    Backprop {
        loss,
        params: NetworkParams {
            weights1,
            biases1: hidden_gradients.clone(),
            weights2,
            biases2: output_gradients.clone(),
        },
        output_gradients,
        hidden_gradients,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Example;
    use crate::network::forward::{evaluate_loss, forward_unchecked};
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn numeric_gradient(params: &NetworkParams, task: TaskType, example: &Example, nudge: impl Fn(&mut NetworkParams, f64)) -> f64 {
        let h = 1e-6;
        let mut plus = params.clone();
        nudge(&mut plus, h);
        let mut minus = params.clone();
        nudge(&mut minus, -h);
        let examples = std::slice::from_ref(example);
        let lp = evaluate_loss(&plus, task, examples).unwrap();
        let lm = evaluate_loss(&minus, task, examples).unwrap();
        (lp - lm) / (2.0 * h)
    }

    #[test]
    fn analytic_gradients_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(3);
        for task in [TaskType::Classification, TaskType::Regression] {
            let params = NetworkParams::random(2, 3, 1, &mut rng);
            let example = Example::new(vec![0.7, -1.3], vec![if task == TaskType::Classification { 1.0 } else { 2.5 }]);
            let pass = forward_unchecked(&params, task, &example.inputs);
            let grads = backward(&params, task, &example.inputs, &pass, &example.targets).params;

            for i in 0..2 {
                for h in 0..3 {
                    let num = numeric_gradient(&params, task, &example, |p, d| p.weights1.data[i][h] += d);
                    assert_abs_diff_eq!(grads.weights1.data[i][h], num, epsilon = 1e-7);
                }
            }
            for h in 0..3 {
                let num = numeric_gradient(&params, task, &example, |p, d| p.weights2.data[h][0] += d);
                assert_abs_diff_eq!(grads.weights2.data[h][0], num, epsilon = 1e-7);
                let num = numeric_gradient(&params, task, &example, |p, d| p.biases1[h] += d);
                assert_abs_diff_eq!(grads.biases1[h], num, epsilon = 1e-7);
            }
            let num = numeric_gradient(&params, task, &example, |p, d| p.biases2[0] += d);
            assert_abs_diff_eq!(grads.biases2[0], num, epsilon = 1e-7);
        }
    }
}
