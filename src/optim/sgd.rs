use crate::network::params::NetworkParams;

/// Vanilla gradient descent: `param -= learning_rate * grad`.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Returns the parameters after one update. `grads` must have the same
    /// shape as `params`.
    pub fn step(&self, params: &NetworkParams, grads: &NetworkParams) -> NetworkParams {
        let lr = self.learning_rate;
        NetworkParams {
            weights1: &params.weights1 - &grads.weights1.map(|g| lr * g),
            biases1: descend(&params.biases1, &grads.biases1, lr),
            weights2: &params.weights2 - &grads.weights2.map(|g| lr * g),
            biases2: descend(&params.biases2, &grads.biases2, lr),
        }
    }
}

fn descend(values: &[f64], grads: &[f64], lr: f64) -> Vec<f64> {
    values.iter().zip(grads.iter()).map(|(v, g)| v - lr * g).collect()
}
