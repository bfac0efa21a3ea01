use serde::{Serialize, Deserialize};

/// `1 / (1 + e^-x)`
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// `σ(x) · (1 - σ(x))`, evaluated at the pre-activation `x`.
pub fn sigmoid_derivative(x: f64) -> f64 {
    let fx = sigmoid(x);
    fx * (1.0 - fx)
}

/// Element-wise nonlinearities available to the engine.
///
/// The hidden layer is always `Sigmoid`; the output layer is `Sigmoid` for
/// classification and `Identity` for regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    Sigmoid,
    Identity,
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::Identity => x,
        }
    }

    /// Derivative with respect to the pre-activation `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => sigmoid_derivative(x),
            ActivationFunction::Identity => 1.0,
        }
    }

    pub fn apply(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.function(x)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_at_zero_is_half() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_eq!(sigmoid_derivative(0.0), 0.25);
    }

    #[test]
    fn sigmoid_derivative_matches_finite_difference() {
        let h = 1e-6;
        for &x in &[-3.0, -0.5, 0.2, 1.7, 4.0] {
            let numeric = (sigmoid(x + h) - sigmoid(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(sigmoid_derivative(x), numeric, epsilon = 1e-8);
        }
    }

    #[test]
    fn sigmoid_variant_uses_the_sigmoid_derivative() {
        let s = ActivationFunction::Sigmoid;
        for &x in &[-2.0, 0.0, 0.3, 5.0] {
            assert_eq!(s.derivative(x), sigmoid_derivative(x));
        }
    }

    #[test]
    fn identity_passes_through() {
        let id = ActivationFunction::Identity;
        assert_eq!(id.apply(&[-2.0, 3.5]), vec![-2.0, 3.5]);
        assert_eq!(id.derivative(123.0), 1.0);
    }

    #[test]
    fn sigmoid_saturates_without_nan() {
        let s = ActivationFunction::Sigmoid;
        assert_eq!(s.function(-1000.0), 0.0);
        assert_eq!(s.function(1000.0), 1.0);
    }
}
