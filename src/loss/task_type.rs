use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::activation::activation::ActivationFunction;
use crate::error::NetworkError;
use crate::loss::{bce::BceLoss, mse::MseLoss};

/// Selects the output activation and the loss the engine trains against.
///
/// - `Classification` — sigmoid output, binary cross-entropy.
/// - `Regression`     — linear output, ½·mean-squared error.
///
/// Both pairings share the same output gradient, `predicted - expected`,
/// w.r.t. the output pre-activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Classification,
    Regression,
}

impl TaskType {
    pub fn output_activation(&self) -> ActivationFunction {
        match self {
            TaskType::Classification => ActivationFunction::Sigmoid,
            TaskType::Regression     => ActivationFunction::Identity,
        }
    }

    /// Scalar loss for one example.
    pub fn loss(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        match self {
            TaskType::Classification => BceLoss::loss(predicted, expected),
            TaskType::Regression     => MseLoss::loss(predicted, expected),
        }
    }

    /// dL/d(outputPre) for one example.
    pub fn loss_derivative(&self, predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        match self {
            TaskType::Classification => BceLoss::derivative(predicted, expected),
            TaskType::Regression     => MseLoss::derivative(predicted, expected),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Classification => "classification",
            TaskType::Regression     => "regression",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classification" => Ok(TaskType::Classification),
            "regression"     => Ok(TaskType::Regression),
            other            => Err(NetworkError::UnknownTaskType(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exactly_two_names() {
        assert_eq!("classification".parse::<TaskType>().unwrap(), TaskType::Classification);
        assert_eq!("regression".parse::<TaskType>().unwrap(), TaskType::Regression);
        assert!("Regression".parse::<TaskType>().is_err());
        assert!("softmax".parse::<TaskType>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TaskType::Classification).unwrap();
        assert_eq!(json, "\"classification\"");
        let back: TaskType = serde_json::from_str("\"regression\"").unwrap();
        assert_eq!(back, TaskType::Regression);
    }

    #[test]
    fn output_gradient_is_residual_for_both_tasks() {
        for task in [TaskType::Classification, TaskType::Regression] {
            assert_eq!(task.loss_derivative(&[0.75], &[1.0]), vec![-0.25]);
        }
    }
}
