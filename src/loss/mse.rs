pub struct MseLoss;

impl MseLoss {
    /// Scalar loss: mean(½·(expected - predicted)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| 0.5 * (y - p).powi(2))
            .sum::<f64>() / n
    }

    /// Per-output gradient w.r.t. a linear output: predicted - expected.
    /// The ½ factor cancels the square's 2.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| p - y)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_squared_error() {
        assert_eq!(MseLoss::loss(&[1.0], &[3.0]), 2.0);
        assert_eq!(MseLoss::loss(&[1.0, 0.0], &[3.0, 0.0]), 1.0);
    }

    #[test]
    fn derivative_is_residual() {
        assert_eq!(MseLoss::derivative(&[1.0, -1.0], &[3.0, -1.0]), vec![-2.0, 0.0]);
    }
}
