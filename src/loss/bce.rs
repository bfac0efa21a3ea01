pub struct BceLoss;

/// Predictions are clamped to `[EPS, 1 - EPS]` before taking logarithms.
pub const EPS: f64 = 1e-12;

impl BceLoss {
    /// Scalar BCE: -mean(y·ln(clamp(p)) + (1-y)·ln(clamp(1-p)))
    ///
    /// Clamping happens on `p` itself, so `1 - clamp(p)` is bounded away
    /// from zero as well and the result is always finite.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| {
                let p = p.clamp(EPS, 1.0 - EPS);
                -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
            })
            .sum::<f64>() / n
    }

    /// Gradient of sigmoid + BCE w.r.t. the pre-sigmoid logits:
    ///   ∂L/∂z_i = predicted[i] - expected[i]
    ///
    /// The sigmoid Jacobian cancels against the BCE denominator, so the
    /// output layer must not apply its own derivative on top of this.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, y)| p - y)
            .collect()
    }
}
