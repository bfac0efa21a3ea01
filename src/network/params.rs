use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::math::matrix::{self, Matrix};

/// The four trainable tensors of a two-layer network.
///
/// - `weights1` — `input_size × hidden_size`, indexed `[input][hidden]`
/// - `biases1`  — `hidden_size`
/// - `weights2` — `hidden_size × output_size`, indexed `[hidden][output]`
/// - `biases2`  — `output_size`
///
/// Values of this type are always owned copies; handing one out or taking
/// one in never shares storage with a live engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkParams {
    pub weights1: Matrix,
    pub biases1: Vec<f64>,
    pub weights2: Matrix,
    pub biases2: Vec<f64>,
}

impl NetworkParams {
    /// Fresh parameters drawn from `(U(0,1) - 0.5) * 0.5`.
    pub fn random<R: Rng + ?Sized>(input_size: usize, hidden_size: usize, output_size: usize, rng: &mut R) -> NetworkParams {
        let weights1 = Matrix::uniform_noise(input_size, hidden_size, rng);
        let biases1 = (0..hidden_size).map(|_| matrix::uniform_noise(rng)).collect();
        let weights2 = Matrix::uniform_noise(hidden_size, output_size, rng);
        let biases2 = (0..output_size).map(|_| matrix::uniform_noise(rng)).collect();

        NetworkParams { weights1, biases1, weights2, biases2 }
    }

    /// Every weight and bias set to `value`.
    pub fn filled(input_size: usize, hidden_size: usize, output_size: usize, value: f64) -> NetworkParams {
        NetworkParams {
            weights1: Matrix::filled(input_size, hidden_size, value),
            biases1: vec![value; hidden_size],
            weights2: Matrix::filled(hidden_size, output_size, value),
            biases2: vec![value; output_size],
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights1.rows
    }

    pub fn hidden_size(&self) -> usize {
        self.biases1.len()
    }

    pub fn output_size(&self) -> usize {
        self.biases2.len()
    }

    /// Confirms every tensor has exactly the shape of the given architecture,
    /// including the row lengths inside each matrix.
    pub fn check_shape(&self, input_size: usize, hidden_size: usize, output_size: usize) -> Result<()> {
        check_matrix("weights1", &self.weights1, (input_size, hidden_size))?;
        check_matrix("weights2", &self.weights2, (hidden_size, output_size))?;
        check_vector("biases1", &self.biases1, hidden_size)?;
        check_vector("biases2", &self.biases2, output_size)?;
        Ok(())
    }

    /// Total number of scalar parameters.
    pub fn len(&self) -> usize {
        self.weights1.rows * self.weights1.cols
            + self.biases1.len()
            + self.weights2.rows * self.weights2.cols
            + self.biases2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_finite(&self) -> bool {
        self.weights1.data.iter().flatten()
            .chain(self.biases1.iter())
            .chain(self.weights2.data.iter().flatten())
            .chain(self.biases2.iter())
            .all(|x| x.is_finite())
    }
}

fn check_matrix(tensor: &'static str, m: &Matrix, expected: (usize, usize)) -> Result<()> {
    let rows = m.data.len();
    let bad_row = m.data.iter().map(|row| row.len()).find(|&len| len != expected.1);
    if m.shape() != expected || rows != expected.0 || bad_row.is_some() {
        return Err(NetworkError::ShapeMismatch {
            tensor,
            expected,
            found: (rows, bad_row.unwrap_or(m.cols)),
        });
    }
    Ok(())
}

fn check_vector(what: &'static str, v: &[f64], expected: usize) -> Result<()> {
    if v.len() != expected {
        return Err(NetworkError::DimensionMismatch { what, expected, found: v.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn random_has_requested_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = NetworkParams::random(3, 4, 2, &mut rng);
        assert!(p.check_shape(3, 4, 2).is_ok());
        assert_eq!(p.len(), 3 * 4 + 4 + 4 * 2 + 2);
        assert!(p.biases1.iter().chain(p.biases2.iter()).all(|b| b.abs() <= 0.25));
    }

    #[test]
    fn same_seed_same_params() {
        let a = NetworkParams::random(2, 6, 1, &mut StdRng::seed_from_u64(42));
        let b = NetworkParams::random(2, 6, 1, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn ragged_matrix_is_reported() {
        let mut p = NetworkParams::filled(2, 3, 1, 0.1);
        p.weights1.data[1].pop();
        match p.check_shape(2, 3, 1) {
            Err(NetworkError::ShapeMismatch { tensor, expected, found }) => {
                assert_eq!(tensor, "weights1");
                assert_eq!(expected, (2, 3));
                assert_eq!(found, (2, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn short_bias_is_reported() {
        let mut p = NetworkParams::filled(2, 3, 1, 0.1);
        p.biases1.truncate(1);
        assert!(matches!(
            p.check_shape(2, 3, 1),
            Err(NetworkError::DimensionMismatch { what: "biases1", expected: 3, found: 1 })
        ));
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let json = serde_json::to_value(NetworkParams::filled(1, 1, 1, 0.0)).unwrap();
        assert!(json.get("weights1").is_some());
        assert!(json.get("biases2").is_some());
    }
}
