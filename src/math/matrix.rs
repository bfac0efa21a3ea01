use rand::Rng;
use serde::{Serialize, Deserialize};
use std::ops::Sub;

/// Scale applied to `U(0,1) - 0.5` at initialisation; values land in `[-0.25, 0.25)`.
const INIT_SCALE: f64 = 0.5;

/// Dense row-major matrix. Weight matrices are indexed `[from][to]`, so a
/// `weights1` matrix has one row per input and one column per hidden unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![value; cols]; rows]
        }
    }

    /// Small zero-centred noise: every cell is `(U(0,1) - 0.5) * 0.5`,
    /// i.e. uniform on `[-0.25, 0.25)`.
    pub fn uniform_noise<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);

        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = uniform_noise(rng);
            }
        }

        res
    }

    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        Matrix {
            rows: data.len(),
            cols: data.first().map(|row| row.len()).unwrap_or(0),
            data
        }
    }

    /// Outer product `a ⊗ b`: `res[i][j] = a[i] * b[j]`.
    pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
        Matrix::from_rows(a.len(), b.len(), a.iter().map(|x| b.iter().map(|y| x * y).collect()).collect())
    }

    fn from_rows(rows: usize, cols: usize, data: Vec<Vec<f64>>) -> Matrix {
        Matrix { rows, cols, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when `data` really holds `rows` rows of `cols` entries each.
    pub fn is_rectangular(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    /// `Mᵗ · v`, contracting over rows: `res[j] = Σ_i data[i][j] * v[i]`.
    ///
    /// This is how activations flow forward through a `[from][to]` matrix.
    pub fn transpose_mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.rows, v.len(), "Matrix and vector are of incorrect sizes");

        let mut res = vec![0.0; self.cols];
        for (row, x) in self.data.iter().zip(v.iter()) {
            for (acc, w) in res.iter_mut().zip(row.iter()) {
                *acc += x * w;
            }
        }
        res
    }

    /// `M · v`, contracting over columns: `res[i] = Σ_j data[i][j] * v[j]`.
    ///
    /// Used to send an error signal backwards through a `[from][to]` matrix.
    pub fn mul_vec(&self, v: &[f64]) -> Vec<f64> {
        assert_eq!(self.cols, v.len(), "Matrix and vector are of incorrect sizes");

        self.data.iter()
            .map(|row| row.iter().zip(v.iter()).map(|(w, x)| w * x).sum())
            .collect()
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix::from_rows(
            self.rows,
            self.cols,
            self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        )
    }
}

/// One draw of the initialisation noise used for weights and biases alike.
pub fn uniform_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (rng.gen::<f64>() - 0.5) * INIT_SCALE
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn uniform_noise_stays_in_quarter_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::uniform_noise(20, 30, &mut rng);
        assert_eq!(m.shape(), (20, 30));
        assert!(m.data.iter().flatten().all(|&x| (-0.25..0.25).contains(&x)));
    }

    #[test]
    fn transpose_mul_vec_contracts_over_rows() {
        // 3 inputs -> 2 outputs
        let m = Matrix::from_data(vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0],
            vec![5.0, 6.0],
        ]);
        assert_eq!(m.transpose_mul_vec(&[1.0, 0.0, -1.0]), vec![-4.0, -4.0]);
    }

    #[test]
    fn mul_vec_contracts_over_columns() {
        let m = Matrix::from_data(vec![
            vec![1.0, 2.0],
            vec![3.0, 4.0],
        ]);
        assert_eq!(m.mul_vec(&[1.0, 1.0]), vec![3.0, 7.0]);
    }

    #[test]
    fn outer_product_shape_and_values() {
        let m = Matrix::outer(&[1.0, 2.0, 3.0], &[10.0, 20.0]);
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.data[2], vec![30.0, 60.0]);
    }

    #[test]
    fn from_data_empty_is_zero_by_zero() {
        let m = Matrix::from_data(vec![]);
        assert_eq!(m.shape(), (0, 0));
        assert!(m.is_rectangular());
    }

    #[test]
    fn ragged_rows_are_not_rectangular() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(!m.is_rectangular());
    }

    #[test]
    fn sub_is_elementwise() {
        let a = Matrix::filled(2, 2, 1.0);
        let b = Matrix::filled(2, 2, 0.25);
        assert_eq!((&a - &b).data, vec![vec![0.75; 2]; 2]);
    }
}
