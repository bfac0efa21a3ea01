use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};

/// One labelled training pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub inputs: Vec<f64>,
    pub targets: Vec<f64>,
}

impl Example {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> Example {
        Example { inputs, targets }
    }
}

/// A finite, ordered list of examples with uniform input and target sizes.
///
/// Only serialisable: every `Dataset` goes through `Dataset::new`, so the
/// size accessors can rely on at least one example.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Short name for display (e.g. "xor", "linear").
    pub name: String,
    examples: Vec<Example>,
}

impl Dataset {
    /// Builds a dataset, checking it is non-empty and every example has the
    /// same input and target lengths as the first one.
    pub fn new(name: impl Into<String>, examples: Vec<Example>) -> Result<Dataset> {
        let first = examples.first().ok_or(NetworkError::EmptyDataset)?;
        let (n_in, n_out) = (first.inputs.len(), first.targets.len());

        for example in &examples {
            if example.inputs.len() != n_in {
                return Err(NetworkError::DimensionMismatch { what: "inputs", expected: n_in, found: example.inputs.len() });
            }
            if example.targets.len() != n_out {
                return Err(NetworkError::DimensionMismatch { what: "targets", expected: n_out, found: example.targets.len() });
            }
        }

        Ok(Dataset { name: name.into(), examples })
    }

    /// Builds a dataset from parallel `(inputs, targets)` slices.
    pub fn from_pairs(name: impl Into<String>, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<Dataset> {
        if inputs.len() != targets.len() {
            return Err(NetworkError::DimensionMismatch { what: "targets", expected: inputs.len(), found: targets.len() });
        }
        let examples = inputs.iter().zip(targets.iter())
            .map(|(i, t)| Example::new(i.clone(), t.clone()))
            .collect();
        Dataset::new(name, examples)
    }

    /// The four XOR truth-table rows, in the order the driver cycles through them.
    pub fn xor() -> Dataset {
        let examples = vec![
            Example::new(vec![0.0, 0.0], vec![0.0]),
            Example::new(vec![0.0, 1.0], vec![1.0]),
            Example::new(vec![1.0, 0.0], vec![1.0]),
            Example::new(vec![1.0, 1.0], vec![0.0]),
        ];
        Dataset { name: "xor".to_owned(), examples }
    }

    /// `samples` points of `y = slope·x + intercept + U(-noise, noise)` with
    /// `x` uniform on `[-1, 1]`.
    pub fn linear<R: Rng + ?Sized>(samples: usize, slope: f64, intercept: f64, noise: f64, rng: &mut R) -> Result<Dataset> {
        let examples = (0..samples)
            .map(|_| {
                let x = rng.gen_range(-1.0..=1.0);
                let jitter = if noise > 0.0 { rng.gen_range(-noise..=noise) } else { 0.0 };
                Example::new(vec![x], vec![slope * x + intercept + jitter])
            })
            .collect();
        Dataset::new("linear", examples)
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn get(&self, index: usize) -> Option<&Example> {
        self.examples.get(index)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.examples[0].inputs.len()
    }

    pub fn output_size(&self) -> usize {
        self.examples[0].targets.len()
    }
}

/// Serializable recipe for one of the built-in datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetKind {
    Xor,
    Linear {
        samples: usize,
        slope: f64,
        intercept: f64,
        noise: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for DatasetKind {
    fn default() -> Self {
        DatasetKind::Xor
    }
}

impl DatasetKind {
    /// The `y = 1.8x + 0.5` regression set used by the linear demo.
    pub fn default_linear() -> DatasetKind {
        DatasetKind::Linear { samples: 20, slope: 1.8, intercept: 0.5, noise: 0.1, seed: None }
    }

    pub fn build(&self) -> Result<Dataset> {
        match self {
            DatasetKind::Xor => Ok(Dataset::xor()),
            DatasetKind::Linear { samples, slope, intercept, noise, seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                Dataset::linear(*samples, *slope, *intercept, *noise, &mut rng)
            }
        }
    }
}
