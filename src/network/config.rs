use serde::{Serialize, Deserialize};

use crate::error::{NetworkError, Result};
use crate::loss::task_type::TaskType;

/// Everything needed to build (or rebuild) a `Network`.
///
/// Fields:
/// - `input_size`    — length of every input vector
/// - `hidden_size`   — number of sigmoid units in the single hidden layer
/// - `output_size`   — length of every target vector
/// - `learning_rate` — step size for vanilla gradient descent
/// - `task_type`     — classification (sigmoid + BCE) or regression (linear + ½MSE)
/// - `seed`          — when set, parameter initialisation is reproducible
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub learning_rate: f64,
    pub task_type: TaskType,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            input_size: 2,
            hidden_size: 6,
            output_size: 1,
            learning_rate: 0.05,
            task_type: TaskType::Classification,
            seed: None,
        }
    }
}

impl NetworkConfig {
    pub fn new(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f64,
        task_type: TaskType,
    ) -> Self {
        NetworkConfig { input_size, hidden_size, output_size, learning_rate, task_type, seed: None }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects configurations that are programmer errors rather than data issues.
    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
        ] {
            if size == 0 {
                return Err(NetworkError::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        validate_learning_rate(self.learning_rate)
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a config from a JSON file.
    pub fn load_json(path: &str) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: NetworkConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

pub(crate) fn validate_learning_rate(rate: f64) -> Result<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidConfig(format!("learning_rate must be positive and finite, got {rate}")))
    }
}
