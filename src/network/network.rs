use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::data::Example;
use crate::error::{NetworkError, Result};
use crate::loss::task_type::TaskType;
use crate::network::backward::backward;
use crate::network::config::{validate_learning_rate, NetworkConfig};
use crate::network::forward::{self, check_len, forward_unchecked, ForwardPass};
use crate::network::params::NetworkParams;
use crate::network::record::{AfterSection, BackwardSection, ForwardSection, TrainingStepRecord};
use crate::optim::sgd::Sgd;

/// A single-hidden-layer network trained one example at a time.
///
/// The engine owns its parameters outright. `weights()` hands out copies
/// and `set_weights()` takes ownership of what it installs, so no caller
/// ever aliases the live tensors. Every entry point validates dimensions
/// up front and leaves state untouched on error.
#[derive(Debug)]
pub struct Network {
    config: NetworkConfig,
    params: NetworkParams,
    optimizer: Sgd,
    rng: StdRng,
}

impl Network {
    /// Builds a network with freshly randomised parameters.
    pub fn new(config: NetworkConfig) -> Result<Network> {
        config.validate()?;
        let mut rng = seeded_rng(config.seed);
        let params = random_params(&config, &mut rng);
        info!(
            input = config.input_size,
            hidden = config.hidden_size,
            output = config.output_size,
            task = %config.task_type,
            "network initialised"
        );
        Ok(Network { optimizer: Sgd::new(config.learning_rate), config, params, rng })
    }

    /// Builds a network around known parameters instead of random ones.
    pub fn with_params(config: NetworkConfig, params: NetworkParams) -> Result<Network> {
        let mut network = Network::new(config)?;
        network.set_weights(params)?;
        Ok(network)
    }

    /// Replaces the whole configuration and reinitialises every parameter.
    /// On error the network keeps its previous configuration and weights.
    pub fn reconfigure(&mut self, config: NetworkConfig) -> Result<()> {
        config.validate()?;
        if config.seed.is_some() || config.seed != self.config.seed {
            self.rng = seeded_rng(config.seed);
        }
        self.optimizer = Sgd::new(config.learning_rate);
        self.config = config;
        self.params = random_params(&self.config, &mut self.rng);
        info!(
            hidden = self.config.hidden_size,
            learning_rate = self.config.learning_rate,
            task = %self.config.task_type,
            "network reconfigured"
        );
        Ok(())
    }

    /// Draws new random parameters. With a configured seed the same initial
    /// parameters come back every time.
    pub fn reset(&mut self) {
        if let Some(seed) = self.config.seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
        self.params = random_params(&self.config, &mut self.rng);
        info!("network parameters reset");
    }

    /// Output activations for `inputs`. Pure: parameters are not touched.
    pub fn predict(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        Ok(self.forward(inputs)?.output_post)
    }

    /// Like `predict`, but keeps every intermediate activation.
    pub fn forward(&self, inputs: &[f64]) -> Result<ForwardPass> {
        self.check_inputs(inputs)?;
        Ok(forward_unchecked(&self.params, self.config.task_type, inputs))
    }

    /// One forward pass, backward pass, and gradient-descent update on a
    /// single example.
    ///
    /// All gradients are computed from the pre-update parameters before any
    /// of them change. The returned record holds the parameters on both
    /// sides of the update.
    pub fn train_step(&mut self, inputs: &[f64], targets: &[f64]) -> Result<TrainingStepRecord> {
        self.check_inputs(inputs)?;
        if let Err(e) = check_len("targets", targets, self.config.output_size) {
            warn!(error = %e, "rejected training targets");
            return Err(e);
        }

        let task = self.config.task_type;
        let before = self.params.clone();
        let pass = forward_unchecked(&before, task, inputs);
        let grads = backward(&before, task, inputs, &pass, targets);
        let after = self.optimizer.step(&before, &grads.params);

        debug!(loss = grads.loss, "training step");
        self.params = after.clone();

        let NetworkParams { weights1, biases1, weights2, biases2 } = before;
        let ForwardPass { hidden_pre, hidden_post, output_pre, output_post } = pass;
        let gradients = grads.params;

        Ok(TrainingStepRecord {
            learning_rate: self.optimizer.learning_rate,
            forward: ForwardSection {
                inputs: inputs.to_vec(),
                hidden_pre,
                hidden_post,
                output_pre,
                output_post,
                weights1,
                biases1,
                weights2,
                biases2,
            },
            backward: BackwardSection {
                targets: targets.to_vec(),
                loss: grads.loss,
                output_gradients: grads.output_gradients,
                hidden_gradients: grads.hidden_gradients,
                weights1_gradients: gradients.weights1,
                biases1_gradients: gradients.biases1,
                weights2_gradients: gradients.weights2,
                biases2_gradients: gradients.biases2,
            },
            after: AfterSection::from(after),
        })
    }

    /// Mean loss of the current parameters over `examples`.
    pub fn mean_loss(&self, examples: &[Example]) -> Result<f64> {
        forward::evaluate_loss(&self.params, self.config.task_type, examples)
    }

    /// A copy of the current parameters.
    pub fn weights(&self) -> NetworkParams {
        self.params.clone()
    }

    /// Installs `params` after checking they match the architecture exactly.
    pub fn set_weights(&mut self, params: NetworkParams) -> Result<()> {
        let c = &self.config;
        if let Err(e) = params.check_shape(c.input_size, c.hidden_size, c.output_size) {
            warn!(error = %e, "rejected weights");
            return Err(e);
        }
        self.params = params;
        Ok(())
    }

    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate
    }

    /// Affects only subsequent steps; parameters are left alone.
    pub fn set_learning_rate(&mut self, rate: f64) -> Result<()> {
        validate_learning_rate(rate)?;
        self.optimizer.learning_rate = rate;
        self.config.learning_rate = rate;
        info!(learning_rate = rate, "learning rate changed");
        Ok(())
    }

    pub fn task_type(&self) -> TaskType {
        self.config.task_type
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    fn check_inputs(&self, inputs: &[f64]) -> Result<()> {
        check_len("inputs", inputs, self.config.input_size).map_err(|e: NetworkError| {
            warn!(error = %e, "rejected inputs");
            e
        })
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn random_params(config: &NetworkConfig, rng: &mut StdRng) -> NetworkParams {
    NetworkParams::random(config.input_size, config.hidden_size, config.output_size, rng)
}
