use std::collections::VecDeque;

use tracing::{debug, info};

use crate::data::dataset::Dataset;
use crate::error::{NetworkError, Result};
use crate::network::config::NetworkConfig;
use crate::network::network::Network;
use crate::network::params::NetworkParams;
use crate::network::record::TrainingStepRecord;
use crate::train::step_stats::StepStats;

/// Default number of `StepStats` the driver keeps.
pub const MAX_HISTORY: usize = 10_000;

/// Feeds a dataset to a network one example per step, round-robin.
///
/// The driver is the only thing that calls `Network::train_step`; it keeps
/// the step counter, the loss history, and the most recent step record.
/// Reset and reconfiguration wipe all three along with the parameters.
///
/// The history is bounded: once it holds `history_limit` entries the oldest
/// is dropped for every new step. Step numbers are never renumbered.
#[derive(Debug)]
pub struct TrainingDriver {
    network: Network,
    dataset: Dataset,
    cursor: usize,
    step_count: usize,
    history: VecDeque<StepStats>,
    history_limit: usize,
    last_record: Option<TrainingStepRecord>,
}

impl TrainingDriver {
    /// Pairs `network` with `dataset`; their sizes must agree.
    pub fn new(network: Network, dataset: Dataset) -> Result<TrainingDriver> {
        check_compatible(network.config(), &dataset)?;
        Ok(TrainingDriver {
            network,
            dataset,
            cursor: 0,
            step_count: 0,
            history: VecDeque::new(),
            history_limit: MAX_HISTORY,
            last_record: None,
        })
    }

    /// Convenience constructor building the network from `config`.
    pub fn from_config(config: NetworkConfig, dataset: Dataset) -> Result<TrainingDriver> {
        TrainingDriver::new(Network::new(config)?, dataset)
    }

    /// Trains on the example under the cursor, then advances the cursor.
    pub fn step(&mut self) -> Result<&TrainingStepRecord> {
        let index = self.cursor;
        let example = self.dataset.get(index).ok_or(NetworkError::EmptyDataset)?;
        let record = self.network.train_step(&example.inputs, &example.targets)?;

        self.cursor = (self.cursor + 1) % self.dataset.len();
        self.step_count += 1;
        self.history.push_back(StepStats {
            step: self.step_count,
            loss: record.backward.loss,
            example_index: index,
        });
        if self.history.len() > self.history_limit {
            self.history.pop_front();
        }
        debug!(step = self.step_count, example = index, loss = record.backward.loss, "driver step");

        Ok(&*self.last_record.insert(record))
    }

    /// Runs `steps` steps and returns the stats of the last one.
    pub fn run(&mut self, steps: usize) -> Result<Option<StepStats>> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(self.history.back().cloned())
    }

    /// New random parameters; counters, history, and cursor back to zero.
    pub fn reset(&mut self) {
        self.network.reset();
        self.clear_progress();
    }

    /// Rebuilds the network from `config` and clears all progress.
    pub fn reconfigure(&mut self, config: NetworkConfig) -> Result<()> {
        config.validate()?;
        check_compatible(&config, &self.dataset)?;
        self.network.reconfigure(config)?;
        self.clear_progress();
        Ok(())
    }

    /// Swaps in another dataset and a matching config in one go.
    pub fn replace(&mut self, config: NetworkConfig, dataset: Dataset) -> Result<()> {
        check_replacement(&config, &dataset)?;
        self.network.reconfigure(config)?;
        self.dataset = dataset;
        self.clear_progress();
        info!(dataset = %self.dataset.name, examples = self.dataset.len(), "dataset replaced");
        Ok(())
    }

    /// Swaps in another dataset of the same shape; parameters are kept and
    /// the cursor rewinds to the first example.
    pub fn set_dataset(&mut self, dataset: Dataset) -> Result<()> {
        check_compatible(self.network.config(), &dataset)?;
        self.dataset = dataset;
        self.cursor = 0;
        info!(dataset = %self.dataset.name, examples = self.dataset.len(), "dataset set");
        Ok(())
    }

    pub fn set_learning_rate(&mut self, rate: f64) -> Result<()> {
        self.network.set_learning_rate(rate)
    }

    /// Installs parameters; progress counters are kept.
    pub fn set_weights(&mut self, params: NetworkParams) -> Result<()> {
        self.network.set_weights(params)
    }

    /// Mean loss of the current parameters over the whole dataset.
    pub fn mean_loss(&self) -> Result<f64> {
        self.network.mean_loss(self.dataset.examples())
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// The most recent `history_limit` step summaries, oldest first.
    pub fn history(&self) -> &VecDeque<StepStats> {
        &self.history
    }

    /// History entries for steps numbered above `step`.
    pub fn history_after(&self, step: usize) -> impl Iterator<Item = &StepStats> + '_ {
        self.history.iter().skip_while(move |s| s.step <= step)
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Changes the history bound, dropping the oldest entries if needed.
    /// The latest step is always kept, so the bound is at least one.
    pub fn set_history_limit(&mut self, limit: usize) {
        self.history_limit = limit.max(1);
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }

    /// `None` until the first step after construction or reset.
    pub fn last_record(&self) -> Option<&TrainingStepRecord> {
        self.last_record.as_ref()
    }

    fn clear_progress(&mut self) {
        self.cursor = 0;
        self.step_count = 0;
        self.history.clear();
        self.last_record = None;
    }
}

/// Checks that `config` is valid and fits `dataset`, without touching any
/// driver. `replace` runs the same check before changing anything.
pub fn check_replacement(config: &NetworkConfig, dataset: &Dataset) -> Result<()> {
    config.validate()?;
    check_compatible(config, dataset)
}

fn check_compatible(config: &NetworkConfig, dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        return Err(NetworkError::EmptyDataset);
    }
    if dataset.input_size() != config.input_size {
        return Err(NetworkError::DimensionMismatch {
            what: "dataset inputs",
            expected: config.input_size,
            found: dataset.input_size(),
        });
    }
    if dataset.output_size() != config.output_size {
        return Err(NetworkError::DimensionMismatch {
            what: "dataset targets",
            expected: config.output_size,
            found: dataset.output_size(),
        });
    }
    Ok(())
}
