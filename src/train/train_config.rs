use std::sync::{Arc, atomic::AtomicBool};

use crate::network::AccumulationMode;

/// Generalization accuracy at which training stops.
pub const DESIRED_ACCURACY: f64 = 0.9999;
/// Epoch cap for a single run.
pub const MAX_ITERATIONS: usize = 100_000;

/// Configuration for a `TrainingDriver` run.
///
/// # Fields
/// - `mode`            — batch or online (momentum) accumulation
/// - `split_data_sets` — partition records into training, generalization
///                       and validation subsets instead of using all records
///                       for each
/// - `target_accuracy` — stop once generalization accuracy reaches this
/// - `max_iterations`  — stop after this many epochs
/// - `stop_flag`       — optional atomic flag; when set to `true` the run
///                       stops at the next epoch boundary.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub mode: AccumulationMode,
    pub split_data_sets: bool,
    pub target_accuracy: f64,
    pub max_iterations: usize,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a `TrainConfig` with the default stopping criteria and no stop flag.
    pub fn new(mode: AccumulationMode, split_data_sets: bool) -> Self {
        TrainConfig {
            mode,
            split_data_sets,
            target_accuracy: DESIRED_ACCURACY,
            max_iterations: MAX_ITERATIONS,
            stop_flag: None,
        }
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(AccumulationMode::Online, false)
    }
}
