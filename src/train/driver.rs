use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::data::{Dataset, Record};
use crate::network::{AccumulationMode, Network};
use crate::train::accuracy::calc_accuracy;
use crate::train::epoch_stats::EpochStats;
use crate::train::partition::{assign_data_sets, Partitions};
use crate::train::report::{RecordSummary, StopReason, TrainReport};
use crate::train::train_config::TrainConfig;

/// Where a [`TrainingDriver`] is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    Training,
    Done(StopReason),
}

/// Owns a network and its records and runs the epoch loop.
///
/// Construction measures the untrained network (iteration 0). Each
/// [`step`](TrainingDriver::step) runs one epoch over the training partition
/// and re-measures the generalization partition; [`finish`](TrainingDriver::finish)
/// scores the validation partition.
#[derive(Debug)]
pub struct TrainingDriver {
    network: Network,
    records: Vec<Record>,
    partitions: Partitions,
    config: TrainConfig,
    state: TrainingState,
    iterations: usize,
    accuracy: f64,
    failed: Vec<usize>,
}

impl TrainingDriver {
    /// Partitions the records, then builds a randomly initialized network,
    /// both from `rng`.
    pub fn new<R: Rng + ?Sized>(dataset: Dataset, config: TrainConfig, rng: &mut R) -> TrainingDriver {
        let partitions = assign_data_sets(dataset.records.len(), config.split_data_sets, rng);
        let network = Network::with_random_weights(dataset.hyperparameters, config.mode, rng);
        TrainingDriver::from_parts(network, dataset.records, partitions, config)
    }

    /// Builds a driver around an existing network and partitioning.
    pub fn from_parts(
        network: Network,
        records: Vec<Record>,
        partitions: Partitions,
        config: TrainConfig,
    ) -> TrainingDriver {
        info!(
            "training on {} records ({} training, {} generalization, {} validation), {:?} mode",
            records.len(),
            partitions.training.len(),
            partitions.generalization.len(),
            partitions.validation.len(),
            config.mode,
        );
        let mut driver = TrainingDriver {
            network,
            records,
            partitions,
            config,
            state: TrainingState::Training,
            iterations: 0,
            accuracy: 0.0,
            failed: Vec::new(),
        };
        driver.measure_generalization();
        driver.check_stop();
        driver
    }

    pub fn state(&self) -> TrainingState { self.state }

    pub fn iterations(&self) -> usize { self.iterations }

    /// Latest generalization accuracy.
    pub fn accuracy(&self) -> f64 { self.accuracy }

    /// Records that failed the latest measurement: generalization indices
    /// while training, validation indices once [`finish`](TrainingDriver::finish) has run.
    pub fn failed(&self) -> &[usize] { &self.failed }

    pub fn network(&self) -> &Network { &self.network }

    pub fn partitions(&self) -> &Partitions { &self.partitions }

    /// Statistics for the current iteration without running an epoch.
    pub fn current_stats(&self) -> EpochStats {
        EpochStats {
            iteration: self.iterations,
            accuracy: self.accuracy,
            failed_records: self.failed.len(),
            elapsed_ms: 0,
        }
    }

    /// Runs one epoch and returns its statistics, or `None` once the run is done.
    pub fn step(&mut self) -> Option<EpochStats> {
        if self.state != TrainingState::Training {
            return None;
        }
        if self.cancel_requested() {
            info!("stop requested after {} iterations", self.iterations);
            self.state = TrainingState::Done(StopReason::Cancelled);
            return None;
        }

        let t_start = Instant::now();
        self.run_one_epoch();
        self.measure_generalization();
        self.iterations += 1;
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        let stats = EpochStats { elapsed_ms, ..self.current_stats() };
        debug!("{stats}");
        self.check_stop();
        Some(stats)
    }

    /// Runs epochs until a stop condition holds and returns the final report.
    /// `on_epoch` sees iteration 0 first and then every completed epoch.
    pub fn run<F: FnMut(&EpochStats)>(mut self, mut on_epoch: F) -> TrainReport {
        on_epoch(&self.current_stats());
        while let Some(stats) = self.step() {
            on_epoch(&stats);
        }
        self.finish()
    }

    /// Scores the validation partition and builds the final report.
    pub fn finish(&mut self) -> TrainReport {
        let stop_reason = match self.state {
            TrainingState::Done(reason) => reason,
            TrainingState::Training => StopReason::Cancelled,
        };
        self.state = TrainingState::Done(stop_reason);

        let validation = calc_accuracy(&self.network, &mut self.records, &self.partitions.validation);
        self.accuracy = validation.accuracy;
        info!(
            "finished after {} iterations ({}): validation accuracy {:.2} %",
            self.iterations,
            stop_reason,
            validation.accuracy * 100.0,
        );

        let summarize = |index: usize| RecordSummary::new(index, &self.records[index]);
        let failed_records = validation.failed.iter().copied().map(summarize).collect();
        let validation_records = self.partitions.validation.iter().copied().map(summarize).collect();
        self.failed = validation.failed;

        TrainReport {
            hyperparameters: self.network.hyperparameters(),
            mode: self.config.mode,
            iterations: self.iterations,
            accuracy: validation.accuracy,
            stop_reason,
            failed_records,
            validation_records,
        }
    }

    fn run_one_epoch(&mut self) {
        let online = self.config.mode == AccumulationMode::Online;
        for &index in &self.partitions.training {
            let record = &mut self.records[index];
            self.network.process(record);
            self.network.back_propagate(record);
            if online {
                self.network.update_weights();
            }
        }
        if !online {
            self.network.update_weights();
        }
    }

    fn measure_generalization(&mut self) {
        let result = calc_accuracy(&self.network, &mut self.records, &self.partitions.generalization);
        self.accuracy = result.accuracy;
        self.failed = result.failed;
    }

    fn cancel_requested(&self) -> bool {
        self.config.stop_flag.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn check_stop(&mut self) {
        if self.accuracy >= self.config.target_accuracy {
            info!("accuracy {:.2} % reached target after {} iterations", self.accuracy * 100.0, self.iterations);
            self.state = TrainingState::Done(StopReason::TargetReached);
        } else if self.iterations >= self.config.max_iterations {
            info!("reached maximum number of iterations ({})", self.config.max_iterations);
            self.state = TrainingState::Done(StopReason::IterationCap);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_lines, Hyperparameters};
    use crate::math::Matrix;
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::{atomic::AtomicBool, Arc};

    const XOR: &str = "NUM_INPUT\n2\nNUM_OUTPUT\n1\nNUM_HIDDEN\n2\nLEARNING_RATE\n0.5\n\
        DATA_SET\nINPUT\n0,0\nDESIRED_OUTPUT\n0\n\
        DATA_SET\nINPUT\n0,1\nDESIRED_OUTPUT\n1\n\
        DATA_SET\nINPUT\n1,0\nDESIRED_OUTPUT\n1\n\
        DATA_SET\nINPUT\n1,1\nDESIRED_OUTPUT\n0\n";

    fn xor_dataset() -> Dataset {
        parse_lines(XOR.lines()).unwrap()
    }

    fn capped(mode: AccumulationMode, max_iterations: usize) -> TrainConfig {
        TrainConfig { max_iterations, target_accuracy: 2.0, ..TrainConfig::new(mode, false) }
    }

    #[test]
    fn construction_measures_iteration_zero() {
        let driver = TrainingDriver::new(xor_dataset(), TrainConfig::default(), &mut StdRng::seed_from_u64(1));
        assert_eq!(driver.iterations(), 0);
        assert_eq!(driver.current_stats().iteration, 0);
        assert!((0.0..=1.0).contains(&driver.accuracy()));
        assert_eq!(driver.partitions(), &Partitions::unsplit(4));
    }

    #[test]
    fn zero_iteration_cap_stops_immediately() {
        let mut driver = TrainingDriver::new(
            xor_dataset(),
            capped(AccumulationMode::Online, 0),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(driver.state(), TrainingState::Done(StopReason::IterationCap));
        assert!(driver.step().is_none());
    }

    #[test]
    fn run_reports_every_epoch_up_to_the_cap() {
        let driver = TrainingDriver::new(
            xor_dataset(),
            capped(AccumulationMode::Online, 3),
            &mut StdRng::seed_from_u64(2),
        );
        let mut seen = Vec::new();
        let report = driver.run(|stats| seen.push(stats.iteration));
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.stop_reason, StopReason::IterationCap);
        assert_eq!(report.validation_records.len(), 4);
        assert_eq!(report.mode, AccumulationMode::Online);
        assert_eq!(report.hyperparameters.num_hidden, 2);
    }

    #[test]
    fn batch_epoch_leaves_offsets_cleared() {
        let mut driver = TrainingDriver::new(
            xor_dataset(),
            capped(AccumulationMode::Batch, 5),
            &mut StdRng::seed_from_u64(4),
        );
        let before = driver.network().weights_hidden_output().clone();
        driver.step().unwrap();
        assert_eq!(driver.network().offsets_input_hidden(), &Matrix::zeros(3, 2));
        assert_eq!(driver.network().offsets_hidden_output(), &Matrix::zeros(3, 1));
        assert_ne!(driver.network().weights_hidden_output(), &before);
    }

    #[test]
    fn online_epoch_updates_weights_after_every_record() {
        let network = Network::with_random_weights(
            Hyperparameters { num_inputs: 2, num_outputs: 1, num_hidden: 2, learning_rate: 0.5 },
            AccumulationMode::Online,
            &mut StdRng::seed_from_u64(8),
        );
        let records = vec![
            Record::new(vec![0.0, 1.0], vec![1.0], 2),
            Record::new(vec![1.0, 1.0], vec![0.0], 2),
        ];
        let partitions = Partitions { training: vec![0, 1], ..Partitions::unsplit(2) };

        let mut per_record = network.clone();
        let mut replayed = records.clone();
        for record in &mut replayed {
            per_record.process(record);
            per_record.back_propagate(record);
            per_record.update_weights();
        }

        let mut end_of_pass = network.clone();
        let mut replayed = records.clone();
        for record in &mut replayed {
            end_of_pass.process(record);
            end_of_pass.back_propagate(record);
        }
        end_of_pass.update_weights();

        let mut driver = TrainingDriver::from_parts(
            network,
            records,
            partitions,
            capped(AccumulationMode::Online, 5),
        );
        driver.step().unwrap();
        let trained = driver.network();
        assert_eq!(trained.weights_input_hidden(), per_record.weights_input_hidden());
        assert_eq!(trained.weights_hidden_output(), per_record.weights_hidden_output());
        assert_ne!(trained.weights_hidden_output(), end_of_pass.weights_hidden_output());
    }

    #[test]
    fn stop_flag_cancels_at_epoch_boundary() {
        let flag = Arc::new(AtomicBool::new(false));
        let config = TrainConfig { stop_flag: Some(flag.clone()), ..capped(AccumulationMode::Online, 100) };
        let mut driver = TrainingDriver::new(xor_dataset(), config, &mut StdRng::seed_from_u64(5));
        assert!(driver.step().is_some());
        flag.store(true, Ordering::Relaxed);
        assert!(driver.step().is_none());
        assert_eq!(driver.state(), TrainingState::Done(StopReason::Cancelled));
        let report = driver.finish();
        assert_eq!(report.iterations, 1);
        assert_eq!(report.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn already_correct_network_stops_without_training() {
        // Output is sigmoid(-10) for every input, so a data set of all-zero
        // targets is classified perfectly before any epoch.
        let hyper = Hyperparameters { num_inputs: 1, num_outputs: 1, num_hidden: 1, learning_rate: 0.5 };
        let network = Network::new(
            hyper,
            AccumulationMode::Online,
            Matrix::zeros(2, 1),
            Matrix::from_data(vec![vec![0.0], vec![-10.0]]),
        );
        let records = vec![Record::new(vec![0.0], vec![0.0], 1), Record::new(vec![1.0], vec![0.0], 1)];
        let driver = TrainingDriver::from_parts(network, records, Partitions::unsplit(2), TrainConfig::default());
        assert_eq!(driver.state(), TrainingState::Done(StopReason::TargetReached));

        let report = driver.run(|_| {});
        assert_eq!(report.iterations, 0);
        assert_eq!(report.accuracy, 1.0);
        assert!(report.failed_records.is_empty());
    }

    #[test]
    fn split_driver_uses_disjoint_partitions() {
        let mut dataset = xor_dataset();
        dataset.records.truncate(3);
        let config = TrainConfig::new(AccumulationMode::Online, true);
        let driver = TrainingDriver::new(dataset, config, &mut StdRng::seed_from_u64(6));
        let p = driver.partitions();
        assert!(p.split);
        let mut all = [p.training.clone(), p.generalization.clone(), p.validation.clone()].concat();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2]);
    }
}
