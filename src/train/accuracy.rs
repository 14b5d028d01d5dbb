use crate::data::Record;
use crate::network::Network;

/// Activations below this count as 0.
pub const CLAMP_LOW: f64 = 0.1;
/// Activations above this count as 1.
pub const CLAMP_HIGH: f64 = 0.9;

/// Snaps an activation to 0 or 1. Ambiguous activations map to `None`, which
/// never equals a desired value.
pub fn clamp(value: f64) -> Option<f64> {
    if value < CLAMP_LOW {
        Some(0.0)
    } else if value > CLAMP_HIGH {
        Some(1.0)
    } else {
        None
    }
}

/// Result of evaluating a partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Accuracy {
    /// Fraction of output units, over the whole partition, whose clamped
    /// activation equals the desired value.
    pub accuracy: f64,
    /// Record indices with at least one mismatched output unit.
    pub failed: Vec<usize>,
}

/// Runs every record of `partition` forward and scores its outputs.
pub fn calc_accuracy(network: &Network, records: &mut [Record], partition: &[usize]) -> Accuracy {
    let mut correct = 0usize;
    let mut failed = Vec::new();

    for &index in partition {
        let record = &mut records[index];
        network.process(record);
        let matches = record.output().iter()
            .zip(record.desired().iter())
            .filter(|&(&output, &desired)| clamp(output) == Some(desired))
            .count();
        correct += matches;
        if matches != record.desired().len() {
            failed.push(index);
        }
    }

    let total = partition.len() * network.num_outputs;
    let accuracy = if total == 0 { 0.0 } else { correct as f64 / total as f64 };
    Accuracy { accuracy, failed }
}
