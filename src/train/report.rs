use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::data::record::{write_summary, Record};
use crate::data::Hyperparameters;
use crate::network::AccumulationMode;

/// Why a run left the training state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    TargetReached,
    IterationCap,
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TargetReached => f.write_str("target accuracy reached"),
            StopReason::IterationCap => f.write_str("iteration cap reached"),
            StopReason::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A record as it looked after the final validation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    /// Position in the loaded data file, 0-based.
    pub index: usize,
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
    pub desired: Vec<f64>,
}

impl RecordSummary {
    pub fn new(index: usize, record: &Record) -> Self {
        RecordSummary {
            index,
            inputs: record.input_values().to_vec(),
            outputs: record.output().to_vec(),
            desired: record.desired().to_vec(),
        }
    }
}

impl fmt::Display for RecordSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_summary(f, &self.inputs, &self.outputs, &self.desired)
    }
}

/// Outcome of a finished run, measured on the validation partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainReport {
    /// Dimensions and learning rate of the trained network.
    pub hyperparameters: Hyperparameters,
    pub mode: AccumulationMode,
    pub iterations: usize,
    pub accuracy: f64,
    pub stop_reason: StopReason,
    /// Validation records with at least one wrong output.
    pub failed_records: Vec<RecordSummary>,
    /// Every validation record, in partition order.
    pub validation_records: Vec<RecordSummary>,
}

impl TrainReport {
    /// Writes the report as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

impl fmt::Display for TrainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Result:")?;
        writeln!(f, "Total Iterations:\t{}", self.iterations)?;
        writeln!(f, "Resulting Accuracy:\t{:.2} %", self.accuracy * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Sets the Neural Network Failed to evaluate correctly")?;
        if self.failed_records.is_empty() {
            writeln!(f, "None")?;
        }
        for record in &self.failed_records {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(failed_records: Vec<RecordSummary>) -> TrainReport {
        TrainReport {
            hyperparameters: Hyperparameters { num_inputs: 2, num_outputs: 1, num_hidden: 2, learning_rate: 0.5 },
            mode: AccumulationMode::Batch,
            iterations: 420,
            accuracy: 0.5,
            stop_reason: StopReason::IterationCap,
            failed_records,
            validation_records: Vec::new(),
        }
    }

    #[test]
    fn display_says_none_without_failures() {
        let text = report(Vec::new()).to_string();
        assert!(text.contains("Total Iterations:\t420"));
        assert!(text.contains("Resulting Accuracy:\t50.00 %"));
        assert!(text.ends_with("Sets the Neural Network Failed to evaluate correctly\nNone\n"));
    }

    #[test]
    fn display_lists_failed_records() {
        let failed = RecordSummary { index: 3, inputs: vec![1.0, 0.0], outputs: vec![0.5], desired: vec![1.0] };
        let text = report(vec![failed]).to_string();
        assert!(text.contains("Inputs:  \t[1.0, 0.0]\nOutputs:\t[0.50]\nDesired:\t[1.0]\n"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn serializes_to_json() {
        let value = serde_json::to_value(report(Vec::new())).unwrap();
        assert_eq!(value["iterations"], 420);
        assert_eq!(value["stop_reason"], "IterationCap");
        assert_eq!(value["mode"], "Batch");
        assert_eq!(value["hyperparameters"]["num_hidden"], 2);
        assert_eq!(value["hyperparameters"]["learning_rate"], 0.5);
    }

    #[test]
    fn save_json_writes_a_readable_file() {
        let path = std::env::temp_dir().join(format!("backprop-mlp-report-{}.json", std::process::id()));
        report(Vec::new()).save_json(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["accuracy"], 0.5);
    }
}
