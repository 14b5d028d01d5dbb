use serde::Serialize;
use std::fmt;

/// Network dimensions and learning rate declared at the top of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hyperparameters {
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_hidden: usize,
    pub learning_rate: f64,
}

/// One of the four hyperparameter markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hyperparameter {
    NumInput,
    NumOutput,
    NumHidden,
    LearningRate,
}

impl Hyperparameter {
    pub fn marker(self) -> &'static str {
        match self {
            Hyperparameter::NumInput => "NUM_INPUT",
            Hyperparameter::NumOutput => "NUM_OUTPUT",
            Hyperparameter::NumHidden => "NUM_HIDDEN",
            Hyperparameter::LearningRate => "LEARNING_RATE",
        }
    }
}

impl fmt::Display for Hyperparameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Hyperparameters collected so far while scanning. A field stays `None`
/// until its marker and value line have been read.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct PartialHyperparameters {
    pub num_inputs: Option<usize>,
    pub num_outputs: Option<usize>,
    pub num_hidden: Option<usize>,
    pub learning_rate: Option<f64>,
}

impl PartialHyperparameters {
    pub fn complete(&self) -> Option<Hyperparameters> {
        Some(Hyperparameters {
            num_inputs: self.num_inputs?,
            num_outputs: self.num_outputs?,
            num_hidden: self.num_hidden?,
            learning_rate: self.learning_rate?,
        })
    }
}
