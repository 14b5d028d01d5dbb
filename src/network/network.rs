use rand::Rng;

use crate::activation::sigmoid::{sigmoid, sigmoid_derivative};
use crate::data::{Hyperparameters, Record};
use crate::math::matrix::Matrix;
use crate::network::mode::AccumulationMode;

/// Single-hidden-layer perceptron with per-weight error offsets.
///
/// Weight rows are origin units and columns destination units; the last row
/// of each matrix holds the bias weights.
#[derive(Debug, Clone)]
pub struct Network {
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_hidden: usize,
    pub learning_rate: f64,
    pub mode: AccumulationMode,
    weights_input_hidden: Matrix,
    weights_hidden_output: Matrix,
    offsets_input_hidden: Matrix,
    offsets_hidden_output: Matrix,
}

impl Network {
    /// Builds a network around the given weights. Panics if either matrix does
    /// not have the `(origin + 1) x destination` shape the hyperparameters imply.
    pub fn new(
        hyperparameters: Hyperparameters,
        mode: AccumulationMode,
        weights_input_hidden: Matrix,
        weights_hidden_output: Matrix,
    ) -> Network {
        let Hyperparameters { num_inputs, num_outputs, num_hidden, learning_rate } = hyperparameters;
        assert_eq!(
            weights_input_hidden.shape(),
            (num_inputs + 1, num_hidden),
            "input->hidden weights have the wrong shape"
        );
        assert_eq!(
            weights_hidden_output.shape(),
            (num_hidden + 1, num_outputs),
            "hidden->output weights have the wrong shape"
        );

        Network {
            num_inputs,
            num_outputs,
            num_hidden,
            learning_rate,
            mode,
            weights_input_hidden,
            weights_hidden_output,
            offsets_input_hidden: Matrix::zeros(num_inputs + 1, num_hidden),
            offsets_hidden_output: Matrix::zeros(num_hidden + 1, num_outputs),
        }
    }

    /// Builds a network with both weight matrices drawn uniformly from [-0.5, 0.5).
    pub fn with_random_weights<R: Rng + ?Sized>(
        hyperparameters: Hyperparameters,
        mode: AccumulationMode,
        rng: &mut R,
    ) -> Network {
        let weights_input_hidden =
            Matrix::random(hyperparameters.num_inputs + 1, hyperparameters.num_hidden, rng);
        let weights_hidden_output =
            Matrix::random(hyperparameters.num_hidden + 1, hyperparameters.num_outputs, rng);
        Network::new(hyperparameters, mode, weights_input_hidden, weights_hidden_output)
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters {
            num_inputs: self.num_inputs,
            num_outputs: self.num_outputs,
            num_hidden: self.num_hidden,
            learning_rate: self.learning_rate,
        }
    }

    pub fn weights_input_hidden(&self) -> &Matrix { &self.weights_input_hidden }

    pub fn weights_hidden_output(&self) -> &Matrix { &self.weights_hidden_output }

    pub fn offsets_input_hidden(&self) -> &Matrix { &self.offsets_input_hidden }

    pub fn offsets_hidden_output(&self) -> &Matrix { &self.offsets_hidden_output }

    /// Forward pass; overwrites the record's scratch values, weights are untouched.
    pub fn process(&self, record: &mut Record) {
        record.reset(self.num_hidden, self.num_outputs);
        feed_forward(
            &record.input,
            &mut record.hidden_raw,
            &mut record.hidden,
            &self.weights_input_hidden,
        );
        feed_forward(
            &record.hidden,
            &mut record.output_raw,
            &mut record.output,
            &self.weights_hidden_output,
        );
    }

    /// Computes error deltas for a record that has just been through
    /// [`Network::process`] and folds the resulting contributions into the
    /// offset matrices according to `mode`.
    pub fn back_propagate(&mut self, record: &Record) {
        let output_deltas: Vec<f64> = record.output_raw.iter()
            .zip(record.output.iter())
            .zip(record.desired().iter())
            .map(|((&raw, &actual), &desired)| sigmoid_derivative(raw) * (desired - actual))
            .collect();

        let hidden_deltas: Vec<f64> = record.hidden_raw.iter()
            .enumerate()
            .map(|(h, &raw)| {
                let weighted: f64 = output_deltas.iter()
                    .enumerate()
                    .map(|(o, delta)| self.weights_hidden_output[(h, o)] * delta)
                    .sum();
                sigmoid_derivative(raw) * weighted
            })
            .collect();

        accumulate_offsets(
            &mut self.offsets_input_hidden,
            record.input(),
            &hidden_deltas,
            self.learning_rate,
            self.mode,
        );
        accumulate_offsets(
            &mut self.offsets_hidden_output,
            record.hidden(),
            &output_deltas,
            self.learning_rate,
            self.mode,
        );
    }

    /// Adds the offsets into the weights. Batch offsets are cleared afterwards;
    /// online offsets are kept as the momentum term of the next record.
    pub fn update_weights(&mut self) {
        self.weights_input_hidden += &self.offsets_input_hidden;
        self.weights_hidden_output += &self.offsets_hidden_output;

        if self.mode == AccumulationMode::Batch {
            self.offsets_input_hidden.clear();
            self.offsets_hidden_output.clear();
        }
    }
}

/// Fills `raw` and the matching leading slots of `activated` from `feed`.
/// A trailing bias slot in `activated` is left as is.
fn feed_forward(feed: &[f64], raw: &mut [f64], activated: &mut [f64], weights: &Matrix) {
    for (dest, raw_value) in raw.iter_mut().enumerate() {
        let sum: f64 = feed.iter()
            .enumerate()
            .map(|(origin, value)| value * weights[(origin, dest)])
            .sum();
        *raw_value = sum;
        activated[dest] = sigmoid(sum);
    }
}

fn accumulate_offsets(
    offsets: &mut Matrix,
    origin: &[f64],
    deltas: &[f64],
    learning_rate: f64,
    mode: AccumulationMode,
) {
    for (o, value) in origin.iter().enumerate() {
        for (d, delta) in deltas.iter().enumerate() {
            let contribution = learning_rate * value * delta;
            offsets[(o, d)] = mode.accumulate(offsets[(o, d)], contribution);
        }
    }
}
