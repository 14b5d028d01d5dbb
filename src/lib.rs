pub mod math;
pub mod activation;
pub mod data;
pub mod network;
pub mod train;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::sigmoid::{sigmoid, sigmoid_derivative};
pub use data::{load_from_path, load_from_reader, parse_lines, Dataset, Hyperparameters, LoadError, MalformedInputError, Record};
pub use network::{AccumulationMode, Network};
pub use train::{TrainConfig, TrainReport, TrainingDriver};
