pub mod error;
pub mod hyperparameters;
pub mod parser;
pub mod record;

pub use error::{LoadError, MalformedInputError, MalformedKind, MissingData, Section};
pub use hyperparameters::{Hyperparameter, Hyperparameters};
pub use parser::{load_from_path, load_from_reader, parse_lines, Dataset};
pub use record::Record;
