use std::convert::Infallible;
use std::fmt::Display;
use std::path::PathBuf;

use backprop_mlp::train::train_config::{DESIRED_ACCURACY, MAX_ITERATIONS};
use backprop_mlp::{AccumulationMode, TrainConfig};
use clap::{ArgAction, Parser, ValueEnum};
use env_logger::Env;
use log::{error, log_enabled, warn, Level};

/// Train a single-hidden-layer perceptron on a marker-based data file.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// path to the data file
    pub input_file: PathBuf,

    /// split the data sets into training, generalization and validation subsets
    #[arg(default_value_t = false, action = ArgAction::Set, value_parser = parse_split)]
    pub split: bool,

    /// accumulate weight offsets over the whole epoch instead of updating after every data set
    #[arg(long, default_value_t = false)]
    pub batch: bool,

    /// seed for weight initialization and data set splitting, random if omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// generalization accuracy (fraction) at which training stops
    #[arg(long, default_value_t = DESIRED_ACCURACY)]
    pub target_accuracy: f64,

    /// max number of training iterations
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// print every validation data set after the final result
    #[arg(long, default_value_t = false)]
    pub show_validation: bool,

    /// file where the final report will be written as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// level of logging details (into stderr)
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn train_config(&self) -> TrainConfig {
        let mode = if self.batch { AccumulationMode::Batch } else { AccumulationMode::Online };
        TrainConfig {
            target_accuracy: self.target_accuracy,
            max_iterations: self.max_iterations,
            ..TrainConfig::new(mode, self.split)
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

/// `true` in any letter case enables splitting; every other value disables it.
fn parse_split(value: &str) -> Result<bool, Infallible> {
    Ok(value.eq_ignore_ascii_case("true"))
}

/// Reports a fatal error and exits with status 1. The message goes through
/// the logger when it is enabled and straight to stderr otherwise.
pub fn fail(message: impl Display) -> ! {
    if log_enabled!(Level::Error) {
        error!("{}", message);
    } else {
        eprintln!("{}", message);
    }
    std::process::exit(1);
}

/// Parses the command line and sets up logging.
pub fn init() -> Cli {
    let mut cli = Cli::parse();
    let loglevel = match cli.log_level {
        LogLevel::Warn => "off,backprop_mlp=warn",
        LogLevel::Info => "off,backprop_mlp=info",
        LogLevel::Error => "off,backprop_mlp=error",
        LogLevel::Debug => "off,backprop_mlp=debug",
        LogLevel::Trace => "off,backprop_mlp=trace",
        LogLevel::Off => "off",
    };
    env_logger::init_from_env(Env::default().default_filter_or(loglevel));
    if !(cli.target_accuracy > 0.0 && cli.target_accuracy <= 1.0) {
        cli.target_accuracy = DESIRED_ACCURACY;
        warn!("Target accuracy must be in (0, 1], overwriting to {}", cli.target_accuracy);
    }
    cli
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_config() {
        let cli = Cli::parse_from(["backprop-mlp", "xor.txt"]);
        assert!(!cli.split);
        let config = cli.train_config();
        assert_eq!(config.mode, AccumulationMode::Online);
        assert!(!config.split_data_sets);
        assert_eq!(config.max_iterations, MAX_ITERATIONS);
        assert_eq!(config.target_accuracy, DESIRED_ACCURACY);
    }

    #[test]
    fn positional_split_flag_and_options() {
        let cli = Cli::parse_from([
            "backprop-mlp", "data.txt", "true", "--batch", "--seed", "7", "--max-iterations", "50",
        ]);
        assert_eq!(cli.input_file, PathBuf::from("data.txt"));
        assert_eq!(cli.seed, Some(7));
        let config = cli.train_config();
        assert!(config.split_data_sets);
        assert_eq!(config.mode, AccumulationMode::Batch);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn split_flag_ignores_case_and_treats_other_values_as_false() {
        for (value, expected) in [("TRUE", true), ("True", true), ("false", false), ("maybe", false), ("1", false)] {
            let cli = Cli::try_parse_from(["backprop-mlp", "data.txt", value]).unwrap();
            assert_eq!(cli.split, expected, "{value}");
        }
    }
}
