pub mod accuracy;
pub mod driver;
pub mod epoch_stats;
pub mod partition;
pub mod report;
pub mod train_config;

pub use accuracy::{calc_accuracy, clamp, Accuracy};
pub use driver::{TrainingDriver, TrainingState};
pub use epoch_stats::EpochStats;
pub use partition::{assign_data_sets, Partitions};
pub use report::{RecordSummary, StopReason, TrainReport};
pub use train_config::TrainConfig;
