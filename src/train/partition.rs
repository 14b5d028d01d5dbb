//! Training / generalization / validation split of the loaded records.

use log::warn;
use rand::seq::index;
use rand::Rng;

/// Share of the records set aside for each of generalization and validation.
pub const GEN_VAL_PORTION: f64 = 0.1;
/// Fewest records that can be split into three non-empty partitions.
pub const MIN_SPLIT_RECORDS: usize = 3;

/// Index views into the record list. Unsplit partitions all alias every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitions {
    pub training: Vec<usize>,
    pub generalization: Vec<usize>,
    pub validation: Vec<usize>,
    pub split: bool,
}

impl Partitions {
    pub fn unsplit(total: usize) -> Partitions {
        let all: Vec<usize> = (0..total).collect();
        Partitions {
            training: all.clone(),
            generalization: all.clone(),
            validation: all,
            split: false,
        }
    }
}

/// Assigns records to partitions.
///
/// With splitting, generalization and validation each receive
/// `max(floor(total * 0.1), 1)` records sampled without replacement, in that
/// order, and training keeps the rest in their original order. Fewer than
/// [`MIN_SPLIT_RECORDS`] records disables splitting with a warning.
pub fn assign_data_sets<R: Rng + ?Sized>(total: usize, split_requested: bool, rng: &mut R) -> Partitions {
    if !split_requested {
        return Partitions::unsplit(total);
    }
    if total < MIN_SPLIT_RECORDS {
        warn!(
            "Must supply a minimum of {} data sets in order to use the training/generalization/validation \
             split, found {}. Running using a single data set",
            MIN_SPLIT_RECORDS, total
        );
        return Partitions::unsplit(total);
    }

    let small = ((total as f64 * GEN_VAL_PORTION).floor() as usize).max(1);
    let mut drawn = index::sample(rng, total, 2 * small).into_vec();
    let validation = drawn.split_off(small);
    let generalization = drawn;

    let mut claimed = vec![false; total];
    for &i in generalization.iter().chain(validation.iter()) {
        claimed[i] = true;
    }
    let training: Vec<usize> = (0..total).filter(|&i| !claimed[i]).collect();

    Partitions { training, generalization, validation, split: true }
}
