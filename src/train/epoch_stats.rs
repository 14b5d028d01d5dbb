use std::fmt;

/// Statistics reported after every epoch, and once for the untrained network
/// as iteration 0.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochStats {
    /// Completed epochs so far.
    pub iteration: usize,
    /// Generalization accuracy as a fraction in [0, 1].
    pub accuracy: f64,
    /// Generalization records with at least one wrong output.
    pub failed_records: usize,
    /// Wall-clock duration of this epoch in milliseconds; 0 for iteration 0.
    pub elapsed_ms: u64,
}

impl fmt::Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Iteration({}): {:.2} %", self.iteration, self.accuracy * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_percentage_with_two_decimals() {
        let stats = EpochStats { iteration: 12, accuracy: 0.756789, failed_records: 1, elapsed_ms: 0 };
        assert_eq!(stats.to_string(), "Iteration(12): 75.68 %");
    }
}
