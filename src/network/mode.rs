use serde::Serialize;

/// Blending factor applied to the previous offset in online mode.
pub const MOMENTUM: f64 = 0.5;

/// How per-record weight contributions are combined before an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AccumulationMode {
    /// Offsets are summed over the whole epoch and applied once, then cleared.
    Batch,
    /// Offsets are replaced per record, carrying `MOMENTUM` times the previous
    /// offset, and applied after every record.
    #[default]
    Online,
}

impl AccumulationMode {
    /// Combines a new contribution with the offset already stored for a weight.
    pub fn accumulate(self, offset: f64, contribution: f64) -> f64 {
        match self {
            AccumulationMode::Batch => offset + contribution,
            AccumulationMode::Online => contribution + MOMENTUM * offset,
        }
    }
}
