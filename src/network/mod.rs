pub mod mode;
pub mod network;

pub use mode::{AccumulationMode, MOMENTUM};
pub use network::Network;
