/// Table-based learners over discretized state spaces
pub mod tabular;

pub use tabular::{Policy, QTableAgent, QTableAgentConfig};
