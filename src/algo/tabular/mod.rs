mod policy;
pub mod q_table;

pub use policy::Policy;
pub use q_table::{QTableAgent, QTableAgentConfig};
