//! Tabular Q-learning for environments with a continuous, bounded observation space and
//! a discrete set of actions.
//!
//! Observations are binned onto a grid by a [`Discretizer`](discretize::Discretizer), a
//! [`QTableAgent`](algo::QTableAgent) learns one value per grid cell and action, and a
//! [`Trainer`](train::Trainer) runs episodes until the episode rewards plateau.

/// Implemented RL algorithms
pub mod algo;

/// Learner interface driven by the trainer
pub mod agent;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Mapping continuous observations to grid cells
pub mod discretize;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Exploration policies
pub mod exploration;

/// Episode driver, stopping rule and policy evaluation
pub mod train;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod error;
mod util;

pub use error::{Error, Result};
