use crate::env::Exp;

/// A learner that can be driven by a [`Trainer`](crate::train::Trainer) over `D`-dimensional observations
pub trait Agent<const D: usize> {
    /// Read-only snapshot of what the agent has learned
    type Policy;

    /// Choose an action for the observed state
    fn act(&mut self, state: &[f32; D]) -> usize;

    /// Learn from one transition
    fn learn(&mut self, exp: Exp<D>);

    /// Called once after each completed episode
    fn end_episode(&mut self) {}

    fn learning_rate(&self) -> f32;

    /// Replace the stored learning rate for all subsequent updates
    fn set_learning_rate(&mut self, alpha: f32);

    /// Derive the current greedy policy
    fn policy(&self) -> Self::Policy;
}
