/// An episodic environment with a continuous, bounded observation space of `D`
/// dimensions and a finite set of actions numbered `0..num_actions()`
///
/// The agent never looks inside the environment; it only sees the observations and
/// rewards returned here. Episode length is the environment's business: it signals the
/// end of an episode through [`Step::done`], including when it enforces a step cap.
pub trait Environment<const D: usize> {
    /// Diagnostics attached to each step, ignored by the learner
    type Info;

    /// Per-dimension `(low, high)` limits of the observation space
    fn bounds(&self) -> ([f32; D], [f32; D]);

    /// Number of discrete actions
    fn num_actions(&self) -> usize;

    /// Reset the environment to an initial state
    ///
    /// **Returns** the initial observation
    fn reset(&mut self) -> [f32; D];

    /// Advance one time step in response to `action`
    fn step(&mut self, action: usize) -> Step<D, Self::Info>;

    /// Release any resources held by the environment
    fn close(&mut self) {}
}

/// Result of a single [`Environment::step`]
#[derive(Debug, Clone, PartialEq)]
pub struct Step<const D: usize, I = ()> {
    pub observation: [f32; D],
    pub reward: f32,
    /// Whether the episode ended with this step
    pub done: bool,
    pub info: I,
}

/// Represents a single experience or transition in the environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exp<const D: usize> {
    /// The observation before taking the action
    pub state: [f32; D],
    /// The action taken in the given state
    pub action: usize,
    /// The reward received after taking the action
    pub reward: f32,
    /// The observation after the action is taken
    pub next_state: [f32; D],
}
