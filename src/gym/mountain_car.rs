use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::{EnumIter, FromRepr, VariantArray};

use crate::env::{Environment, Step};

const MIN_POSITION: f64 = -1.2;
const MAX_POSITION: f64 = 0.6;
const MAX_SPEED: f64 = 0.07;
const GOAL_POSITION: f64 = 0.5;
const FORCE: f64 = 0.001;
const GRAVITY: f64 = 0.0025;

/// Actions for the [`MountainCar`] environment, representing pushing the car left, not
/// pushing, or pushing right
#[derive(FromRepr, EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MCAction {
    Left = 0,
    Idle = 1,
    Right = 2,
}

impl From<usize> for MCAction {
    fn from(value: usize) -> Self {
        Self::from_repr(value).expect("MCAction::from is only called with valid values [0, 2]")
    }
}

/// Diagnostics for a single [`MountainCar`] step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MCInfo {
    /// Steps taken so far in this episode
    pub steps: usize,
    /// The episode was cut off by the step cap rather than reaching the goal
    pub truncated: bool,
}

/// The classic MountainCar reinforcement learning environment
///
/// An underpowered car sits in a valley and must rock back and forth to build enough
/// momentum to reach the flag on the right hill. Observations are `[position, velocity]`,
/// every step costs a reward of `-1`, and an episode ends at the flag or after
/// `max_steps` steps.
#[derive(Debug, Clone)]
pub struct MountainCar {
    position: f64,
    velocity: f64,
    steps: usize,
    max_steps: usize,
    rng: StdRng,
}

impl MountainCar {
    /// Default episode step cap
    pub const MAX_STEPS: usize = 200;

    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible start positions
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            position: -0.5,
            velocity: 0.0,
            steps: 0,
            max_steps: Self::MAX_STEPS,
            rng,
        }
    }

    /// Use a different episode step cap
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    fn observation(&self) -> [f32; 2] {
        [self.position as f32, self.velocity as f32]
    }
}

impl Default for MountainCar {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment<2> for MountainCar {
    type Info = MCInfo;

    fn bounds(&self) -> ([f32; 2], [f32; 2]) {
        (
            [MIN_POSITION as f32, -MAX_SPEED as f32],
            [MAX_POSITION as f32, MAX_SPEED as f32],
        )
    }

    fn num_actions(&self) -> usize {
        MCAction::VARIANTS.len()
    }

    fn reset(&mut self) -> [f32; 2] {
        self.position = self.rng.gen_range(-0.6..-0.4);
        self.velocity = 0.0;
        self.steps = 0;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Step<2, MCInfo> {
        let action = MCAction::from(action);
        let push = action as i32 - 1;

        self.velocity += push as f64 * FORCE - (3.0 * self.position).cos() * GRAVITY;
        self.velocity = self.velocity.clamp(-MAX_SPEED, MAX_SPEED);
        self.position = (self.position + self.velocity).clamp(MIN_POSITION, MAX_POSITION);
        if self.position <= MIN_POSITION && self.velocity < 0.0 {
            self.velocity = 0.0;
        }
        self.steps += 1;

        let reached = self.position >= GOAL_POSITION && self.velocity >= 0.0;
        let truncated = !reached && self.steps >= self.max_steps;

        Step {
            observation: self.observation(),
            reward: -1.0,
            done: reached || truncated,
            info: MCInfo {
                steps: self.steps,
                truncated,
            },
        }
    }
}
