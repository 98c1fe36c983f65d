use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    agent::Agent,
    decay::{self, Decay},
    discretize::Discretizer,
    ds::QTable,
    ensure_interval,
    env::{Environment, Exp},
    exploration::{Choice, EpsilonGreedy},
    Error, Result,
};

use super::Policy;

/// Exploration floor
pub const EPSILON_MIN: f32 = 0.005;
/// Per-step epsilon decrement: the floor is reached after 500 * `EPSILON_MIN` of a
/// 10 000 episode, 200 step budget
pub const EPSILON_DECAY: f32 = 500.0 * EPSILON_MIN / (10_000.0 * 200.0);

/// Configuration for the [`QTableAgent`]
#[derive(Debug, Clone)]
pub struct QTableAgentConfig<S: Decay = decay::Linear> {
    /// Exploration policy and its epsilon schedule
    ///
    /// **Default**: epsilon starts at `1.0` and drops by [`EPSILON_DECAY`] per action
    /// selection down to [`EPSILON_MIN`]
    pub exploration: EpsilonGreedy<S>,
    /// Learning rate, in `[0, 1]`
    ///
    /// **Default**: `0.01`
    pub alpha: f32,
    /// Discount factor, in `[0, 1]`
    ///
    /// **Default**: `0.98`
    pub gamma: f32,
    /// Bins per observation dimension when the discretizer is derived from an environment
    ///
    /// **Default**: `30`
    pub bins: usize,
    /// Seed for the exploration RNG; `None` seeds from the OS
    ///
    /// **Default**: `None`
    pub seed: Option<u64>,
}

impl Default for QTableAgentConfig<decay::Linear> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(
                decay::Linear::new(EPSILON_DECAY, 1.0, EPSILON_MIN).unwrap(),
            ),
            alpha: 0.01,
            gamma: 0.98,
            bins: 30,
            seed: None,
        }
    }
}

/// A Q-learning agent over a discretized continuous observation space
///
/// Observations are mapped to grid cells by a [`Discretizer`]; a dense [`QTable`] holds
/// one value per cell and action, initialized to zero. Updates use the one-step
/// Q-learning rule, bootstrapping from the greedy value of the successor cell:
///
/// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
///
/// ### Generics
/// - `D` - Number of observation dimensions
/// - `S` - Decay strategy for the exploration rate
pub struct QTableAgent<const D: usize, S: Decay = decay::Linear> {
    table: QTable<D>,
    discretizer: Discretizer<D>,
    exploration: EpsilonGreedy<S>,
    alpha: f32,   // learning rate
    gamma: f32,   // discount factor
    steps: u64,   // action selections so far
    episode: u32, // completed episodes
    rng: StdRng,
}

impl<const D: usize, S: Decay> QTableAgent<D, S> {
    /// Initialize a new `QTableAgent` for an environment, using its bounds, its action count
    /// and `config.bins` bins per dimension
    pub fn new<E: Environment<D>>(env: &E, config: QTableAgentConfig<S>) -> Result<Self> {
        let (low, high) = env.bounds();
        let discretizer = Discretizer::new(low, high, config.bins)?;
        Self::with_discretizer(discretizer, env.num_actions(), config)
    }

    /// Initialize a new `QTableAgent` from an explicit discretizer
    ///
    /// `config.bins` is ignored; the discretizer's bins decide the table shape.
    pub fn with_discretizer(
        discretizer: Discretizer<D>,
        num_actions: usize,
        config: QTableAgentConfig<S>,
    ) -> Result<Self> {
        let QTableAgentConfig {
            exploration,
            alpha,
            gamma,
            seed,
            ..
        } = config;
        ensure_interval!(alpha, 0.0, 1.0);
        ensure_interval!(gamma, 0.0, 1.0);
        if num_actions == 0 {
            return Err(Error::NoActions);
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            table: QTable::zeros(discretizer.shape(), num_actions),
            discretizer,
            exploration,
            alpha,
            gamma,
            steps: 0,
            episode: 0,
            rng,
        })
    }

    /// Choose an action with the epsilon greedy policy
    ///
    /// Exploitation picks the highest valued action of the observation's cell, preferring
    /// the lowest index on ties; exploration picks uniformly among all actions.
    pub fn select_action(&mut self, obs: &[f32; D]) -> usize {
        let cell = self.discretizer.discretize(obs);
        let choice = self
            .exploration
            .choose(self.steps, self.episode, &mut self.rng);
        self.steps += 1;
        match choice {
            Choice::Explore => self.rng.gen_range(0..self.table.num_actions()),
            Choice::Exploit => self.table.argmax(&cell),
        }
    }

    /// Apply one Q-learning update for the transition `obs --action--> next_obs`
    ///
    /// **Returns** the TD error measured before the update
    ///
    /// **Panics** if `action` is out of range
    pub fn update(&mut self, obs: &[f32; D], action: usize, reward: f32, next_obs: &[f32; D]) -> f32 {
        let cell = self.discretizer.discretize(obs);
        let next_cell = self.discretizer.discretize(next_obs);

        let td_target = reward + self.gamma * self.table.max(&next_cell);
        let q_value = &mut self.table.row_mut(&cell)[action];
        let td_error = td_target - *q_value;
        *q_value += self.alpha * td_error;
        td_error
    }

    /// Greedy action of every cell, as an independent snapshot
    pub fn policy(&self) -> Policy<D> {
        Policy::new(self.discretizer.clone(), self.table.argmax_all())
    }

    /// Current exploration rate
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon(self.steps, self.episode)
    }

    pub fn learning_rate(&self) -> f32 {
        self.alpha
    }

    pub fn set_learning_rate(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    pub fn discount(&self) -> f32 {
        self.gamma
    }

    pub fn get_q_table(&self) -> &QTable<D> {
        &self.table
    }

    pub fn discretizer(&self) -> &Discretizer<D> {
        &self.discretizer
    }

    /// Number of completed episodes
    pub fn episode(&self) -> u32 {
        self.episode
    }
}

impl<const D: usize, S: Decay> Agent<D> for QTableAgent<D, S> {
    type Policy = Policy<D>;

    fn act(&mut self, state: &[f32; D]) -> usize {
        self.select_action(state)
    }

    fn learn(&mut self, exp: Exp<D>) {
        let Exp {
            state,
            action,
            reward,
            next_state,
        } = exp;
        self.update(&state, action, reward, &next_state);
    }

    fn end_episode(&mut self) {
        self.episode += 1;
    }

    fn learning_rate(&self) -> f32 {
        self.alpha
    }

    fn set_learning_rate(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn policy(&self) -> Policy<D> {
        QTableAgent::policy(self)
    }
}
