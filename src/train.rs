use std::sync::mpsc::Sender;

use log::{debug, info};

use crate::{
    agent::Agent,
    algo::Policy,
    env::{Environment, Exp},
    ensure_interval, Error, Result,
};

/// One-time change of the agent's learning rate during training
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningRateStep {
    /// Index of the episode after which the new rate applies
    pub episode: usize,
    /// The new learning rate, in `[0, 1]`
    pub alpha: f32,
}

impl LearningRateStep {
    /// Switch to `alpha` once episode `max_episodes / 2` has completed
    pub fn halfway(max_episodes: usize, alpha: f32) -> Self {
        Self {
            episode: max_episodes / 2,
            alpha,
        }
    }
}

/// Configuration for the [`Trainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Hard cap on the number of episodes
    ///
    /// **Default**: `10_000`
    pub max_episodes: usize,
    /// Consecutive episodes whose rewards fall in the same bucket needed to stop early
    ///
    /// **Default**: `1000`
    pub streak_threshold: usize,
    /// Width of the reward buckets compared by the stopping rule
    ///
    /// **Default**: `10.0`
    pub bucket_width: f32,
    /// Learning rate change applied partway through training
    ///
    /// **Default**: switch to `0.05` halfway through `max_episodes`
    pub learning_rate_step: Option<LearningRateStep>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_episodes: 10_000,
            streak_threshold: 1000,
            bucket_width: 10.0,
            learning_rate_step: Some(LearningRateStep::halfway(10_000, 0.05)),
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: String::from("`max_episodes` must be at least 1"),
            });
        }
        if self.streak_threshold == 0 {
            return Err(Error::InvalidConfiguration {
                message: String::from("`streak_threshold` must be at least 1"),
            });
        }
        if !(self.bucket_width.is_finite() && self.bucket_width > 0.0) {
            return Err(Error::InvalidConfiguration {
                message: format!("`bucket_width` must be positive, got {}", self.bucket_width),
            });
        }
        if let Some(LearningRateStep { alpha, .. }) = self.learning_rate_step {
            ensure_interval!(alpha, 0.0, 1.0);
        }
        Ok(())
    }
}

/// Progress of a single completed episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeReport {
    pub episode: usize,
    /// Total reward of this episode
    pub reward: f32,
    /// Best total reward over all episodes so far
    pub best_reward: f32,
    /// Current run of episodes in the same reward bucket as their predecessor
    pub streak: usize,
}

/// Everything a training run produces
#[derive(Debug, Clone)]
pub struct Outcome<P> {
    /// Total reward of every completed episode, in order
    pub rewards: Vec<f32>,
    pub best_reward: f32,
    /// Whether the run stopped on the streak rule rather than the episode cap
    pub solved: bool,
    /// Streak length when training ended
    pub streak: usize,
    /// Greedy policy derived from the final agent
    pub policy: P,
}

impl<P> Outcome<P> {
    /// Number of episodes run
    pub fn episodes(&self) -> usize {
        self.rewards.len()
    }
}

/// Plateau detector over consecutive episode rewards
///
/// Two rewards match when `floor(reward / width)` is equal. Each match extends the
/// streak, any mismatch resets it to zero.
#[derive(Debug, Clone)]
pub struct Streak {
    width: f32,
    threshold: usize,
    count: usize,
    last_bucket: Option<f32>,
}

impl Streak {
    pub fn new(width: f32, threshold: usize) -> Self {
        Self {
            width,
            threshold,
            count: 0,
            last_bucket: None,
        }
    }

    /// Record the next episode's reward and return the streak length
    pub fn push(&mut self, reward: f32) -> usize {
        let bucket = (reward / self.width).floor();
        match self.last_bucket {
            Some(last) if last == bucket => self.count += 1,
            Some(_) => self.count = 0,
            None => {}
        }
        self.last_bucket = Some(bucket);
        self.count
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_solved(&self) -> bool {
        self.count >= self.threshold
    }
}

/// Drives an [`Agent`] through episodes of an [`Environment`] until the reward plateaus
/// or the episode cap is reached
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainConfig,
    reporter: Option<Sender<EpisodeReport>>,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            reporter: None,
        })
    }

    /// Also send an [`EpisodeReport`] over `tx` after every episode
    pub fn with_reporter(mut self, tx: Sender<EpisodeReport>) -> Self {
        self.reporter = Some(tx);
        self
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Run one episode, learning from every transition
    ///
    /// **Returns** the episode's total reward
    pub fn run_episode<const D: usize, A, E>(agent: &mut A, env: &mut E) -> f32
    where
        A: Agent<D>,
        E: Environment<D>,
    {
        let mut state = env.reset();
        let mut total_reward = 0.0;
        loop {
            let action = agent.act(&state);
            let step = env.step(action);
            agent.learn(Exp {
                state,
                action,
                reward: step.reward,
                next_state: step.observation,
            });
            total_reward += step.reward;
            state = step.observation;
            if step.done {
                break;
            }
        }
        agent.end_episode();
        total_reward
    }

    /// Train until solved or `max_episodes` episodes have run
    pub fn run<const D: usize, A, E>(&self, agent: &mut A, env: &mut E) -> Outcome<A::Policy>
    where
        A: Agent<D>,
        E: Environment<D>,
    {
        let TrainConfig {
            max_episodes,
            streak_threshold,
            bucket_width,
            learning_rate_step,
        } = self.config;

        let mut rewards = Vec::with_capacity(max_episodes);
        let mut best_reward = f32::NEG_INFINITY;
        let mut streak = Streak::new(bucket_width, streak_threshold);

        for episode in 0..max_episodes {
            let reward = Self::run_episode(agent, env);
            best_reward = best_reward.max(reward);
            rewards.push(reward);
            info!("episode {episode}: reward {reward} best_reward {best_reward}");

            let count = streak.push(reward);
            if count > 0 {
                debug!("episode {episode}: streak {count}");
            }

            if let Some(tx) = &self.reporter {
                // a dropped receiver only stops the reports
                let _ = tx.send(EpisodeReport {
                    episode,
                    reward,
                    best_reward,
                    streak: count,
                });
            }

            if streak.is_solved() {
                info!("solved with reward streak {count}, best reward {best_reward}");
                break;
            }

            if let Some(LearningRateStep { episode: at, alpha }) = learning_rate_step {
                if episode == at {
                    info!(
                        "episode {episode}: learning rate {} -> {alpha}",
                        agent.learning_rate()
                    );
                    agent.set_learning_rate(alpha);
                }
            }
        }

        Outcome {
            solved: streak.is_solved(),
            streak: streak.count(),
            rewards,
            best_reward,
            policy: agent.policy(),
        }
    }
}

/// Run one episode following a frozen `policy`, without learning
///
/// **Returns** the episode's total reward
pub fn evaluate<const D: usize, E: Environment<D>>(policy: &Policy<D>, env: &mut E) -> f32 {
    let mut state = env.reset();
    let mut total_reward = 0.0;
    loop {
        let step = env.step(policy.action(&state));
        total_reward += step.reward;
        state = step.observation;
        if step.done {
            return total_reward;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::{
        algo::{QTableAgent, QTableAgentConfig},
        decay,
        env::tests::MockEnv,
        exploration::EpsilonGreedy,
    };

    fn q_agent(env: &MockEnv, alpha: f32) -> QTableAgent<2, decay::Constant> {
        QTableAgent::new(
            env,
            QTableAgentConfig {
                exploration: EpsilonGreedy::new(decay::Constant::new(0.5)),
                alpha,
                gamma: 0.9,
                bins: 4,
                seed: Some(3),
            },
        )
        .unwrap()
    }

    fn config(max_episodes: usize) -> TrainConfig {
        TrainConfig {
            max_episodes,
            learning_rate_step: None,
            ..Default::default()
        }
    }

    /// Records the learning rate in effect at every update
    struct RateRecorder {
        alpha: f32,
        seen: Vec<f32>,
        episodes: usize,
    }

    impl Agent<2> for RateRecorder {
        type Policy = usize;

        fn act(&mut self, _state: &[f32; 2]) -> usize {
            0
        }

        fn learn(&mut self, _exp: Exp<2>) {
            self.seen.push(self.alpha);
        }

        fn end_episode(&mut self) {
            self.episodes += 1;
        }

        fn learning_rate(&self) -> f32 {
            self.alpha
        }

        fn set_learning_rate(&mut self, alpha: f32) {
            self.alpha = alpha;
        }

        fn policy(&self) -> usize {
            self.episodes
        }
    }

    #[test]
    fn episode_reward_sums_steps() {
        // 5 steps of 10 then a final step of 10
        let mut env = MockEnv::new(vec![60.0], 6);
        let mut agent = q_agent(&env, 0.1);
        let outcome = Trainer::new(config(1)).unwrap().run(&mut agent, &mut env);

        assert_eq!(outcome.rewards, vec![60.0]);
        assert_eq!(outcome.best_reward, 60.0);
        assert_eq!(agent.episode(), 1);
    }

    #[test]
    fn constant_rewards_stop_at_threshold() {
        let mut env = MockEnv::new(vec![-200.0], 1);
        let mut agent = q_agent(&env, 0.1);
        let outcome = Trainer::new(config(5000)).unwrap().run(&mut agent, &mut env);

        assert!(outcome.solved);
        assert_eq!(outcome.streak, 1000);
        assert_eq!(
            outcome.episodes(),
            1001,
            "first episode has no predecessor, the next 1000 match"
        );
        assert_eq!(outcome.best_reward, -200.0);
    }

    #[test]
    fn unstable_rewards_run_to_cap() {
        let mut env = MockEnv::new(vec![0.0, 100.0], 2);
        let mut agent = q_agent(&env, 0.1);
        let outcome = Trainer::new(config(50)).unwrap().run(&mut agent, &mut env);

        assert!(!outcome.solved);
        assert_eq!(outcome.episodes(), 50);
        assert_eq!(outcome.streak, 0);
        assert_eq!(outcome.best_reward, 100.0);
        assert_eq!(outcome.policy.shape(), [5, 5]);
    }

    #[test]
    fn streak_buckets() {
        let mut streak = Streak::new(10.0, 3);
        let counts: Vec<_> = [5.0, 7.0, 15.0, 12.0, 18.0, 19.9]
            .into_iter()
            .map(|r| streak.push(r))
            .collect();
        assert_eq!(counts, vec![0, 1, 0, 1, 2, 3]);
        assert!(streak.is_solved());

        let mut negative = Streak::new(10.0, 1000);
        negative.push(-195.0);
        assert_eq!(negative.push(-200.0), 1, "both floor to bucket -20");
        assert_eq!(negative.push(-190.0), 0);
    }

    #[test]
    fn learning_rate_step_reaches_agent() {
        let mut env = MockEnv::new(vec![1.0], 2);
        let mut agent = RateRecorder {
            alpha: 0.01,
            seen: Vec::new(),
            episodes: 0,
        };
        let trainer = Trainer::new(TrainConfig {
            max_episodes: 6,
            learning_rate_step: Some(LearningRateStep::halfway(6, 0.05)),
            ..Default::default()
        })
        .unwrap();
        let outcome = trainer.run(&mut agent, &mut env);

        assert_eq!(outcome.policy, 6, "end_episode called per episode");
        // two updates per episode; episodes 0..=3 before the switch
        assert_eq!(&agent.seen[..8], &[0.01f32; 8]);
        assert_eq!(&agent.seen[8..], &[0.05f32; 4]);
    }

    #[test]
    fn learning_rate_step_updates_q_agent() {
        let mut env = MockEnv::new(vec![1.0], 2);
        let mut agent = q_agent(&env, 0.01);
        let trainer = Trainer::new(TrainConfig {
            max_episodes: 10,
            learning_rate_step: Some(LearningRateStep::halfway(10, 0.05)),
            ..Default::default()
        })
        .unwrap();
        trainer.run(&mut agent, &mut env);
        assert_eq!(agent.learning_rate(), 0.05);
    }

    #[test]
    fn reporter_receives_every_episode() {
        let (tx, rx) = mpsc::channel();
        let mut env = MockEnv::new(vec![3.0, 30.0, 1.0], 1);
        let mut agent = q_agent(&env, 0.1);
        Trainer::new(config(3))
            .unwrap()
            .with_reporter(tx)
            .run(&mut agent, &mut env);

        let reports: Vec<_> = rx.try_iter().collect();
        assert_eq!(reports.len(), 3);
        assert_eq!(
            reports
                .iter()
                .map(|r| (r.episode, r.reward, r.best_reward))
                .collect::<Vec<_>>(),
            vec![(0, 3.0, 3.0), (1, 30.0, 30.0), (2, 1.0, 30.0)]
        );
        assert_eq!(reports[2].streak, 0);
    }

    #[test]
    fn evaluate_follows_policy() {
        let mut env = MockEnv::new(vec![12.0], 4);
        let mut agent = q_agent(&env, 0.1);
        let outcome = Trainer::new(config(3)).unwrap().run(&mut agent, &mut env);

        let reward = evaluate(&outcome.policy, &mut env);
        assert_eq!(reward, 12.0);
    }

    #[test]
    fn invalid_configs() {
        assert!(Trainer::new(config(0)).is_err());
        assert!(Trainer::new(TrainConfig {
            streak_threshold: 0,
            ..Default::default()
        })
        .is_err());
        assert!(Trainer::new(TrainConfig {
            bucket_width: 0.0,
            ..Default::default()
        })
        .is_err());
        assert!(matches!(
            Trainer::new(TrainConfig {
                learning_rate_step: Some(LearningRateStep {
                    episode: 1,
                    alpha: 2.0
                }),
                ..Default::default()
            }),
            Err(Error::OutOfInterval { name: "alpha", .. })
        ));
        assert_eq!(
            TrainConfig::default().learning_rate_step,
            Some(LearningRateStep {
                episode: 5000,
                alpha: 0.05
            })
        );
    }
}
