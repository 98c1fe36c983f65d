use rand::Rng;

use crate::decay::Decay;

use super::Choice;

/// What the exploration schedule counts as one unit of time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecayClock {
    /// Every action selection advances the schedule
    #[default]
    PerStep,
    /// Every completed episode advances the schedule
    PerEpisode,
}

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
    clock: DecayClock,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy ticking once per action selection
    pub fn new(decay: D) -> Self {
        Self {
            epsilon: decay,
            clock: DecayClock::PerStep,
        }
    }

    /// Use a different [`DecayClock`]
    pub fn with_clock(mut self, clock: DecayClock) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> DecayClock {
        self.clock
    }

    /// Exploration rate after `steps` action selections over `episodes` completed episodes
    pub fn epsilon(&self, steps: u64, episodes: u32) -> f32 {
        let t = match self.clock {
            DecayClock::PerStep => steps as f32,
            DecayClock::PerEpisode => episodes as f32,
        };
        self.epsilon.evaluate(t).clamp(0.0, 1.0)
    }

    /// Invoke epsilon greedy policy
    pub fn choose(&self, steps: u64, episodes: u32, rng: &mut impl Rng) -> Choice {
        let epsilon = self.epsilon(steps, episodes);
        if rng.gen::<f32>() >= epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::decay;

    #[test]
    fn extremes_are_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let never = EpsilonGreedy::new(decay::Constant::new(0.0));
        let always = EpsilonGreedy::new(decay::Constant::new(1.0));
        for _ in 0..1000 {
            assert_eq!(never.choose(0, 0, &mut rng), Choice::Exploit);
            assert_eq!(always.choose(0, 0, &mut rng), Choice::Explore);
        }
    }

    #[test]
    fn clock_selects_time_axis() {
        let linear = decay::Linear::new(0.1, 1.0, 0.0).unwrap();
        let per_step = EpsilonGreedy::new(linear.clone());
        let per_episode = EpsilonGreedy::new(linear).with_clock(DecayClock::PerEpisode);

        assert!((per_step.epsilon(5, 1) - 0.5).abs() < 1e-6);
        assert!((per_episode.epsilon(5, 1) - 0.9).abs() < 1e-6);
        assert_eq!(per_episode.clock(), DecayClock::PerEpisode);
    }

    #[test]
    fn epsilon_is_clamped() {
        let greedy = EpsilonGreedy::new(decay::Constant::new(3.0));
        assert_eq!(greedy.epsilon(0, 0), 1.0);
    }
}
