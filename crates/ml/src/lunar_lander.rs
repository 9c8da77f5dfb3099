use crate::env::{Env, Step};
use crate::error::MlError;
use physics::{Lander, LanderAction, LanderConfig, LanderStatus, Vec2, OBSERVATION_SIZE};

/// Fuel cost per frame of main-engine burn.
const MAIN_ENGINE_COST: f32 = 0.30;
/// Fuel cost per frame of orientation-engine burn.
const SIDE_ENGINE_COST: f32 = 0.03;
const LANDED_REWARD: f32 = 100.0;
const FAILED_REWARD: f32 = -100.0;
/// Largest horizontal and vertical spawn velocity (m/s).
const INITIAL_PUSH: Vec2 = Vec2::new(1.5, 1.0);

/// Environment where the agent must bring a lander to rest on the pad.
///
/// Rewards follow the potential-based shaping of the classic task: moving
/// closer to the pad, slowing down, staying level and touching down with
/// each leg all raise the potential, and each step pays the difference.
/// Firing engines costs fuel. Coming to rest on both legs ends the episode
/// with +100; crashing or drifting out of the viewport ends it with -100.
pub struct LunarLanderEnv {
    lander: Lander,
    rng: fastrand::Rng,
    prev_shaping: f32,
}

impl LunarLanderEnv {
    /// Creates the environment; `seed` drives the random spawn velocity.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(LanderConfig::default(), seed)
    }

    #[must_use]
    pub fn with_config(config: LanderConfig, seed: u64) -> Self {
        let mut env = Self {
            lander: Lander::new(config),
            rng: fastrand::Rng::with_seed(seed),
            prev_shaping: 0.0,
        };
        env.reset();
        env
    }

    pub fn lander(&self) -> &Lander {
        &self.lander
    }

    pub fn lander_mut(&mut self) -> &mut Lander {
        &mut self.lander
    }
}

fn shaping(obs: &[f32; OBSERVATION_SIZE]) -> f32 {
    -100.0 * obs[0].hypot(obs[1]) - 100.0 * obs[2].hypot(obs[3]) - 100.0 * obs[4].abs()
        + 10.0 * obs[6]
        + 10.0 * obs[7]
}

impl Env for LunarLanderEnv {
    fn step(&mut self, action: usize) -> Result<Step, MlError> {
        let command = LanderAction::try_from(action).map_err(|_| MlError::InvalidAction {
            action,
            size: LanderAction::COUNT,
        })?;
        let outcome = self.lander.step(command)?;
        let obs = self.lander.observation();

        let shaping = shaping(&obs);
        let mut reward = shaping - self.prev_shaping;
        self.prev_shaping = shaping;
        reward -= outcome.main_power * MAIN_ENGINE_COST;
        reward -= outcome.side_power * SIDE_ENGINE_COST;

        let done = match outcome.status {
            LanderStatus::Flying => false,
            LanderStatus::Landed => {
                reward = LANDED_REWARD;
                true
            }
            LanderStatus::Crashed | LanderStatus::OutOfBounds => {
                reward = FAILED_REWARD;
                true
            }
        };

        Ok(Step { obs: obs.to_vec(), reward, done })
    }

    fn reset(&mut self) -> Vec<f32> {
        let push = Vec2::new(
            (self.rng.f32() * 2.0 - 1.0) * INITIAL_PUSH.x,
            (self.rng.f32() * 2.0 - 1.0) * INITIAL_PUSH.y,
        );
        self.lander.reset(push);
        let obs = self.lander.observation();
        self.prev_shaping = shaping(&obs);
        obs.to_vec()
    }

    fn obs_size(&self) -> usize {
        OBSERVATION_SIZE
    }

    fn action_size(&self) -> usize {
        LanderAction::COUNT
    }
}
