use crate::env::Env;
use crate::error::MlError;
use crate::policy::PolicyValueNet;

/// Everything recorded while playing one episode, step by step.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    pub observations: Vec<Vec<f32>>,
    pub actions: Vec<usize>,
    pub log_probs: Vec<f32>,
    pub values: Vec<f32>,
    pub rewards: Vec<f32>,
    /// Sum of the episode's rewards.
    pub score: f32,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    fn push(&mut self, obs: Vec<f32>, action: usize, log_prob: f32, value: f32, reward: f32) {
        self.observations.push(obs);
        self.actions.push(action);
        self.log_probs.push(log_prob);
        self.values.push(value);
        self.rewards.push(reward);
        self.score += reward;
    }

    /// # Errors
    ///
    /// Returns [`MlError::LengthMismatch`] if the per-step arrays disagree.
    pub fn check(&self) -> Result<(), MlError> {
        let n = self.rewards.len();
        if self.observations.len() != n
            || self.actions.len() != n
            || self.log_probs.len() != n
            || self.values.len() != n
        {
            return Err(MlError::LengthMismatch("trajectory arrays"));
        }
        Ok(())
    }
}

/// Plays one episode, sampling actions from `net`, for at most `max_steps`.
///
/// # Errors
///
/// Fails on an observation of the wrong length or an environment error.
pub fn collect_trajectory<E: Env>(
    env: &mut E,
    net: &PolicyValueNet,
    rng: &mut fastrand::Rng,
    max_steps: usize,
) -> Result<Trajectory, MlError> {
    let mut trajectory = Trajectory::default();
    let mut obs = env.reset();
    for _ in 0..max_steps {
        let (dist, value) = net.evaluate(&obs)?;
        let action = dist.sample(rng);
        let step = env.step(action)?;
        trajectory.push(obs, action, dist.log_prob(action), value, step.reward);
        obs = step.obs;
        if step.done {
            break;
        }
    }
    Ok(trajectory)
}

/// Plays one episode taking the most likely action at every step.
///
/// # Errors
///
/// Same as [`collect_trajectory`].
pub fn greedy_episode<E: Env>(
    env: &mut E,
    net: &PolicyValueNet,
    max_steps: usize,
) -> Result<f32, MlError> {
    let mut score = 0.0;
    let mut obs = env.reset();
    for _ in 0..max_steps {
        let (dist, _) = net.evaluate(&obs)?;
        let step = env.step(dist.mode())?;
        score += step.reward;
        obs = step.obs;
        if step.done {
            break;
        }
    }
    Ok(score)
}
