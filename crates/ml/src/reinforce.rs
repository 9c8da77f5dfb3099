//! REINFORCE with a learned value baseline.
//!
//! One episode is one update:
//!
//! 1. play an episode with the current policy ([`collect_trajectory`]);
//! 2. turn its rewards into normalized discounted returns `G`;
//! 3. take the advantage `A = G - V` with `V` detached, so it only weights
//!    the policy term;
//! 4. policy loss `-Σ log π(a|s) · A`, value loss `½ Σ (G - V)²`;
//! 5. one backward pass through their sum and one Adam step over the trunk
//!    and both heads;
//! 6. record the episode score.
//!
//! Errors are not retried. A non-finite loss stops training with
//! [`MlError::NonFiniteLoss`]; the scores recorded before it stay available
//! through [`ReinforceTrainer::scores`].

use crate::config::TrainConfig;
use crate::env::Env;
use crate::error::MlError;
use crate::optim::Adam;
use crate::policy::PolicyValueNet;
use crate::returns::compute_returns;
use crate::scores::ScoreHistory;
use crate::tape::Tape;
use crate::tensor::Tensor;
use crate::trajectory::{collect_trajectory, greedy_episode, Trajectory};
use std::collections::HashMap;

/// The three scalar loss tensors of one episode, still on the tape.
#[derive(Debug)]
pub struct EpisodeLoss {
    pub policy: Tensor,
    pub value: Tensor,
    pub total: Tensor,
}

/// Records the composite loss for `trajectory` on `tape`.
///
/// The network is re-run over all recorded observations as one batch so
/// the gradient reaches every step of the episode.
///
/// # Errors
///
/// Fails if the trajectory is empty, its arrays or `returns` disagree in
/// length, or it holds observations or actions the network cannot take.
pub fn assemble_loss(
    net: &PolicyValueNet,
    trajectory: &Trajectory,
    returns: &[f32],
    tape: &mut Tape,
    tensors: &mut HashMap<usize, Tensor>,
) -> Result<EpisodeLoss, MlError> {
    trajectory.check()?;
    if trajectory.is_empty() {
        return Err(MlError::EmptyTrajectory);
    }
    if returns.len() != trajectory.len() {
        return Err(MlError::LengthMismatch("returns and trajectory"));
    }
    let obs_dim = net.obs_dim();
    if let Some(bad) = trajectory.observations.iter().find(|o| o.len() != obs_dim) {
        return Err(MlError::ObservationShape { expected: obs_dim, got: bad.len() });
    }
    if let Some(&action) = trajectory.actions.iter().find(|&&a| a >= net.n_actions()) {
        return Err(MlError::InvalidAction { action, size: net.n_actions() });
    }

    let n = trajectory.len();
    let x = Tensor::from_vec(vec![n, obs_dim], trajectory.observations.concat());
    let (logits, values) = net.forward(&x, tape, tensors);
    let log_probs = logits
        .log_softmax(tape, tensors)
        .gather(&trajectory.actions, tape, tensors);

    let returns = Tensor::from_vec(vec![n, 1], returns.to_vec());
    let baseline = values.detach(tensors);
    let advantage = returns.sub(&baseline, tape, tensors);

    let policy = log_probs
        .mul(&advantage, tape, tensors)
        .reduce_sum(tape, tensors)
        .mul_scalar(-1.0, tape, tensors);
    let value = returns
        .sub(&values, tape, tensors)
        .pow(2.0, tape, tensors)
        .reduce_sum(tape, tensors)
        .mul_scalar(0.5, tape, tensors);
    let total = policy.add(&value, tape, tensors);

    Ok(EpisodeLoss { policy, value, total })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LossBreakdown {
    pub policy: f32,
    pub value: f32,
    pub total: f32,
}

#[derive(Clone, Debug)]
pub struct EpisodeStats {
    /// 1-based episode index
    pub episode: usize,
    pub score: f32,
    pub steps: usize,
    pub loss: LossBreakdown,
    pub rolling_average: f32,
}

#[derive(Clone, Debug)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub final_average: Option<f32>,
    /// Best rolling average over a full window
    pub best_average: Option<f32>,
    /// Episode at which `solved_score` was reached
    pub solved_at: Option<usize>,
}

pub struct ReinforceTrainer<E: Env> {
    env: E,
    net: PolicyValueNet,
    optimizer: Adam,
    rng: fastrand::Rng,
    config: TrainConfig,
    scores: ScoreHistory,
    episodes: usize,
}

impl<E: Env> ReinforceTrainer<E> {
    /// Builds a freshly initialized network sized for `env`.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::InvalidConfig`] if `config` does not validate.
    pub fn new(env: E, config: TrainConfig) -> Result<Self, MlError> {
        config.validate()?;
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let net = PolicyValueNet::new(env.obs_size(), config.hidden, env.action_size(), &mut rng);
        Ok(Self::assemble(env, net, config, rng))
    }

    /// Trains an existing network.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not validate or `net` does not match the
    /// environment's observation and action sizes.
    pub fn with_network(env: E, net: PolicyValueNet, config: TrainConfig) -> Result<Self, MlError> {
        config.validate()?;
        if net.obs_dim() != env.obs_size() {
            return Err(MlError::ObservationShape { expected: net.obs_dim(), got: env.obs_size() });
        }
        if net.n_actions() != env.action_size() {
            return Err(MlError::InvalidConfig(format!(
                "network has {} actions, environment {}",
                net.n_actions(),
                env.action_size()
            )));
        }
        let rng = fastrand::Rng::with_seed(config.seed);
        Ok(Self::assemble(env, net, config, rng))
    }

    fn assemble(env: E, net: PolicyValueNet, config: TrainConfig, rng: fastrand::Rng) -> Self {
        let optimizer = Adam::new(&net.params(), config.learning_rate);
        let scores = ScoreHistory::new(config.window);
        Self { env, net, optimizer, rng, config, scores, episodes: 0 }
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn net(&self) -> &PolicyValueNet {
        &self.net
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn scores(&self) -> &ScoreHistory {
        &self.scores
    }

    /// Completed (updated) episodes so far.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// One gradient step on the composite loss of `trajectory`.
    ///
    /// # Errors
    ///
    /// Everything [`assemble_loss`] rejects, plus [`MlError::NonFiniteLoss`].
    /// The parameters are untouched when an error is returned.
    pub fn update(&mut self, trajectory: &Trajectory) -> Result<LossBreakdown, MlError> {
        let returns = compute_returns(&trajectory.rewards, self.config.gamma);

        let mut tape = Tape::new();
        let mut tensors = HashMap::new();
        self.net.register(&mut tensors);
        let loss = assemble_loss(&self.net, trajectory, &returns, &mut tape, &mut tensors)?;
        let breakdown = LossBreakdown {
            policy: loss.policy.data()[0],
            value: loss.value.data()[0],
            total: loss.total.data()[0],
        };
        if !breakdown.total.is_finite() {
            return Err(MlError::NonFiniteLoss { episode: self.episodes + 1, loss: breakdown.total });
        }

        tape.backward(&loss.total, &mut tensors)?;
        self.net.collect_grads(&tensors);
        self.optimizer.step(&mut self.net.params_mut());
        self.net.zero_grad();
        Ok(breakdown)
    }

    /// Plays, learns from and records one episode.
    ///
    /// # Errors
    ///
    /// Environment failures and everything [`ReinforceTrainer::update`]
    /// rejects. The episode is not recorded when it fails.
    pub fn train_episode(&mut self) -> Result<EpisodeStats, MlError> {
        let trajectory =
            collect_trajectory(&mut self.env, &self.net, &mut self.rng, self.config.max_steps)?;
        let loss = self.update(&trajectory)?;

        self.episodes += 1;
        self.scores.push(trajectory.score);
        let rolling_average = self.scores.rolling_average().unwrap_or(trajectory.score);
        tracing::debug!(
            episode = self.episodes,
            steps = trajectory.len(),
            score = trajectory.score,
            policy_loss = loss.policy,
            value_loss = loss.value,
            "episode finished"
        );

        Ok(EpisodeStats {
            episode: self.episodes,
            score: trajectory.score,
            steps: trajectory.len(),
            loss,
            rolling_average,
        })
    }

    /// Trains until `config.episodes` episodes are done, or the solved score
    /// is reached over a full window.
    ///
    /// # Errors
    ///
    /// The first error of any episode; training stops there.
    pub fn run(&mut self) -> Result<TrainingSummary, MlError> {
        let mut best_average: Option<f32> = None;
        let mut solved_at = None;

        while self.episodes < self.config.episodes {
            let stats = match self.train_episode() {
                Ok(stats) => stats,
                Err(e) => {
                    tracing::error!(
                        episode = self.episodes + 1,
                        recorded = self.scores.len(),
                        "training aborted: {e}"
                    );
                    return Err(e);
                }
            };

            if stats.episode % self.config.report_every == 0 {
                tracing::info!("Episode {}\tAverage Score: {:.2}", stats.episode, stats.rolling_average);
            }
            if self.scores.window_full() {
                best_average = Some(best_average.map_or(stats.rolling_average, |b| b.max(stats.rolling_average)));
                if let Some(target) = self.config.solved_score {
                    if stats.rolling_average >= target {
                        tracing::info!(
                            "Solved in {} episodes!\tAverage Score: {:.2}",
                            stats.episode,
                            stats.rolling_average
                        );
                        solved_at = Some(stats.episode);
                        break;
                    }
                }
            }
        }

        Ok(TrainingSummary {
            episodes: self.episodes,
            final_average: self.scores.rolling_average(),
            best_average,
            solved_at,
        })
    }

    /// Scores of `episodes` greedy episodes; the network is not updated.
    ///
    /// # Errors
    ///
    /// Environment failures.
    pub fn evaluate(&mut self, episodes: usize) -> Result<Vec<f32>, MlError> {
        (0..episodes)
            .map(|_| greedy_episode(&mut self.env, &self.net, self.config.max_steps))
            .collect()
    }
}
