//! Builds the training run from the command line and drives it.

use crate::Args;
use anyhow::{Context, Result};
use ml::{LunarLanderEnv, ReinforceTrainer, TrainConfig};

/// Loads `--config` (or the defaults) and applies the flag overrides.
///
/// # Errors
///
/// Fails if the config file cannot be read or parsed, or the final values
/// do not validate.
pub fn load_config(args: &Args) -> Result<TrainConfig> {
    let mut config = match &args.config {
        Some(path) => TrainConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrainConfig::default(),
    };

    if let Some(v) = args.episodes {
        config.episodes = v;
    }
    if let Some(v) = args.gamma {
        config.gamma = v;
    }
    if let Some(v) = args.learning_rate {
        config.learning_rate = v;
    }
    if let Some(v) = args.seed {
        config.seed = v;
    }
    if let Some(v) = args.max_steps {
        config.max_steps = v;
    }
    if let Some(v) = args.report_every {
        config.report_every = v;
    }
    if let Some(v) = args.window {
        config.window = v;
    }
    if let Some(v) = args.hidden {
        config.hidden = v;
    }
    if args.solved_score.is_some() {
        config.solved_score = args.solved_score;
    }

    config.validate().context("invalid training config")?;
    Ok(config)
}

/// Trains on the lunar lander, then optionally plays greedy episodes.
///
/// # Errors
///
/// Config errors, and the first error of the training run.
#[allow(clippy::cast_precision_loss)]
pub fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    tracing::info!(?config, "starting training");

    // The environment gets its own stream so spawn noise and action sampling
    // stay independent.
    let env = LunarLanderEnv::new(config.seed.wrapping_add(1));
    let mut trainer = ReinforceTrainer::new(env, config)?;

    let summary = match trainer.run() {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(
                completed = trainer.episodes(),
                average = ?trainer.scores().rolling_average(),
                "training stopped early"
            );
            return Err(e).context("training failed");
        }
    };

    match summary.solved_at {
        Some(episode) => tracing::info!("Environment solved after {episode} episodes"),
        None => tracing::info!(
            episodes = summary.episodes,
            final_average = ?summary.final_average,
            best_average = ?summary.best_average,
            "training finished"
        ),
    }

    if args.eval_episodes > 0 {
        let scores = trainer.evaluate(args.eval_episodes).context("evaluation failed")?;
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        tracing::info!(episodes = scores.len(), mean_score = mean, "greedy evaluation");
    }

    Ok(())
}
