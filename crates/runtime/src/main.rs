//! # REINFORCE runtime
//!
//! Trains a policy/value network on the lunar-lander task and reports the
//! rolling average score while it learns. Hyperparameters come from an
//! optional JSON file (`--config`); individual flags override it.

#![deny(clippy::all, clippy::pedantic)]

mod app;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reinforce", about = "Train a lunar-lander policy with REINFORCE and a value baseline")]
pub struct Args {
    /// JSON file with training hyperparameters
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Number of training episodes
    #[arg(long)]
    pub episodes: Option<usize>,
    /// Discount factor
    #[arg(long)]
    pub gamma: Option<f32>,
    #[arg(long)]
    pub learning_rate: Option<f32>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Step cap per episode
    #[arg(long)]
    pub max_steps: Option<usize>,
    /// Episodes between progress lines
    #[arg(long)]
    pub report_every: Option<usize>,
    /// Episodes in the rolling average
    #[arg(long)]
    pub window: Option<usize>,
    /// Width of the shared hidden layer
    #[arg(long)]
    pub hidden: Option<usize>,
    /// Stop once the rolling average reaches this score
    #[arg(long)]
    pub solved_score: Option<f32>,
    /// Greedy episodes to play after training
    #[arg(long, default_value_t = 0)]
    pub eval_episodes: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    app::run(&Args::parse())
}
