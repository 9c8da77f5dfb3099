//! # ML
//!
//! Building blocks for training a lunar-lander policy with REINFORCE and a
//! learned value baseline.
//!
//! -   **Tensors and autodiff:** [`Tensor`] operations record onto a
//!     [`recorder::Recorder`]; a [`tape::Tape`] differentiates them in
//!     reverse, a [`graph::Graph`] is used when only the forward pass matters.
//! -   **Layers and optimizers:** [`nn::Dense`], [`optim::Adam`].
//! -   **Policy:** [`PolicyValueNet`] maps an observation to a
//!     [`Categorical`] action distribution and a state value.
//! -   **Environments:** the [`Env`] trait and [`LunarLanderEnv`].
//! -   **Training:** [`returns`] computes normalized discounted returns,
//!     [`trajectory`] plays episodes, [`ReinforceTrainer`] ties them together.

pub mod config;
pub mod distribution;
pub mod env;
pub mod error;
pub mod graph;
pub mod lunar_lander;
pub mod nn;
pub mod optim;
pub mod policy;
pub mod recorder;
pub mod reinforce;
pub mod returns;
pub mod scores;
pub mod tape;
pub mod tensor;
pub mod trajectory;

pub use config::TrainConfig;
pub use distribution::Categorical;
pub use env::{Env, Step};
pub use error::MlError;
pub use lunar_lander::LunarLanderEnv;
pub use policy::PolicyValueNet;
pub use reinforce::{EpisodeStats, LossBreakdown, ReinforceTrainer, TrainingSummary};
pub use scores::ScoreHistory;
pub use tensor::Tensor;
pub use trajectory::Trajectory;
