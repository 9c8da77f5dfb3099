#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Lander Physics
//!
//! Planar rigid-body dynamics for a lunar-lander control task.
//!
//! This crate is the environment layer under the `ml` crate's training loop.
//! It does one thing: integrate a single hull with a main engine, two
//! orientation engines and two landing legs over flat ground, and report
//! whether the hull is still flying, resting on its legs, crashed or out of
//! the viewport.
//!
//! ## Key Components
//!
//! -   **[`Lander`]:** owns a [`LanderState`] and advances it one frame per
//!     [`Lander::step`] under a [`LanderAction`].
//! -   **[`LanderConfig`]:** gravity, engine strengths, geometry and the
//!     touchdown limits.
//! -   **[`Vec2`]:** the small vector type the integrator works in.
//!
//! ## Usage
//!
//! ```rust
//! use physics::{Lander, LanderAction, LanderConfig, Vec2};
//!
//! let mut lander = Lander::new(LanderConfig::default());
//! lander.reset(Vec2::new(0.5, 0.0));
//! let outcome = lander.step(LanderAction::FireMain).unwrap();
//! assert!(!outcome.status.is_terminal());
//! ```

pub mod error;
pub mod lander;
pub mod types;

pub use error::PhysicsError;
pub use lander::{
    Lander, LanderAction, LanderConfig, LanderState, LanderStatus, StepOutcome, OBSERVATION_SIZE,
};
pub use types::Vec2;
