use crate::error::MlError;

/// One environment transition.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Observation of the state after the action.
    pub obs: Vec<f32>,
    pub reward: f32,
    /// The episode ended on this step.
    pub done: bool,
}

/// An episodic task with a fixed observation length and a discrete action set.
///
/// [`reset`] starts an episode and returns its first observation. Every
/// [`step`] consumes one action index and yields the next [`Step`]; an action
/// outside `0..action_size()` or a failure of the underlying simulation is an
/// [`MlError`], never a silently clamped action.
///
/// [`reset`]: Env::reset
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::InvalidAction`] for an action outside
    /// `0..action_size()`, or an error from the underlying simulation.
    fn step(&mut self, action: usize) -> Result<Step, MlError>;

    /// Reset the environment to a starting state and return the initial
    /// observation vector.
    fn reset(&mut self) -> Vec<f32>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Number of discrete actions.
    fn action_size(&self) -> usize;
}
