use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysicsError {
    /// An action index outside the lander's engine set.
    InvalidAction(usize),
    /// The lander was stepped after its episode ended; call `reset` first.
    EpisodeOver,
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidAction(a) => {
                write!(f, "invalid lander action {a}, expected 0..{}", crate::LanderAction::COUNT)
            }
            PhysicsError::EpisodeOver => write!(f, "lander stepped after the episode ended"),
        }
    }
}

impl std::error::Error for PhysicsError {}
