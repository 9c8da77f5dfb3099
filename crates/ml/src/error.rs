use physics::PhysicsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MlError {
    #[error("observation has {got} values, network expects {expected}")]
    ObservationShape { expected: usize, got: usize },
    #[error("action {action} outside action space of size {size}")]
    InvalidAction { action: usize, size: usize },
    #[error("trajectory has no steps")]
    EmptyTrajectory,
    #[error("length mismatch: {0}")]
    LengthMismatch(&'static str),
    #[error("loss became non-finite ({loss}) in episode {episode}")]
    NonFiniteLoss { episode: usize, loss: f32 },
    #[error("tensor {0} missing from the tensor map")]
    MissingTensor(usize),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("failed to read config")]
    Config(#[from] ConfigError),
    #[error("environment: {0}")]
    Physics(#[from] PhysicsError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
