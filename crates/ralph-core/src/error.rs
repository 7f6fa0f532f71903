use thiserror::Error;

#[derive(Debug, Error)]
pub enum RalphError {
    #[error("prd not found: {0}")]
    PrdNotFound(String),

    #[error("task count {got} out of range: must be between {min} and {max}")]
    TaskCountOutOfRange { got: u32, min: u32, max: u32 },

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("input rejected: {0}")]
    InputRejected(String),

    #[error("unknown tech stack preset '{0}'")]
    UnknownPreset(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RalphError>;
