use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}: invalid parameters.")]
    InvalidParameters(&'static str),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}
