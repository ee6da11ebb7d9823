use thiserror::Error;

pub type Result<T> = std::result::Result<T, StepFlowError>;

#[derive(Debug, Error)]
pub enum StepFlowError {
    #[error("invalid http method `{0}`")]
    InvalidMethod(String),
    #[error("invalid route key `{0}`")]
    InvalidRouteKey(String),
    #[error("duplicate route `{0}`")]
    DuplicateRoute(String),
    #[error("route `{key}` declares method `{method}`")]
    MethodMismatch { key: String, method: String },
    #[error("handler `{0}` not registered")]
    HandlerNotRegistered(String),
    #[error("step `{step}` emitted undeclared topic `{topic}`")]
    UndeclaredTopic { step: String, topic: String },
    #[error("invalid input for step `{step}`: {message}")]
    InvalidInput {
        step: String,
        message: String,
        path: Vec<String>,
    },
    #[error("state error: {0}")]
    State(String),
    #[error("step `{step}` timed out after {timeout_ms}ms")]
    Timeout { step: String, timeout_ms: u64 },
    #[error("manifest error: {0}")]
    Manifest(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for StepFlowError {
    fn from(error: serde_json::Error) -> Self {
        StepFlowError::Serialization(error.to_string())
    }
}
