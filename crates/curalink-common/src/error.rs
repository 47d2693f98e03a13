use thiserror::Error;

#[derive(Debug, Error)]
pub enum CuralinkError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request blocked: {0}")]
    Blocked(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CuralinkError>;
