use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON: {0}")]
    Bson(#[from] bson::error::Error),

    #[error("Topology error: {0}")]
    Topology(String),

    #[error("No primary server available")]
    NoPrimary,

    #[error("Invalid read preference: {0}")]
    InvalidReadPreference(String),

    #[error("Invalid index spec: {0}")]
    InvalidIndexSpec(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Config error: {0}")]
    Config(String),
}
