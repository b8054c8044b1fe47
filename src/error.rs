use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Featurization failed: {0}")]
    Featurization(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Evaluation failed: {0}")]
    Evaluation(String),

    #[error("Invalid model file: {0}")]
    Model(String),

    #[error("Model schema mismatch: {0}")]
    SchemaMismatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
