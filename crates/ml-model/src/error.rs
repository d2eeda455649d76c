use thiserror::Error;

/// Errors that can occur when loading or querying the admission model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Model has no label encoder for feature '{0}'")]
    MissingEncoder(String),

    /// The label was never seen while the model was trained
    #[error("Unknown {feature} '{label}': not one of the values the model was trained on")]
    UnknownLabel { feature: String, label: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
