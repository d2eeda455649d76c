//! Error types for the heuristic predictor.

use data_loader::DataLoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    /// The backing cutoff table could not be loaded
    #[error("Failed to load cutoff data: {0}")]
    Load(#[from] DataLoadError),

    /// Category is not present in the cutoff table
    #[error("Unknown category '{category}'. Valid categories: {}", .valid.join(", "))]
    UnknownCategory { category: String, valid: Vec<String> },

    /// Ranks start at 1
    #[error("Rank must be a positive integer, got {0}")]
    InvalidRank(u32),

    /// A filter in the recommendation pipeline failed
    #[error(transparent)]
    Pipeline(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PredictorError>;
