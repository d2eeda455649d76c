//! Admission model for a single institute/branch/category seat.
//!
//! The trained model is a JSON artifact holding the feature order, one label
//! encoder per categorical feature and a tree ensemble that predicts the
//! closing rank. The student's rank is compared against that cutoff to give
//! an admission probability.

pub mod encoder;
pub mod ensemble;
pub mod error;
pub mod model;

pub use encoder::LabelEncoder;
pub use ensemble::{Aggregation, Node, RegressionTree, TreeEnsemble};
pub use error::{ModelError, Result};
pub use model::{
    admission_probability, AdmissionPrediction, AdmissionQuery, AdmissionStatus,
    CollegePredictionModel, ModelArtifact, CATEGORICAL_FEATURES, NUMERIC_FEATURES,
};
