use crate::encoder::LabelEncoder;
use crate::ensemble::TreeEnsemble;
use crate::error::{ModelError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Features passed to the regressor as plain numbers
pub const NUMERIC_FEATURES: [&str; 3] = ["year", "round", "is_pwd"];

/// Features passed to the regressor as label-encoder codes
pub const CATEGORICAL_FEATURES: [&str; 6] = [
    "category",
    "quota",
    "gender",
    "institute_type",
    "institute_name",
    "branch",
];

/// Steepness of the rank/cutoff logistic curve
const PROBABILITY_STEEPNESS: f64 = 10.0;
const MIN_PROBABILITY: f64 = 1.0;
const MAX_PROBABILITY: f64 = 99.0;
const HIGH_CHANCE_THRESHOLD: f64 = 70.0;
const MODERATE_CHANCE_THRESHOLD: f64 = 40.0;

/// On-disk form of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_order: Vec<String>,
    pub label_encoders: BTreeMap<String, LabelEncoder>,
    pub regressor: TreeEnsemble,
    /// Regressor was trained on `ln(1 + cutoff)`
    #[serde(default)]
    pub log_target: bool,
}

/// One seat the student wants a prediction for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionQuery {
    pub student_rank: u32,
    pub year: u16,
    pub round: u8,
    pub category: String,
    pub quota: String,
    pub gender: String,
    pub institute_type: String,
    pub institute_name: String,
    pub branch: String,
    pub is_pwd: bool,
}

impl AdmissionQuery {
    fn categorical(&self, feature: &str) -> Option<&str> {
        match feature {
            "category" => Some(&self.category),
            "quota" => Some(&self.quota),
            "gender" => Some(&self.gender),
            "institute_type" => Some(&self.institute_type),
            "institute_name" => Some(&self.institute_name),
            "branch" => Some(&self.branch),
            _ => None,
        }
    }

    fn numeric(&self, feature: &str) -> Option<f64> {
        match feature {
            "year" => Some(f64::from(self.year)),
            "round" => Some(f64::from(self.round)),
            "is_pwd" => Some(if self.is_pwd { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionStatus {
    #[serde(rename = "High Chance")]
    High,
    #[serde(rename = "Moderate Chance")]
    Moderate,
    #[serde(rename = "Low Chance")]
    Low,
}

impl AdmissionStatus {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= HIGH_CHANCE_THRESHOLD {
            Self::High
        } else if probability >= MODERATE_CHANCE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High Chance",
            Self::Moderate => "Moderate Chance",
            Self::Low => "Low Chance",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            Self::High => "Strong chance of admission. This is a safe choice to keep in your list.",
            Self::Moderate => {
                "Reasonable chance of admission. Worth applying, but keep backup options."
            }
            Self::Low => {
                "Admission is unlikely at the predicted cutoff. Treat this as a reach option."
            }
        }
    }
}

impl fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionPrediction {
    pub institute_name: String,
    pub branch: String,
    pub category: String,
    pub year: u16,
    pub round: u8,
    pub student_rank: u32,
    pub predicted_cutoff: u32,
    pub admission_probability: f64,
    pub status: AdmissionStatus,
    pub recommendation: String,
}

/// Tree-ensemble model predicting the closing rank of a single seat
#[derive(Debug, Clone)]
pub struct CollegePredictionModel {
    artifact: ModelArtifact,
}

impl CollegePredictionModel {
    /// Read and validate a model artifact from disk
    pub fn load_model(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&content)?;
        let model = Self::from_artifact(artifact)?;

        info!(
            "Loaded admission model from {} ({} trees, {} features)",
            path.display(),
            model.artifact.regressor.trees.len(),
            model.artifact.feature_order.len()
        );
        Ok(model)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        Self::validate(&artifact)?;
        Ok(Self { artifact })
    }

    fn validate(artifact: &ModelArtifact) -> Result<()> {
        if artifact.feature_order.is_empty() {
            return Err(ModelError::InvalidArtifact(
                "feature_order is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for feature in &artifact.feature_order {
            if !seen.insert(feature.as_str()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "feature '{feature}' appears twice in feature_order"
                )));
            }
            if CATEGORICAL_FEATURES.contains(&feature.as_str()) {
                if !artifact.label_encoders.contains_key(feature) {
                    return Err(ModelError::MissingEncoder(feature.clone()));
                }
            } else if !NUMERIC_FEATURES.contains(&feature.as_str()) {
                return Err(ModelError::InvalidArtifact(format!(
                    "unknown feature '{feature}'"
                )));
            }
        }

        for (feature, encoder) in &artifact.label_encoders {
            if encoder.has_duplicates() {
                return Err(ModelError::InvalidArtifact(format!(
                    "label encoder for '{feature}' has duplicate classes"
                )));
            }
        }

        artifact
            .regressor
            .validate(artifact.feature_order.len())
            .map_err(ModelError::InvalidArtifact)
    }

    /// Encoder classes per feature, in code order
    pub fn options(&self) -> BTreeMap<String, Vec<String>> {
        self.artifact
            .label_encoders
            .iter()
            .map(|(feature, encoder)| (feature.clone(), encoder.classes().to_vec()))
            .collect()
    }

    /// Build the regressor input in `feature_order`
    pub fn encode(&self, query: &AdmissionQuery) -> Result<Vec<f64>> {
        self.artifact
            .feature_order
            .iter()
            .map(|feature| {
                if let Some(value) = query.numeric(feature) {
                    return Ok(value);
                }
                let label = query
                    .categorical(feature)
                    .ok_or_else(|| ModelError::InvalidArtifact(format!("unknown feature '{feature}'")))?;
                let encoder = self
                    .artifact
                    .label_encoders
                    .get(feature)
                    .ok_or_else(|| ModelError::MissingEncoder(feature.clone()))?;
                encoder
                    .transform(label)
                    .map(|code| code as f64)
                    .ok_or_else(|| ModelError::UnknownLabel {
                        feature: feature.clone(),
                        label: label.to_string(),
                    })
            })
            .collect()
    }

    /// Predicted closing rank, at least 1
    pub fn predict_cutoff(&self, query: &AdmissionQuery) -> Result<u32> {
        let features = self.encode(query)?;
        let raw = self.artifact.regressor.predict(&features);
        let cutoff = if self.artifact.log_target {
            raw.exp() - 1.0
        } else {
            raw
        };

        if !cutoff.is_finite() {
            return Err(ModelError::InvalidInput(format!(
                "model produced a non-finite cutoff ({cutoff})"
            )));
        }
        Ok(cutoff.round().clamp(1.0, f64::from(u32::MAX)) as u32)
    }

    pub fn get_admission_probability(&self, query: &AdmissionQuery) -> Result<AdmissionPrediction> {
        if query.student_rank == 0 {
            return Err(ModelError::InvalidInput(
                "student_rank must be a positive integer".to_string(),
            ));
        }

        let predicted_cutoff = self.predict_cutoff(query)?;
        let admission_probability = admission_probability(query.student_rank, predicted_cutoff);
        let status = AdmissionStatus::from_probability(admission_probability);

        debug!(
            institute = %query.institute_name,
            branch = %query.branch,
            rank = query.student_rank,
            predicted_cutoff,
            admission_probability,
            "Admission prediction"
        );

        Ok(AdmissionPrediction {
            institute_name: query.institute_name.clone(),
            branch: query.branch.clone(),
            category: query.category.clone(),
            year: query.year,
            round: query.round,
            student_rank: query.student_rank,
            predicted_cutoff,
            admission_probability,
            status,
            recommendation: status.advice().to_string(),
        })
    }
}

/// Logistic chance of a rank clearing a cutoff, as a percentage with one decimal
pub fn admission_probability(rank: u32, cutoff: u32) -> f64 {
    let ratio = f64::from(rank) / f64::from(cutoff.max(1));
    let probability = 100.0 / (1.0 + (PROBABILITY_STEEPNESS * (ratio - 1.0)).exp());
    let probability = probability.clamp(MIN_PROBABILITY, MAX_PROBABILITY);
    (probability * 10.0).round() / 10.0
}
