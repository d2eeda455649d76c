//! Candidate and result types for rank-based recommendation.

use data_loader::{CutoffRecord, Rank, Round, Year};
use serde::{Deserialize, Serialize};

/// What the caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationQuery {
    pub rank: Rank,
    pub category: String,
}

impl RecommendationQuery {
    pub fn new(rank: Rank, category: impl Into<String>) -> Self {
        Self {
            rank,
            category: category.into(),
        }
    }
}

/// A program under consideration, with its estimated admission chance.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub record: CutoffRecord,
    /// Admission chance in percent, 0.0 to 99.0
    pub probability: f32,
}

impl Candidate {
    pub fn new(record: CutoffRecord, probability: f32) -> Self {
        Self { record, probability }
    }
}

/// One row of the recommendation list returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub institute_name: String,
    pub institute_type: String,
    pub branch: String,
    pub quota: String,
    pub gender: String,
    pub category: String,
    pub year: Year,
    pub round: Round,
    pub opening_rank: Rank,
    pub closing_rank: Rank,
    pub probability: f32,
}

impl From<Candidate> for Recommendation {
    fn from(candidate: Candidate) -> Self {
        let record = candidate.record;
        Self {
            institute_name: record.institute_name,
            institute_type: record.institute_type,
            branch: record.branch,
            quota: record.quota,
            gender: record.gender,
            category: record.category,
            year: record.year,
            round: record.round,
            opening_rank: record.opening_rank,
            closing_rank: record.closing_rank,
            probability: candidate.probability,
        }
    }
}
