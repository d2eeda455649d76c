//! Filter to keep gender-neutral seat pools only.
//!
//! Female-only supernumerary seats usually close at much worse ranks than
//! the gender-neutral pool. Without knowing the candidate's gender they
//! would make the list look more optimistic than it is.

use crate::candidate::{Candidate, RecommendationQuery};
use crate::traits::Filter;
use anyhow::Result;

/// Keeps candidates from the seat pool labelled `label`.
pub struct GenderNeutralFilter {
    label: String,
}

impl GenderNeutralFilter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Find the gender-neutral label among the table's gender values
    ///
    /// Returns `None` when the table has no such pool, in which case the
    /// filter should not be installed at all.
    pub fn detect<'a>(genders: impl IntoIterator<Item = &'a String>) -> Option<Self> {
        genders
            .into_iter()
            .find(|gender| gender.to_lowercase().contains("neutral"))
            .map(|label| Self::new(label.as_str()))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Filter for GenderNeutralFilter {
    fn name(&self) -> &str {
        "GenderNeutralFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _query: &RecommendationQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.record.gender == self.label)
            .collect())
    }
}
