//! Filter to remove seats reserved for persons with disability.
//!
//! A rank and category alone do not say whether the candidate is eligible
//! for PwD seats, so the general list only shows open seats.

use crate::candidate::{Candidate, RecommendationQuery};
use crate::traits::Filter;
use anyhow::Result;

/// Removes candidates whose seat is PwD-reserved.
pub struct NonPwdFilter;

impl Filter for NonPwdFilter {
    fn name(&self) -> &str {
        "NonPwdFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _query: &RecommendationQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| !candidate.record.is_pwd)
            .collect())
    }
}
