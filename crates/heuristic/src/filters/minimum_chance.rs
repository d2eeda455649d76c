//! Filter to drop programs that are out of reach.

use crate::candidate::{Candidate, RecommendationQuery};
use crate::traits::Filter;
use anyhow::Result;

/// Removes candidates whose admission chance is not above `min_chance`.
pub struct MinimumChanceFilter {
    min_chance: f32,
}

impl MinimumChanceFilter {
    /// `min_chance` is a percentage; `0.0` keeps every reachable program
    pub fn new(min_chance: f32) -> Self {
        Self { min_chance }
    }
}

impl Filter for MinimumChanceFilter {
    fn name(&self) -> &str {
        "MinimumChanceFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _query: &RecommendationQuery,
    ) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| candidate.probability > self.min_chance)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::CutoffRecord;

    fn candidate(probability: f32) -> Candidate {
        Candidate::new(
            CutoffRecord {
                year: 2023,
                round: 1,
                institute_type: "GFTI".to_string(),
                institute_name: "Assam University".to_string(),
                branch: "Agricultural Engineering".to_string(),
                quota: "OS".to_string(),
                category: "OPEN".to_string(),
                gender: "Gender-Neutral".to_string(),
                is_pwd: false,
                opening_rank: 30000,
                closing_rank: 45000,
            },
            probability,
        )
    }

    #[test]
    fn test_minimum_chance_filter() {
        let query = RecommendationQuery::new(40000, "OPEN");
        let candidates = vec![candidate(0.0), candidate(5.0), candidate(72.3)];

        let filtered = MinimumChanceFilter::new(0.0).apply(candidates.clone(), &query).unwrap();
        assert_eq!(filtered.len(), 2);

        let filtered = MinimumChanceFilter::new(50.0).apply(candidates, &query).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].probability, 72.3);
    }
}
