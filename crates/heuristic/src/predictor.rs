//! CollegePredictor - rank-based college recommendation
//!
//! ## Algorithm
//! 1. Take the category's cutoff rows, keeping the latest (year, round)
//!    row of every program
//! 2. Score each program's admission chance from the rank
//! 3. Run the filter pipeline (PwD seats, gender pool, unreachable programs)
//! 4. Sort by chance, then by closing rank so that the most competitive of
//!    equally likely programs come first
//! 5. Return the top N

use crate::candidate::{Candidate, Recommendation, RecommendationQuery};
use crate::error::{PredictorError, Result};
use crate::filter_pipeline::FilterPipeline;
use crate::filters::{GenderNeutralFilter, MinimumChanceFilter, NonPwdFilter};
use crate::scoring::admission_chance;
use data_loader::{Column, CutoffIndex, Rank};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Keys of `CollegePredictor::unique_values`
pub const CATEGORIES: &str = "categories";
pub const QUOTAS: &str = "quotas";
pub const GENDERS: &str = "genders";
pub const INSTITUTE_TYPES: &str = "institute_types";
pub const INSTITUTES: &str = "institutes";
pub const BRANCHES: &str = "branches";
pub const YEARS: &str = "years";

/// Heuristic recommender over the historical cutoff table
pub struct CollegePredictor {
    /// Shared reference to the cutoff table (read-only, so no Mutex needed)
    index: Arc<CutoffIndex>,

    /// Option lists precomputed at load time
    unique_values: BTreeMap<String, Vec<String>>,

    filter_pipeline: FilterPipeline,
}

impl CollegePredictor {
    /// Create a predictor over an already loaded table
    ///
    /// The gender pool filter is only installed when the table actually has
    /// a gender-neutral pool.
    pub fn new(index: Arc<CutoffIndex>) -> Self {
        let genders = index.unique_values(Column::Gender);

        let mut filter_pipeline = FilterPipeline::new().add_filter(NonPwdFilter);
        if let Some(filter) = GenderNeutralFilter::detect(&genders) {
            debug!("Restricting recommendations to the '{}' pool", filter.label());
            filter_pipeline = filter_pipeline.add_filter(filter);
        }
        let filter_pipeline = filter_pipeline.add_filter(MinimumChanceFilter::new(0.0));

        let unique_values = compute_unique_values(&index);

        Self {
            index,
            unique_values,
            filter_pipeline,
        }
    }

    /// Load the cutoff table and prepare the predictor
    pub fn load_model_and_data(path: &Path) -> Result<Self> {
        let index = CutoffIndex::load_from_file(path)?;
        let predictor = Self::new(Arc::new(index));
        info!(
            "Heuristic predictor ready with {} categories",
            predictor.categories().len()
        );
        Ok(predictor)
    }

    /// Option lists keyed by `categories`, `quotas`, `genders`,
    /// `institute_types`, `institutes`, `branches` and `years`
    pub fn unique_values(&self) -> &BTreeMap<String, Vec<String>> {
        &self.unique_values
    }

    /// Sorted categories known to the cutoff table
    pub fn categories(&self) -> &[String] {
        self.unique_values
            .get(CATEGORIES)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn index(&self) -> &CutoffIndex {
        &self.index
    }

    /// Recommend up to `top_n` programs for a rank within a category
    #[instrument(skip(self))]
    pub fn get_recommendations_by_rank(
        &self,
        rank: Rank,
        category: &str,
        top_n: usize,
    ) -> Result<Vec<Recommendation>> {
        if rank == 0 {
            return Err(PredictorError::InvalidRank(rank));
        }
        if !self.index.contains_value(Column::Category, category) {
            return Err(PredictorError::UnknownCategory {
                category: category.to_string(),
                valid: self.categories().to_vec(),
            });
        }

        let query = RecommendationQuery::new(rank, category);

        let candidates = self.generate_candidates(&query);
        debug!("Generated {} candidates", candidates.len());

        let mut candidates = self.filter_pipeline.apply(candidates, &query)?;
        rank_candidates(&mut candidates);
        candidates.truncate(top_n);

        debug!("Returning {} recommendations", candidates.len());
        Ok(candidates.into_iter().map(Recommendation::from).collect())
    }

    /// Latest cutoff of every program in the category, scored against the rank
    fn generate_candidates(&self, query: &RecommendationQuery) -> Vec<Candidate> {
        self.index
            .latest_by_program(&query.category)
            .into_par_iter()
            .map(|record| {
                let probability =
                    admission_chance(query.rank, record.opening_rank, record.closing_rank);
                Candidate::new(record.clone(), probability)
            })
            .collect()
    }
}

/// Chance descending, then closing rank ascending, then names
fn rank_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.record.closing_rank.cmp(&b.record.closing_rank))
            .then_with(|| a.record.institute_name.cmp(&b.record.institute_name))
            .then_with(|| a.record.branch.cmp(&b.record.branch))
            .then_with(|| a.record.quota.cmp(&b.record.quota))
            .then_with(|| a.record.gender.cmp(&b.record.gender))
    });
}

fn compute_unique_values(index: &CutoffIndex) -> BTreeMap<String, Vec<String>> {
    let mut values = BTreeMap::new();
    values.insert(CATEGORIES.to_string(), index.unique_values(Column::Category));
    values.insert(QUOTAS.to_string(), index.unique_values(Column::Quota));
    values.insert(GENDERS.to_string(), index.unique_values(Column::Gender));
    values.insert(
        INSTITUTE_TYPES.to_string(),
        index.unique_values(Column::InstituteType),
    );
    values.insert(INSTITUTES.to_string(), index.unique_values(Column::InstituteName));
    values.insert(BRANCHES.to_string(), index.unique_values(Column::Branch));
    values.insert(
        YEARS.to_string(),
        index.years().iter().map(|y| y.to_string()).collect(),
    );
    values
}
