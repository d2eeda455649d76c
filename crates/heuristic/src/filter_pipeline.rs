//! The FilterPipeline orchestrates multiple filters.

use crate::candidate::{Candidate, RecommendationQuery};
use crate::traits::Filter;
use anyhow::{Context, Result};
use tracing::debug;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(NonPwdFilter)
///     .add_filter(MinimumChanceFilter::new(0.0));
///
/// let filtered = pipeline.apply(candidates, &query)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Names of the configured filters, in application order
    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run the filters in order
    ///
    /// Stops early once nothing is left to filter.
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &RecommendationQuery,
    ) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            if current.is_empty() {
                break;
            }
            let before = current.len();
            current = filter
                .apply(current, query)
                .with_context(|| format!("{} failed", filter.name()))?;
            debug!(
                filter = filter.name(),
                before,
                after = current.len(),
                "Filter applied"
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
