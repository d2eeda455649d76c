//! Extension point for candidate filtering.

use crate::candidate::{Candidate, RecommendationQuery};
use anyhow::Result;

/// A step of the recommendation filter pipeline.
///
/// Filters own the candidate list they are given and hand back what survives,
/// so a filter may also rewrite candidates (for example to drop or rescore
/// them). Implementations are shared between request handlers and must be
/// `Send + Sync`.
pub trait Filter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        query: &RecommendationQuery,
    ) -> Result<Vec<Candidate>>;
}
