//! # Heuristic Crate
//!
//! Rank-based college recommendation over the historical cutoff table.
//!
//! ## Components
//!
//! - **predictor**: `CollegePredictor`, the entry point. Loads the table,
//!   exposes option lists and produces ranked recommendations
//! - **scoring**: maps a rank against opening/closing ranks to a chance
//! - **filters / filter_pipeline**: composable candidate filters
//! - **candidate**: query, candidate and result types
//!
//! ## Example Usage
//!
//! ```ignore
//! use heuristic::CollegePredictor;
//! use std::path::Path;
//!
//! let predictor = CollegePredictor::load_model_and_data(Path::new("data/cutoffs.csv"))?;
//!
//! for rec in predictor.get_recommendations_by_rank(5000, "OPEN", 20)? {
//!     println!("{} - {} ({:.1}%)", rec.institute_name, rec.branch, rec.probability);
//! }
//! ```

// Public modules
pub mod candidate;
pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod predictor;
pub mod scoring;
pub mod traits;

// Re-export commonly used types
pub use candidate::{Candidate, Recommendation, RecommendationQuery};
pub use error::{PredictorError, Result};
pub use filter_pipeline::FilterPipeline;
pub use predictor::CollegePredictor;
pub use traits::Filter;

/// Number of recommendations returned by default
pub const DEFAULT_TOP_N: usize = 20;
