//! HTTP API for the college recommender.
//!
//! Two independently loaded predictors sit behind four JSON endpoints:
//!
//! - `GET /api/options`, `POST /api/predict`: heuristic recommendations
//!   from historical cutoffs
//! - `GET /api/ml-options`, `POST /api/predict-specific`: ML admission
//!   probability for one seat

pub mod config;
pub mod error;
pub mod handlers;
pub mod request;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ModelKind};
pub use request::{FieldError, RecommendationRequest, SpecificPredictionRequest};
pub use routes::create_router;
pub use state::AppState;
