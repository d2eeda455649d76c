use std::path::Path;
use std::sync::Arc;

use heuristic::{CollegePredictor, DEFAULT_TOP_N};
use ml_model::CollegePredictionModel;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::error::{ApiError, ModelKind};

/// Shared application state for API handlers
///
/// Each predictor is loaded once at startup. A predictor that failed to load
/// stays `None` for the life of the process and only its endpoints report
/// the failure.
#[derive(Clone)]
pub struct AppState {
    pub heuristic: Option<Arc<CollegePredictor>>,
    pub ml: Option<Arc<CollegePredictionModel>>,
    pub top_n: usize,
}

impl AppState {
    pub fn new(
        heuristic: Option<Arc<CollegePredictor>>,
        ml: Option<Arc<CollegePredictionModel>>,
    ) -> Self {
        Self {
            heuristic,
            ml,
            top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Load both predictors independently
    pub fn load(config: &ServerConfig) -> Self {
        Self::new(
            load_heuristic(&config.data_path),
            load_ml(&config.model_path),
        )
        .with_top_n(config.top_n)
    }

    pub fn heuristic(&self) -> Result<&Arc<CollegePredictor>, ApiError> {
        self.heuristic
            .as_ref()
            .ok_or(ApiError::ModelUnavailable(ModelKind::Heuristic))
    }

    pub fn ml(&self) -> Result<&Arc<CollegePredictionModel>, ApiError> {
        self.ml
            .as_ref()
            .ok_or(ApiError::ModelUnavailable(ModelKind::Ml))
    }
}

fn load_heuristic(path: &Path) -> Option<Arc<CollegePredictor>> {
    info!("Loading heuristic predictor from {}", path.display());
    match CollegePredictor::load_model_and_data(path) {
        Ok(predictor) => Some(Arc::new(predictor)),
        Err(e) => {
            error!("Failed to load heuristic predictor: {}", e);
            None
        }
    }
}

fn load_ml(path: &Path) -> Option<Arc<CollegePredictionModel>> {
    info!("Loading ML model from {}", path.display());
    match CollegePredictionModel::load_model(path) {
        Ok(model) => Some(Arc::new(model)),
        Err(e) => {
            error!("Failed to load ML model: {}", e);
            None
        }
    }
}
