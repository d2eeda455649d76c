use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Json, body::Bytes, extract::State};
use heuristic::{CollegePredictor, Recommendation};
use ml_model::{AdmissionPrediction, AdmissionQuery};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::request::{RecommendationRequest, SpecificPredictionRequest, parse_object};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
    pub predictions: Vec<Recommendation>,
}

/// Run CPU-bound predictor work off the async executor
async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::Internal(format!("prediction task panicked: {e}")))?
}

/// GET /api/options
pub async fn get_options(State(state): State<AppState>) -> Result<Json<OptionsResponse>, ApiError> {
    let predictor = state.heuristic()?;
    Ok(Json(OptionsResponse {
        categories: predictor.categories().to_vec(),
    }))
}

/// POST /api/predict
///
/// Every failure, bad input included, is a 500 on this endpoint.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictionsResponse>, ApiError> {
    let predictor = state.heuristic()?.clone();
    let predictions = recommend(predictor, &body, state.top_n)
        .await
        .map_err(ApiError::into_server_error)?;

    info!("Returning {} recommendations", predictions.len());
    Ok(Json(PredictionsResponse { predictions }))
}

async fn recommend(
    predictor: Arc<CollegePredictor>,
    body: &[u8],
    top_n: usize,
) -> Result<Vec<Recommendation>, ApiError> {
    let request = RecommendationRequest::from_fields(&parse_object(body)?)?;

    debug!(rank = request.rank, category = %request.category, "Recommendation request");
    run_blocking(move || {
        predictor
            .get_recommendations_by_rank(request.rank, &request.category, top_n)
            .map_err(ApiError::from)
    })
    .await
}

/// GET /api/ml-options
pub async fn get_ml_options(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Vec<String>>>, ApiError> {
    Ok(Json(state.ml()?.options()))
}

/// POST /api/predict-specific
pub async fn predict_specific(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AdmissionPrediction>, ApiError> {
    let model = state.ml()?.clone();
    let query = AdmissionQuery::from(SpecificPredictionRequest::from_fields(&parse_object(
        &body,
    )?)?);

    debug!(
        rank = query.student_rank,
        institute = %query.institute_name,
        branch = %query.branch,
        "Specific prediction request"
    );
    let prediction = run_blocking(move || {
        model
            .get_admission_probability(&query)
            .map_err(ApiError::from)
    })
    .await?;

    Ok(Json(prediction))
}
