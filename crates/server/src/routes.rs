use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Heuristic recommender
        .route("/api/options", get(handlers::get_options))
        .route("/api/predict", post(handlers::predict))
        // ML admission model
        .route("/api/ml-options", get(handlers::get_ml_options))
        .route("/api/predict-specific", post(handlers::predict_specific))
        .with_state(state)
        .layer(cors)
}
