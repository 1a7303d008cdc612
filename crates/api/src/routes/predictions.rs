//! Used-Vehicle Prediction Routes

use axum::{extract::State, Json};
use data_validator::{VehicleCategory, VehicleQuery};
use serde::Serialize;
use std::sync::Arc;
use tax_engine::format_rupees;

use crate::{error::ApiError, extract::ApiJson, AppState};

/// Response for the used-vehicle prediction endpoint
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub category: VehicleCategory,
    pub predicted_price: f64,
    /// Display string, e.g. "₹485,000"
    pub formatted: String,
}

/// Predict a used vehicle's resale price
pub async fn predict_used(
    State(state): State<Arc<AppState>>,
    ApiJson(query): ApiJson<VehicleQuery>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let registry = state.registry().await;
    let category = query.category;

    let predicted_price = tokio::task::spawn_blocking(move || registry.predict(&query))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(PredictionResponse {
        category,
        predicted_price,
        formatted: format_rupees(predicted_price),
    }))
}
