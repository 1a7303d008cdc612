//! Model Status and Retraining Routes

use axum::{extract::State, Json};
use data_validator::VehicleCategory;
use inference_engine::{ModelRegistry, ModelStatus};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::{error::ApiError, AppState};

/// Status of one category's model
#[derive(Debug, Serialize)]
pub struct CategoryStatus {
    pub category: VehicleCategory,
    #[serde(flatten)]
    pub status: ModelStatus,
}

/// Response for the model endpoints
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<CategoryStatus>,
}

impl ModelsResponse {
    fn from_registry(registry: &ModelRegistry) -> Self {
        Self {
            models: VehicleCategory::ALL
                .iter()
                .map(|&category| CategoryStatus {
                    category,
                    status: registry.status(category),
                })
                .collect(),
        }
    }
}

/// Current model availability
pub async fn get_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let registry = state.registry().await;
    Json(ModelsResponse::from_registry(&registry))
}

/// Rebuild both models from the datasets and swap them in
pub async fn retrain(State(state): State<Arc<AppState>>) -> Result<Json<ModelsResponse>, ApiError> {
    info!("Retraining models");
    let registry = Arc::new(state.new_registry());
    let building = Arc::clone(&registry);
    tokio::task::spawn_blocking(move || building.warm_up())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let response = ModelsResponse::from_registry(&registry);
    state.replace_registry(registry).await;
    Ok(Json(response))
}
