//! Resale Price Inference Engine
//!
//! Random forest regression over encoded vehicle features, one independent
//! model per vehicle category.

mod engine;
mod forest;
mod registry;

pub use engine::{ResalePredictor, TrainedModel};
pub use forest::{r_squared, DecisionTreeRegressor, ForestConfig, RandomForestRegressor};
pub use registry::{DatasetSources, ModelRegistry, ModelStatus};

use data_validator::{DatasetError, SchemaError, ValidationError, VehicleCategory};
use feature_engine::EncodingError;
use thiserror::Error;

/// Errors during training or inference
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("Training failed: {0}")]
    Training(String),
    #[error("Query is for a {query} but the model was trained on {model} data")]
    CategoryMismatch {
        model: VehicleCategory,
        query: VehicleCategory,
    },
    #[error("No {category} model available: {reason}")]
    CategoryUnavailable {
        category: VehicleCategory,
        reason: String,
    },
}
