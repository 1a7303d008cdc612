//! Per-Category Model Registry
//!
//! Each category's model is built at most once per registry, on first use.
//! A build that fails is remembered too: that category stays unavailable
//! rather than being retried or predicted from partial data. Replacing the
//! models means building a new registry.

use crate::engine::{ResalePredictor, TrainedModel};
use crate::forest::ForestConfig;
use crate::InferenceError;
use data_validator::{load_csv, normalize_now, ColumnAliases, VehicleCategory, VehicleQuery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Where the training datasets live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSources {
    pub bikes_path: PathBuf,
    pub cars_path: PathBuf,
}

impl Default for DatasetSources {
    fn default() -> Self {
        Self {
            bikes_path: PathBuf::from("data/used_bikes.csv"),
            cars_path: PathBuf::from("data/used_cars.csv"),
        }
    }
}

impl DatasetSources {
    /// Dataset path for a category
    pub fn path(&self, category: VehicleCategory) -> &PathBuf {
        match category {
            VehicleCategory::Car => &self.cars_path,
            VehicleCategory::Bike => &self.bikes_path,
        }
    }
}

/// Availability of one category's model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelStatus {
    /// Not built yet
    NotLoaded,
    /// Trained and serving
    Ready {
        training_rows: usize,
        columns: Vec<String>,
        training_r2: f64,
    },
    /// Build failed; category is not offered
    Unavailable { reason: String },
}

type Slot = OnceLock<Result<Arc<TrainedModel>, InferenceError>>;

/// Lazily initialized, read-only pair of resale models
#[derive(Debug)]
pub struct ModelRegistry {
    sources: DatasetSources,
    aliases: ColumnAliases,
    predictor: ResalePredictor,
    car: Slot,
    bike: Slot,
}

impl ModelRegistry {
    /// Create a registry. Nothing is loaded until a model is requested.
    pub fn new(sources: DatasetSources, config: ForestConfig) -> Self {
        Self {
            sources,
            aliases: ColumnAliases::default(),
            predictor: ResalePredictor::new(config),
            car: OnceLock::new(),
            bike: OnceLock::new(),
        }
    }

    fn slot(&self, category: VehicleCategory) -> &Slot {
        match category {
            VehicleCategory::Car => &self.car,
            VehicleCategory::Bike => &self.bike,
        }
    }

    /// Model for a category, building it on first access
    pub fn model(&self, category: VehicleCategory) -> Result<Arc<TrainedModel>, InferenceError> {
        let slot = self.slot(category).get_or_init(|| {
            self.build(category).map(Arc::new).inspect_err(|e| {
                warn!("{} model unavailable: {}", category, e);
            })
        });
        match slot {
            Ok(model) => Ok(Arc::clone(model)),
            Err(e) => Err(InferenceError::CategoryUnavailable {
                category,
                reason: e.to_string(),
            }),
        }
    }

    /// Predict a resale price with the query's category model
    pub fn predict(&self, query: &VehicleQuery) -> Result<f64, InferenceError> {
        self.model(query.category)?.predict_query(query)
    }

    /// Build every category now and report which are available
    pub fn warm_up(&self) -> Vec<(VehicleCategory, ModelStatus)> {
        VehicleCategory::ALL
            .iter()
            .map(|&category| {
                let _ = self.model(category);
                (category, self.status(category))
            })
            .collect()
    }

    /// Current status without triggering a build
    pub fn status(&self, category: VehicleCategory) -> ModelStatus {
        match self.slot(category).get() {
            None => ModelStatus::NotLoaded,
            Some(Ok(model)) => ModelStatus::Ready {
                training_rows: model.training_rows(),
                columns: model.layout().names().to_vec(),
                training_r2: model.training_r2(),
            },
            Some(Err(e)) => ModelStatus::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    fn build(&self, category: VehicleCategory) -> Result<TrainedModel, InferenceError> {
        let path = self.sources.path(category);
        info!("Building {} model from {}", category, path.display());
        let table = load_csv(path)?;
        let table = normalize_now(table, &self.aliases);
        self.predictor.train(category, &table)
    }
}
