//! Resale Price Model

use crate::forest::{ForestConfig, RandomForestRegressor};
use crate::InferenceError;
use data_validator::{Table, Validator, VehicleCategory, VehicleQuery};
use feature_engine::{ColumnLayout, FeatureEncoder, FeatureVector, FieldSpec, Record};
use ndarray::{Array1, Array2, ArrayView1};
use std::time::Instant;
use tracing::{debug, info};

/// A fitted forest together with the column layout it was trained on.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    category: VehicleCategory,
    layout: ColumnLayout,
    forest: RandomForestRegressor,
    training_rows: usize,
    training_r2: f64,
}

impl TrainedModel {
    /// Fit a model from an already encoded training matrix
    pub fn train(
        category: VehicleCategory,
        x: &Array2<f64>,
        y: &Array1<f64>,
        layout: ColumnLayout,
        config: &ForestConfig,
    ) -> Result<Self, InferenceError> {
        if x.ncols() != layout.len() {
            return Err(InferenceError::Training(format!(
                "matrix has {} columns but layout has {}",
                x.ncols(),
                layout.len()
            )));
        }

        let forest = RandomForestRegressor::fit(x, y, config)?;
        let training_r2 = forest.score(x, y);

        Ok(Self {
            category,
            layout,
            forest,
            training_rows: x.nrows(),
            training_r2,
        })
    }

    /// Predict a price for a vector encoded against this model's layout
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, InferenceError> {
        self.layout.check(features)?;
        let sample = ArrayView1::from(features.values());
        Ok(self.forest.predict_one(sample))
    }

    /// Validate, encode, and predict a used-vehicle query
    pub fn predict_query(&self, query: &VehicleQuery) -> Result<f64, InferenceError> {
        if query.category != self.category {
            return Err(InferenceError::CategoryMismatch {
                model: self.category,
                query: query.category,
            });
        }
        Validator::new().validate_query(query)?;

        let features = FeatureEncoder::new().encode(&Record::from_query(query), &self.layout)?;
        let price = self.predict(&features)?;
        debug!("Predicted {} resale price {:.0} for {:?}", self.category, price, query);
        Ok(price)
    }

    pub fn category(&self) -> VehicleCategory {
        self.category
    }

    /// Frozen column layout
    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Number of rows the model was trained on
    pub fn training_rows(&self) -> usize {
        self.training_rows
    }

    /// R² on the training data
    pub fn training_r2(&self) -> f64 {
        self.training_r2
    }
}

/// Trains per-category models from normalized datasets
#[derive(Debug, Clone, Default)]
pub struct ResalePredictor {
    config: ForestConfig,
}

impl ResalePredictor {
    /// Create a predictor with the given forest settings
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Train a model for `category` from a normalized table
    pub fn train(
        &self,
        category: VehicleCategory,
        table: &Table,
    ) -> Result<TrainedModel, InferenceError> {
        let start = Instant::now();
        let spec = FieldSpec::for_category(category);
        table.require_columns(&spec.required_columns())?;

        let encoder = FeatureEncoder::new();
        let layout = encoder.fit_columns(table, &spec)?;
        let (x, y) = encoder.training_matrix(table, &spec, &layout)?;
        let model = TrainedModel::train(category, &x, &y, layout, &self.config)?;

        info!(
            "Trained {} model: {} rows, {} columns, {} trees, R²={:.3} in {}ms",
            category,
            model.training_rows(),
            model.layout().len(),
            self.config.n_estimators,
            model.training_r2(),
            start.elapsed().as_millis()
        );
        Ok(model)
    }
}
