//! Vehicle Pricing API Server
//!
//! REST API for used-vehicle resale predictions and new-vehicle GST quotes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use data_validator::VehicleCategory;
use inference_engine::{ModelRegistry, ModelStatus};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
mod extract;
mod routes;

pub use config::AppConfig;
pub use error::{ApiError, ConfigError};

/// Application state shared across handlers
pub struct AppState {
    /// Current model pair; replaced wholesale on retrain
    models: RwLock<Arc<ModelRegistry>>,
    /// Service configuration
    pub config: AppConfig,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create state with an untrained registry; models build on first use
    pub fn new(config: AppConfig) -> Self {
        let registry = ModelRegistry::new(config.data.clone(), config.forest.clone());
        Self {
            models: RwLock::new(Arc::new(registry)),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Create state and train both models before returning
    pub async fn initialize(config: AppConfig) -> Self {
        let state = Self::new(config);
        let registry = state.registry().await;
        match tokio::task::spawn_blocking(move || registry.warm_up()).await {
            Ok(statuses) => {
                for (category, status) in statuses {
                    match status {
                        ModelStatus::Unavailable { reason } => {
                            warn!("{} predictions disabled: {}", category, reason)
                        }
                        _ => info!("{} model ready", category),
                    }
                }
            }
            Err(e) => warn!("Model warm-up task failed: {}", e),
        }
        state
    }

    /// Snapshot of the current registry
    pub async fn registry(&self) -> Arc<ModelRegistry> {
        Arc::clone(&*self.models.read().await)
    }

    /// Fresh, empty registry built from the configured sources
    pub fn new_registry(&self) -> ModelRegistry {
        ModelRegistry::new(self.config.data.clone(), self.config.forest.clone())
    }

    /// Swap in a new registry; in-flight requests keep the old one
    pub async fn replace_registry(&self, registry: Arc<ModelRegistry>) {
        *self.models.write().await = registry;
        info!("Model registry replaced");
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub car_model: ComponentHealth,
    pub bike_model: ComponentHealth,
    pub tax_calculator: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: Option<String>,
}

impl From<ModelStatus> for ComponentHealth {
    fn from(status: ModelStatus) -> Self {
        match status {
            ModelStatus::NotLoaded => ComponentHealth {
                status: "not_loaded".to_string(),
                detail: None,
            },
            ModelStatus::Ready { training_rows, .. } => ComponentHealth {
                status: "ok".to_string(),
                detail: Some(format!("{training_rows} training rows")),
            },
            ModelStatus::Unavailable { reason } => ComponentHealth {
                status: "unavailable".to_string(),
                detail: Some(reason),
            },
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let permissive_cors = state.config.server.permissive_cors;
    let router = Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/predictions/used", post(routes::predictions::predict_used))
        .route("/api/v1/quotes/new", post(routes::quotes::quote_new))
        .route("/api/v1/models", get(routes::models::get_models))
        .route("/api/v1/models/retrain", post(routes::models::retrain))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if permissive_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let registry = state.registry().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let car_model = ComponentHealth::from(registry.status(VehicleCategory::Car));
    let bike_model = ComponentHealth::from(registry.status(VehicleCategory::Bike));
    let degraded = car_model.status == "unavailable" || bike_model.status == "unavailable";

    Json(HealthResponse {
        status: if degraded { "degraded" } else { "healthy" }.to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            car_model,
            bike_model,
            tax_calculator: ComponentHealth {
                status: "ok".to_string(),
                detail: None,
            },
        },
    })
}

/// Initialize logging
pub fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        warn!("Tracing subscriber already installed");
    }
}

/// Train the models and serve until the listener fails
pub async fn run_server(config: AppConfig) -> std::io::Result<()> {
    let addr = config.server.bind_addr.clone();
    let state = Arc::new(AppState::initialize(config).await);
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
