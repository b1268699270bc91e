//! REST API for climate-data reads.

use crate::error::QueryResult;
use crate::orchestrator::{ReadOrchestrator, ReadParams, ReadResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Read API configuration
#[derive(Debug, Clone)]
pub struct ReadApiConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ReadApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 7000)),
            enable_cors: false,
        }
    }
}

/// Read API server
pub struct ReadApi {
    config: ReadApiConfig,
    orchestrator: Arc<ReadOrchestrator>,
}

/// API state
#[derive(Clone)]
struct ApiState {
    orchestrator: Arc<ReadOrchestrator>,
}

impl ReadApi {
    /// Create a new read API
    pub fn new(config: ReadApiConfig, orchestrator: Arc<ReadOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    /// Serve until `shutdown` resolves
    pub async fn start<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listen_addr = self.config.listen_addr;
        let app = self.router();

        tracing::info!("Starting read API on {}", listen_addr);

        let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let state = ApiState {
            orchestrator: self.orchestrator.clone(),
        };

        let read = Router::new().route("/climate-data", get(read_climate_data));

        let mut router = Router::new()
            .route("/", get(root))
            .nest("/read", read)
            .fallback(not_found)
            .with_state(state);

        // Add middleware
        router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        router
    }
}

/// Liveness handler
async fn root() -> impl IntoResponse {
    (StatusCode::OK, Json("up and running..."))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "page not found" })),
    )
}

/// `GET /read/climate-data`
async fn read_climate_data(
    State(state): State<ApiState>,
    Query(params): Query<ReadParams>,
) -> QueryResult<Json<ReadResponse>> {
    let start = Instant::now();

    match state.orchestrator.execute(&params).await {
        Ok(response) => {
            tracing::info!(
                data_type = params.data_type.as_deref().unwrap_or_default(),
                areas = params.area_id.as_deref().unwrap_or_default(),
                dates = params.date.as_deref().unwrap_or_default(),
                records = response.result.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Request successful"
            );
            Ok(Json(response))
        }
        Err(e) => {
            if e.is_validation() {
                tracing::warn!("Rejected read from table {}: {}", state.orchestrator.table(), e);
            } else {
                tracing::error!(
                    "Error reading areas {:?} and dates {:?}: {}",
                    params.area_id,
                    params.date,
                    e
                );
            }
            Err(e)
        }
    }
}
