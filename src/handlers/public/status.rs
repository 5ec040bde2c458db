// handlers/public/status.rs - GET / and GET /health

use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - Service banner
pub async fn root() -> ApiResult<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Ok(ApiResponse::success(json!({
        "name": "CityInfo API",
        "version": version,
        "description": "Cities and their points of interest",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "authenticate": "/api/authentication/authenticate (public - token acquisition)",
            "cities": "/api/cities[/:id] (protected)",
            "points_of_interest": "/api/cities/:cityId/pointsofinterest[/:id] (protected, city claim)",
        }
    })))
}

/// GET /health - Store health
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("database unavailable"))
        }
    }
}
