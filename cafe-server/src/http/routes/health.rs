//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::repos::CafeRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub cafes: i64,
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let cafes = CafeRepo::new(&state.pool).count().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cafes,
    }))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    #[tokio::test]
    async fn health_returns_ok() {
        let pool = create_memory_pool().await.unwrap();
        let state = Arc::new(AppState::new(pool));

        let Json(body) = health(State(state)).await.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.cafes, 0);
    }
}
