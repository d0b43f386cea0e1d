pub mod car_routes;
pub mod recommendation_routes;

use axum::{extract::State, middleware, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::{cors_layer, rate_limit_middleware};
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/recommendations",
            recommendation_routes::create_recommendation_router(),
        )
        .nest("/api/cars", car_routes::create_car_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "inventory_backend": state.repository.backend(),
        "cache_enabled": state.cache.is_enabled(),
        "cache_connected": state.cache.is_connected().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
