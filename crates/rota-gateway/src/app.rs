use axum::{
    routing::{get, post},
    Router,
};
use rota_attribution::OverlapAttributionEngine;
use rota_core::config::RotaConfig;
use rota_source::ScheduleSource;
use std::sync::Arc;

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
///
/// Nothing in here is mutated after startup; each request computes on its
/// own data.
pub struct AppState {
    pub config: RotaConfig,
    pub source: Box<dyn ScheduleSource>,
    pub engine: OverlapAttributionEngine,
}

impl AppState {
    pub fn new(
        config: RotaConfig,
        source: Box<dyn ScheduleSource>,
        engine: OverlapAttributionEngine,
    ) -> Self {
        Self {
            config,
            source,
            engine,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route(
            "/api/v1/compensation",
            post(crate::http::compensation::compensation_handler),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
