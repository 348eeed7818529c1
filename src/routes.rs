use axum::{
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::chat::ChatResponse;
use crate::error::ChatResult;
use crate::footer::SiteFooter;
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/chat", post(chat))
        .route("/api/site/footer", get(site_footer));

    match &state.config.server_config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Full application: routes, middleware and state
pub fn build_app(state: AppState) -> Router {
    let max_duration = Duration::from_secs(state.config.server_config.max_duration_secs);

    Router::new()
        .merge(create_routes(&state))
        .layer(TimeoutLayer::new(max_duration))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let agent_service_healthy = state.agent_service.health_check().await.unwrap_or(false);
    Json(json!({
        "status": "ok",
        "agent_service": agent_service_healthy
    }))
}

// Raw bytes rather than `Json<_>`: a body that fails to parse is reported
// by the handler as an unexpected error, not as an extractor rejection
async fn chat(State(state): State<AppState>, body: Bytes) -> ChatResult<Json<ChatResponse>> {
    state.chat.handle(&body).await.map(Json)
}

#[derive(Debug, Deserialize)]
struct FooterQuery {
    #[serde(default)]
    path: Option<String>,
}

async fn site_footer(Query(query): Query<FooterQuery>) -> Json<Option<SiteFooter>> {
    let year = chrono::Utc::now().year();
    Json(SiteFooter::for_path(query.path.as_deref().unwrap_or("/"), year))
}
