use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::error::GenerateError;
use crate::generate::generate_campaign;
use crate::providers::DynProvider;
use crate::store::DynStore;

#[derive(Clone)]
pub struct AppState {
    pub provider: DynProvider,
    pub store: DynStore,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/generate", post(generate))
        .route("/campaigns", get(list_campaigns))
        .route("/campaigns/{slug}", get(campaign_by_slug))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// `POST /generate` with `{ "topic": "..." }`. A missing body, non-JSON body,
/// or non-string topic is the caller's mistake and is rejected before any
/// remote call.
async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let topic = payload
        .ok()
        .and_then(|Json(v)| v.get("topic").and_then(Value::as_str).map(str::to_string));

    let Some(topic) = topic else {
        return GenerateError::InvalidTopic.into_response();
    };

    match generate_campaign(&state.provider, &state.store, &topic).await {
        Ok(campaign) => (StatusCode::CREATED, Json(campaign)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Listing for the storefront index, creation-descending.
async fn list_campaigns(State(state): State<AppState>) -> Response {
    match state.store.list().await {
        Ok(items) => Json(items).into_response(),
        Err(err) => GenerateError::Store(err).into_response(),
    }
}

/// Detail lookup for the storefront campaign page.
async fn campaign_by_slug(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.store.get_by_slug(&slug).await {
        Ok(Some(campaign)) => Json(campaign).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "campaign not found" })),
        )
            .into_response(),
        Err(err) => GenerateError::Store(err).into_response(),
    }
}
