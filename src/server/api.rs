use crate::assistant::{ AssistantProxy, ProxyOutcome };
use crate::models::chat::{ ChatRequest, DEFAULT_LOCATION };
use crate::models::signup::{ SignupAccepted, SignupRejected, SignupRequest };
use crate::safety::{ AlertFeed, AlertFilter, SafetyDataProvider };
use crate::safety::model::Alert;

use std::sync::Arc;
use axum::{
    routing::{ get, post },
    Router,
    Json,
    extract::{ State, Query },
    extract::rejection::JsonRejection,
    response::{ IntoResponse, Response },
    http::StatusCode,
};
use serde::{ Deserialize, Serialize };
use serde_json::json;
use tower_http::cors::{ Any, CorsLayer };
use log::{ info, warn, error };

#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<AssistantProxy>,
    pub data: Arc<dyn SafetyDataProvider>,
}

#[derive(Deserialize)]
pub struct AlertsQuery {
    pub filter: Option<String>,
}

#[derive(Deserialize)]
pub struct SafetyScoreQuery {
    pub location: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertsResponse {
    alerts: Vec<Alert>,
    unread_count: usize,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/signup", post(signup_handler))
        .route("/api/alerts", get(alerts_handler))
        .route("/api/trips", get(trips_handler))
        .route("/api/itinerary", get(itinerary_handler))
        .route("/api/safety-score", get(safety_score_handler))
        .route("/api/contacts", get(contacts_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Server error" }))).into_response()
}

async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>
) -> Response {
    let outcome = match payload {
        Ok(Json(req)) => state.proxy.answer(&req).await,
        Err(e) => {
            error!("Rejected chat request body: {}", e);
            ProxyOutcome::Fallback
        }
    };

    let code = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(json!({ "reply": outcome.into_reply() }))).into_response()
}

async fn signup_handler(payload: Result<Json<SignupRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(e) => {
            warn!("Rejected signup body: {}", e);
            return server_error();
        }
    };

    if !req.is_complete() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SignupRejected { error: "Missing fields" }),
        ).into_response();
    }

    info!("Signup accepted (not persisted)");
    (StatusCode::CREATED, Json(SignupAccepted { ok: true })).into_response()
}

async fn alerts_handler(
    State(state): State<AppState>,
    Query(query): Query<AlertsQuery>
) -> Response {
    let filter: AlertFilter = match query.filter.as_deref().unwrap_or("all").parse() {
        Ok(f) => f,
        Err(msg) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
        }
    };

    match state.data.fetch_alerts().await {
        Ok(alerts) => {
            let feed = AlertFeed::new(alerts);
            let body = AlertsResponse {
                alerts: feed.filter(filter).into_iter().cloned().collect(),
                unread_count: feed.unread_count(),
            };
            Json(body).into_response()
        }
        Err(e) => {
            error!("Failed to fetch alerts: {}", e);
            server_error()
        }
    }
}

async fn trips_handler(State(state): State<AppState>) -> Response {
    match state.data.fetch_trips().await {
        Ok(trips) => Json(trips).into_response(),
        Err(e) => {
            error!("Failed to fetch trips: {}", e);
            server_error()
        }
    }
}

async fn itinerary_handler(State(state): State<AppState>) -> Response {
    match state.data.fetch_itinerary().await {
        Ok(days) => Json(days).into_response(),
        Err(e) => {
            error!("Failed to fetch itinerary: {}", e);
            server_error()
        }
    }
}

async fn safety_score_handler(
    State(state): State<AppState>,
    Query(query): Query<SafetyScoreQuery>
) -> Response {
    let location = query.location
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    match state.data.fetch_safety_score(&location).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("Failed to score '{}': {}", location, e);
            server_error()
        }
    }
}

async fn contacts_handler(State(state): State<AppState>) -> Response {
    match state.data.fetch_contacts().await {
        Ok(contacts) => Json(contacts).into_response(),
        Err(e) => {
            error!("Failed to fetch contacts: {}", e);
            server_error()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
