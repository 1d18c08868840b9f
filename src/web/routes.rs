use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::AppState;
use crate::dispatch::{ConversationEntry, Dispatched};
use crate::telemetry::{TelemetryEvent, TelemetrySnapshot};

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryBody {
    pub history: Vec<ConversationEntry>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusBody {
    pub status: String,
}

pub async fn health() -> &'static str {
    "ok"
}

/// Runs one chat message through the dispatcher, then records the exchange.
/// Blank input touches neither. The log is only locked to append.
pub async fn process_message(state: &AppState, text: &str) -> Option<Dispatched> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let timestamp = state.dispatcher.timestamp();
    let dispatched = state.dispatcher.dispatch(text).await;

    state
        .history
        .lock()
        .await
        .record_exchange(text, &dispatched.response.text, &timestamp);

    state
        .telemetry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .record(TelemetryEvent::from(&dispatched));

    Some(dispatched)
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ErrorBody>)> {
    let Some(dispatched) = process_message(&state, &request.message).await else {
        debug!("Rejected empty chat message");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "No message provided".to_string(),
            }),
        ));
    };

    Ok(Json(ChatReply {
        url: dispatched.response.resolved_url().map(str::to_string),
        response: dispatched.response.text,
        timestamp: state.dispatcher.timestamp(),
    }))
}

pub async fn history(State(state): State<Arc<AppState>>) -> Json<HistoryBody> {
    let log = state.history.lock().await;
    Json(HistoryBody {
        history: log.entries(),
    })
}

pub async fn clear(State(state): State<Arc<AppState>>) -> Json<StatusBody> {
    state.history.lock().await.clear();
    info!("Conversation history cleared");
    Json(StatusBody {
        status: "cleared".to_string(),
    })
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<TelemetrySnapshot> {
    let snapshot = state
        .telemetry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .snapshot();
    Json(snapshot)
}
