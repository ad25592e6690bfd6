use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

const MAX_QUERY_CHARS: usize = 2000;
const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Deserialize)]
pub struct AgentRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AgentResponse {
    pub answer: String,
    pub session_id: String,
    pub intent: String,
    pub routed_via: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCleared {
    pub status: String,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndexInvalidated {
    pub status: String,
    pub collection: String,
}

/// POST /agent
pub async fn handle_agent(
    State(state): State<AppState>,
    payload: Result<Json<AgentRequest>, JsonRejection>,
) -> Result<Json<AgentResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    let query = req.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query must not be empty".to_string()));
    }
    if query.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::Validation(format!(
            "query must be at most {MAX_QUERY_CHARS} characters"
        )));
    }
    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION.to_string());

    let preview: String = query.chars().take(60).collect();
    info!("Agent request: session={session_id} query={preview}");

    let routed = state
        .dispatcher
        .dispatch(query, &session_id, req.job_id.as_deref())
        .await?;

    Ok(Json(AgentResponse {
        answer: routed.answer,
        session_id,
        intent: routed.intent,
        routed_via: routed.routed_via.as_str().to_string(),
    }))
}

/// DELETE /session/:id
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SessionCleared> {
    state.sessions.remove(&session_id);
    Json(SessionCleared {
        status: "ok".to_string(),
        session_id,
    })
}

/// POST /index/:collection/invalidate
pub async fn handle_invalidate_index(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Json<IndexInvalidated> {
    state.indexes.invalidate(&collection);
    Json(IndexInvalidated {
        status: "ok".to_string(),
        collection,
    })
}
