use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use kaska_api::KaskaError;
use kaska_api::wire::{
    CreateTopicsResponse, EndOffsetsResponse, GetRequest, GetResponse, LookupResponse,
    PollRequest, PollResponse, SendRequest, SendResponse, TopicListResponse, TopicsRequest,
};

use super::AppState;

/// Only failures of the call itself land here. Missing topics and
/// out-of-range offsets are ordinary 200 bodies.
fn error_response(op: &'static str, e: KaskaError) -> Response {
    tracing::error!(op, error = %e, "contract call failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}

// ═══════════════════════════════════════════════════════════════
//  GET /registry/{name}
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_lookup(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    if name == *state.service_name {
        Json(LookupResponse { name }).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("service '{name}' is not bound") })),
        )
            .into_response()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Contract calls
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_create_topics(
    State(state): State<AppState>,
    Json(req): Json<TopicsRequest>,
) -> Response {
    match state.srv.create_topics(req.topics).await {
        Ok(created) => Json(CreateTopicsResponse { created }).into_response(),
        Err(e) => error_response("create_topics", e),
    }
}

pub(crate) async fn handle_topic_list(State(state): State<AppState>) -> Response {
    match state.srv.topic_list().await {
        Ok(topics) => Json(TopicListResponse { topics }).into_response(),
        Err(e) => error_response("topic_list", e),
    }
}

pub(crate) async fn handle_send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Response {
    match state.srv.send(&req.topic, req.payload).await {
        Ok(ok) => Json(SendResponse { ok }).into_response(),
        Err(e) => error_response("send", e),
    }
}

pub(crate) async fn handle_get(
    State(state): State<AppState>,
    Json(req): Json<GetRequest>,
) -> Response {
    match state.srv.get(&req.topic, req.offset).await {
        Ok(payload) => Json(GetResponse { payload }).into_response(),
        Err(e) => error_response("get", e),
    }
}

pub(crate) async fn handle_end_offsets(
    State(state): State<AppState>,
    Json(req): Json<TopicsRequest>,
) -> Response {
    match state.srv.end_offsets(req.topics).await {
        Ok(offsets) => Json(EndOffsetsResponse { offsets }).into_response(),
        Err(e) => error_response("end_offsets", e),
    }
}

pub(crate) async fn handle_poll(
    State(state): State<AppState>,
    Json(req): Json<PollRequest>,
) -> Response {
    match state.srv.poll(req.offsets).await {
        Ok(records) => Json(PollResponse { records }).into_response(),
        Err(e) => error_response("poll", e),
    }
}
