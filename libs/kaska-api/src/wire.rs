//! Request/response bodies of the HTTP binding of [`KaskaSrv`](crate::KaskaSrv).
//!
//! Shared by the server (axum extractors) and the client (reqwest bodies) so
//! both ends agree on field names.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Payload, TopicOffset};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResponse {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicsRequest {
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTopicsResponse {
    pub created: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicListResponse {
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    pub topic: String,
    pub payload: Payload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRequest {
    pub topic: String,
    pub offset: u64,
}

/// `payload: null` is the absent marker (topic missing or offset out of range).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub payload: Option<Payload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndOffsetsResponse {
    pub offsets: Vec<TopicOffset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollRequest {
    pub offsets: Vec<TopicOffset>,
}

/// Topics with nothing new are absent from `records`, never mapped to `[]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollResponse {
    pub records: HashMap<String, Vec<Payload>>,
}
