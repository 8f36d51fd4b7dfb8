use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use kaska_api::wire::{
    CreateTopicsResponse, EndOffsetsResponse, GetRequest, GetResponse, LookupResponse,
    PollRequest, PollResponse, SendRequest, SendResponse, TopicListResponse, TopicsRequest,
};
use kaska_api::{KaskaError, KaskaFuture, KaskaSrv, Payload, TopicOffset};

// ═══════════════════════════════════════════════════════════════
//  HttpKaskaSrv — KaskaSrv over the broker's HTTP binding
// ═══════════════════════════════════════════════════════════════

/// Handle to a remote broker, bound to one service name.
///
/// Obtain it with [`HttpKaskaSrv::lookup`], which fails unless the broker
/// at `base_url` has the name bound.
#[derive(Debug, Clone)]
pub struct HttpKaskaSrv {
    http: reqwest::Client,
    service_url: String,
}

impl HttpKaskaSrv {
    /// Resolve `name` at `base_url` (e.g. `http://127.0.0.1:9092`).
    pub async fn lookup(base_url: &str, name: &str) -> Result<Self, KaskaError> {
        let base_url = base_url.trim_end_matches('/');
        let http = reqwest::Client::new();

        let url = format!("{base_url}/registry/{name}");
        let resp = http
            .get(&url)
            .send()
            .await
            .map_err(|e| KaskaError::transport(format!("lookup {url}: {e}")))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(KaskaError::not_bound(name));
        }
        let found: LookupResponse = decode_response(resp).await.map_err(|e| e.with_context("lookup"))?;
        tracing::debug!(service = %found.name, %base_url, "resolved broker");

        Ok(Self {
            http,
            service_url: format!("{base_url}/{name}"),
        })
    }

    async fn post<Req, Resp>(&self, op: &'static str, body: &Req) -> Result<Resp, KaskaError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/{op}", self.service_url);
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| KaskaError::transport(format!("{op}: {e}")))?;
        decode_response(resp).await.map_err(|e| e.with_context(op))
    }

    async fn get_json<Resp: DeserializeOwned>(&self, op: &'static str) -> Result<Resp, KaskaError> {
        let url = format!("{}/{op}", self.service_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| KaskaError::transport(format!("{op}: {e}")))?;
        decode_response(resp).await.map_err(|e| e.with_context(op))
    }
}

async fn decode_response<Resp: DeserializeOwned>(resp: reqwest::Response) -> Result<Resp, KaskaError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(KaskaError::transport(format!("HTTP {status}: {body}")));
    }
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| KaskaError::transport(format!("read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| KaskaError::protocol(format!("parse body: {e}")))
}

impl KaskaSrv for HttpKaskaSrv {
    fn create_topics(&self, topics: Vec<String>) -> KaskaFuture<'_, usize> {
        Box::pin(async move {
            let resp: CreateTopicsResponse = self.post("create_topics", &TopicsRequest { topics }).await?;
            Ok(resp.created)
        })
    }

    fn topic_list(&self) -> KaskaFuture<'_, Vec<String>> {
        Box::pin(async move {
            let resp: TopicListResponse = self.get_json("topics").await?;
            Ok(resp.topics)
        })
    }

    fn send(&self, topic: &str, payload: Payload) -> KaskaFuture<'_, bool> {
        let req = SendRequest { topic: topic.to_string(), payload };
        Box::pin(async move {
            let resp: SendResponse = self.post("send", &req).await?;
            Ok(resp.ok)
        })
    }

    fn get(&self, topic: &str, offset: u64) -> KaskaFuture<'_, Option<Payload>> {
        let req = GetRequest { topic: topic.to_string(), offset };
        Box::pin(async move {
            let resp: GetResponse = self.post("get", &req).await?;
            Ok(resp.payload)
        })
    }

    fn end_offsets(&self, topics: Vec<String>) -> KaskaFuture<'_, Vec<TopicOffset>> {
        Box::pin(async move {
            let resp: EndOffsetsResponse = self.post("end_offsets", &TopicsRequest { topics }).await?;
            Ok(resp.offsets)
        })
    }

    fn poll(&self, offsets: Vec<TopicOffset>) -> KaskaFuture<'_, HashMap<String, Vec<Payload>>> {
        Box::pin(async move {
            let resp: PollResponse = self.post("poll", &PollRequest { offsets }).await?;
            Ok(resp.records)
        })
    }
}
