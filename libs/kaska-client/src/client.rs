use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde::de::DeserializeOwned;

use kaska_api::{DEFAULT_SERVICE_NAME, KaskaError, KaskaSrv, Payload, Record, TopicOffset};

use crate::codec::{Codec, JsonCodec};
use crate::remote::HttpKaskaSrv;

// ═══════════════════════════════════════════════════════════════
//  KaskaClient
// ═══════════════════════════════════════════════════════════════

/// Stateful consumer/producer on top of the broker's stateless contract.
///
/// Subscriptions and read offsets live here and nowhere else; the broker
/// has no idea who is reading what. Methods that move offsets take
/// `&mut self`, so one client is one reader.
pub struct KaskaClient<S = HttpKaskaSrv, C = JsonCodec> {
    srv: S,
    codec: C,
    /// topic → next offset to read
    subscriptions: HashMap<String, u64>,
}

impl KaskaClient<HttpKaskaSrv, JsonCodec> {
    /// Resolve the default service name at `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self, KaskaError> {
        Self::connect_named(host, port, DEFAULT_SERVICE_NAME).await
    }

    /// Resolve `name` at `host:port`. Fails if nothing is bound under it.
    pub async fn connect_named(host: &str, port: u16, name: &str) -> Result<Self, KaskaError> {
        let srv = HttpKaskaSrv::lookup(&format!("http://{host}:{port}"), name).await?;
        Ok(Self::with_service(srv))
    }
}

impl<S: KaskaSrv> KaskaClient<S, JsonCodec> {
    pub fn with_service(srv: S) -> Self {
        Self::with_codec(srv, JsonCodec)
    }
}

impl<S: KaskaSrv, C: Codec> KaskaClient<S, C> {
    pub fn with_codec(srv: S, codec: C) -> Self {
        Self {
            srv,
            codec,
            subscriptions: HashMap::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.srv
    }

    // --- passthroughs ---

    /// Create topics, counting each distinct name once. Returns how many
    /// were new on the broker.
    pub async fn create_topics<I, T>(&self, topics: I) -> Result<usize, KaskaError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let unique: HashSet<String> = topics.into_iter().map(Into::into).collect();
        self.srv.create_topics(unique.into_iter().collect()).await
    }

    pub async fn create_one_topic(&self, topic: &str) -> Result<bool, KaskaError> {
        Ok(self.create_topics([topic]).await? == 1)
    }

    pub async fn topic_list(&self) -> Result<Vec<String>, KaskaError> {
        self.srv.topic_list().await
    }

    /// Encode `value` with the client codec and append it to `topic`.
    ///
    /// An object the codec cannot encode gives `Ok(false)` and the broker
    /// is never contacted. `Ok(false)` is also returned for a missing topic.
    pub async fn send<T: Serialize + ?Sized>(&self, topic: &str, value: &T) -> Result<bool, KaskaError> {
        let bytes = match self.codec.encode(value) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(topic, error = %e, "payload not serializable, not sent");
                return Ok(false);
            }
        };
        self.srv.send(topic, Payload::from(bytes)).await
    }

    /// Append raw bytes, bypassing the codec.
    pub async fn send_bytes(&self, topic: &str, payload: impl Into<Payload>) -> Result<bool, KaskaError> {
        self.srv.send(topic, payload.into()).await
    }

    /// Point read. Does not touch subscription offsets.
    pub async fn get(&self, topic: &str, offset: u64) -> Result<Option<Record>, KaskaError> {
        let payload = self.srv.get(topic, offset).await?;
        Ok(payload.map(|payload| Record::new(topic, offset, payload)))
    }

    pub async fn end_offsets<I, T>(&self, topics: I) -> Result<Vec<TopicOffset>, KaskaError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.srv.end_offsets(topics.into_iter().map(Into::into).collect()).await
    }

    /// Decode a record's payload with the client codec.
    pub fn decode<T: DeserializeOwned>(&self, record: &Record) -> Result<T, KaskaError> {
        self.codec.decode(record.payload.as_bytes())
    }

    // --- local subscription state ---

    /// Subscribe from offset 0 to every name not already subscribed.
    /// Returns how many were added. The broker is not told.
    pub fn subscribe<I, T>(&mut self, topics: I) -> usize
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut added = 0;
        for topic in topics {
            let topic = topic.into();
            if self.subscriptions.contains_key(&topic) {
                continue;
            }
            self.subscriptions.insert(topic, 0);
            added += 1;
        }
        added
    }

    pub fn subscribe_one_topic(&mut self, topic: &str) -> bool {
        self.subscribe([topic]) == 1
    }

    /// Drop every subscription.
    pub fn unsubscribe(&mut self) {
        self.subscriptions.clear();
    }

    /// Next offset to read for `topic`, `None` when not subscribed.
    pub fn position(&self, topic: &str) -> Option<u64> {
        self.subscriptions.get(topic).copied()
    }

    /// Move the read position of a subscribed topic. Not checked against the
    /// broker: a position past the end just polls empty. `false` (and no new
    /// subscription) when not subscribed.
    pub fn seek(&mut self, topic: &str, offset: u64) -> bool {
        match self.subscriptions.get_mut(topic) {
            Some(next) => {
                *next = offset;
                true
            }
            None => false,
        }
    }

    /// Fetch everything appended since the last poll on every subscribed
    /// topic and advance the local offsets past it.
    ///
    /// Records of one topic come out in offset order; nothing is promised
    /// across topics. With no subscriptions this is an empty result and no
    /// broker call.
    pub async fn poll(&mut self) -> Result<Vec<Record>, KaskaError> {
        if self.subscriptions.is_empty() {
            return Ok(Vec::new());
        }

        let request: Vec<TopicOffset> = self
            .subscriptions
            .iter()
            .map(|(topic, &offset)| TopicOffset::new(topic.clone(), offset))
            .collect();
        let batches = self.srv.poll(request).await?;

        let mut records = Vec::new();
        for (topic, payloads) in batches {
            let Some(next) = self.subscriptions.get_mut(&topic) else {
                tracing::warn!(topic = %topic, "poll returned unrequested topic, ignoring");
                continue;
            };
            let from = *next;
            *next = from + payloads.len() as u64;
            tracing::debug!(topic = %topic, from, count = payloads.len(), "polled records");

            records.extend(
                payloads
                    .into_iter()
                    .zip(from..)
                    .map(|(payload, offset)| Record::new(topic.as_str(), offset, payload)),
            );
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use kaska_api::{ErrorKind, KaskaFuture};
    use kaska_broker::LogStore;

    use super::*;

    fn client_with(topics: &[&str]) -> (KaskaClient<Arc<LogStore>>, Arc<LogStore>) {
        let store = Arc::new(LogStore::new());
        LogStore::create_topics(&store, topics.iter().copied());
        (KaskaClient::with_service(store.clone()), store)
    }

    fn append(store: &LogStore, topic: &str, payload: &[u8]) {
        assert!(LogStore::send(store, topic, payload));
    }

    /// Contract whose every call fails as if the network were down.
    #[derive(Default)]
    struct DownSrv {
        calls: AtomicUsize,
    }

    impl DownSrv {
        fn fail<T>(&self) -> KaskaFuture<'_, T> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(KaskaError::transport("connection refused")) })
        }
    }

    impl KaskaSrv for DownSrv {
        fn create_topics(&self, _: Vec<String>) -> KaskaFuture<'_, usize> {
            self.fail()
        }
        fn topic_list(&self) -> KaskaFuture<'_, Vec<String>> {
            self.fail()
        }
        fn send(&self, _: &str, _: Payload) -> KaskaFuture<'_, bool> {
            self.fail()
        }
        fn get(&self, _: &str, _: u64) -> KaskaFuture<'_, Option<Payload>> {
            self.fail()
        }
        fn end_offsets(&self, _: Vec<String>) -> KaskaFuture<'_, Vec<TopicOffset>> {
            self.fail()
        }
        fn poll(&self, _: Vec<TopicOffset>) -> KaskaFuture<'_, HashMap<String, Vec<Payload>>> {
            self.fail()
        }
    }

    #[tokio::test]
    async fn create_one_topic_only_first_time() {
        let (client, _) = client_with(&[]);
        assert!(client.create_one_topic("t").await.unwrap());
        assert!(!client.create_one_topic("t").await.unwrap());
        assert_eq!(client.topic_list().await.unwrap(), vec!["t".to_string()]);
    }

    #[tokio::test]
    async fn create_topics_dedups_before_sending() {
        let (client, _) = client_with(&["a"]);
        assert_eq!(client.create_topics(["a", "b", "b", "c"]).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn send_encodes_with_codec() {
        let (client, store) = client_with(&["orders"]);
        assert!(client.send("orders", &serde_json::json!({ "id": 1 })).await.unwrap());
        assert_eq!(LogStore::get(&store, "orders", 0).unwrap().as_bytes(), br#"{"id":1}"#);

        let rec = client.get("orders", 0).await.unwrap().unwrap();
        let value: serde_json::Value = client.decode(&rec).unwrap();
        assert_eq!(value["id"], 1);
    }

    #[tokio::test]
    async fn send_to_missing_topic_is_false() {
        let (client, _) = client_with(&[]);
        assert!(!client.send("missing", "hi").await.unwrap());
    }

    #[tokio::test]
    async fn unserializable_send_is_false_without_broker_call() {
        let client = KaskaClient::with_service(DownSrv::default());
        let mut bad = HashMap::new();
        bad.insert((1, 2), 3);

        assert!(!client.send("t", &bad).await.unwrap());
        assert_eq!(client.service().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn get_wraps_record_and_leaves_position() {
        let (mut client, store) = client_with(&["t"]);
        append(&store, "t", b"x");
        client.subscribe_one_topic("t");

        let rec = client.get("t", 0).await.unwrap();
        assert_eq!(rec, Some(Record::new("t", 0, b"x")));
        assert_eq!(client.get("t", 1).await.unwrap(), None);
        assert_eq!(client.get("nope", 0).await.unwrap(), None);
        assert_eq!(client.position("t"), Some(0));
    }

    #[test]
    fn subscribe_is_local_and_idempotent() {
        let (mut client, store) = client_with(&[]);
        assert_eq!(client.subscribe(["a", "b", "a"]), 2);
        assert_eq!(client.subscribe(["b", "c"]), 1);
        assert!(!client.subscribe_one_topic("a"));
        assert_eq!(client.position("c"), Some(0));
        // the broker never heard of these
        assert!(LogStore::topic_list(&store).is_empty());
    }

    #[test]
    fn position_of_unsubscribed_is_none() {
        let (client, _) = client_with(&["t"]);
        assert_eq!(client.position("t"), None);
    }

    #[test]
    fn seek_requires_subscription() {
        let (mut client, _) = client_with(&[]);
        assert!(!client.seek("t", 5));
        assert_eq!(client.position("t"), None);

        client.subscribe_one_topic("t");
        assert!(client.seek("t", 5));
        assert_eq!(client.position("t"), Some(5));
    }

    #[test]
    fn unsubscribe_clears_everything() {
        let (mut client, _) = client_with(&[]);
        client.subscribe(["a", "b"]);
        client.unsubscribe();
        assert_eq!(client.position("a"), None);
        assert_eq!(client.position("b"), None);
        assert!(client.subscribe_one_topic("a"));
    }

    #[tokio::test]
    async fn poll_without_subscriptions_is_empty() {
        let mut client = KaskaClient::with_service(DownSrv::default());
        assert!(client.poll().await.unwrap().is_empty());
        assert_eq!(client.service().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn orders_scenario() {
        let (mut client, store) = client_with(&["orders"]);
        append(&store, "orders", b"A");
        append(&store, "orders", b"B");

        assert_eq!(client.get("orders", 0).await.unwrap().unwrap().payload.as_bytes(), b"A");
        assert_eq!(client.get("orders", 1).await.unwrap().unwrap().payload.as_bytes(), b"B");
        assert_eq!(client.get("orders", 2).await.unwrap(), None);
        assert_eq!(
            client.end_offsets(["orders"]).await.unwrap(),
            vec![TopicOffset::new("orders", 2)]
        );

        assert!(client.subscribe_one_topic("orders"));
        assert_eq!(client.position("orders"), Some(0));

        let records = client.poll().await.unwrap();
        assert_eq!(
            records,
            vec![Record::new("orders", 0, b"A"), Record::new("orders", 1, b"B")]
        );
        assert_eq!(client.position("orders"), Some(2));

        assert!(client.poll().await.unwrap().is_empty());
        assert_eq!(client.position("orders"), Some(2));
    }

    #[tokio::test]
    async fn poll_advances_by_count_and_sees_new_appends() {
        let (mut client, store) = client_with(&["t"]);
        client.subscribe_one_topic("t");
        append(&store, "t", b"0");

        assert_eq!(client.poll().await.unwrap().len(), 1);
        assert_eq!(client.position("t"), Some(1));

        append(&store, "t", b"1");
        append(&store, "t", b"2");
        let records = client.poll().await.unwrap();
        let offsets: Vec<u64> = records.iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![1, 2]);
        assert_eq!(client.position("t"), Some(3));
    }

    #[tokio::test]
    async fn poll_keeps_per_topic_order_and_leaves_idle_topics() {
        let (mut client, store) = client_with(&["a", "b", "idle"]);
        client.subscribe(["a", "b", "idle", "missing"]);
        for i in 0..3u8 {
            append(&store, "a", &[i]);
            append(&store, "b", &[10 + i]);
        }

        let records = client.poll().await.unwrap();
        assert_eq!(records.len(), 6);
        for topic in ["a", "b"] {
            let offsets: Vec<u64> = records.iter().filter(|r| r.topic == topic).map(|r| r.offset).collect();
            assert_eq!(offsets, vec![0, 1, 2]);
        }
        assert_eq!(client.position("a"), Some(3));
        assert_eq!(client.position("b"), Some(3));
        assert_eq!(client.position("idle"), Some(0));
        assert_eq!(client.position("missing"), Some(0));
    }

    #[tokio::test]
    async fn seek_back_replays_and_seek_past_end_polls_empty() {
        let (mut client, store) = client_with(&["t"]);
        client.subscribe_one_topic("t");
        for p in [b"a", b"b", b"c"] {
            append(&store, "t", p);
        }
        client.poll().await.unwrap();

        assert!(client.seek("t", 1));
        let replay = client.poll().await.unwrap();
        assert_eq!(replay, vec![Record::new("t", 1, b"b"), Record::new("t", 2, b"c")]);

        assert!(client.seek("t", 100));
        assert!(client.poll().await.unwrap().is_empty());
        assert_eq!(client.position("t"), Some(100));
    }

    #[tokio::test]
    async fn transport_failure_propagates_and_keeps_offsets() {
        let mut client = KaskaClient::with_service(DownSrv::default());
        client.subscribe_one_topic("t");
        assert!(client.seek("t", 4));

        let err = client.poll().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(client.position("t"), Some(4));

        assert!(client.get("t", 0).await.is_err());
        assert!(client.create_one_topic("t").await.is_err());
        assert!(client.send("t", "x").await.is_err());
    }
}
