pub mod error;
pub mod types;
pub mod wire;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use error::{ErrorKind, KaskaError};
pub use types::{Payload, Record, TopicOffset};

/// Name the broker binds its contract under unless configured otherwise.
pub const DEFAULT_SERVICE_NAME: &str = "KaskaSrv";

/// Boxed future returned by every contract call.
pub type KaskaFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, KaskaError>> + Send + 'a>>;

// ════════════════════════════════════════════════════════════════
//  Broker contract
// ════════════════════════════════════════════════════════════════

/// The broker's remote contract.
///
/// Implemented in-process by the log store and remotely by the HTTP client.
/// Missing topics and out-of-range offsets are reported inside `Ok`
/// (`false`, `None`, omission); `Err` is reserved for failures of the call
/// itself. The api crate stays free of any runtime dependency.
pub trait KaskaSrv: Send + Sync {
    /// Create every name not yet present. Returns how many were new.
    fn create_topics(&self, topics: Vec<String>) -> KaskaFuture<'_, usize>;

    /// Snapshot of known topic names, in no particular order.
    fn topic_list(&self) -> KaskaFuture<'_, Vec<String>>;

    /// Append `payload` to `topic`. `false` if the topic does not exist.
    fn send(&self, topic: &str, payload: Payload) -> KaskaFuture<'_, bool>;

    /// Point read. `None` if the topic is missing or `offset` is past the end.
    fn get(&self, topic: &str, offset: u64) -> KaskaFuture<'_, Option<Payload>>;

    /// Log length of each requested topic that exists; others are dropped.
    fn end_offsets(&self, topics: Vec<String>) -> KaskaFuture<'_, Vec<TopicOffset>>;

    /// Snapshot read of `[offset, len)` per topic. Topics that are missing
    /// or have nothing at/after `offset` are left out of the map.
    fn poll(&self, offsets: Vec<TopicOffset>) -> KaskaFuture<'_, HashMap<String, Vec<Payload>>>;
}

impl<T: KaskaSrv + ?Sized> KaskaSrv for Arc<T> {
    fn create_topics(&self, topics: Vec<String>) -> KaskaFuture<'_, usize> {
        (**self).create_topics(topics)
    }

    fn topic_list(&self) -> KaskaFuture<'_, Vec<String>> {
        (**self).topic_list()
    }

    fn send(&self, topic: &str, payload: Payload) -> KaskaFuture<'_, bool> {
        (**self).send(topic, payload)
    }

    fn get(&self, topic: &str, offset: u64) -> KaskaFuture<'_, Option<Payload>> {
        (**self).get(topic, offset)
    }

    fn end_offsets(&self, topics: Vec<String>) -> KaskaFuture<'_, Vec<TopicOffset>> {
        (**self).end_offsets(topics)
    }

    fn poll(&self, offsets: Vec<TopicOffset>) -> KaskaFuture<'_, HashMap<String, Vec<Payload>>> {
        (**self).poll(offsets)
    }
}
