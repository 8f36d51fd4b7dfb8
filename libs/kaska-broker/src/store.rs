use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use kaska_api::{KaskaFuture, KaskaSrv, Payload, TopicOffset};

// ═══════════════════════════════════════════════════════════════
//  BrokerState
// ═══════════════════════════════════════════════════════════════

/// Topic name → append-only log. A record's index in its `Vec` is its offset.
#[derive(Debug, Default)]
struct BrokerState {
    topics: HashMap<String, Vec<Payload>>,
}

// ═══════════════════════════════════════════════════════════════
//  LogStore
// ═══════════════════════════════════════════════════════════════

/// In-memory store of every topic log.
///
/// One mutex covers the whole state, so all operations (reads included)
/// form a single total order: a poll never sees half an append, and an
/// append is visible to every call ordered after it. Nothing here awaits
/// or blocks on a condition while holding the lock.
#[derive(Debug, Default)]
pub struct LogStore {
    state: Mutex<BrokerState>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!("log store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Create each name not already present. Duplicates in `names` count
    /// once. Returns the number of topics that did not exist before.
    pub fn create_topics<I, S>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: HashSet<String> = names.into_iter().map(Into::into).collect();
        let mut state = self.lock();
        let mut created = 0;
        for name in names {
            if state.topics.contains_key(&name) {
                continue;
            }
            tracing::debug!(topic = %name, "created topic");
            state.topics.insert(name, Vec::new());
            created += 1;
        }
        created
    }

    pub fn topic_list(&self) -> Vec<String> {
        self.lock().topics.keys().cloned().collect()
    }

    /// Append to `topic`. `false` when the topic does not exist; topics are
    /// never created implicitly.
    pub fn send(&self, topic: &str, payload: impl Into<Payload>) -> bool {
        let mut state = self.lock();
        match state.topics.get_mut(topic) {
            Some(log) => {
                log.push(payload.into());
                tracing::debug!(topic, offset = log.len() - 1, "appended record");
                true
            }
            None => {
                tracing::debug!(topic, "append to unknown topic");
                false
            }
        }
    }

    /// Record at `offset`, or `None` if the topic is missing or the offset
    /// is past the end. The two cases are deliberately indistinguishable.
    pub fn get(&self, topic: &str, offset: u64) -> Option<Payload> {
        let state = self.lock();
        let log = state.topics.get(topic)?;
        let idx = usize::try_from(offset).ok()?;
        log.get(idx).cloned()
    }

    /// Current length of each requested topic that exists, in request order.
    pub fn end_offsets<I, S>(&self, names: I) -> Vec<TopicOffset>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let state = self.lock();
        names
            .into_iter()
            .filter_map(|name| {
                let name = name.as_ref();
                state
                    .topics
                    .get(name)
                    .map(|log| TopicOffset::new(name, log.len() as u64))
            })
            .collect()
    }

    /// For every request whose topic exists and whose offset is below the
    /// current length, the records from that offset to the end of the log.
    /// Everything else is left out of the result.
    pub fn poll<I>(&self, requests: I) -> HashMap<String, Vec<Payload>>
    where
        I: IntoIterator<Item = TopicOffset>,
    {
        let state = self.lock();
        let mut out = HashMap::new();
        for TopicOffset { topic, offset } in requests {
            let Some(log) = state.topics.get(&topic) else {
                continue;
            };
            let Ok(from) = usize::try_from(offset) else {
                continue;
            };
            if from < log.len() {
                out.insert(topic, log[from..].to_vec());
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// KaskaSrv implementation — in-process contract, never fails
// ---------------------------------------------------------------------------

impl KaskaSrv for LogStore {
    fn create_topics(&self, topics: Vec<String>) -> KaskaFuture<'_, usize> {
        Box::pin(async move { Ok(LogStore::create_topics(self, topics)) })
    }

    fn topic_list(&self) -> KaskaFuture<'_, Vec<String>> {
        Box::pin(async move { Ok(LogStore::topic_list(self)) })
    }

    fn send(&self, topic: &str, payload: Payload) -> KaskaFuture<'_, bool> {
        let topic = topic.to_string();
        Box::pin(async move { Ok(LogStore::send(self, &topic, payload)) })
    }

    fn get(&self, topic: &str, offset: u64) -> KaskaFuture<'_, Option<Payload>> {
        let topic = topic.to_string();
        Box::pin(async move { Ok(LogStore::get(self, &topic, offset)) })
    }

    fn end_offsets(&self, topics: Vec<String>) -> KaskaFuture<'_, Vec<TopicOffset>> {
        Box::pin(async move { Ok(LogStore::end_offsets(self, topics)) })
    }

    fn poll(&self, offsets: Vec<TopicOffset>) -> KaskaFuture<'_, HashMap<String, Vec<Payload>>> {
        Box::pin(async move { Ok(LogStore::poll(self, offsets)) })
    }
}
