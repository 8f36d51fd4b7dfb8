use base64::Engine;
use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════
//  Payload
// ════════════════════════════════════════════════════════════════

/// Opaque record bytes. The broker never looks inside.
///
/// On the wire a payload is a standard base64 string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Payload(Vec<u8>);

impl Payload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Payload {
    fn from(bytes: &[u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Payload {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Payload {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.0);
        serializer.serialize_str(&encoded)
    }
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let b64 = String::deserialize(deserializer)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.as_bytes())
            .map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

// ════════════════════════════════════════════════════════════════
//  TopicOffset
// ════════════════════════════════════════════════════════════════

/// `(topic, offset)` pair.
///
/// In a poll request it means "read from here"; in an end-offsets response
/// it means "log length", i.e. the offset the next append will receive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicOffset {
    pub topic: String,
    pub offset: u64,
}

impl TopicOffset {
    pub fn new(topic: impl Into<String>, offset: u64) -> Self {
        Self { topic: topic.into(), offset }
    }
}

// ════════════════════════════════════════════════════════════════
//  Record
// ════════════════════════════════════════════════════════════════

/// A payload bound to its permanent `(topic, offset)` position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub topic: String,
    pub offset: u64,
    pub payload: Payload,
}

impl Record {
    pub fn new(topic: impl Into<String>, offset: u64, payload: impl Into<Payload>) -> Self {
        Self {
            topic: topic.into(),
            offset,
            payload: payload.into(),
        }
    }
}
