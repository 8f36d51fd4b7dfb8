use serde::Serialize;
use serde::de::DeserializeOwned;

use kaska_api::KaskaError;

/// Turns application objects into record payloads and back.
///
/// The broker never sees anything but the bytes.
pub trait Codec: Send + Sync {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, KaskaError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, KaskaError>;
}

/// JSON via serde_json.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, KaskaError> {
        serde_json::to_vec(value).map_err(|e| KaskaError::codec(format!("encode: {e}")))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, KaskaError> {
        serde_json::from_slice(bytes).map_err(|e| KaskaError::codec(format!("decode: {e}")))
    }
}
