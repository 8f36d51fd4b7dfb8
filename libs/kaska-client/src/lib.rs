pub mod client;
pub mod codec;
pub mod remote;

pub use client::KaskaClient;
pub use codec::{Codec, JsonCodec};
pub use remote::HttpKaskaSrv;

pub use kaska_api::{ErrorKind, KaskaError, Payload, Record, TopicOffset};
