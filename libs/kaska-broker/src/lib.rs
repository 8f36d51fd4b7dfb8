pub mod config;
pub mod error;
pub mod store;

pub use config::BrokerConfig;
pub use error::BrokerError;
pub use store::LogStore;
