#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("config error: {0}")]
    Config(String),
}

impl BrokerError {
    /// Prepend context to the message.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            BrokerError::Config(msg) => BrokerError::Config(format!("{ctx}: {msg}")),
        }
    }
}
